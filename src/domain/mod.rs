//! HR domain: entities, DTOs with their mappers, and criteria.

pub mod country;
pub mod department;
pub mod employee;
pub mod job;
pub mod job_history;
pub mod location;
pub mod region;
pub mod task;

pub use country::{Country, CountryCriteria, CountryDto, COUNTRY};
pub use department::{Department, DepartmentCriteria, DepartmentDto, DEPARTMENT};
pub use employee::{Employee, EmployeeCriteria, EmployeeDto, EMPLOYEE};
pub use job::{Job, JobCriteria, JobDto, JOB};
pub use job_history::{JobHistory, JobHistoryCriteria, JobHistoryDto, Language, JOB_HISTORY};
pub use location::{Location, LocationCriteria, LocationDto, LOCATION};
pub use region::{Region, RegionCriteria, RegionDto, REGION};
pub use task::{Task, TaskCriteria, TaskDto, TaskRef, TASK};

use crate::model::EntityDef;

/// All entities, each after the tables it references.
pub static ENTITY_DEFS: &[&EntityDef] = &[
    &REGION,
    &COUNTRY,
    &LOCATION,
    &DEPARTMENT,
    &TASK,
    &EMPLOYEE,
    &JOB,
    &JOB_HISTORY,
];
