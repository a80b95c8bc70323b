use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, IdRef, Record, RelationPath};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub static EMPLOYEE: EntityDef = EntityDef {
    name: "employee",
    path: "employees",
    table: "employee",
    columns: &[
        ColumnDef::text("first_name", "firstName"),
        ColumnDef::text("last_name", "lastName"),
        ColumnDef::text("email", "email"),
        ColumnDef::text("phone_number", "phoneNumber"),
        ColumnDef::instant("hire_date", "hireDate"),
        ColumnDef::big_int("salary", "salary"),
        ColumnDef::big_int("commission_pct", "commissionPct"),
        ColumnDef::reference("manager_id", "manager", "employee"),
        ColumnDef::reference("department_id", "department", "department"),
    ],
    links: &[],
    paginated: true,
};

static JOBS: RelationPath = RelationPath {
    table: "job",
    owner_column: "employee_id",
    value_column: "id",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Employee {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub hire_date: Option<DateTime<Utc>>,
    pub salary: Option<i64>,
    pub commission_pct: Option<i64>,
    pub manager_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl Entity for Employee {
    type Criteria = EmployeeCriteria;

    fn def() -> &'static EntityDef {
        &EMPLOYEE
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("first_name", self.first_name.clone())
            .with("last_name", self.last_name.clone())
            .with("email", self.email.clone())
            .with("phone_number", self.phone_number.clone())
            .with("hire_date", self.hire_date)
            .with("salary", self.salary)
            .with("commission_pct", self.commission_pct)
            .with("manager_id", self.manager_id)
            .with("department_id", self.department_id)
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Employee {
            id: record.id,
            first_name: record.text("first_name"),
            last_name: record.text("last_name"),
            email: record.text("email"),
            phone_number: record.text("phone_number"),
            hire_date: record.instant("hire_date"),
            salary: record.int("salary"),
            commission_pct: record.int("commission_pct"),
            manager_id: record.int("manager_id"),
            department_id: record.int("department_id"),
        })
    }
}

/// Manager is projected as `{id}` only, which is where the self-reference stops.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub hire_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub commission_pct: Option<i64>,
    #[serde(default)]
    pub manager: Option<IdRef>,
    #[serde(default)]
    pub department: Option<IdRef>,
}

impl Dto for EmployeeDto {
    type Entity = Employee;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Employee) -> Self {
        EmployeeDto {
            id: e.id,
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            email: e.email.clone(),
            phone_number: e.phone_number.clone(),
            hire_date: e.hire_date,
            salary: e.salary,
            commission_pct: e.commission_pct,
            manager: IdRef::option(e.manager_id),
            department: IdRef::option(e.department_id),
        }
    }

    fn into_entity(self) -> Employee {
        Employee {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            hire_date: self.hire_date,
            salary: self.salary,
            commission_pct: self.commission_pct,
            manager_id: self.manager.map(|m| m.id),
            department_id: self.department.map(|d| d.id),
        }
    }

    fn merge_into(self, e: &mut Employee) {
        if let Some(v) = self.first_name {
            e.first_name = Some(v);
        }
        if let Some(v) = self.last_name {
            e.last_name = Some(v);
        }
        if let Some(v) = self.email {
            e.email = Some(v);
        }
        if let Some(v) = self.phone_number {
            e.phone_number = Some(v);
        }
        if let Some(v) = self.hire_date {
            e.hire_date = Some(v);
        }
        if let Some(v) = self.salary {
            e.salary = Some(v);
        }
        if let Some(v) = self.commission_pct {
            e.commission_pct = Some(v);
        }
        if let Some(m) = self.manager {
            e.manager_id = Some(m.id);
        }
        if let Some(d) = self.department {
            e.department_id = Some(d.id);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployeeCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub first_name: Option<StringFilter>,
    pub last_name: Option<StringFilter>,
    pub email: Option<StringFilter>,
    pub phone_number: Option<StringFilter>,
    pub hire_date: Option<RangeFilter<DateTime<Utc>>>,
    pub salary: Option<RangeFilter<i64>>,
    pub commission_pct: Option<RangeFilter<i64>>,
    pub job_id: Option<RangeFilter<i64>>,
    pub manager_id: Option<RangeFilter<i64>>,
    pub department_id: Option<RangeFilter<i64>>,
}

impl Criteria for EmployeeCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(EmployeeCriteria {
            id: p.range("id")?,
            first_name: p.string("firstName")?,
            last_name: p.string("lastName")?,
            email: p.string("email")?,
            phone_number: p.string("phoneNumber")?,
            hire_date: p.range("hireDate")?,
            salary: p.range("salary")?,
            commission_pct: p.range("commissionPct")?,
            job_id: p.range("jobId")?,
            manager_id: p.range("managerId")?,
            department_id: p.range("departmentId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("first_name"), &self.first_name)
            .filter(Target::Column("last_name"), &self.last_name)
            .filter(Target::Column("email"), &self.email)
            .filter(Target::Column("phone_number"), &self.phone_number)
            .filter(Target::Column("hire_date"), &self.hire_date)
            .filter(Target::Column("salary"), &self.salary)
            .filter(Target::Column("commission_pct"), &self.commission_pct)
            .filter(Target::Related(&JOBS), &self.job_id)
            .filter(Target::Column("manager_id"), &self.manager_id)
            .filter(Target::Column("department_id"), &self.department_id)
            .build()
    }
}
