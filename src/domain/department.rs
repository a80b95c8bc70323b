use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, IdRef, Record, RelationPath};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use serde::{Deserialize, Serialize};

pub static DEPARTMENT: EntityDef = EntityDef {
    name: "department",
    path: "departments",
    table: "department",
    columns: &[
        ColumnDef::text("department_name", "departmentName").required(),
        ColumnDef::reference("location_id", "location", "location"),
    ],
    links: &[],
    paginated: false,
};

static EMPLOYEES: RelationPath = RelationPath {
    table: "employee",
    owner_column: "department_id",
    value_column: "id",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Department {
    pub id: Option<i64>,
    pub department_name: Option<String>,
    pub location_id: Option<i64>,
}

impl Entity for Department {
    type Criteria = DepartmentCriteria;

    fn def() -> &'static EntityDef {
        &DEPARTMENT
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("department_name", self.department_name.clone())
            .with("location_id", self.location_id)
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Department {
            id: record.id,
            department_name: record.text("department_name"),
            location_id: record.int("location_id"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub location: Option<IdRef>,
}

impl Dto for DepartmentDto {
    type Entity = Department;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Department) -> Self {
        DepartmentDto {
            id: e.id,
            department_name: e.department_name.clone(),
            location: IdRef::option(e.location_id),
        }
    }

    fn into_entity(self) -> Department {
        Department {
            id: self.id,
            department_name: self.department_name,
            location_id: self.location.map(|l| l.id),
        }
    }

    fn merge_into(self, e: &mut Department) {
        if let Some(v) = self.department_name {
            e.department_name = Some(v);
        }
        if let Some(l) = self.location {
            e.location_id = Some(l.id);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepartmentCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub department_name: Option<StringFilter>,
    pub location_id: Option<RangeFilter<i64>>,
    pub employee_id: Option<RangeFilter<i64>>,
}

impl Criteria for DepartmentCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(DepartmentCriteria {
            id: p.range("id")?,
            department_name: p.string("departmentName")?,
            location_id: p.range("locationId")?,
            employee_id: p.range("employeeId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("department_name"), &self.department_name)
            .filter(Target::Column("location_id"), &self.location_id)
            .filter(Target::Related(&EMPLOYEES), &self.employee_id)
            .build()
    }
}
