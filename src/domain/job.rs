use crate::domain::task::TaskRef;
use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, IdRef, LinkDef, LinkRef, Record, RelationPath};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use serde::{Deserialize, Serialize};

pub static JOB: EntityDef = EntityDef {
    name: "job",
    path: "jobs",
    table: "job",
    columns: &[
        ColumnDef::text("job_title", "jobTitle"),
        ColumnDef::big_int("min_salary", "minSalary"),
        ColumnDef::big_int("max_salary", "maxSalary"),
        ColumnDef::reference("employee_id", "employee", "employee"),
    ],
    links: &[TASKS_LINK],
    paginated: true,
};

const TASKS_LINK: LinkDef = LinkDef {
    name: "tasks",
    join_table: "rel_job__task",
    owner_column: "job_id",
    target_column: "task_id",
    target_table: "task",
    label_column: "title",
};

static TASKS: RelationPath = RelationPath {
    table: "rel_job__task",
    owner_column: "job_id",
    value_column: "task_id",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Job {
    pub id: Option<i64>,
    pub job_title: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub tasks: Vec<LinkRef>,
    pub employee_id: Option<i64>,
}

impl Entity for Job {
    type Criteria = JobCriteria;

    fn def() -> &'static EntityDef {
        &JOB
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("job_title", self.job_title.clone())
            .with("min_salary", self.min_salary)
            .with("max_salary", self.max_salary)
            .with("employee_id", self.employee_id)
            .with_links(TASKS_LINK.name, self.tasks.clone())
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Job {
            id: record.id,
            job_title: record.text("job_title"),
            min_salary: record.int("min_salary"),
            max_salary: record.int("max_salary"),
            tasks: record.links(TASKS_LINK.name).to_vec(),
            employee_id: record.int("employee_id"),
        })
    }
}

/// Tasks are projected as `{id, title}`; a task never carries its jobs back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub min_salary: Option<i64>,
    #[serde(default)]
    pub max_salary: Option<i64>,
    #[serde(default)]
    pub tasks: Option<Vec<TaskRef>>,
    #[serde(default)]
    pub employee: Option<IdRef>,
}

impl Dto for JobDto {
    type Entity = Job;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Job) -> Self {
        JobDto {
            id: e.id,
            job_title: e.job_title.clone(),
            min_salary: e.min_salary,
            max_salary: e.max_salary,
            tasks: Some(e.tasks.iter().map(TaskRef::from).collect()),
            employee: IdRef::option(e.employee_id),
        }
    }

    fn into_entity(self) -> Job {
        Job {
            id: self.id,
            job_title: self.job_title,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            tasks: self.tasks.unwrap_or_default().into_iter().map(LinkRef::from).collect(),
            employee_id: self.employee.map(|e| e.id),
        }
    }

    fn merge_into(self, e: &mut Job) {
        if let Some(v) = self.job_title {
            e.job_title = Some(v);
        }
        if let Some(v) = self.min_salary {
            e.min_salary = Some(v);
        }
        if let Some(v) = self.max_salary {
            e.max_salary = Some(v);
        }
        if let Some(tasks) = self.tasks {
            e.tasks = tasks.into_iter().map(LinkRef::from).collect();
        }
        if let Some(emp) = self.employee {
            e.employee_id = Some(emp.id);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub job_title: Option<StringFilter>,
    pub min_salary: Option<RangeFilter<i64>>,
    pub max_salary: Option<RangeFilter<i64>>,
    pub task_id: Option<RangeFilter<i64>>,
    pub employee_id: Option<RangeFilter<i64>>,
}

impl Criteria for JobCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(JobCriteria {
            id: p.range("id")?,
            job_title: p.string("jobTitle")?,
            min_salary: p.range("minSalary")?,
            max_salary: p.range("maxSalary")?,
            task_id: p.range("taskId")?,
            employee_id: p.range("employeeId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("job_title"), &self.job_title)
            .filter(Target::Column("min_salary"), &self.min_salary)
            .filter(Target::Column("max_salary"), &self.max_salary)
            .filter(Target::Related(&TASKS), &self.task_id)
            .filter(Target::Column("employee_id"), &self.employee_id)
            .build()
    }
}
