use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, LinkRef, Record, RelationPath};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use serde::{Deserialize, Serialize};

pub static TASK: EntityDef = EntityDef {
    name: "task",
    path: "tasks",
    table: "task",
    columns: &[
        ColumnDef::text("title", "title"),
        ColumnDef::text("description", "description"),
    ],
    links: &[],
    paginated: false,
};

static JOBS: RelationPath = RelationPath {
    table: "rel_job__task",
    owner_column: "task_id",
    value_column: "job_id",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Entity for Task {
    type Criteria = TaskCriteria;

    fn def() -> &'static EntityDef {
        &TASK
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("title", self.title.clone())
            .with("description", self.description.clone())
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Task {
            id: record.id,
            title: record.text("title"),
            description: record.text("description"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Dto for TaskDto {
    type Entity = Task;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Task) -> Self {
        TaskDto {
            id: e.id,
            title: e.title.clone(),
            description: e.description.clone(),
        }
    }

    fn into_entity(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description,
        }
    }

    fn merge_into(self, e: &mut Task) {
        if let Some(v) = self.title {
            e.title = Some(v);
        }
        if let Some(v) = self.description {
            e.description = Some(v);
        }
    }
}

/// `{id, title}` projection of a task inside a job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<&LinkRef> for TaskRef {
    fn from(link: &LinkRef) -> Self {
        TaskRef {
            id: link.id,
            title: link.label.clone(),
        }
    }
}

impl From<TaskRef> for LinkRef {
    fn from(r: TaskRef) -> Self {
        LinkRef {
            id: r.id,
            label: r.title,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub title: Option<StringFilter>,
    pub description: Option<StringFilter>,
    pub job_id: Option<RangeFilter<i64>>,
}

impl Criteria for TaskCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(TaskCriteria {
            id: p.range("id")?,
            title: p.string("title")?,
            description: p.string("description")?,
            job_id: p.range("jobId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("title"), &self.title)
            .filter(Target::Column("description"), &self.description)
            .filter(Target::Related(&JOBS), &self.job_id)
            .build()
    }
}
