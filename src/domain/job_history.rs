use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, IdRef, Record};
use crate::query::{Criteria, Filter, FilterParams, FilterValue, Predicate, PredicateBuilder, RangeFilter, Target};
use crate::model::Scalar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    French,
    English,
    Spanish,
}

impl Language {
    pub const VALUES: &'static [&'static str] = &["FRENCH", "ENGLISH", "SPANISH"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::French => "FRENCH",
            Language::English => "ENGLISH",
            Language::Spanish => "SPANISH",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FRENCH" => Ok(Language::French),
            "ENGLISH" => Ok(Language::English),
            "SPANISH" => Ok(Language::Spanish),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}

impl FilterValue for Language {
    fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Text(self.as_str().to_string())
    }
}

pub static JOB_HISTORY: EntityDef = EntityDef {
    name: "jobHistory",
    path: "job-histories",
    table: "job_history",
    columns: &[
        ColumnDef::instant("start_date", "startDate"),
        ColumnDef::instant("end_date", "endDate"),
        ColumnDef::enumeration("language", "language", Language::VALUES),
        ColumnDef::reference("job_id", "job", "job"),
        ColumnDef::reference("department_id", "department", "department"),
        ColumnDef::reference("employee_id", "employee", "employee"),
    ],
    links: &[],
    paginated: true,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobHistory {
    pub id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub language: Option<Language>,
    pub job_id: Option<i64>,
    pub department_id: Option<i64>,
    pub employee_id: Option<i64>,
}

impl Entity for JobHistory {
    type Criteria = JobHistoryCriteria;

    fn def() -> &'static EntityDef {
        &JOB_HISTORY
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("start_date", self.start_date)
            .with("end_date", self.end_date)
            .with("language", self.language.map(|l| l.as_str()))
            .with("job_id", self.job_id)
            .with("department_id", self.department_id)
            .with("employee_id", self.employee_id)
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        let language = record
            .text("language")
            .map(|s| s.parse::<Language>())
            .transpose()
            .map_err(|e| AppError::Db(sqlx::Error::Decode(e.into())))?;
        Ok(JobHistory {
            id: record.id,
            start_date: record.instant("start_date"),
            end_date: record.instant("end_date"),
            language,
            job_id: record.int("job_id"),
            department_id: record.int("department_id"),
            employee_id: record.int("employee_id"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub job: Option<IdRef>,
    #[serde(default)]
    pub department: Option<IdRef>,
    #[serde(default)]
    pub employee: Option<IdRef>,
}

impl Dto for JobHistoryDto {
    type Entity = JobHistory;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &JobHistory) -> Self {
        JobHistoryDto {
            id: e.id,
            start_date: e.start_date,
            end_date: e.end_date,
            language: e.language,
            job: IdRef::option(e.job_id),
            department: IdRef::option(e.department_id),
            employee: IdRef::option(e.employee_id),
        }
    }

    fn into_entity(self) -> JobHistory {
        JobHistory {
            id: self.id,
            start_date: self.start_date,
            end_date: self.end_date,
            language: self.language,
            job_id: self.job.map(|r| r.id),
            department_id: self.department.map(|r| r.id),
            employee_id: self.employee.map(|r| r.id),
        }
    }

    fn merge_into(self, e: &mut JobHistory) {
        if let Some(v) = self.start_date {
            e.start_date = Some(v);
        }
        if let Some(v) = self.end_date {
            e.end_date = Some(v);
        }
        if let Some(v) = self.language {
            e.language = Some(v);
        }
        if let Some(r) = self.job {
            e.job_id = Some(r.id);
        }
        if let Some(r) = self.department {
            e.department_id = Some(r.id);
        }
        if let Some(r) = self.employee {
            e.employee_id = Some(r.id);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobHistoryCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub start_date: Option<RangeFilter<DateTime<Utc>>>,
    pub end_date: Option<RangeFilter<DateTime<Utc>>>,
    pub language: Option<Filter<Language>>,
    pub job_id: Option<RangeFilter<i64>>,
    pub department_id: Option<RangeFilter<i64>>,
    pub employee_id: Option<RangeFilter<i64>>,
}

impl Criteria for JobHistoryCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(JobHistoryCriteria {
            id: p.range("id")?,
            start_date: p.range("startDate")?,
            end_date: p.range("endDate")?,
            language: p.basic("language")?,
            job_id: p.range("jobId")?,
            department_id: p.range("departmentId")?,
            employee_id: p.range("employeeId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("start_date"), &self.start_date)
            .filter(Target::Column("end_date"), &self.end_date)
            .filter(Target::Column("language"), &self.language)
            .filter(Target::Column("job_id"), &self.job_id)
            .filter(Target::Column("department_id"), &self.department_id)
            .filter(Target::Column("employee_id"), &self.employee_id)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_uses_upper_case_on_the_wire() {
        let dto = JobHistoryDto { language: Some(Language::Spanish), ..Default::default() };
        assert_eq!(serde_json::to_value(&dto).unwrap()["language"], "SPANISH");
        assert_eq!("FRENCH".parse::<Language>(), Ok(Language::French));
        assert!("french".parse::<Language>().is_err());
    }

    #[test]
    fn language_filter_rejects_unknown_values() {
        let mut p = FilterParams::from_pairs([("language.equals".to_string(), "KLINGON".to_string())]);
        assert!(JobHistoryCriteria::from_params(&mut p).is_err());
    }

    #[test]
    fn unknown_stored_language_is_a_decode_error() {
        let r = Record::new(Some(1)).with("language", "KLINGON");
        assert!(matches!(JobHistory::from_record(r), Err(AppError::Db(_))));
    }
}
