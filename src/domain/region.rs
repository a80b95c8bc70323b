use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, Record, RelationPath};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use serde::{Deserialize, Serialize};

pub static REGION: EntityDef = EntityDef {
    name: "region",
    path: "regions",
    table: "region",
    columns: &[ColumnDef::text("region_name", "regionName")],
    links: &[],
    paginated: false,
};

static COUNTRIES: RelationPath = RelationPath {
    table: "country",
    owner_column: "region_id",
    value_column: "id",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    pub id: Option<i64>,
    pub region_name: Option<String>,
}

impl Entity for Region {
    type Criteria = RegionCriteria;

    fn def() -> &'static EntityDef {
        &REGION
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id).with("region_name", self.region_name.clone())
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Region {
            id: record.id,
            region_name: record.text("region_name"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub region_name: Option<String>,
}

impl Dto for RegionDto {
    type Entity = Region;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Region) -> Self {
        RegionDto {
            id: e.id,
            region_name: e.region_name.clone(),
        }
    }

    fn into_entity(self) -> Region {
        Region {
            id: self.id,
            region_name: self.region_name,
        }
    }

    fn merge_into(self, e: &mut Region) {
        if let Some(v) = self.region_name {
            e.region_name = Some(v);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub region_name: Option<StringFilter>,
    pub country_id: Option<RangeFilter<i64>>,
}

impl Criteria for RegionCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(RegionCriteria {
            id: p.range("id")?,
            region_name: p.string("regionName")?,
            country_id: p.range("countryId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("region_name"), &self.region_name)
            .filter(Target::Related(&COUNTRIES), &self.country_id)
            .build()
    }
}
