use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, IdRef, Record, RelationPath};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use serde::{Deserialize, Serialize};

pub static COUNTRY: EntityDef = EntityDef {
    name: "country",
    path: "countries",
    table: "country",
    columns: &[
        ColumnDef::text("country_name", "countryName"),
        ColumnDef::reference("region_id", "region", "region"),
    ],
    links: &[],
    paginated: false,
};

static LOCATIONS: RelationPath = RelationPath {
    table: "location",
    owner_column: "country_id",
    value_column: "id",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Country {
    pub id: Option<i64>,
    pub country_name: Option<String>,
    pub region_id: Option<i64>,
}

impl Entity for Country {
    type Criteria = CountryCriteria;

    fn def() -> &'static EntityDef {
        &COUNTRY
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("country_name", self.country_name.clone())
            .with("region_id", self.region_id)
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Country {
            id: record.id,
            country_name: record.text("country_name"),
            region_id: record.int("region_id"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub region: Option<IdRef>,
}

impl Dto for CountryDto {
    type Entity = Country;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Country) -> Self {
        CountryDto {
            id: e.id,
            country_name: e.country_name.clone(),
            region: IdRef::option(e.region_id),
        }
    }

    fn into_entity(self) -> Country {
        Country {
            id: self.id,
            country_name: self.country_name,
            region_id: self.region.map(|r| r.id),
        }
    }

    fn merge_into(self, e: &mut Country) {
        if let Some(v) = self.country_name {
            e.country_name = Some(v);
        }
        if let Some(r) = self.region {
            e.region_id = Some(r.id);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub country_name: Option<StringFilter>,
    pub region_id: Option<RangeFilter<i64>>,
    pub location_id: Option<RangeFilter<i64>>,
}

impl Criteria for CountryCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(CountryCriteria {
            id: p.range("id")?,
            country_name: p.string("countryName")?,
            region_id: p.range("regionId")?,
            location_id: p.range("locationId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("country_name"), &self.country_name)
            .filter(Target::Column("region_id"), &self.region_id)
            .filter(Target::Related(&LOCATIONS), &self.location_id)
            .build()
    }
}
