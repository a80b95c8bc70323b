use crate::error::AppError;
use crate::model::{ColumnDef, Dto, Entity, EntityDef, IdRef, Record};
use crate::query::{Criteria, FilterParams, Predicate, PredicateBuilder, RangeFilter, StringFilter, Target};
use serde::{Deserialize, Serialize};

pub static LOCATION: EntityDef = EntityDef {
    name: "location",
    path: "locations",
    table: "location",
    columns: &[
        ColumnDef::text("street_address", "streetAddress"),
        ColumnDef::text("postal_code", "postalCode"),
        ColumnDef::text("city", "city"),
        ColumnDef::text("state_province", "stateProvince"),
        ColumnDef::reference("country_id", "country", "country"),
    ],
    links: &[],
    paginated: false,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Location {
    pub id: Option<i64>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country_id: Option<i64>,
}

impl Entity for Location {
    type Criteria = LocationCriteria;

    fn def() -> &'static EntityDef {
        &LOCATION
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("street_address", self.street_address.clone())
            .with("postal_code", self.postal_code.clone())
            .with("city", self.city.clone())
            .with("state_province", self.state_province.clone())
            .with("country_id", self.country_id)
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(Location {
            id: record.id,
            street_address: record.text("street_address"),
            postal_code: record.text("postal_code"),
            city: record.text("city"),
            state_province: record.text("state_province"),
            country_id: record.int("country_id"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub country: Option<IdRef>,
}

impl Dto for LocationDto {
    type Entity = Location;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_entity(e: &Location) -> Self {
        LocationDto {
            id: e.id,
            street_address: e.street_address.clone(),
            postal_code: e.postal_code.clone(),
            city: e.city.clone(),
            state_province: e.state_province.clone(),
            country: IdRef::option(e.country_id),
        }
    }

    fn into_entity(self) -> Location {
        Location {
            id: self.id,
            street_address: self.street_address,
            postal_code: self.postal_code,
            city: self.city,
            state_province: self.state_province,
            country_id: self.country.map(|c| c.id),
        }
    }

    fn merge_into(self, e: &mut Location) {
        if let Some(v) = self.street_address {
            e.street_address = Some(v);
        }
        if let Some(v) = self.postal_code {
            e.postal_code = Some(v);
        }
        if let Some(v) = self.city {
            e.city = Some(v);
        }
        if let Some(v) = self.state_province {
            e.state_province = Some(v);
        }
        if let Some(c) = self.country {
            e.country_id = Some(c.id);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub street_address: Option<StringFilter>,
    pub postal_code: Option<StringFilter>,
    pub city: Option<StringFilter>,
    pub state_province: Option<StringFilter>,
    pub country_id: Option<RangeFilter<i64>>,
}

impl Criteria for LocationCriteria {
    fn from_params(p: &mut FilterParams) -> Result<Self, AppError> {
        Ok(LocationCriteria {
            id: p.range("id")?,
            street_address: p.string("streetAddress")?,
            postal_code: p.string("postalCode")?,
            city: p.string("city")?,
            state_province: p.string("stateProvince")?,
            country_id: p.range("countryId")?,
        })
    }

    fn to_predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .filter(Target::Id, &self.id)
            .filter(Target::Column("street_address"), &self.street_address)
            .filter(Target::Column("postal_code"), &self.postal_code)
            .filter(Target::Column("city"), &self.city)
            .filter(Target::Column("state_province"), &self.state_province)
            .filter(Target::Column("country_id"), &self.country_id)
            .build()
    }
}
