//! Bind [`Scalar`] values to PostgreSQL queries.

use crate::model::Scalar;
use chrono::{DateTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

impl<'q> Encode<'q, Postgres> for Scalar {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            Scalar::Null => IsNull::Yes,
            Scalar::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            Scalar::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf)?,
            Scalar::Instant(t) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(t, buf)?,
        })
    }

    /// Declare the wire type per variant so the binary encoding matches what the server expects.
    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            Scalar::Null | Scalar::Text(_) => <String as Type<Postgres>>::type_info(),
            Scalar::Int(_) => <i64 as Type<Postgres>>::type_info(),
            Scalar::Instant(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for Scalar {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}
