//! Request body validation against the entity's column definitions.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnKind, EntityDef, LinkDef};
use chrono::DateTime;
use serde_json::{Map, Value};

/// Longest text accepted for a VARCHAR column.
pub const MAX_TEXT_LENGTH: usize = 255;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full body (create / update). Required columns must be present and non-null.
    pub fn validate(body: &Map<String, Value>, def: &EntityDef) -> Result<(), AppError> {
        validate_id(body)?;
        for col in def.columns {
            let val = body.get(col.field);
            if col.required && val.map_or(true, Value::is_null) {
                return Err(AppError::Validation(format!("{} is required", col.field)));
            }
            if let Some(v) = val {
                validate_field(col, v)?;
            }
        }
        validate_links(body, def)
    }

    /// Validate only the fields present in body (merge patch). Required is not enforced.
    pub fn validate_partial(body: &Map<String, Value>, def: &EntityDef) -> Result<(), AppError> {
        validate_id(body)?;
        for (field, v) in body {
            if let Some(col) = def.column_by_field(field) {
                validate_field(col, v)?;
            }
        }
        validate_links(body, def)
    }
}

/// Accept a body only when it is a JSON object.
pub fn body_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::Validation("request body must be a JSON object".into()))
}

fn validate_id(body: &Map<String, Value>) -> Result<(), AppError> {
    match body.get("id") {
        None | Some(Value::Null) => Ok(()),
        Some(v) if v.as_i64().is_some() => Ok(()),
        Some(_) => Err(AppError::Validation("id must be an integer".into())),
    }
}

fn validate_field(col: &ColumnDef, v: &Value) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    let field = col.field;
    match col.kind {
        ColumnKind::BigInt => {
            if v.as_i64().is_none() {
                return Err(AppError::Validation(format!("{} must be an integer", field)));
            }
        }
        ColumnKind::Text => {
            let s = v
                .as_str()
                .ok_or_else(|| AppError::Validation(format!("{} must be a string", field)))?;
            if s.chars().count() > MAX_TEXT_LENGTH {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, MAX_TEXT_LENGTH
                )));
            }
        }
        ColumnKind::Instant => {
            let ok = v.as_str().map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok());
            if !ok {
                return Err(AppError::Validation(format!("{} must be an RFC 3339 instant", field)));
            }
        }
        ColumnKind::Enum(allowed) => {
            if !v.as_str().map_or(false, |s| allowed.contains(&s)) {
                return Err(AppError::Validation(format!("{} must be one of: {:?}", field, allowed)));
            }
        }
        ColumnKind::Reference(_) => validate_reference(field, v)?,
    }
    Ok(())
}

fn validate_reference(field: &str, v: &Value) -> Result<(), AppError> {
    let ok = v
        .as_object()
        .and_then(|o| o.get("id"))
        .map_or(false, |id| id.as_i64().is_some());
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{} must be an object with an integer id", field)))
    }
}

fn validate_links(body: &Map<String, Value>, def: &EntityDef) -> Result<(), AppError> {
    for link in def.links {
        if let Some(v) = body.get(link.name) {
            validate_link(link, v)?;
        }
    }
    Ok(())
}

fn validate_link(link: &LinkDef, v: &Value) -> Result<(), AppError> {
    match v {
        Value::Null => Ok(()),
        Value::Array(items) => items.iter().try_for_each(|item| validate_reference(link.name, item)),
        _ => Err(AppError::Validation(format!("{} must be an array", link.name))),
    }
}
