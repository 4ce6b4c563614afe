//! Adapter between the upstream inventory service's JSON records and the
//! domain models.
//!
//! The upstream service uses abbreviated, inconsistently cased keys
//! (`minquantity`, `contactperson`, `materialid`, ...). Every key the adapter
//! understands is declared in the field tables below; the first key present
//! with a non-null value wins.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::{
    parse_timestamp, Material, MaterialInput, StockDirection, Supplier, SupplierInput,
    Transaction, TransactionInput,
};
use crate::validation::validate_rating_range;

/// Why a single upstream record could not be mapped
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has an invalid value: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// One internal field and the upstream keys it may arrive under
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: &'static str,
    pub wire_keys: &'static [&'static str],
}

const fn field_spec(field: &'static str, wire_keys: &'static [&'static str]) -> FieldSpec {
    FieldSpec { field, wire_keys }
}

pub const MATERIAL_FIELDS: &[FieldSpec] = &[
    field_spec("id", &["id"]),
    field_spec("name", &["name"]),
    field_spec("category", &["category"]),
    field_spec("unit", &["unit"]),
    field_spec("current_stock", &["quantity", "current_stock", "currentstock"]),
    field_spec("min_stock_level", &["minquantity", "min_quantity", "minstock", "min_stock"]),
    field_spec("max_stock_level", &["maxquantity", "max_quantity", "maxstock", "max_stock"]),
    field_spec("unit_price", &["price", "unitprice", "unit_price"]),
    field_spec("supplier_id", &["supplierid", "supplier_id"]),
    field_spec("supplier_name", &["supplier", "supplier_name"]),
    field_spec("location", &["location"]),
    field_spec("last_updated", &["lastupdated", "last_updated"]),
];

pub const TRANSACTION_FIELDS: &[FieldSpec] = &[
    field_spec("id", &["id"]),
    field_spec("material_id", &["materialid", "material_id"]),
    field_spec("material_name", &["materialname", "material_name"]),
    field_spec("type", &["type"]),
    field_spec("quantity", &["quantity"]),
    field_spec("reference_number", &["reference", "reference_number"]),
    field_spec("supplier_id", &["supplierid", "supplier_id"]),
    field_spec("supplier_name", &["supplier", "supplier_name"]),
    field_spec("notes", &["notes"]),
    field_spec("created_at", &["date", "timestamp", "created_at"]),
    field_spec("created_by", &["user", "recorded_by", "created_by"]),
];

pub const SUPPLIER_FIELDS: &[FieldSpec] = &[
    field_spec("id", &["id"]),
    field_spec("name", &["name"]),
    field_spec("contact_person", &["contactperson", "contact_person"]),
    field_spec("email", &["email"]),
    field_spec("phone", &["phone"]),
    field_spec("address", &["address"]),
    field_spec("materials", &["materials"]),
    field_spec("rating", &["rating"]),
    field_spec("is_active", &["active", "is_active", "isactive"]),
];

/// Upstream materials without an explicit maximum are assumed to hold up to
/// twice their minimum level.
pub const DEFAULT_MAX_STOCK_FACTOR: Decimal = Decimal::TWO;

/// Largest quantity or price accepted from upstream. Keeps every product and
/// sum the reports compute well inside `Decimal` range.
pub const MAX_WIRE_MAGNITUDE: i64 = 10_000_000_000;

/// Outcome of mapping a list of upstream records
#[derive(Debug, Clone)]
pub struct MappedRecords<T> {
    pub records: Vec<T>,
    /// Index into the input list and the reason the record was skipped
    pub rejected: Vec<(usize, MappingError)>,
}

/// Map every record, keeping the ones that convert and collecting the rest
pub fn map_records<T>(
    values: &[Value],
    mapper: impl Fn(&Value) -> Result<T, MappingError>,
) -> MappedRecords<T> {
    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    for (index, value) in values.iter().enumerate() {
        match mapper(value) {
            Ok(record) => records.push(record),
            Err(e) => rejected.push((index, e)),
        }
    }
    MappedRecords { records, rejected }
}

// ============================================================================
// Wire -> domain
// ============================================================================

pub fn material_from_wire(value: &Value) -> Result<Material, MappingError> {
    let record = WireRecord::new(value, MATERIAL_FIELDS)?;

    let current_stock = record.non_negative_decimal("current_stock")?;
    let min_stock_level = record.non_negative_decimal("min_stock_level")?;
    let max_stock_level = match record.opt_non_negative_decimal("max_stock_level")? {
        Some(max) => max,
        None => min_stock_level
            .checked_mul(DEFAULT_MAX_STOCK_FACTOR)
            .ok_or_else(|| MappingError::InvalidField {
                field: "max_stock_level",
                reason: "default maximum is out of range".to_string(),
            })?,
    };

    Ok(Material {
        id: record.id("id")?,
        name: record.string("name")?,
        category: record.opt_string("category").unwrap_or_default(),
        unit: record.opt_string("unit").unwrap_or_default(),
        current_stock,
        min_stock_level,
        max_stock_level,
        unit_price: record.non_negative_decimal("unit_price")?,
        supplier_id: record.opt_id("supplier_id"),
        supplier_name: record.opt_string("supplier_name"),
        location: record.opt_string("location").unwrap_or_default(),
        last_updated: record
            .opt_string("last_updated")
            .and_then(|raw| parse_timestamp(&raw)),
    })
}

pub fn transaction_from_wire(value: &Value) -> Result<Transaction, MappingError> {
    let record = WireRecord::new(value, TRANSACTION_FIELDS)?;

    let direction_code = record.string("type")?;
    let direction =
        StockDirection::parse(&direction_code).ok_or_else(|| MappingError::InvalidField {
            field: "type",
            reason: format!("unknown direction `{}`", direction_code),
        })?;

    let created_at_raw = record.opt_string("created_at").unwrap_or_default();
    let created_at = parse_timestamp(&created_at_raw);

    Ok(Transaction {
        id: record.id("id")?,
        material_id: record.id("material_id")?,
        material_name: record.opt_string("material_name"),
        direction,
        quantity: record.non_negative_decimal("quantity")?,
        reference_number: record.opt_string("reference_number").unwrap_or_default(),
        supplier_id: record.opt_id("supplier_id"),
        supplier_name: record.opt_string("supplier_name"),
        notes: record.opt_string("notes"),
        created_at_raw,
        created_at,
        created_by: record.opt_string("created_by").unwrap_or_default(),
    })
}

pub fn supplier_from_wire(value: &Value) -> Result<Supplier, MappingError> {
    let record = WireRecord::new(value, SUPPLIER_FIELDS)?;

    let rating = record.opt_decimal("rating")?.unwrap_or(Decimal::ZERO);
    validate_rating_range(rating).map_err(|reason| MappingError::InvalidField {
        field: "rating",
        reason: format!("{} ({})", reason, rating),
    })?;

    Ok(Supplier {
        id: record.id("id")?,
        name: record.string("name")?,
        contact_person: record.opt_string("contact_person").unwrap_or_default(),
        email: record.opt_string("email").unwrap_or_default(),
        phone: record.opt_string("phone").unwrap_or_default(),
        address: record.opt_string("address").unwrap_or_default(),
        materials: record.string_list("materials")?,
        rating,
        is_active: record.opt_bool("is_active")?.unwrap_or(true),
    })
}

// ============================================================================
// Domain -> wire (mutation payloads)
// ============================================================================

pub fn material_to_wire(input: &MaterialInput) -> Value {
    let mut payload = json!({
        "name": input.name,
        "category": input.category,
        "unit": input.unit,
        "quantity": decimal_to_wire(input.current_stock),
        "min_quantity": decimal_to_wire(input.min_stock_level),
        "price": decimal_to_wire(input.unit_price),
        "supplier": input.supplier_name.clone().unwrap_or_default(),
        "location": input.location,
    });
    if let (Some(max), Some(object)) = (input.max_stock_level, payload.as_object_mut()) {
        object.insert("max_quantity".to_string(), decimal_to_wire(max));
    }
    payload
}

pub fn supplier_to_wire(input: &SupplierInput) -> Value {
    json!({
        "name": input.name,
        "contact_person": input.contact_person,
        "email": input.email,
        "phone": input.phone,
        "address": input.address,
        "materials": input.materials.join(","),
        "rating": decimal_to_wire(input.rating),
        "active": input.is_active,
    })
}

pub fn transaction_to_wire(input: &TransactionInput) -> Value {
    json!({
        "material_id": input.material_id,
        "material_name": input.material_name,
        "type": input.direction.code(),
        "quantity": decimal_to_wire(input.quantity),
        "reference": input.reference_number,
        "supplier": input.supplier_name,
        "notes": input.notes,
        "user": input.created_by,
    })
}

/// Upstream expects plain JSON numbers
fn decimal_to_wire(value: Decimal) -> Value {
    value
        .to_string()
        .parse::<serde_json::Number>()
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// ============================================================================
// Field access
// ============================================================================

struct WireRecord<'a> {
    object: &'a Map<String, Value>,
    table: &'static [FieldSpec],
}

impl<'a> WireRecord<'a> {
    fn new(value: &'a Value, table: &'static [FieldSpec]) -> Result<Self, MappingError> {
        let object = value.as_object().ok_or(MappingError::NotAnObject)?;
        Ok(Self { object, table })
    }

    fn lookup(&self, field: &'static str) -> Option<&'a Value> {
        let entry = self.table.iter().find(|entry| entry.field == field)?;
        entry
            .wire_keys
            .iter()
            .filter_map(|key| self.object.get(*key))
            .find(|value| !value.is_null())
    }

    fn opt_string(&self, field: &'static str) -> Option<String> {
        match self.lookup(field)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn string(&self, field: &'static str) -> Result<String, MappingError> {
        self.opt_string(field)
            .ok_or(MappingError::MissingField(field))
    }

    /// Ids arrive as strings or integers
    fn opt_id(&self, field: &'static str) -> Option<String> {
        match self.lookup(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn id(&self, field: &'static str) -> Result<String, MappingError> {
        self.opt_id(field).ok_or(MappingError::MissingField(field))
    }

    fn opt_decimal(&self, field: &'static str) -> Result<Option<Decimal>, MappingError> {
        let Some(value) = self.lookup(field) else {
            return Ok(None);
        };
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().to_string(),
            other => {
                return Err(MappingError::InvalidField {
                    field,
                    reason: format!("expected a number, got {}", other),
                })
            }
        };
        let value = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| MappingError::InvalidField {
                field,
                reason: format!("`{}` is not a number", text),
            })?;
        if value.abs() > Decimal::from(MAX_WIRE_MAGNITUDE) {
            return Err(MappingError::InvalidField {
                field,
                reason: format!("{} exceeds {}", value, MAX_WIRE_MAGNITUDE),
            });
        }
        Ok(Some(value))
    }

    fn opt_non_negative_decimal(
        &self,
        field: &'static str,
    ) -> Result<Option<Decimal>, MappingError> {
        match self.opt_decimal(field)? {
            Some(value) if value < Decimal::ZERO => Err(MappingError::InvalidField {
                field,
                reason: format!("{} is negative", value),
            }),
            other => Ok(other),
        }
    }

    fn non_negative_decimal(&self, field: &'static str) -> Result<Decimal, MappingError> {
        self.opt_non_negative_decimal(field)?
            .ok_or(MappingError::MissingField(field))
    }

    fn opt_bool(&self, field: &'static str) -> Result<Option<bool>, MappingError> {
        let Some(value) = self.lookup(field) else {
            return Ok(None);
        };
        match value {
            Value::Bool(b) => Ok(Some(*b)),
            Value::Number(n) => Ok(Some(n.as_f64().map(|v| v != 0.0).unwrap_or(false))),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Some(true)),
                "false" | "0" | "no" => Ok(Some(false)),
                other => Err(MappingError::InvalidField {
                    field,
                    reason: format!("`{}` is not a boolean", other),
                }),
            },
            other => Err(MappingError::InvalidField {
                field,
                reason: format!("expected a boolean, got {}", other),
            }),
        }
    }

    /// Comma-joined string or JSON array of strings
    fn string_list(&self, field: &'static str) -> Result<Vec<String>, MappingError> {
        let Some(value) = self.lookup(field) else {
            return Ok(Vec::new());
        };
        match value {
            Value::String(s) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()),
            Value::Array(items) => Ok(items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()),
            other => Err(MappingError::InvalidField {
                field,
                reason: format!("expected a list, got {}", other),
            }),
        }
    }
}
