//! `application/x-www-form-urlencoded` codec.
//!
//! # Responsibilities
//! - Flatten a record into key/value pairs (encode)
//! - Rebuild a record from key/value pairs using its [`FormSchema`] (decode)
//!
//! # Design Decisions
//! - Encode goes through the JSON tree so field naming follows the serde
//!   attributes without a second naming scheme
//! - Nested objects cannot be flattened and are dropped on encode, not rejected
//! - Decode starts from the type's `Default` and overlays declared fields;
//!   the first value of a repeated key wins unless the field is `repeated`

mod schema;
mod values;

use serde_json::{Map, Value};

use crate::codec::{ensure_settable, Codec, CodecError, Payload, Target, APPLICATION_FORM};

pub use schema::{FormField, FormSchema, ScalarKind};
pub use values::FormValues;

#[derive(Debug, Default, Clone, Copy)]
pub struct FormCodec;

impl Codec for FormCodec {
    fn content_type(&self) -> &'static str {
        APPLICATION_FORM
    }

    fn marshal(&self, value: &dyn Payload) -> Result<Vec<u8>, CodecError> {
        let src = value.to_json()?;
        let tree: Map<String, Value> = serde_json::from_slice(&src)?;
        Ok(flatten(&tree).encode().into_bytes())
    }

    fn unmarshal(&self, src: &[u8], target: &mut dyn Target) -> Result<(), CodecError> {
        ensure_settable(target)?;
        let values = FormValues::parse(src)?;

        let mut tree = match target.default_tree()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for field in target.form_fields() {
            if let Some(value) = unflatten_field(field, &values)? {
                tree.insert(field.name.to_owned(), value);
            }
        }

        target.assign_tree(Value::Object(tree))
    }
}

fn flatten(tree: &Map<String, Value>) -> FormValues {
    let mut values = FormValues::new();
    for (key, value) in tree {
        match value {
            Value::Array(items) => {
                for text in items.iter().filter_map(scalar_text) {
                    values.append(key.as_str(), text);
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    values.set(key.as_str(), text);
                }
            }
        }
    }
    values
}

/// Default text of a scalar; `None` for null, objects and arrays.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn unflatten_field(field: &FormField, values: &FormValues) -> Result<Option<Value>, CodecError> {
    if field.repeated {
        let Some(all) = values.get(field.name) else {
            return Ok(None);
        };
        let items = all
            .iter()
            .map(|text| field.kind.convert(field.name, text))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(Value::Array(items)));
    }

    values
        .first(field.name)
        .map(|text| field.kind.convert(field.name, text))
        .transpose()
}
