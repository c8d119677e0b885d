//! Response validation against a workflow's expected shape.
//!
//! Checks are shallow on purpose: key presence and coarse JSON kind. Array
//! lengths and string contents are not inspected.

use crate::content::GeneratedContent;
use crate::workflow::{FieldKind, KeySpec, WorkflowSpec};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    Malformed(String),
    #[error("response key `{key}` {reason}")]
    Incomplete { key: String, reason: String },
}

impl ValidationError {
    fn missing(key: String) -> Self {
        ValidationError::Incomplete {
            key,
            reason: "is missing".to_string(),
        }
    }

    fn mistyped(key: String, kind: &FieldKind) -> Self {
        ValidationError::Incomplete {
            key,
            reason: format!("should be {}", kind.describe()),
        }
    }
}

/// Parse raw model text and check it against the workflow's expected keys
pub fn validate(raw: &str, spec: &WorkflowSpec) -> Result<GeneratedContent, ValidationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    // Valid JSON of the wrong kind lacks every key, so it is checked as empty
    let Value::Object(object) = value else {
        check_object(&Map::new(), spec.keys, "")?;
        return Err(ValidationError::mistyped(String::new(), &FieldKind::Object(spec.keys)));
    };

    check_object(&object, spec.keys, "")?;
    Ok(GeneratedContent::new(spec.workflow, object))
}

fn check_object(
    object: &Map<String, Value>,
    keys: &[KeySpec],
    path: &str,
) -> Result<(), ValidationError> {
    for key in keys {
        let full = if path.is_empty() {
            key.name.to_string()
        } else {
            format!("{}.{}", path, key.name)
        };

        match object.get(key.name) {
            None | Some(Value::Null) if !key.required => {}
            None => return Err(ValidationError::missing(full)),
            Some(value) => check_value(value, &key.kind, &full)?,
        }
    }
    Ok(())
}

fn check_value(value: &Value, kind: &FieldKind, path: &str) -> Result<(), ValidationError> {
    let matches = match (kind, value) {
        (FieldKind::Text, Value::String(_)) => true,
        (FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (FieldKind::TextList, Value::Array(items)) => items.iter().all(Value::is_string),
        (FieldKind::Object(children), Value::Object(inner)) => {
            return check_object(inner, children, path);
        }
        (FieldKind::ObjectList(children), Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, index);
                match item {
                    Value::Object(inner) => check_object(inner, children, &item_path)?,
                    _ => {
                        return Err(ValidationError::mistyped(
                            item_path,
                            &FieldKind::Object(*children),
                        ));
                    }
                }
            }
            true
        }
        _ => false,
    };

    if matches {
        Ok(())
    } else {
        Err(ValidationError::mistyped(path.to_string(), kind))
    }
}
