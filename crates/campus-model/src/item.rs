//! List items.
//!
//! A [`ListItem`] is one row of a paginated collection. Its shape is
//! schema-less: an id plus a JSON object of fields. Backends disagree on
//! where the id lives (`id` vs `_id`) and on its type (string vs integer),
//! so conversion from raw JSON normalizes both.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

/// Field map of a list item.
pub type Fields = Map<String, Value>;

/// Keys that may carry the record id, in lookup order.
const ID_KEYS: [&str; 2] = ["id", "_id"];

/// Stable identifier of a list item.
///
/// Selection and CRUD reconciliation are keyed by this id, never by row index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id from a JSON value. Strings and integers are accepted.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One row/card of a paginated collection.
///
/// Serializes as a single flat JSON object with `id` next to the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ListItem {
    /// Stable id, unique across pages.
    pub id: ItemId,
    /// Every other field of the record.
    pub fields: Fields,
}

impl ListItem {
    /// Create an item from an id and its fields.
    pub fn new(id: impl Into<ItemId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Look up a field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Render a scalar field as text.
    ///
    /// Strings are returned as-is, numbers and booleans through their JSON
    /// form. Nulls, arrays and objects have no text form.
    pub fn text(&self, name: &str) -> Option<String> {
        self.field(name).and_then(scalar_text)
    }

    /// Overwrite exactly the keys present in `patch`.
    ///
    /// An `id` key inside the patch is ignored; ids are immutable.
    pub fn merge(&mut self, patch: &Fields) {
        for (key, value) in patch {
            if ID_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Convert a raw JSON record into an item.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(ModelError::NotAnObject {
                found: json_type_name(&value),
            });
        };

        let id = ID_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(ItemId::from_json))
            .ok_or(ModelError::MissingId)?;

        for key in ID_KEYS {
            fields.remove(key);
        }

        Ok(Self { id, fields })
    }

    /// Convert the item back into a flat JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert("id".to_string(), Value::String(self.id.0.clone()));
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl TryFrom<Value> for ListItem {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<ListItem> for Value {
    fn from(item: ListItem) -> Self {
        item.to_value()
    }
}

/// Text form of a scalar JSON value.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Short name of a JSON value's type, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_string_id() {
        let item = ListItem::from_value(json!({"id": "c-1", "title": "React Basics"})).unwrap();
        assert_eq!(item.id.as_str(), "c-1");
        assert_eq!(item.text("title").as_deref(), Some("React Basics"));
        assert!(item.field("id").is_none());
    }

    #[test]
    fn test_from_value_underscore_id_and_number() {
        let item = ListItem::from_value(json!({"_id": 42, "seats": 12})).unwrap();
        assert_eq!(item.id.as_str(), "42");
        assert_eq!(item.text("seats").as_deref(), Some("12"));
    }

    #[test]
    fn test_from_value_rejects_missing_id() {
        let err = ListItem::from_value(json!({"title": "No id"})).unwrap_err();
        assert_eq!(err, ModelError::MissingId);

        let err = ListItem::from_value(json!({"id": ""})).unwrap_err();
        assert_eq!(err, ModelError::MissingId);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = ListItem::from_value(json!(["a"])).unwrap_err();
        assert_eq!(err, ModelError::NotAnObject { found: "array" });
    }

    #[test]
    fn test_merge_overwrites_only_patched_keys() {
        let mut item =
            ListItem::from_value(json!({"id": "1", "title": "Old", "status": "draft"})).unwrap();
        let patch = json!({"title": "New", "id": "other"});
        item.merge(patch.as_object().unwrap());

        assert_eq!(item.id.as_str(), "1");
        assert_eq!(item.text("title").as_deref(), Some("New"));
        assert_eq!(item.text("status").as_deref(), Some("draft"));
    }

    #[test]
    fn test_serde_flat_shape() {
        let item = ListItem::from_value(json!({"id": "7", "title": "Vue"})).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"id": "7", "title": "Vue"}));

        let back: ListItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }
}
