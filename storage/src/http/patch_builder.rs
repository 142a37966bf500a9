//! JSON merge-patch payloads.

use serde::Serialize;
use serde_json::{Map, Value};

/// An untyped PATCH body. Fields set to `null` ask the service to delete them, fields never
/// mentioned are left alone.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PatchBuilder {
    patch: Map<String, Value>,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the patch that turns `original` into `updated`. Nested objects are compared field
    /// by field, arrays and scalars are replaced as a whole and fields missing from `updated`
    /// become `null`.
    pub fn diff<T: Serialize>(original: &T, updated: &T) -> Self {
        match (serde_json::to_value(original), serde_json::to_value(updated)) {
            (Ok(Value::Object(original)), Ok(Value::Object(updated))) => Self {
                patch: diff_objects(&original, &updated),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.patch.insert(name.to_string(), value.into());
        self
    }

    /// Sets `name` to the JSON form of `value`.
    pub fn set_serialized<T: Serialize>(&mut self, name: &str, value: &T) -> &mut Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.patch.insert(name.to_string(), value);
        self
    }

    /// Sets `name` to an int64 value, which travels as a decimal string.
    pub fn set_int64(&mut self, name: &str, value: i64) -> &mut Self {
        self.set_field(name, value.to_string())
    }

    pub fn remove_field(&mut self, name: &str) -> &mut Self {
        self.patch.insert(name.to_string(), Value::Null);
        self
    }

    /// Nests `sub` under `name`. An empty sub-patch is not added.
    pub fn add_sub_patch(&mut self, name: &str, sub: PatchBuilder) -> &mut Self {
        if !sub.is_empty() {
            self.patch.insert(name.to_string(), Value::Object(sub.patch));
        }
        self
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.patch.clone())
    }

    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

fn diff_objects(original: &Map<String, Value>, updated: &Map<String, Value>) -> Map<String, Value> {
    let mut patch = Map::new();
    for (name, value) in updated {
        match (original.get(name), value) {
            (Some(old), new) if old == new => {}
            (Some(Value::Object(old)), Value::Object(new)) => {
                patch.insert(name.clone(), Value::Object(diff_objects(old, new)));
            }
            _ => {
                patch.insert(name.clone(), value.clone());
            }
        }
    }
    for name in original.keys() {
        if !updated.contains_key(name) {
            patch.insert(name.clone(), Value::Null);
        }
    }
    patch
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn diff_of_equal_values_is_empty() {
        let value = json!({"a": 1, "b": {"c": [1, 2]}});
        assert!(PatchBuilder::diff(&value, &value).is_empty());
        assert_eq!(PatchBuilder::diff(&value, &value).to_json_string(), "{}");
    }

    #[test]
    fn diff_nested_and_removed_fields() {
        let original = json!({"a": 1, "b": {"c": 1, "d": 2}, "e": [1, 2], "gone": "x"});
        let updated = json!({"a": 1, "b": {"c": 1, "d": 3}, "e": [2], "new": true});
        let patch = PatchBuilder::diff(&original, &updated);
        assert_eq!(
            patch.to_value(),
            json!({"b": {"d": 3}, "e": [2], "new": true, "gone": null})
        );
    }

    #[test]
    fn explicit_fields() {
        let mut sub = PatchBuilder::new();
        sub.set_field("enabled", true);
        let mut patch = PatchBuilder::new();
        patch
            .set_field("name", "bucket")
            .remove_field("website")
            .set_int64("metageneration", 7)
            .add_sub_patch("versioning", sub)
            .add_sub_patch("labels", PatchBuilder::new());
        assert_eq!(
            patch.to_value(),
            json!({"name": "bucket", "website": null, "metageneration": "7", "versioning": {"enabled": true}})
        );
    }
}
