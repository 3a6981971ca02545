//! Append-only table of registered schemas.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::schema::Schema;

/// Schemas registered during one rewrite pass.
///
/// Ids are dense and start at 0: each is the registry's size at the time
/// of registration. Equal schemas from different call sites get different
/// ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: Schema) -> usize {
        let id = self.schemas.len();
        self.schemas.push(schema);
        id
    }

    pub fn get(&self, id: usize) -> Option<&Schema> {
        self.schemas.get(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Schema)> {
        self.schemas.iter().enumerate()
    }

    /// The type manifest: a JSON object keyed by id, pretty-printed.
    pub fn to_manifest(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for SchemaRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schemas.len()))?;
        for (id, schema) in self.iter() {
            map.serialize_entry(&id.to_string(), schema)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_never_deduplicated() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.register(Schema::String), 0);
        assert_eq!(registry.register(Schema::String), 1);
        assert_eq!(registry.register(Schema::Number), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(1), Some(&Schema::String));
        assert_eq!(registry.get(3), None);
    }

    #[test]
    fn serializes_as_an_object_keyed_by_id() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::Boolean);
        registry.register(Schema::Array {
            element_type: Box::new(Schema::Undefined),
        });
        assert_eq!(
            serde_json::to_string(&registry).unwrap(),
            r#"{"0":{"name":"boolean"},"1":{"name":"array","elementType":{"name":"undefined"}}}"#
        );
    }

    #[test]
    fn manifest_is_pretty_printed() {
        assert_eq!(SchemaRegistry::new().to_manifest().unwrap(), "{}");

        let mut registry = SchemaRegistry::new();
        registry.register(Schema::Boolean);
        assert_eq!(
            registry.to_manifest().unwrap(),
            "{\n  \"0\": {\n    \"name\": \"boolean\"\n  }\n}"
        );
    }
}
