use super::{Container, Table};
use crate::error::FrameworkError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Records grouped by category, persisted as a JSON object of arrays
///
/// Categories keep the order they had in the file. Each category is its own
/// id scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<(String, Table)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, or replace the table of an existing one
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        match self.category_mut(&name) {
            Some(existing) => *existing = table,
            None => self.categories.push((name, table)),
        }
    }

    pub fn category(&self, name: &str) -> Option<&Table> {
        self.categories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.categories
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Category names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.categories.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Container for Catalog {
    type Scope = String;

    fn table(&self, scope: &String) -> Result<&Table, FrameworkError> {
        self.category(scope)
            .ok_or_else(|| FrameworkError::invalid_category(scope.as_str()))
    }

    fn table_mut(&mut self, scope: &String) -> Result<&mut Table, FrameworkError> {
        self.category_mut(scope)
            .ok_or_else(|| FrameworkError::invalid_category(scope.as_str()))
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, table) in &self.categories {
            map.serialize_entry(name, table)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping category names to arrays of records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some((name, table)) = access.next_entry::<String, Table>()? {
                    catalog.insert(name, table);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
