//! CRUD operations over one stored collection
//!
//! A [`Resource`] bundles a [`Store`] with the entity label used in messages
//! and the fields a new record must carry. Every verb resolves the scope
//! first (an unknown category fails before any id lookup), then the id.

use crate::error::FrameworkError;
use crate::store::{Catalog, Container, Record, Store};
use serde_json::Value;

pub struct Resource<C> {
    store: Store<C>,
    entity: &'static str,
    required: &'static [&'static str],
}

impl<C: Container> Resource<C> {
    /// `entity` is the singular label used in error messages ("user")
    pub fn new(store: Store<C>, entity: &'static str) -> Self {
        Self {
            store,
            entity,
            required: &[],
        }
    }

    /// Fields that must be present and non-null when creating a record
    pub fn required(mut self, fields: &'static [&'static str]) -> Self {
        self.required = fields;
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn store(&self) -> &Store<C> {
        &self.store
    }

    /// Fail unless `scope` names a table in the container
    ///
    /// Lets a handler reject an unknown category before it looks at the id.
    pub async fn check_scope(&self, scope: &C::Scope) -> Result<(), FrameworkError> {
        self.store.read(|c| c.table(scope).map(|_| ())).await
    }

    /// Every record in the scope, in stored order
    pub async fn list(&self, scope: &C::Scope) -> Result<Vec<Record>, FrameworkError> {
        self.store
            .read(|c| Ok(c.table(scope)?.iter().cloned().collect()))
            .await
    }

    /// The whole container as JSON
    pub async fn all(&self) -> Result<Value, FrameworkError> {
        self.store
            .read(|c| serde_json::to_value(c))
            .await
            .map_err(|e| FrameworkError::internal(e.to_string()))
    }

    pub async fn show(&self, scope: &C::Scope, id: i64) -> Result<Record, FrameworkError> {
        self.store
            .read(|c| {
                c.table(scope)?
                    .find(id)
                    .cloned()
                    .ok_or_else(|| FrameworkError::not_found(self.entity, id))
            })
            .await
    }

    /// Append `body` under the next free id
    ///
    /// The new record starts with its `id`; any `id` in the body is ignored.
    pub async fn create(&self, scope: &C::Scope, body: Record) -> Result<Record, FrameworkError> {
        self.store
            .write(|c| {
                let table = c.table_mut(scope)?;
                self.validate(&body)?;

                let record = with_id(table.next_id()?, body);
                table.append(record.clone());
                Ok(record)
            })
            .await
    }

    /// Replace the record wholesale, keeping only its id
    pub async fn replace(
        &self,
        scope: &C::Scope,
        id: i64,
        body: Record,
    ) -> Result<Record, FrameworkError> {
        self.store
            .write(|c| {
                let table = c.table_mut(scope)?;
                let index = table
                    .position(id)
                    .ok_or_else(|| FrameworkError::not_found(self.entity, id))?;

                let record = with_id(id, body);
                table.replace_at(index, record.clone());
                Ok(record)
            })
            .await
    }

    /// Shallow-merge `body` over the record; fields not in `body` are kept
    pub async fn merge(
        &self,
        scope: &C::Scope,
        id: i64,
        body: Record,
    ) -> Result<Record, FrameworkError> {
        self.store
            .write(|c| {
                let entity = self.entity;
                let not_found = || FrameworkError::not_found(entity, id);

                let table = c.table_mut(scope)?;
                let index = table.position(id).ok_or_else(not_found)?;
                let record = table.get_mut(index).ok_or_else(not_found)?;

                for (key, value) in body {
                    if key != "id" {
                        record.insert(key, value);
                    }
                }
                Ok(record.clone())
            })
            .await
    }

    /// Remove the record and return it
    pub async fn remove(&self, scope: &C::Scope, id: i64) -> Result<Record, FrameworkError> {
        self.store
            .write(|c| {
                let table = c.table_mut(scope)?;
                let index = table
                    .position(id)
                    .ok_or_else(|| FrameworkError::not_found(self.entity, id))?;
                Ok(table.remove_at(index))
            })
            .await
    }

    fn validate(&self, body: &Record) -> Result<(), FrameworkError> {
        let missing = self
            .required
            .iter()
            .any(|field| body.get(*field).map_or(true, Value::is_null));

        if missing {
            return Err(FrameworkError::ValidationFailure {
                entity: self.entity,
                fields: self.required.iter().map(|f| f.to_string()).collect(),
            });
        }
        Ok(())
    }
}

impl Resource<Catalog> {
    /// Category names in stored order
    pub async fn categories(&self) -> Vec<String> {
        self.store
            .read(|c| c.names().map(str::to_string).collect())
            .await
    }
}

fn with_id(id: i64, body: Record) -> Record {
    let mut record = Record::new();
    record.insert("id".to_string(), Value::from(id));
    record.extend(body.into_iter().filter(|(key, _)| key != "id"));
    record
}
