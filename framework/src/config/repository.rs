//! Process-wide config values, one per type

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

type Values = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

static VALUES: OnceLock<RwLock<Values>> = OnceLock::new();

fn values() -> &'static RwLock<Values> {
    VALUES.get_or_init(|| RwLock::new(HashMap::new()))
}

pub(super) fn register<T: Any + Send + Sync>(value: T) {
    values()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(TypeId::of::<T>(), Box::new(value));
}

pub(super) fn get<T: Any + Send + Sync + Clone>() -> Option<T> {
    values()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&TypeId::of::<T>())?
        .downcast_ref::<T>()
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Limits {
        max: usize,
    }

    #[derive(Clone)]
    struct NeverRegistered;

    #[test]
    fn test_register_replaces_by_type() {
        register(Limits { max: 1 });
        register(Limits { max: 2 });

        assert_eq!(get::<Limits>(), Some(Limits { max: 2 }));
        assert!(get::<NeverRegistered>().is_none());
    }
}
