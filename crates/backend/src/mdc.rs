//! crates/backend/src/mdc.rs
//! Thread-local mapped diagnostic context.
//!
//! Each thread owns an ordered key/value map. Records copy the map of the
//! emitting thread so layouts can render it with `%X` or `%X{key}`.

use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static MDC: RefCell<BTreeMap<String, String>> = const { RefCell::new(BTreeMap::new()) };
}

/// Stores `value` under `key` for the calling thread, replacing any previous
/// mapping. Returns the replaced value.
pub fn put(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    MDC.with(|mdc| mdc.borrow_mut().insert(key.into(), value.into()))
}

/// Returns the value stored under `key` for the calling thread.
#[must_use]
pub fn get(key: &str) -> Option<String> {
    MDC.with(|mdc| mdc.borrow().get(key).cloned())
}

/// Removes `key` from the calling thread's context, returning its value.
pub fn remove(key: &str) -> Option<String> {
    MDC.with(|mdc| mdc.borrow_mut().remove(key))
}

/// Removes every entry from the calling thread's context.
pub fn clear() {
    MDC.with(|mdc| mdc.borrow_mut().clear());
}

/// Copies the calling thread's context.
#[must_use]
pub fn snapshot() -> BTreeMap<String, String> {
    MDC.with(|mdc| mdc.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_and_returns_previous() {
        clear();
        assert_eq!(put("x", "1"), None);
        assert_eq!(put("x", "2"), Some("1".to_owned()));
        assert_eq!(get("x").as_deref(), Some("2"));
        clear();
    }

    #[test]
    fn remove_missing_key_is_harmless() {
        clear();
        assert_eq!(remove("missing"), None);
        put("k", "v");
        assert_eq!(remove("k").as_deref(), Some("v"));
        assert!(snapshot().is_empty());
    }

    #[test]
    fn context_is_per_thread() {
        clear();
        put("owner", "main");
        let other = std::thread::spawn(snapshot).join().unwrap();
        assert!(other.is_empty());
        assert_eq!(get("owner").as_deref(), Some("main"));
        clear();
    }

    #[test]
    fn snapshot_is_sorted_by_key() {
        clear();
        put("y", "foo");
        put("x", "3");
        let keys: Vec<_> = snapshot().into_keys().collect();
        assert_eq!(keys, ["x", "y"]);
        clear();
    }
}
