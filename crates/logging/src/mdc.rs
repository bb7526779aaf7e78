//! crates/logging/src/mdc.rs
//! Mapped diagnostic context helpers.

use hierlog_backend::mdc;

/// Stores `value` under `key` in the calling thread's diagnostic context,
/// always overwriting. Returns the previous value.
pub fn mdc_put(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    mdc::put(key, value)
}

/// Removes `key` from the calling thread's diagnostic context.
pub fn mdc_remove(key: &str) -> Option<String> {
    mdc::remove(key)
}

/// Value of `key` in the calling thread's diagnostic context.
pub fn mdc_get(key: &str) -> Option<String> {
    mdc::get(key)
}

/// Sets a context entry for the lifetime of the guard.
///
/// On drop the previous value is restored, or the key removed if it had
/// none. Guards must be dropped on the thread that created them, which the
/// type enforces by not being `Send`.
#[derive(Debug)]
#[must_use = "the entry is restored as soon as the guard is dropped"]
pub struct MdcScope {
    key: String,
    previous: Option<String>,
    _not_send: std::marker::PhantomData<*const ()>,
}

impl MdcScope {
    /// Puts `key = value` and remembers what it replaced.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let previous = mdc::put(key.clone(), value);
        Self {
            key,
            previous,
            _not_send: std::marker::PhantomData,
        }
    }

    /// Key this guard manages.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for MdcScope {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                mdc::put(self.key.clone(), previous);
            }
            None => {
                mdc::remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_returns_previous_value() {
        mdc_remove("mdc-put");
        assert_eq!(mdc_put("mdc-put", "1"), None);
        assert_eq!(mdc_put("mdc-put", "2").as_deref(), Some("1"));
        assert_eq!(mdc_remove("mdc-put").as_deref(), Some("2"));
    }

    #[test]
    fn scope_removes_new_key() {
        {
            let scope = MdcScope::new("mdc-scope-new", "v");
            assert_eq!(scope.key(), "mdc-scope-new");
            assert_eq!(mdc_get("mdc-scope-new").as_deref(), Some("v"));
        }
        assert_eq!(mdc_get("mdc-scope-new"), None);
    }

    #[test]
    fn nested_scopes_restore_in_order() {
        mdc_put("mdc-nested", "outer");
        {
            let _a = MdcScope::new("mdc-nested", "a");
            {
                let _b = MdcScope::new("mdc-nested", "b");
                assert_eq!(mdc_get("mdc-nested").as_deref(), Some("b"));
            }
            assert_eq!(mdc_get("mdc-nested").as_deref(), Some("a"));
        }
        assert_eq!(mdc_get("mdc-nested").as_deref(), Some("outer"));
        mdc_remove("mdc-nested");
    }
}
