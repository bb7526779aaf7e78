//! crates/logging/src/mdc_init.rs
//! Per-thread diagnostic-context setup hooks.
//!
//! Callers register functions that populate the mapped diagnostic context
//! of a thread (a worker id, a request tag, ...). Every thread runs the
//! registered list once, on its first emission through the owning
//! [`LogSystem`](crate::LogSystem), before its record reaches the backend.
//!
//! # Ordering
//!
//! A function registered before a thread first emits runs on that thread
//! exactly once. A function registered after a thread has already
//! initialized runs on the registering thread immediately and on threads
//! that have not yet emitted; threads that already initialized do not replay
//! it.
//!
//! Registered functions run while the registration lock is held and must
//! not register further functions.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

type InitFn = Box<dyn Fn() + Send + Sync>;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Ids of the registries whose list already ran on this thread.
    #[allow(clippy::missing_const_for_thread_local)]
    static INITIALIZED: RefCell<HashSet<u64>> = RefCell::new(HashSet::new());
}

/// Receipt returned by registration.
///
/// Holding it is optional; it exists so registration can initialise a
/// `static`, e.g. through [`std::sync::LazyLock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use = "registration already happened; bind the token to make that explicit"]
pub struct MdcInitToken {
    index: usize,
}

impl MdcInitToken {
    /// Zero-based position of the function in its registry.
    pub const fn index(self) -> usize {
        self.index
    }
}

pub(crate) struct MdcInitRegistry {
    id: u64,
    functions: Mutex<Vec<InitFn>>,
}

impl MdcInitRegistry {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            functions: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<InitFn>> {
        self.functions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_thread_initialized(&self) -> bool {
        INITIALIZED.with(|set| set.borrow().contains(&self.id))
    }

    /// Marks the calling thread; returns `false` if it was already marked.
    fn mark_thread(&self) -> bool {
        INITIALIZED.with(|set| set.borrow_mut().insert(self.id))
    }

    pub(crate) fn register<F>(&self, function: F) -> MdcInitToken
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut functions = self.lock();
        if self.mark_thread() {
            // This thread has not emitted yet; bring it up to date so the
            // new function does not run twice on its first emission.
            for existing in functions.iter() {
                existing();
            }
        }
        function();
        functions.push(Box::new(function));
        let token = MdcInitToken {
            index: functions.len() - 1,
        };
        drop(functions);
        tracing::trace!(
            target: "hierlog::mdc",
            index = token.index,
            "registered MDC init function"
        );
        token
    }

    pub(crate) fn ensure_thread_initialized(&self) {
        if self.is_thread_initialized() {
            return;
        }
        // Flag first, so a function that logs does not recurse into the list.
        self.mark_thread();
        let functions = self.lock();
        for function in functions.iter() {
            function();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

impl fmt::Debug for MdcInitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MdcInitRegistry")
            .field("id", &self.id)
            .field("functions", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn registration_runs_on_calling_thread() {
        let registry = MdcInitRegistry::new();
        let (count, function) = counter();
        let token = registry.register(function);
        assert_eq!(token.index(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.is_thread_initialized());

        registry.ensure_thread_initialized();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn each_thread_runs_list_once() {
        let registry = Arc::new(MdcInitRegistry::new());
        let (count, function) = counter();
        let _ = registry.register(function);

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry.ensure_thread_initialized();
                    registry.ensure_thread_initialized();
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn late_registration_brings_fresh_thread_up_to_date() {
        let registry = Arc::new(MdcInitRegistry::new());
        let (first, first_fn) = counter();
        let (second, second_fn) = counter();
        let _ = registry.register(first_fn);

        let registry_clone = Arc::clone(&registry);
        thread::spawn(move || {
            let _ = registry_clone.register(second_fn);
            registry_clone.ensure_thread_initialized();
        })
        .join()
        .unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn initialized_threads_do_not_replay() {
        let registry = MdcInitRegistry::new();
        registry.ensure_thread_initialized();
        let (count, function) = counter();
        let _ = registry.register(function);
        registry.ensure_thread_initialized();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registries_track_threads_independently() {
        let a = MdcInitRegistry::new();
        let b = MdcInitRegistry::new();
        a.ensure_thread_initialized();
        assert!(a.is_thread_initialized());
        assert!(!b.is_thread_initialized());
    }
}
