//! crates/backend/src/thread.rs
//! Lightweight-process (LWP) identifiers for log enrichment.
//!
//! On Linux the kernel thread id is used, which equals the process id on the
//! main thread. macOS reports the Mach thread port. Elsewhere a small
//! per-thread counter stands in for it.

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use std::sync::atomic::{AtomicU32, Ordering};

thread_local! {
    static LWP_ID: u32 = current_lwp();
}

/// Returns the lightweight-process id of the calling thread.
///
/// The value is stable for the lifetime of the thread and distinct between
/// threads that are alive at the same time.
#[must_use]
pub fn lwp_id() -> u32 {
    LWP_ID.with(|id| *id)
}

#[cfg(target_os = "linux")]
#[allow(unsafe_code)]
fn current_lwp() -> u32 {
    // SAFETY: gettid takes no arguments, cannot fail and has no side effects.
    let tid = unsafe { libc::syscall(libc::SYS_gettid) };
    tid as u32
}

#[cfg(target_os = "macos")]
#[allow(unsafe_code)]
fn current_lwp() -> u32 {
    // SAFETY: both calls only inspect the calling thread.
    unsafe { libc::pthread_mach_thread_np(libc::pthread_self()) }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn current_lwp() -> u32 {
    static NEXT: AtomicU32 = AtomicU32::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Name of the calling thread, if it has one.
pub(crate) fn thread_name() -> Option<String> {
    std::thread::current().name().map(str::to_owned)
}
