//! Runtime selection for controller timers and attempts.
//!
//! Controllers spawn their debounce timers, retry timers and attempts on a
//! Tokio runtime. When a controller is built inside a runtime, that runtime
//! is used, so tracing context and paused test clocks carry over. When it
//! is built from plain synchronous code, a lazily-initialized process-wide
//! runtime is used instead.

use std::cell::RefCell;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};

/// Fallback runtime for controllers built outside Tokio.
///
/// Multi-thread scheduler, one worker per CPU core, all drivers enabled.
/// It has static lifetime and is never dropped.
static FALLBACK_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("searchline-worker")
        .enable_all()
        .build()
        .expect("failed to create searchline fallback runtime")
});

thread_local! {
    static CACHED_HANDLE: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

/// Returns the fallback runtime.
#[inline]
#[must_use]
pub fn global() -> &'static Runtime {
    &FALLBACK_RUNTIME
}

/// Returns the current runtime's handle, or the fallback runtime's handle
/// when called outside Tokio.
#[must_use]
pub fn handle() -> Handle {
    if let Ok(current_handle) = Handle::try_current() {
        return current_handle;
    }

    CACHED_HANDLE.with(|cached| {
        cached
            .borrow_mut()
            .get_or_insert_with(|| global().handle().clone())
            .clone()
    })
}
