//! Supervised background tasks.

use std::{backtrace::Backtrace, future::Future, panic::AssertUnwindSafe};

use futures_util::FutureExt;
use tokio::task::JoinHandle;

/// Spawns `fut` on the runtime, logging a panic with a backtrace instead of
/// letting it vanish with the task. The task is not restarted.
///
/// # Arguments
/// - `name` - Label used in log lines
/// - `fut` - Work to run
///
/// # Returns
/// - `JoinHandle<Option<T>>` - `Some` with the output, `None` if the task panicked
pub fn spawn_guarded<F, T>(name: &'static str, fut: F) -> JoinHandle<Option<T>>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(async move {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(output) => Some(output),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(
                    "Background task '{}' panicked: {}\n{}",
                    name,
                    message,
                    Backtrace::force_capture()
                );
                None
            }
        }
    })
}
