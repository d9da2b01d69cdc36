//! Cancellable task handles.
//!
//! A [`TaskHandle`] owns a spawned tokio task. Unlike a bare
//! [`JoinHandle`](tokio::task::JoinHandle), dropping it cancels the task, so a
//! poll or timer started by a script never outlives the code that started it.
//!
//! # Example
//!
//! ```rust
//! use tidewait::task::TaskHandle;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let handle = TaskHandle::spawn(async { 7 });
//! assert_eq!(handle.join().await, Some(7));
//!
//! let slow = TaskHandle::spawn(tokio::time::sleep(Duration::from_secs(3600)));
//! slow.cancel();
//! assert_eq!(slow.join().await, None);
//! # });
//! ```

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;

/// Handle to a spawned task that is cancelled when dropped.
pub struct TaskHandle<T> {
    inner: Option<JoinHandle<T>>,
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Spawn `future` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            inner: Some(tokio::spawn(future)),
        }
    }
}

impl<T> TaskHandle<T> {
    /// Request cancellation. The task stops at its next suspension point.
    pub fn cancel(&self) {
        if let Some(handle) = &self.inner {
            handle.abort();
        }
    }

    /// Returns true once the task completed or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the task. Returns `None` if it was cancelled.
    ///
    /// A panic inside the task is resumed on the caller.
    pub async fn join(mut self) -> Option<T> {
        let handle = self.inner.take()?;
        match handle.await {
            Ok(value) => Some(value),
            Err(e) if e.is_cancelled() => None,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Let the task run to completion without a handle.
    pub fn detach(mut self) {
        self.inner.take();
    }
}

impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.take() {
            handle.abort();
        }
    }
}
