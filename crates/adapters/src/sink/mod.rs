// SPDX-License-Identifier: MIT

//! Progress sink adapters
//!
//! Progress events and out-of-band notices (failures, scheduler
//! messages) flow to one registered sink. Forwarding is awaited at the
//! point of receipt, so a sink observes events in arrival order.

mod noop;

pub use noop::NoopProgressSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProgressSink, SinkCall};

use async_trait::async_trait;
use ph_core::Progress;

/// Receiver of progress events and notices
#[async_trait]
pub trait ProgressSink: Clone + Send + Sync + 'static {
    /// A progress update from the active task.
    async fn progress(&self, progress: Progress);

    /// An out-of-band notice: failure summaries, scheduler messages.
    async fn notice(&self, title: &str, detail: &str);
}
