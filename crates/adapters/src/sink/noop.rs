// SPDX-License-Identifier: MIT

//! No-op progress sink

use super::ProgressSink;
use async_trait::async_trait;
use ph_core::Progress;

/// Discards everything; for callers that only want completions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

#[async_trait]
impl ProgressSink for NoopProgressSink {
    async fn progress(&self, _progress: Progress) {}

    async fn notice(&self, _title: &str, _detail: &str) {}
}
