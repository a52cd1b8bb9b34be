// SPDX-License-Identifier: MIT

//! Recording progress sink for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::ProgressSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use ph_core::Progress;
use std::sync::Arc;

/// Recorded call to FakeProgressSink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Progress(Progress),
    Notice { title: String, detail: String },
}

/// Records every event in arrival order.
#[derive(Clone, Default)]
pub struct FakeProgressSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl FakeProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    /// Just the progress messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SinkCall::Progress(p) => Some(p.message.clone()),
                SinkCall::Notice { .. } => None,
            })
            .collect()
    }

    /// Notice titles, in order.
    pub fn notices(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SinkCall::Notice { title, .. } => Some(title.clone()),
                SinkCall::Progress(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ProgressSink for FakeProgressSink {
    async fn progress(&self, progress: Progress) {
        self.calls.lock().push(SinkCall::Progress(progress));
    }

    async fn notice(&self, title: &str, detail: &str) {
        self.calls.lock().push(SinkCall::Notice {
            title: title.to_string(),
            detail: detail.to_string(),
        });
    }
}
