// SPDX-License-Identifier: MIT

//! Terminal progress sink

use async_trait::async_trait;
use ph_adapters::ProgressSink;
use ph_core::Progress;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Prints progress to stdout and notices to stderr.
///
/// Commands that decode stdout into their own tables (`search`,
/// `repo list`, `version`) silence the streaming echo so results are
/// not printed twice.
#[derive(Clone, Default)]
pub struct ConsoleSink {
    silenced: Arc<AtomicBool>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress progress lines; notices still print.
    pub fn silence(&self) {
        self.silenced.store(true, Ordering::Relaxed);
    }
}

#[async_trait]
impl ProgressSink for ConsoleSink {
    async fn progress(&self, progress: Progress) {
        if self.silenced.load(Ordering::Relaxed) {
            return;
        }
        match progress.fraction {
            Some(fraction) => {
                println!("[{:>3}%] {}", (fraction * 100.0).round() as u32, progress.message)
            }
            None => println!("{}", progress.message),
        }
    }

    async fn notice(&self, title: &str, detail: &str) {
        if detail.is_empty() {
            eprintln!("{}", title);
        } else {
            eprintln!("{}: {}", title, detail);
        }
    }
}
