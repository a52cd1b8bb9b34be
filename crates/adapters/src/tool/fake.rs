// SPDX-License-Identifier: MIT

//! Fake tool status for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RequirementsFailure, ToolStatus};
use async_trait::async_trait;
use parking_lot::Mutex;
use ph_core::ToolVersion;
use std::sync::Arc;

/// Fake tool status with programmable answers.
#[derive(Clone, Default)]
pub struct FakeToolStatus {
    inner: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    installed: bool,
    version: Option<ToolVersion>,
    failure: Option<String>,
}

impl FakeToolStatus {
    /// A tool that is installed at the given version and meets requirements.
    pub fn installed(version: &str) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.inner.lock();
            state.installed = true;
            state.version = ToolVersion::parse(version).ok();
        }
        fake
    }

    /// A tool that is absent.
    pub fn not_installed() -> Self {
        Self::default()
    }

    /// Force `meets_requirements` to fail with this message.
    pub fn set_failure(&self, message: &str) {
        self.inner.lock().failure = Some(message.to_string());
    }

    pub fn set_installed(&self, installed: bool) {
        self.inner.lock().installed = installed;
    }
}

#[async_trait]
impl ToolStatus for FakeToolStatus {
    async fn installed(&self) -> bool {
        self.inner.lock().installed
    }

    async fn version(&self) -> Option<ToolVersion> {
        self.inner.lock().version.clone()
    }

    async fn meets_requirements(&self) -> Result<(), RequirementsFailure> {
        let state = self.inner.lock();
        if let Some(message) = &state.failure {
            return Err(RequirementsFailure(message.clone()));
        }
        if !state.installed {
            return Err(RequirementsFailure("autopkg is not installed".to_string()));
        }
        Ok(())
    }
}
