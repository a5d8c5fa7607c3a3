// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Pipeline error types

use crate::hooks::HookKind;
use crate::router::RoutingError;
use alertrelay_core::{ControlSignal, StoreError};
use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors a pipeline hands back to its caller
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A plugin raised a control signal; passed through unchanged.
    #[error(transparent)]
    Signal(#[from] ControlSignal),

    /// A plugin broke the hook contract.
    #[error("Plugin '{plugin}' {stage} hook did not return modified alert")]
    ProtocolViolation { plugin: String, stage: HookKind },

    /// A plugin failed under the strict failure policy.
    #[error("Error while running {stage} plugin '{plugin}': {message}")]
    PluginFailed {
        plugin: String,
        stage: HookKind,
        message: String,
    },

    /// Duplicate, correlation, create or update failed.
    #[error("Alert lifecycle resolution failed: {0}")]
    Lifecycle(String),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Alert store error: {0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// HTTP status code a request layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Signal(signal) => signal.status_code(),
            _ => 500,
        }
    }

    pub fn is_signal(&self) -> bool {
        matches!(self, PipelineError::Signal(_))
    }

    /// Name of the plugin the error is attributed to, if any.
    pub fn plugin(&self) -> Option<&str> {
        match self {
            PipelineError::ProtocolViolation { plugin, .. }
            | PipelineError::PluginFailed { plugin, .. } => Some(plugin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_failed_message_names_plugin_and_stage() {
        let err = PipelineError::PluginFailed {
            plugin: "enrich".into(),
            stage: HookKind::PreReceive,
            message: "lookup failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error while running pre-receive plugin 'enrich': lookup failed"
        );
        assert_eq!(err.plugin(), Some("enrich"));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_signal_is_transparent() {
        let err = PipelineError::from(ControlSignal::Reject("[POLICY] nope".into()));
        assert_eq!(err.to_string(), "[POLICY] nope");
        assert_eq!(err.status_code(), 403);
        assert!(err.is_signal());
    }
}
