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

//! Fault classification for hook failures.

use super::{HookError, HookKind};
use crate::config::FailurePolicy;
use crate::error::{PipelineError, PipelineResult};
use alertrelay_core::ControlSignal;

/// How a pipeline must react to a failed hook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Abort the pipeline and surface the signal unchanged.
    Signal(ControlSignal),
    /// Skip this plugin for this pipeline.
    Unsupported,
    /// Anything else; handled according to the failure policy.
    Generic(String),
}

/// Classify a hook failure for the given hook kind.
pub fn classify(error: HookError, kind: HookKind) -> Fault {
    match error {
        HookError::Signal(signal) => Fault::Signal(signal),
        HookError::NotSupported if kind.tolerates_unsupported() => Fault::Unsupported,
        other => Fault::Generic(other.to_string()),
    }
}

impl Fault {
    /// Turn the fault into the pipeline's next step: `Ok(())` continues with
    /// the next plugin as if this one returned nothing, `Err` aborts.
    pub fn resolve(self, policy: FailurePolicy, plugin: &str, kind: HookKind) -> PipelineResult<()> {
        match self {
            Fault::Signal(signal) => {
                tracing::debug!(
                    plugin = %plugin,
                    stage = %kind,
                    signal = signal.kind(),
                    "Plugin raised control signal"
                );
                Err(PipelineError::Signal(signal))
            }
            Fault::Unsupported => {
                tracing::debug!(plugin = %plugin, stage = %kind, "Plugin does not support hook");
                Ok(())
            }
            Fault::Generic(message) => match policy {
                FailurePolicy::Strict => Err(PipelineError::PluginFailed {
                    plugin: plugin.to_string(),
                    stage: kind,
                    message,
                }),
                FailurePolicy::Lenient => {
                    tracing::error!(
                        plugin = %plugin,
                        stage = %kind,
                        "Error while running {} plugin '{}': {}",
                        kind,
                        plugin,
                        message
                    );
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_always_signal() {
        for kind in HookKind::ALL {
            let fault = classify(ControlSignal::Reject("no".into()).into(), kind);
            assert_eq!(fault, Fault::Signal(ControlSignal::Reject("no".into())));
        }
    }

    #[test]
    fn test_unsupported_only_where_tolerated() {
        assert_eq!(classify(HookError::NotSupported, HookKind::TakeNote), Fault::Unsupported);
        assert_eq!(classify(HookError::NotSupported, HookKind::TakeAction), Fault::Unsupported);
        assert!(matches!(
            classify(HookError::NotSupported, HookKind::PreReceive),
            Fault::Generic(_)
        ));
        assert!(matches!(
            classify(HookError::NotSupported, HookKind::StatusChange),
            Fault::Generic(_)
        ));
    }

    #[test]
    fn test_generic_follows_policy() {
        let strict = Fault::Generic("boom".into()).resolve(FailurePolicy::Strict, "p", HookKind::TakeNote);
        match strict {
            Err(PipelineError::PluginFailed { plugin, stage, message }) => {
                assert_eq!(plugin, "p");
                assert_eq!(stage, HookKind::TakeNote);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let lenient = Fault::Generic("boom".into()).resolve(FailurePolicy::Lenient, "p", HookKind::TakeNote);
        assert!(lenient.is_ok());
    }

    #[test]
    fn test_signal_ignores_policy() {
        let result = Fault::Signal(ControlSignal::RateLimit("slow".into())).resolve(
            FailurePolicy::Lenient,
            "p",
            HookKind::PreReceive,
        );
        assert!(matches!(result, Err(PipelineError::Signal(ControlSignal::RateLimit(_)))));
    }
}
