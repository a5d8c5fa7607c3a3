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

use super::{PluginPipeline, StatusOutcome};
use crate::error::PipelineResult;
use crate::hooks::{HookKind, HookState, PipelineKind};
use alertrelay_core::{Alert, Status};

impl PluginPipeline {
    /// Process a requested status change.
    ///
    /// A hook returning a bare alert replaces the alert only; the requested
    /// status and text stay as they were.
    pub fn process_status(
        &self,
        alert: Alert,
        status: Status,
        text: &str,
    ) -> PipelineResult<StatusOutcome> {
        let routing = self.router.route(&alert, PipelineKind::Status)?;
        let mut state = HookState::new(alert).with_status(status).with_text(text);

        self.run_chain(HookKind::StatusChange, &routing, &mut state, true, |plugin, state, config| {
            plugin.status_change(&state.alert, state.status, &state.text, config)
        })?;

        let state = self.finish(state)?;
        Ok(StatusOutcome {
            alert: state.alert,
            status: state.status,
            text: state.text,
            mutated: state.mutated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{pipeline, stored};
    use super::*;
    use crate::config::FailurePolicy;
    use crate::error::PipelineError;
    use crate::hooks::{HookError, HookUpdate};
    use crate::plugin::{CallShape, CallbackPlugin, HookArgs};
    use serde_json::json;

    #[test]
    fn test_bare_alert_keeps_requested_status() {
        let tagger = CallbackPlugin::new("tagger").on(HookKind::StatusChange, |alert, _, _| {
            Ok(alert.clone().with_tag("touched").into())
        });
        let (pipeline, store) = pipeline(vec![tagger], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_status(alert, Status::Ack, "on it").unwrap();
        assert_eq!(outcome.status, Status::Ack);
        assert_eq!(outcome.text, "on it");
        assert!(outcome.alert.tags.contains("touched"));
        assert!(outcome.mutated);
    }

    #[test]
    fn test_update_rewrites_status_and_text() {
        let downgrade = CallbackPlugin::new("downgrade").on(HookKind::StatusChange, |alert, args, _| {
            match args {
                HookArgs::StatusChange { status: Status::Closed, .. } => Ok(HookUpdate::new(alert.clone())
                    .with_status(Status::Ack)
                    .with_text("closing needs approval")
                    .into()),
                _ => Ok(alert.clone().into()),
            }
        });
        let (pipeline, store) = pipeline(vec![downgrade], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_status(alert, Status::Closed, "done").unwrap();
        assert_eq!(outcome.status, Status::Ack);
        assert_eq!(outcome.text, "closing needs approval");
    }

    #[test]
    fn test_legacy_plugin_receives_no_config() {
        let legacy = CallbackPlugin::new("legacy")
            .on(HookKind::StatusChange, |alert, _, config| {
                assert!(config.is_none());
                Ok(alert.clone().with_attribute("legacy", json!(true)).into())
            })
            .with_call_shape(CallShape::Legacy);
        let (pipeline, store) = pipeline(vec![legacy], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_status(alert, Status::Ack, "").unwrap();
        assert_eq!(outcome.alert.attributes["legacy"], json!(true));
    }

    #[test]
    fn test_signature_mismatch_falls_back() {
        let old = CallbackPlugin::new("old").on(HookKind::StatusChange, |alert, _, config| match config {
            Some(_) => Err(HookError::SignatureMismatch),
            None => Ok(alert.clone().with_tag("old").into()),
        });
        let (pipeline, store) = pipeline(vec![old], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_status(alert, Status::Ack, "").unwrap();
        assert!(outcome.alert.tags.contains("old"));
    }

    #[test]
    fn test_unsupported_is_a_fault() {
        let none = CallbackPlugin::new("none").on(HookKind::StatusChange, |_, _, _| Err(HookError::NotSupported));
        let (pipeline, store) = pipeline(vec![none], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let err = pipeline.process_status(alert, Status::Ack, "").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PluginFailed { stage: HookKind::StatusChange, .. }
        ));
    }

    #[test]
    fn test_suppressed_alert_is_returned_unchanged() {
        let closer = CallbackPlugin::new("closer").on(HookKind::StatusChange, |alert, _, _| {
            Ok(HookUpdate::new(alert.clone()).with_status(Status::Closed).into())
        });
        let (pipeline, store) = pipeline(vec![closer], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError").with_status(Status::Blackout));

        let outcome = pipeline.process_status(alert.clone(), Status::Open, "").unwrap();
        assert_eq!(outcome.status, Status::Open);
        assert_eq!(outcome.alert, alert);
        assert!(!outcome.mutated);
    }
}
