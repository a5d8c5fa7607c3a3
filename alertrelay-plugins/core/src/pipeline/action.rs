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

use super::{ActionOutcome, PluginPipeline};
use crate::error::PipelineResult;
use crate::hooks::{HookKind, HookState, PipelineKind};
use alertrelay_core::Alert;

impl PluginPipeline {
    /// Process an operator action such as `ack` or `shelve`.
    ///
    /// `timeout` is passed through as data. Plugins may rewrite the action,
    /// its text and timeout; fields a plugin leaves unset keep their value.
    pub fn process_action(
        &self,
        alert: Alert,
        action: &str,
        text: &str,
        timeout: Option<u64>,
    ) -> PipelineResult<ActionOutcome> {
        let routing = self.router.route(&alert, PipelineKind::Action)?;
        let mut state = HookState::new(alert)
            .with_action(action)
            .with_text(text)
            .with_timeout(timeout);

        self.run_chain(HookKind::TakeAction, &routing, &mut state, true, |plugin, state, config| {
            plugin.take_action(&state.alert, &state.action, &state.text, state.timeout, config)
        })?;

        let state = self.finish(state)?;
        Ok(ActionOutcome {
            alert: state.alert,
            action: state.action,
            text: state.text,
            timeout: state.timeout,
            mutated: state.mutated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{call_log, calls, pipeline, stored};
    use super::*;
    use crate::config::FailurePolicy;
    use crate::error::PipelineError;
    use crate::hooks::{HookError, HookReturn, HookUpdate};
    use crate::plugin::{CallbackPlugin, HookArgs};
    use alertrelay_core::{AlertStore, ControlSignal, Status};

    #[test]
    fn test_partial_update_preserves_timeout() {
        let rename = CallbackPlugin::new("rename").on(HookKind::TakeAction, |alert, _, _| {
            Ok(HookUpdate::new(alert.clone())
                .with_action("shelve")
                .with_text("shelved by rename")
                .into())
        });
        let (pipeline, store) = pipeline(vec![rename], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_action(alert, "ack", "looking", Some(7200)).unwrap();
        assert_eq!(outcome.action, "shelve");
        assert_eq!(outcome.text, "shelved by rename");
        assert_eq!(outcome.timeout, Some(7200));
        assert!(outcome.mutated);
    }

    #[test]
    fn test_later_plugins_see_earlier_mutations() {
        let first = CallbackPlugin::new("first").on(HookKind::TakeAction, |alert, _, _| {
            Ok(HookUpdate::new(alert.clone().with_tag("first")).with_action("close").into())
        });
        let second = CallbackPlugin::new("second").on(HookKind::TakeAction, |alert, args, _| {
            assert!(alert.tags.contains("first"));
            assert!(matches!(args, HookArgs::TakeAction { action: "close", .. }));
            Ok(HookReturn::Unchanged)
        });
        let (pipeline, store) = pipeline(vec![first, second], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_action(alert.clone(), "ack", "", None).unwrap();
        assert_eq!(outcome.action, "close");
        assert!(store.get(&alert.id).unwrap().unwrap().tags.contains("first"));
    }

    #[test]
    fn test_unsupported_is_skipped() {
        let none = CallbackPlugin::new("none").on(HookKind::TakeAction, |_, _, _| Err(HookError::NotSupported));
        let (pipeline, store) = pipeline(vec![none], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let outcome = pipeline.process_action(alert, "ack", "text", None).unwrap();
        assert_eq!(outcome.action, "ack");
        assert!(!outcome.mutated);
    }

    #[test]
    fn test_suppressed_alert_runs_nothing() {
        let log = call_log();
        let hook_log = log.clone();
        let watcher = CallbackPlugin::new("watcher").on(HookKind::TakeAction, move |alert, _, _| {
            hook_log.lock().unwrap().push("watcher".into());
            Ok(alert.clone().into())
        });
        let (pipeline, store) = pipeline(vec![watcher], FailurePolicy::Strict);
        let alert = stored(&store, Alert::new("web01", "HttpError").with_status(Status::Blackout));

        let outcome = pipeline.process_action(alert.clone(), "ack", "", Some(60)).unwrap();
        assert!(calls(&log).is_empty());
        assert!(!outcome.mutated);
        assert_eq!(outcome.alert, alert);
        assert_eq!(outcome.timeout, Some(60));
    }

    #[test]
    fn test_invalid_action_signal_propagates() {
        let guard = CallbackPlugin::new("guard").on(HookKind::TakeAction, |_, args, _| match args {
            HookArgs::TakeAction { action: "escalate", .. } => {
                Err(ControlSignal::InvalidAction("escalate is not allowed".into()).into())
            }
            _ => Ok(HookReturn::Unchanged),
        });
        let (pipeline, store) = pipeline(vec![guard], FailurePolicy::Lenient);
        let alert = stored(&store, Alert::new("web01", "HttpError"));

        let err = pipeline.process_action(alert, "escalate", "", None).unwrap_err();
        assert!(matches!(err, PipelineError::Signal(ControlSignal::InvalidAction(_))));
        assert_eq!(err.status_code(), 409);
    }
}
