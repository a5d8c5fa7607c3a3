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

//! Pipeline executor.
//!
//! One [`PluginPipeline`] serves all five chains. Each chain follows the same
//! loop: route, then for every plugin in order check the short-circuit,
//! skip undeclared hooks, invoke, classify failures and fold returns into a
//! [`HookState`]. If any plugin mutated the alert, its tags and attributes
//! are written back through the store.

mod action;
mod delete;
mod lifecycle;
mod note;
mod receive;
mod status;

pub use lifecycle::Lifecycle;

use crate::config::FailurePolicy;
use crate::error::{PipelineError, PipelineResult};
use crate::hooks::{classify, invoke, HookError, HookKind, HookReturn, HookState};
use crate::plugin::{AlertPlugin, PluginConfig};
use crate::router::{PluginRouter, Routing};
use alertrelay_core::{Alert, AlertStore, Status};
use std::sync::Arc;

/// Result of the receive pipeline.
#[derive(Debug, Clone)]
pub struct ReceiveOutcome {
    pub alert: Alert,
    pub lifecycle: Lifecycle,
    /// The pre-receive phase stopped on a suppressed alert; no post-receive
    /// hook ran.
    pub suppressed: bool,
    /// Set by post-receive hooks only.
    pub mutated: bool,
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub alert: Alert,
    pub action: String,
    pub text: String,
    pub timeout: Option<u64>,
    pub mutated: bool,
}

#[derive(Debug, Clone)]
pub struct NoteOutcome {
    pub alert: Alert,
    pub text: String,
    pub mutated: bool,
}

#[derive(Debug, Clone)]
pub struct StatusOutcome {
    pub alert: Alert,
    pub status: Status,
    pub text: String,
    pub mutated: bool,
}

/// How a chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainEnd {
    Completed,
    /// Stopped at the top of an iteration because the alert was suppressed.
    Suppressed,
}

/// Runs plugin chains against alerts.
pub struct PluginPipeline {
    router: Arc<dyn PluginRouter>,
    store: Arc<dyn AlertStore>,
    policy: FailurePolicy,
}

impl PluginPipeline {
    pub fn new(
        router: Arc<dyn PluginRouter>,
        store: Arc<dyn AlertStore>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            router,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run one hook over every routed plugin, folding returns into `state`.
    fn run_chain<F>(
        &self,
        kind: HookKind,
        routing: &Routing,
        state: &mut HookState,
        stop_when_suppressed: bool,
        call: F,
    ) -> PipelineResult<ChainEnd>
    where
        F: Fn(&dyn AlertPlugin, &HookState, Option<&PluginConfig>) -> Result<HookReturn, HookError>,
    {
        tracing::debug!(
            pipeline = %kind.pipeline(),
            stage = %kind,
            alert_id = %state.alert.id,
            plugins = routing.plugins.len(),
            "Running plugin chain"
        );

        for handle in &routing.plugins {
            if stop_when_suppressed && state.alert.is_suppressed() {
                tracing::debug!(
                    stage = %kind,
                    alert_id = %state.alert.id,
                    "Alert suppressed, skipping remaining plugins"
                );
                return Ok(ChainEnd::Suppressed);
            }

            if !handle.implements(kind) {
                continue;
            }

            let snapshot: &HookState = state;
            let result = invoke(handle, kind, &routing.config, |plugin, config| {
                call(plugin, snapshot, config)
            });

            match result {
                Ok(HookReturn::Unchanged) if kind == HookKind::PreReceive => {
                    return Err(PipelineError::ProtocolViolation {
                        plugin: handle.name().to_string(),
                        stage: kind,
                    });
                }
                Ok(ret) => {
                    if state.apply(ret) {
                        tracing::trace!(plugin = %handle.name(), stage = %kind, "Plugin mutated alert");
                    }
                }
                Err(error) => classify(error, kind).resolve(self.policy, handle.name(), kind)?,
            }
        }

        tracing::debug!(
            stage = %kind,
            alert_id = %state.alert.id,
            mutated = state.mutated,
            "Plugin chain completed"
        );
        Ok(ChainEnd::Completed)
    }

    /// Write tags and attributes of a plugin-mutated alert back to the store.
    fn resync(&self, alert: &mut Alert) -> PipelineResult<()> {
        self.store.update_tags(&*alert, &alert.tags)?;
        let attributes = self.store.update_attributes(&*alert, &alert.attributes)?;
        alert.attributes = attributes;
        Ok(())
    }

    /// Resync when mutated, then hand the state back.
    fn finish(&self, mut state: HookState) -> PipelineResult<HookState> {
        if state.mutated {
            self.resync(&mut state.alert)?;
        }
        Ok(state)
    }
}
