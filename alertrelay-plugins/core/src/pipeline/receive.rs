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

use super::{lifecycle, ChainEnd, PluginPipeline, ReceiveOutcome};
use crate::error::PipelineResult;
use crate::hooks::{HookKind, HookState, PipelineKind};
use alertrelay_core::Alert;

impl PluginPipeline {
    /// Process a newly received alert.
    ///
    /// Pre-receive hooks run first and must each return the alert. The
    /// result is then deduplicated, correlated or created in the store, and
    /// post-receive hooks run against the stored alert under a fresh routing
    /// decision. Post-receive hooks are skipped entirely if the pre-receive
    /// chain stopped on a suppressed alert.
    pub fn process_alert(&self, alert: Alert) -> PipelineResult<ReceiveOutcome> {
        let routing = self.router.route(&alert, PipelineKind::Receive)?;
        let mut pre = HookState::new(alert);
        let end = self.run_chain(HookKind::PreReceive, &routing, &mut pre, true, |plugin, state, config| {
            plugin.pre_receive(&state.alert, config)
        })?;
        let suppressed = end == ChainEnd::Suppressed;

        let (stored, lifecycle) = lifecycle::resolve(self.store.as_ref(), &pre.alert)?;

        let mut post = HookState::new(stored);
        if !suppressed {
            let routing = self.router.route(&post.alert, PipelineKind::Receive)?;
            self.run_chain(HookKind::PostReceive, &routing, &mut post, false, |plugin, state, config| {
                plugin.post_receive(&state.alert, config)
            })?;
        }

        let post = self.finish(post)?;
        Ok(ReceiveOutcome {
            alert: post.alert,
            lifecycle,
            suppressed,
            mutated: post.mutated,
        })
    }
}
