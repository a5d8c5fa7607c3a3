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

use super::PluginPipeline;
use crate::error::PipelineResult;
use crate::hooks::{classify, invoke, HookKind, PipelineKind};
use alertrelay_core::Alert;

impl PluginPipeline {
    /// Process a delete request.
    ///
    /// Routed plugins vote in order; the first `false` vetoes the delete and
    /// no later plugin is called. Returns whether the alert was removed.
    pub fn process_delete(&self, alert: &Alert) -> PipelineResult<bool> {
        let kind = HookKind::Delete;
        let routing = self.router.route(alert, PipelineKind::Delete)?;
        tracing::debug!(
            alert_id = %alert.id,
            plugins = routing.plugins.len(),
            "Running delete plugin chain"
        );

        for handle in &routing.plugins {
            if !handle.implements(kind) {
                continue;
            }

            match invoke(handle, kind, &routing.config, |plugin, config| plugin.delete(alert, config)) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(plugin = %handle.name(), alert_id = %alert.id, "Plugin vetoed delete");
                    return Ok(false);
                }
                Err(error) => classify(error, kind).resolve(self.policy, handle.name(), kind)?,
            }
        }

        let deleted = self.store.delete(alert)?;
        tracing::debug!(alert_id = %alert.id, deleted, "Delete plugin chain completed");
        Ok(deleted)
    }
}
