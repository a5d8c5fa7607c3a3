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

use super::{NoteOutcome, PluginPipeline};
use crate::error::PipelineResult;
use crate::hooks::{HookKind, HookState, PipelineKind};
use alertrelay_core::Alert;

impl PluginPipeline {
    /// Process a note added to an alert. Runs on suppressed alerts too.
    pub fn process_note(&self, alert: Alert, text: &str) -> PipelineResult<NoteOutcome> {
        let routing = self.router.route(&alert, PipelineKind::Note)?;
        let mut state = HookState::new(alert).with_text(text);

        self.run_chain(HookKind::TakeNote, &routing, &mut state, false, |plugin, state, config| {
            plugin.take_note(&state.alert, &state.text, config)
        })?;

        let state = self.finish(state)?;
        Ok(NoteOutcome {
            alert: state.alert,
            text: state.text,
            mutated: state.mutated,
        })
    }
}
