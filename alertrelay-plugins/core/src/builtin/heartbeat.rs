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

use crate::hooks::{HookError, HookKind, HookReturn, HookSet};
use crate::plugin::{AlertPlugin, PluginConfig};
use alertrelay_core::{Alert, ControlSignal};

/// Stops normal processing for heartbeat events.
pub struct HeartbeatPlugin {
    events: Vec<String>,
}

impl Default for HeartbeatPlugin {
    fn default() -> Self {
        Self::new(vec!["Heartbeat".to_string()])
    }
}

impl HeartbeatPlugin {
    pub fn new(events: Vec<String>) -> Self {
        Self { events }
    }
}

impl AlertPlugin for HeartbeatPlugin {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn hooks(&self) -> HookSet {
        HookSet::of(&[HookKind::PreReceive])
    }

    fn pre_receive(&self, alert: &Alert, _config: Option<&PluginConfig>) -> Result<HookReturn, HookError> {
        if !self.events.contains(&alert.event) {
            return Ok(alert.clone().into());
        }

        let origin = if alert.origin.is_empty() {
            &alert.resource
        } else {
            &alert.origin
        };
        Err(ControlSignal::HeartbeatReceived(format!("Heartbeat received from {}", origin)).into())
    }
}
