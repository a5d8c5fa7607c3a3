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

use crate::config::{ConfigError, RejectConfig};
use crate::hooks::{HookError, HookKind, HookReturn, HookSet};
use crate::plugin::{AlertPlugin, PluginConfig};
use alertrelay_core::{Alert, ControlSignal};
use regex::Regex;

/// Refuses alerts by origin, environment and missing service.
pub struct RejectPlugin {
    origin_blacklist: Vec<Regex>,
    allowed_environments: Vec<String>,
}

impl RejectPlugin {
    pub fn from_config(config: &RejectConfig) -> Result<Self, ConfigError> {
        // Patterns match from the start of the origin.
        let origin_blacklist = config
            .origin_blacklist
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})", pattern)).map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            origin_blacklist,
            allowed_environments: config.allowed_environments.clone(),
        })
    }
}

impl AlertPlugin for RejectPlugin {
    fn name(&self) -> &str {
        "reject"
    }

    fn hooks(&self) -> HookSet {
        HookSet::of(&[HookKind::PreReceive])
    }

    fn pre_receive(&self, alert: &Alert, _config: Option<&PluginConfig>) -> Result<HookReturn, HookError> {
        if self.origin_blacklist.iter().any(|re| re.is_match(&alert.origin)) {
            return Err(ControlSignal::Reject(format!(
                "[POLICY] Alert origin '{}' has been blacklisted",
                alert.origin
            ))
            .into());
        }

        if !self.allowed_environments.contains(&alert.environment) {
            return Err(ControlSignal::Reject(format!(
                "[POLICY] Alert environment does not match one of {}",
                self.allowed_environments.join(", ")
            ))
            .into());
        }

        if alert.service.is_empty() {
            return Err(ControlSignal::Reject("[POLICY] Alert must define a service".to_string()).into());
        }

        Ok(alert.clone().into())
    }
}
