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

//! Built-in plugins.
//!
//! | Name        | Hooks                   | Effect                                         |
//! |-------------|-------------------------|------------------------------------------------|
//! | `reject`    | pre-receive             | refuses blacklisted origins, unknown environments, missing service |
//! | `blackout`  | pre-receive             | suppresses or refuses alerts inside a blackout window |
//! | `heartbeat` | pre-receive             | turns heartbeat events into a control signal   |
//! | `acked_by`  | action, status          | tracks who acknowledged an alert               |
//!
//! All are registered by [`PluginRegistry::with_builtins`]; only those named
//! in the configured plugin order run.
//!
//! [`PluginRegistry::with_builtins`]: crate::registry::PluginRegistry::with_builtins

mod acked_by;
mod blackout;
mod heartbeat;
mod reject;

pub use acked_by::AckedByPlugin;
pub use blackout::BlackoutPlugin;
pub use heartbeat::HeartbeatPlugin;
pub use reject::RejectPlugin;

use crate::config::{ConfigError, PipelineConfig};
use crate::plugin::AlertPlugin;
use std::sync::Arc;

/// Build every built-in plugin from its configuration section.
pub fn builtin_plugins(config: &PipelineConfig) -> Result<Vec<Arc<dyn AlertPlugin>>, ConfigError> {
    Ok(vec![
        Arc::new(RejectPlugin::from_config(&config.reject)?),
        Arc::new(BlackoutPlugin::from_config(&config.blackout)),
        Arc::new(HeartbeatPlugin::default()),
        Arc::new(AckedByPlugin),
    ])
}
