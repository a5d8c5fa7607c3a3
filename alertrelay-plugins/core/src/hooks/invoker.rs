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

//! Single hook invocation with call-shape negotiation.

use super::{HookError, HookKind};
use crate::plugin::{AlertPlugin, PluginConfig};
use crate::registry::PluginHandle;

/// Call one hook on a registered plugin.
///
/// The canonical shape passes `Some(config)`. If the plugin answers with
/// [`HookError::SignatureMismatch`] on a hook that has a legacy form, the call
/// is repeated once with `None` and the handle remembers the legacy shape
/// for that hook, so later calls skip the failed attempt. Every other error
/// is returned as-is and never retried.
pub fn invoke<T, F>(
    handle: &PluginHandle,
    kind: HookKind,
    config: &PluginConfig,
    call: F,
) -> Result<T, HookError>
where
    F: Fn(&dyn AlertPlugin, Option<&PluginConfig>) -> Result<T, HookError>,
{
    let plugin = handle.plugin();

    if kind.has_legacy_shape() && handle.uses_legacy_shape(kind) {
        return call(plugin, None);
    }

    match call(plugin, Some(config)) {
        Err(HookError::SignatureMismatch) if kind.has_legacy_shape() => {
            tracing::warn!(
                plugin = %handle.name(),
                stage = %kind,
                "Plugin rejected configuration argument, retrying with legacy call shape"
            );
            handle.record_legacy_shape(kind);
            call(plugin, None)
        }
        other => other,
    }
}
