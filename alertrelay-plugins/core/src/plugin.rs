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

//! Plugin interface.

use crate::hooks::{HookError, HookKind, HookReturn, HookSet};
use alertrelay_core::{Alert, Status};
use std::collections::HashMap;

/// Opaque configuration value handed to every plugin of one routing decision.
pub type PluginConfig = serde_json::Value;

/// Argument shape a plugin's hooks accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallShape {
    /// Hooks receive `Some(config)`.
    #[default]
    Canonical,
    /// Hooks predate the configuration argument and receive `None`.
    Legacy,
}

/// Trait for alert plugins
///
/// A plugin implements any subset of the hooks and declares that subset
/// through [`AlertPlugin::hooks`]. Pipelines never call a hook that is not
/// declared; the default bodies only matter for plugins that declare a hook
/// without overriding it.
///
/// Hooks borrow the alert. To mutate it, clone, modify, and return the copy:
///
/// ```rust,ignore
/// struct Enrich;
///
/// impl AlertPlugin for Enrich {
///     fn name(&self) -> &str { "enrich" }
///     fn hooks(&self) -> HookSet { HookSet::of(&[HookKind::PreReceive]) }
///
///     fn pre_receive(&self, alert: &Alert, _config: Option<&PluginConfig>) -> Result<HookReturn, HookError> {
///         Ok(alert.clone().with_tag("enriched").into())
///     }
/// }
/// ```
pub trait AlertPlugin: Send + Sync {
    /// Plugin name, used for routing and in diagnostics.
    fn name(&self) -> &str;

    /// Hooks this plugin implements.
    fn hooks(&self) -> HookSet;

    /// Argument shape the plugin's hooks expect.
    fn call_shape(&self) -> CallShape {
        CallShape::Canonical
    }

    /// Runs before lifecycle resolution. Must return the (possibly modified)
    /// alert; returning [`HookReturn::Unchanged`] breaks the contract.
    fn pre_receive(
        &self,
        _alert: &Alert,
        _config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        Err(HookError::NotSupported)
    }

    /// Runs after the alert was stored.
    fn post_receive(
        &self,
        _alert: &Alert,
        _config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        Err(HookError::NotSupported)
    }

    fn take_action(
        &self,
        _alert: &Alert,
        _action: &str,
        _text: &str,
        _timeout: Option<u64>,
        _config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        Err(HookError::NotSupported)
    }

    fn take_note(
        &self,
        _alert: &Alert,
        _text: &str,
        _config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        Err(HookError::NotSupported)
    }

    fn status_change(
        &self,
        _alert: &Alert,
        _status: Status,
        _text: &str,
        _config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        Err(HookError::NotSupported)
    }

    /// Verdict on deleting the alert; `false` vetoes physical deletion.
    fn delete(&self, _alert: &Alert, _config: Option<&PluginConfig>) -> Result<bool, HookError> {
        Err(HookError::NotSupported)
    }
}

/// Pipeline-specific arguments of a hook call, as seen by [`CallbackPlugin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookArgs<'a> {
    PreReceive,
    PostReceive,
    TakeAction {
        action: &'a str,
        text: &'a str,
        timeout: Option<u64>,
    },
    TakeNote {
        text: &'a str,
    },
    StatusChange {
        status: Status,
        text: &'a str,
    },
}

type HookFn = Box<
    dyn Fn(&Alert, &HookArgs<'_>, Option<&PluginConfig>) -> Result<HookReturn, HookError>
        + Send
        + Sync,
>;

type DeleteFn = Box<dyn Fn(&Alert, Option<&PluginConfig>) -> Result<bool, HookError> + Send + Sync>;

/// Plugin assembled from closures, one per hook.
pub struct CallbackPlugin {
    name: String,
    shape: CallShape,
    callbacks: HashMap<HookKind, HookFn>,
    on_delete: Option<DeleteFn>,
}

impl CallbackPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: CallShape::Canonical,
            callbacks: HashMap::new(),
            on_delete: None,
        }
    }

    /// Implement `kind` with `callback`. Use [`CallbackPlugin::on_delete`]
    /// for the delete hook.
    pub fn on<F>(mut self, kind: HookKind, callback: F) -> Self
    where
        F: Fn(&Alert, &HookArgs<'_>, Option<&PluginConfig>) -> Result<HookReturn, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.callbacks.insert(kind, Box::new(callback));
        self
    }

    pub fn on_delete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Alert, Option<&PluginConfig>) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        self.on_delete = Some(Box::new(callback));
        self
    }

    pub fn with_call_shape(mut self, shape: CallShape) -> Self {
        self.shape = shape;
        self
    }

    fn run(
        &self,
        kind: HookKind,
        alert: &Alert,
        args: HookArgs<'_>,
        config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        match self.callbacks.get(&kind) {
            Some(callback) => callback(alert, &args, config),
            None => Err(HookError::NotSupported),
        }
    }
}

impl AlertPlugin for CallbackPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn hooks(&self) -> HookSet {
        let mut set = HookSet::new();
        for kind in self.callbacks.keys() {
            set.add(*kind);
        }
        if self.on_delete.is_some() {
            set.add(HookKind::Delete);
        }
        set
    }

    fn call_shape(&self) -> CallShape {
        self.shape
    }

    fn pre_receive(&self, alert: &Alert, config: Option<&PluginConfig>) -> Result<HookReturn, HookError> {
        self.run(HookKind::PreReceive, alert, HookArgs::PreReceive, config)
    }

    fn post_receive(&self, alert: &Alert, config: Option<&PluginConfig>) -> Result<HookReturn, HookError> {
        self.run(HookKind::PostReceive, alert, HookArgs::PostReceive, config)
    }

    fn take_action(
        &self,
        alert: &Alert,
        action: &str,
        text: &str,
        timeout: Option<u64>,
        config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        let args = HookArgs::TakeAction {
            action,
            text,
            timeout,
        };
        self.run(HookKind::TakeAction, alert, args, config)
    }

    fn take_note(
        &self,
        alert: &Alert,
        text: &str,
        config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        self.run(HookKind::TakeNote, alert, HookArgs::TakeNote { text }, config)
    }

    fn status_change(
        &self,
        alert: &Alert,
        status: Status,
        text: &str,
        config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        self.run(
            HookKind::StatusChange,
            alert,
            HookArgs::StatusChange { status, text },
            config,
        )
    }

    fn delete(&self, alert: &Alert, config: Option<&PluginConfig>) -> Result<bool, HookError> {
        match &self.on_delete {
            Some(callback) => callback(alert, config),
            None => Err(HookError::NotSupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_hooks_follow_registered_closures() {
        let plugin = CallbackPlugin::new("cb")
            .on(HookKind::TakeNote, |alert, _, _| Ok(alert.clone().into()))
            .on_delete(|_, _| Ok(true));

        let hooks = plugin.hooks();
        assert!(hooks.has(HookKind::TakeNote));
        assert!(hooks.has(HookKind::Delete));
        assert!(!hooks.has(HookKind::PreReceive));
    }

    #[test]
    fn test_callback_passes_arguments() {
        let plugin = CallbackPlugin::new("cb").on(HookKind::TakeAction, |alert, args, _| {
            match args {
                HookArgs::TakeAction { action, timeout, .. } => {
                    assert_eq!(*action, "shelve");
                    assert_eq!(*timeout, Some(60));
                }
                other => panic!("unexpected args: {:?}", other),
            }
            Ok(alert.clone().into())
        });

        let alert = Alert::new("web01", "HttpError");
        let ret = plugin.take_action(&alert, "shelve", "", Some(60), None).unwrap();
        assert_eq!(ret, HookReturn::Alert(alert));
    }

    #[test]
    fn test_missing_callback_is_not_supported() {
        let plugin = CallbackPlugin::new("cb");
        let alert = Alert::new("web01", "HttpError");
        assert!(matches!(
            plugin.take_note(&alert, "text", None),
            Err(HookError::NotSupported)
        ));
        assert!(matches!(plugin.delete(&alert, None), Err(HookError::NotSupported)));
    }
}
