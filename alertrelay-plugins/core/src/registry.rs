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

//! Plugin registry for managing registered plugins.

use crate::builtin;
use crate::config::{ConfigError, PipelineConfig};
use crate::hooks::{HookKind, HookSet};
use crate::plugin::{AlertPlugin, CallShape};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// A registered plugin with its cached capabilities and call shape.
pub struct PluginHandle {
    plugin: Arc<dyn AlertPlugin>,
    hooks: HookSet,
    /// Hook kinds known to need the legacy call shape, as `HookKind` bits.
    legacy: AtomicU8,
    enabled: AtomicBool,
}

impl PluginHandle {
    fn new(plugin: Arc<dyn AlertPlugin>) -> Self {
        let hooks = plugin.hooks();
        let legacy = match plugin.call_shape() {
            CallShape::Legacy => HookKind::ALL
                .iter()
                .filter(|kind| kind.has_legacy_shape())
                .fold(HookSet::new(), |set, kind| set.with(*kind)),
            CallShape::Canonical => HookSet::new(),
        };

        Self {
            plugin,
            hooks,
            legacy: AtomicU8::new(legacy.bits()),
            enabled: AtomicBool::new(true),
        }
    }

    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    pub fn plugin(&self) -> &dyn AlertPlugin {
        self.plugin.as_ref()
    }

    /// Hooks the plugin declared at registration.
    pub fn hooks(&self) -> HookSet {
        self.hooks
    }

    pub fn implements(&self, kind: HookKind) -> bool {
        self.hooks.has(kind)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn uses_legacy_shape(&self, kind: HookKind) -> bool {
        HookSet::from_bits(self.legacy.load(Ordering::Acquire)).has(kind)
    }

    pub(crate) fn record_legacy_shape(&self, kind: HookKind) {
        self.legacy
            .fetch_or(HookSet::new().with(kind).bits(), Ordering::AcqRel);
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.name())
            .field("hooks", &self.hooks)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Registry of plugins by unique name.
///
/// Order is not kept here; routers decide the execution order.
pub struct PluginRegistry {
    plugins: DashMap<String, Arc<PluginHandle>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// Create a new empty plugin registry.
    pub fn new() -> Self {
        Self {
            plugins: DashMap::new(),
        }
    }

    /// Create a registry holding the built-in plugins configured by `config`.
    pub fn with_builtins(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let registry = Self::new();
        for plugin in builtin::builtin_plugins(config)? {
            registry
                .register_arc(plugin)
                .map_err(|e| ConfigError::InvalidPlugin(e.to_string()))?;
        }
        Ok(registry)
    }

    /// Register a plugin under its own name.
    pub fn register(
        &self,
        plugin: impl AlertPlugin + 'static,
    ) -> Result<Arc<PluginHandle>, RegistryError> {
        self.register_arc(Arc::new(plugin))
    }

    pub fn register_arc(
        &self,
        plugin: Arc<dyn AlertPlugin>,
    ) -> Result<Arc<PluginHandle>, RegistryError> {
        let name = plugin.name().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        match self.plugins.entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::PluginAlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                let handle = Arc::new(PluginHandle::new(plugin));
                tracing::debug!(plugin = %entry.key(), hooks = ?handle.hooks(), "Registered plugin");
                entry.insert(handle.clone());
                Ok(handle)
            }
        }
    }

    /// Unregister a plugin by name.
    pub fn unregister(&self, name: &str) -> Result<Arc<PluginHandle>, RegistryError> {
        self.plugins
            .remove(name)
            .map(|(_, handle)| handle)
            .ok_or_else(|| RegistryError::PluginNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Arc<PluginHandle>> {
        self.plugins.get(name).map(|h| h.clone())
    }

    pub fn enable(&self, name: &str) -> Result<(), RegistryError> {
        self.set_enabled(name, true)
    }

    pub fn disable(&self, name: &str) -> Result<(), RegistryError> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), RegistryError> {
        let handle = self
            .plugins
            .get(name)
            .ok_or_else(|| RegistryError::PluginNotFound(name.to_string()))?;
        handle.set_enabled(enabled);
        Ok(())
    }

    /// Names of all registered plugins, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Plugin already exists: {0}")]
    PluginAlreadyExists(String),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Plugin name cannot be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::CallbackPlugin;

    fn noop(name: &str) -> CallbackPlugin {
        CallbackPlugin::new(name).on(HookKind::PostReceive, |_, _, _| {
            Ok(crate::hooks::HookReturn::Unchanged)
        })
    }

    #[test]
    fn test_register_plugin() {
        let registry = PluginRegistry::new();
        let handle = registry.register(noop("test")).unwrap();

        assert_eq!(handle.name(), "test");
        assert!(handle.implements(HookKind::PostReceive));
        assert!(registry.get("test").is_some());
    }

    #[test]
    fn test_duplicate_plugin() {
        let registry = PluginRegistry::new();
        registry.register(noop("test")).unwrap();
        assert!(matches!(
            registry.register(noop("test")),
            Err(RegistryError::PluginAlreadyExists(_))
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let registry = PluginRegistry::new();
        assert!(matches!(registry.register(noop("")), Err(RegistryError::EmptyName)));
    }

    #[test]
    fn test_disable_plugin() {
        let registry = PluginRegistry::new();
        let handle = registry.register(noop("test")).unwrap();

        registry.disable("test").unwrap();
        assert!(!handle.is_enabled());
        registry.enable("test").unwrap();
        assert!(handle.is_enabled());
        assert!(registry.disable("missing").is_err());
    }

    #[test]
    fn test_unregister_plugin() {
        let registry = PluginRegistry::new();
        registry.register(noop("b")).unwrap();
        registry.register(noop("a")).unwrap();
        assert_eq!(registry.list(), vec!["a".to_string(), "b".to_string()]);

        registry.unregister("a").unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister("a").is_err());
    }

    #[test]
    fn test_legacy_shape_declared_at_registration() {
        let registry = PluginRegistry::new();
        let handle = registry
            .register(noop("old").with_call_shape(CallShape::Legacy))
            .unwrap();

        assert!(handle.uses_legacy_shape(HookKind::PreReceive));
        assert!(handle.uses_legacy_shape(HookKind::StatusChange));
        assert!(!handle.uses_legacy_shape(HookKind::TakeNote));
    }
}
