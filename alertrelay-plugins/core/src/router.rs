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

//! Plugin routing.

use crate::config::PipelineConfig;
use crate::hooks::PipelineKind;
use crate::plugin::PluginConfig;
use crate::registry::{PluginHandle, PluginRegistry};
use alertrelay_core::Alert;
use std::sync::Arc;
use thiserror::Error;

/// The plugins that apply to one alert for one pipeline run, in execution
/// order, plus the configuration every one of them receives.
#[derive(Debug, Clone)]
pub struct Routing {
    pub plugins: Vec<Arc<PluginHandle>>,
    pub config: PluginConfig,
}

impl Routing {
    pub fn new(plugins: Vec<Arc<PluginHandle>>, config: PluginConfig) -> Self {
        Self { plugins, config }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), PluginConfig::Null)
    }
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Routing rules failed: {0}")]
    Rules(String),
}

/// Resolves which plugins apply to an alert.
///
/// Called afresh on every pipeline entry, and a second time between the
/// pre- and post-receive phases, so results may differ as the alert changes.
pub trait PluginRouter: Send + Sync {
    fn route(&self, alert: &Alert, pipeline: PipelineKind) -> Result<Routing, RoutingError>;
}

impl<F> PluginRouter for F
where
    F: Fn(&Alert, PipelineKind) -> Result<Routing, RoutingError> + Send + Sync,
{
    fn route(&self, alert: &Alert, pipeline: PipelineKind) -> Result<Routing, RoutingError> {
        self(alert, pipeline)
    }
}

/// Routes every alert to the enabled plugins of a fixed, configured order.
pub struct RegistryRouter {
    registry: Arc<PluginRegistry>,
    order: Vec<String>,
    config: PluginConfig,
}

impl RegistryRouter {
    pub fn new(registry: Arc<PluginRegistry>, order: Vec<String>, config: PluginConfig) -> Self {
        Self {
            registry,
            order,
            config,
        }
    }

    pub fn from_config(registry: Arc<PluginRegistry>, config: &PipelineConfig) -> Self {
        Self::new(registry, config.plugins.clone(), config.plugin_config.clone())
    }
}

impl PluginRouter for RegistryRouter {
    fn route(&self, _alert: &Alert, pipeline: PipelineKind) -> Result<Routing, RoutingError> {
        let mut plugins = Vec::with_capacity(self.order.len());
        for name in &self.order {
            match self.registry.get(name) {
                Some(handle) if handle.is_enabled() => plugins.push(handle),
                Some(_) => {}
                None => {
                    tracing::warn!(plugin = %name, pipeline = %pipeline, "Configured plugin is not registered");
                }
            }
        }
        Ok(Routing::new(plugins, self.config.clone()))
    }
}
