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

//! Alertrelay Plugin Pipelines
//!
//! Runs an ordered chain of plugins over an alert for each of the five
//! pipeline kinds and reconciles what they return into a single record.
//!
//! # Architecture
//!
//! Every pipeline has the same shape:
//!
//! 1. Resolve the applicable plugins and their configuration via a [`PluginRouter`]
//! 2. Invoke each plugin's hook in order (canonical shape, legacy fallback)
//! 3. Classify failures: control signals abort, unsupported hooks are skipped,
//!    other faults follow the [`FailurePolicy`]
//! 4. Fold returned mutations into the running state
//! 5. Resync tags and attributes through the [`AlertStore`] if anything changed
//!
//! The receive pipeline additionally resolves the alert's lifecycle
//! (deduplicate, correlate or create) between its pre- and post-receive phases.
//!
//! # Example
//!
//! ```rust,ignore
//! use alertrelay_plugins::{PipelineConfig, PluginPipeline, PluginRegistry, RegistryRouter};
//! use alertrelay_core::{Alert, MemoryAlertStore};
//! use std::sync::Arc;
//!
//! let config = PipelineConfig::from_toml(r#"plugins = ["reject", "blackout"]"#)?;
//! let registry = Arc::new(PluginRegistry::with_builtins(&config)?);
//! let router = RegistryRouter::from_config(registry, &config);
//! let pipeline = PluginPipeline::new(Arc::new(router), Arc::new(MemoryAlertStore::new()), config.policy());
//!
//! let outcome = pipeline.process_alert(Alert::new("web01", "HttpError").with_service("Web"))?;
//! println!("{:?} {}", outcome.lifecycle, outcome.alert.id);
//! ```
//!
//! [`AlertStore`]: alertrelay_core::AlertStore

pub mod builtin;
pub mod config;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod plugin;
pub mod registry;
pub mod router;

// Re-exports
pub use builtin::{AckedByPlugin, BlackoutPlugin, HeartbeatPlugin, RejectPlugin};
pub use config::{BlackoutConfig, BlackoutWindow, ConfigError, FailurePolicy, PipelineConfig, RejectConfig};
pub use error::{PipelineError, PipelineResult};
pub use hooks::{
    classify, invoke, Fault, HookError, HookKind, HookReturn, HookSet, HookState, HookUpdate,
    PipelineKind,
};
pub use pipeline::{
    ActionOutcome, Lifecycle, NoteOutcome, PluginPipeline, ReceiveOutcome, StatusOutcome,
};
pub use plugin::{AlertPlugin, CallShape, CallbackPlugin, HookArgs, PluginConfig};
pub use registry::{PluginHandle, PluginRegistry, RegistryError};
pub use router::{PluginRouter, RegistryRouter, Routing, RoutingError};
