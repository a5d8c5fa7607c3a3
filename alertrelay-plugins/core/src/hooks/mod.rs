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

//! Hook machinery shared by all pipelines.
//!
//! - [`invoke`]: calls one hook, negotiating the canonical or legacy call shape
//! - [`classify`]: sorts a hook failure into signal, unsupported or generic fault
//! - [`HookState`]: running pipeline state that hook returns are folded into

mod classifier;
mod invoker;
mod normalizer;

pub use classifier::{classify, Fault};
pub use invoker::invoke;
pub use normalizer::{HookReturn, HookState, HookUpdate};

use alertrelay_core::ControlSignal;
use std::fmt;
use thiserror::Error;

/// The five hook chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Receive,
    Action,
    Note,
    Status,
    Delete,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineKind::Receive => "receive",
            PipelineKind::Action => "action",
            PipelineKind::Note => "note",
            PipelineKind::Status => "status",
            PipelineKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A single extension point a plugin may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    PreReceive,
    PostReceive,
    TakeAction,
    TakeNote,
    StatusChange,
    Delete,
}

impl HookKind {
    pub const ALL: [HookKind; 6] = [
        HookKind::PreReceive,
        HookKind::PostReceive,
        HookKind::TakeAction,
        HookKind::TakeNote,
        HookKind::StatusChange,
        HookKind::Delete,
    ];

    /// Pipeline this hook belongs to.
    pub fn pipeline(&self) -> PipelineKind {
        match self {
            HookKind::PreReceive | HookKind::PostReceive => PipelineKind::Receive,
            HookKind::TakeAction => PipelineKind::Action,
            HookKind::TakeNote => PipelineKind::Note,
            HookKind::StatusChange => PipelineKind::Status,
            HookKind::Delete => PipelineKind::Delete,
        }
    }

    /// Hooks that historically had a form without the configuration argument.
    pub fn has_legacy_shape(&self) -> bool {
        matches!(
            self,
            HookKind::PreReceive | HookKind::PostReceive | HookKind::StatusChange
        )
    }

    /// Hooks whose pipelines skip a plugin reporting `NotSupported`.
    pub fn tolerates_unsupported(&self) -> bool {
        matches!(
            self,
            HookKind::TakeAction | HookKind::TakeNote | HookKind::Delete
        )
    }

    fn bit(&self) -> u8 {
        match self {
            HookKind::PreReceive => 1 << 0,
            HookKind::PostReceive => 1 << 1,
            HookKind::TakeAction => 1 << 2,
            HookKind::TakeNote => 1 << 3,
            HookKind::StatusChange => 1 << 4,
            HookKind::Delete => 1 << 5,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            HookKind::PreReceive => "pre-receive",
            HookKind::PostReceive => "post-receive",
            HookKind::TakeAction => "action",
            HookKind::TakeNote => "note",
            HookKind::StatusChange => "status",
            HookKind::Delete => "delete",
        };
        f.write_str(stage)
    }
}

/// The set of hooks a plugin implements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookSet(u8);

impl HookSet {
    /// Create an empty hook set
    pub fn new() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        HookKind::ALL.iter().fold(Self::new(), |set, kind| set.with(*kind))
    }

    pub fn of(kinds: &[HookKind]) -> Self {
        kinds.iter().fold(Self::new(), |set, kind| set.with(*kind))
    }

    pub fn with(self, kind: HookKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn add(&mut self, kind: HookKind) {
        self.0 |= kind.bit();
    }

    pub fn has(&self, kind: HookKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Rebuild a set from [`HookSet::bits`]; unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::all().0)
    }

    pub fn iter(&self) -> impl Iterator<Item = HookKind> + '_ {
        HookKind::ALL.into_iter().filter(move |kind| self.has(*kind))
    }
}

/// Errors a hook may return.
#[derive(Debug, Error)]
pub enum HookError {
    /// A domain control signal; aborts the pipeline unchanged.
    #[error(transparent)]
    Signal(#[from] ControlSignal),

    #[error("Hook not supported")]
    NotSupported,

    /// The plugin does not accept the configuration argument.
    #[error("Hook does not accept a configuration argument")]
    SignatureMismatch,

    #[error("{0}")]
    Failed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl HookError {
    pub fn failed(message: impl Into<String>) -> Self {
        HookError::Failed(message.into())
    }
}

impl From<serde_json::Error> for HookError {
    fn from(e: serde_json::Error) -> Self {
        HookError::SerializationError(e.to_string())
    }
}
