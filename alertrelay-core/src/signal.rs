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

//! Domain control signals.
//!
//! A plugin raises a signal when processing must stop with a specific,
//! expected meaning. Signals abort the running pipeline and reach the caller
//! unchanged, whatever the failure policy.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlSignal {
    /// The alert violates policy and must not be stored.
    #[error("{0}")]
    Reject(String),

    /// The event was a heartbeat; normal alert processing stops.
    #[error("{0}")]
    HeartbeatReceived(String),

    /// The alert arrived inside a blackout period.
    #[error("{0}")]
    BlackoutPeriod(String),

    #[error("{0}")]
    RateLimit(String),

    /// The alert already passed through this server.
    #[error("{0}")]
    ForwardingLoop(String),

    #[error("{0}")]
    InvalidAction(String),

    /// Any other recognized domain condition, with the status code the
    /// caller should answer with.
    #[error("{message}")]
    Domain { message: String, code: u16 },
}

impl ControlSignal {
    /// HTTP status code a request layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ControlSignal::Reject(_) => 403,
            ControlSignal::HeartbeatReceived(_) => 202,
            ControlSignal::BlackoutPeriod(_) => 202,
            ControlSignal::RateLimit(_) => 429,
            ControlSignal::ForwardingLoop(_) => 202,
            ControlSignal::InvalidAction(_) => 409,
            ControlSignal::Domain { code, .. } => *code,
        }
    }

    /// Short machine-readable name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ControlSignal::Reject(_) => "reject",
            ControlSignal::HeartbeatReceived(_) => "heartbeat",
            ControlSignal::BlackoutPeriod(_) => "blackout",
            ControlSignal::RateLimit(_) => "rate_limit",
            ControlSignal::ForwardingLoop(_) => "forwarding_loop",
            ControlSignal::InvalidAction(_) => "invalid_action",
            ControlSignal::Domain { .. } => "domain",
        }
    }

    pub fn domain(message: impl Into<String>, code: u16) -> Self {
        ControlSignal::Domain {
            message: message.into(),
            code,
        }
    }
}
