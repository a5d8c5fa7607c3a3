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

//! Alertrelay Core
//!
//! The alert record, the domain control signals plugins raise to stop
//! processing, and the store port the hook pipelines persist through.

pub mod alert;
pub mod memory;
pub mod signal;
pub mod store;

pub use alert::{
    Alert, AlertParseError, Attributes, ChangeType, HistoryEntry, Severity, Status, Trend,
    DEFAULT_TIMEOUT_SECS,
};
pub use memory::MemoryAlertStore;
pub use signal::ControlSignal;
pub use store::{AlertStore, StoreError, StoreResult};
