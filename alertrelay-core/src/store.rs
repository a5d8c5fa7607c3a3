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

//! Alert store port.

use crate::alert::{Alert, Attributes};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Alert not found: {0}")]
    NotFound(Uuid),

    #[error("Alert already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Persistence operations the hook pipelines rely on.
///
/// Every call is synchronous. Implementations may perform I/O; the pipelines
/// neither schedule nor retry these calls.
pub trait AlertStore: Send + Sync {
    fn get(&self, id: &Uuid) -> StoreResult<Option<Alert>>;

    /// Return the stored alert `alert` duplicates, if any.
    fn is_duplicate(&self, alert: &Alert) -> StoreResult<Option<Alert>>;

    /// Fold `alert` into its stored duplicate and return the result.
    fn deduplicate(&self, alert: &Alert, duplicate_of: &Alert) -> StoreResult<Alert>;

    /// Return the stored alert `alert` correlates with, if any.
    fn is_correlated(&self, alert: &Alert) -> StoreResult<Option<Alert>>;

    /// Update the correlated alert with the new event and return the result.
    fn update(&self, alert: &Alert, correlated: &Alert) -> StoreResult<Alert>;

    fn create(&self, alert: &Alert) -> StoreResult<Alert>;

    /// Physically remove the alert. Returns `false` if nothing was removed.
    fn delete(&self, alert: &Alert) -> StoreResult<bool>;

    fn update_tags(&self, alert: &Alert, tags: &BTreeSet<String>) -> StoreResult<()>;

    /// Merge `attributes` into the stored alert and return the merged map.
    fn update_attributes(&self, alert: &Alert, attributes: &Attributes) -> StoreResult<Attributes>;
}
