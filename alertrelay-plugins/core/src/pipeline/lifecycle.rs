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

//! Alert lifecycle resolution between the pre- and post-receive phases.

use crate::error::{PipelineError, PipelineResult};
use alertrelay_core::{Alert, AlertStore, StoreResult};
use serde::Serialize;
use std::fmt;

/// What the store did with a received alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Deduplicated,
    Correlated,
    Created,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Deduplicated => f.write_str("deduplicated"),
            Lifecycle::Correlated => f.write_str("correlated"),
            Lifecycle::Created => f.write_str("created"),
        }
    }
}

/// Deduplicate, correlate or create `alert`. Any store failure, whatever
/// its kind, becomes [`PipelineError::Lifecycle`].
pub(super) fn resolve(store: &dyn AlertStore, alert: &Alert) -> PipelineResult<(Alert, Lifecycle)> {
    let resolved = try_resolve(store, alert).map_err(|e| PipelineError::Lifecycle(e.to_string()))?;
    tracing::debug!(alert_id = %resolved.0.id, lifecycle = %resolved.1, "Resolved alert lifecycle");
    Ok(resolved)
}

fn try_resolve(store: &dyn AlertStore, alert: &Alert) -> StoreResult<(Alert, Lifecycle)> {
    if let Some(duplicate) = store.is_duplicate(alert)? {
        return Ok((store.deduplicate(alert, &duplicate)?, Lifecycle::Deduplicated));
    }
    if let Some(correlated) = store.is_correlated(alert)? {
        return Ok((store.update(alert, &correlated)?, Lifecycle::Correlated));
    }
    Ok((store.create(alert)?, Lifecycle::Created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertrelay_core::{MemoryAlertStore, Severity};

    #[test]
    fn test_create_then_deduplicate_then_correlate() {
        let store = MemoryAlertStore::new();
        let alert = Alert::new("web01", "HttpError").with_severity(Severity::Major);

        let (created, lifecycle) = resolve(&store, &alert).unwrap();
        assert_eq!(lifecycle, Lifecycle::Created);

        let (dup, lifecycle) = resolve(&store, &Alert::new("web01", "HttpError").with_severity(Severity::Major)).unwrap();
        assert_eq!(lifecycle, Lifecycle::Deduplicated);
        assert_eq!(dup.id, created.id);
        assert_eq!(dup.duplicate_count, 1);

        let (corr, lifecycle) = resolve(&store, &Alert::new("web01", "HttpError").with_severity(Severity::Critical)).unwrap();
        assert_eq!(lifecycle, Lifecycle::Correlated);
        assert_eq!(corr.id, created.id);
        assert_eq!(corr.previous_severity, Some(Severity::Major));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_failure_is_wrapped() {
        let store = MemoryAlertStore::new();
        let alert = Alert::new("web01", "HttpError");
        store.create(&alert).unwrap();

        // Same id, different scope: neither duplicate nor correlated, so
        // create collides with the stored record.
        let mut clash = alert.clone().with_environment("Development");
        clash.id = alert.id;
        let err = resolve(&store, &clash).unwrap_err();
        assert!(matches!(err, PipelineError::Lifecycle(_)));
        assert_eq!(err.status_code(), 500);
    }
}
