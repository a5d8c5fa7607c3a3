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

//! In-memory alert store.
//!
//! Implements the duplicate and correlation rules of the alert model:
//!
//! - **Duplicate**: same environment, resource, event, severity and customer.
//! - **Correlated**: same environment, resource and customer, and either the
//!   same event with a different severity, or an event the stored alert
//!   lists in its `correlate` set.

use crate::alert::{Alert, Attributes, ChangeType, Status, Trend};
use crate::store::{AlertStore, StoreError, StoreResult};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<HashMap<Uuid, Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored alerts, oldest first.
    pub fn list(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.alerts.read().values().cloned().collect();
        alerts.sort_by_key(|a| a.create_time);
        alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }

    fn same_scope(a: &Alert, b: &Alert) -> bool {
        a.environment == b.environment && a.resource == b.resource && a.customer == b.customer
    }
}

/// Merge `incoming` into `target`; `null` values remove the key.
fn merge_attributes(target: &mut Attributes, incoming: &Attributes) {
    for (key, value) in incoming {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Status an existing alert moves to when a new event for it arrives.
fn next_status(existing: &Alert, incoming: &Alert) -> Status {
    if incoming.status == Status::Blackout {
        Status::Blackout
    } else if incoming.severity.is_cleared() {
        Status::Closed
    } else if matches!(existing.status, Status::Closed | Status::Expired) {
        Status::Open
    } else {
        existing.status
    }
}

impl AlertStore for MemoryAlertStore {
    fn get(&self, id: &Uuid) -> StoreResult<Option<Alert>> {
        Ok(self.alerts.read().get(id).cloned())
    }

    fn is_duplicate(&self, alert: &Alert) -> StoreResult<Option<Alert>> {
        let alerts = self.alerts.read();
        Ok(alerts
            .values()
            .find(|stored| {
                Self::same_scope(stored, alert)
                    && stored.event == alert.event
                    && stored.severity == alert.severity
            })
            .cloned())
    }

    fn deduplicate(&self, alert: &Alert, duplicate_of: &Alert) -> StoreResult<Alert> {
        let mut alerts = self.alerts.write();
        let stored = alerts
            .get_mut(&duplicate_of.id)
            .ok_or(StoreError::NotFound(duplicate_of.id))?;

        let status = next_status(stored, alert);
        let status_changed = status != stored.status;

        stored.status = status;
        stored.value = alert.value.clone();
        stored.text = alert.text.clone();
        stored.timeout = alert.timeout;
        stored.tags.extend(alert.tags.iter().cloned());
        merge_attributes(&mut stored.attributes, &alert.attributes);
        stored.duplicate_count += 1;
        stored.repeat = true;
        stored.last_receive_time = Some(alert.receive_time);
        if status_changed {
            stored.record(ChangeType::Status);
        }

        Ok(stored.clone())
    }

    fn is_correlated(&self, alert: &Alert) -> StoreResult<Option<Alert>> {
        let alerts = self.alerts.read();
        Ok(alerts
            .values()
            .find(|stored| {
                Self::same_scope(stored, alert)
                    && ((stored.event == alert.event && stored.severity != alert.severity)
                        || (stored.event != alert.event && stored.correlate.contains(&alert.event)))
            })
            .cloned())
    }

    fn update(&self, alert: &Alert, correlated: &Alert) -> StoreResult<Alert> {
        let mut alerts = self.alerts.write();
        let stored = alerts
            .get_mut(&correlated.id)
            .ok_or(StoreError::NotFound(correlated.id))?;

        stored.previous_severity = Some(stored.severity);
        stored.trend_indication = Some(Trend::between(stored.severity, alert.severity));
        stored.status = next_status(stored, alert);
        stored.event = alert.event.clone();
        stored.severity = alert.severity;
        stored.value = alert.value.clone();
        stored.text = alert.text.clone();
        stored.timeout = alert.timeout;
        stored.tags.extend(alert.tags.iter().cloned());
        merge_attributes(&mut stored.attributes, &alert.attributes);
        stored.duplicate_count = 0;
        stored.repeat = false;
        stored.last_receive_time = Some(alert.receive_time);
        stored.record(ChangeType::Severity);

        Ok(stored.clone())
    }

    fn create(&self, alert: &Alert) -> StoreResult<Alert> {
        let mut alerts = self.alerts.write();
        if alerts.contains_key(&alert.id) {
            return Err(StoreError::AlreadyExists(alert.id));
        }

        let mut created = alert.clone();
        if created.severity.is_cleared() && created.status == Status::Open {
            created.status = Status::Closed;
        }
        created.last_receive_time = Some(Utc::now());
        created.record(ChangeType::New);

        alerts.insert(created.id, created.clone());
        tracing::debug!(alert_id = %created.id, resource = %created.resource, "Alert created");
        Ok(created)
    }

    fn delete(&self, alert: &Alert) -> StoreResult<bool> {
        Ok(self.alerts.write().remove(&alert.id).is_some())
    }

    fn update_tags(&self, alert: &Alert, tags: &BTreeSet<String>) -> StoreResult<()> {
        let mut alerts = self.alerts.write();
        let stored = alerts.get_mut(&alert.id).ok_or(StoreError::NotFound(alert.id))?;
        stored.tags.extend(tags.iter().cloned());
        Ok(())
    }

    fn update_attributes(&self, alert: &Alert, attributes: &Attributes) -> StoreResult<Attributes> {
        let mut alerts = self.alerts.write();
        let stored = alerts.get_mut(&alert.id).ok_or(StoreError::NotFound(alert.id))?;
        merge_attributes(&mut stored.attributes, attributes);
        Ok(stored.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Severity;
    use serde_json::json;

    fn web_alert(severity: Severity) -> Alert {
        Alert::new("web01", "HttpError").with_severity(severity)
    }

    #[test]
    fn test_duplicate_requires_same_severity() {
        let store = MemoryAlertStore::new();
        store.create(&web_alert(Severity::Major)).unwrap();

        assert!(store.is_duplicate(&web_alert(Severity::Major)).unwrap().is_some());
        assert!(store.is_duplicate(&web_alert(Severity::Minor)).unwrap().is_none());
        assert!(store
            .is_duplicate(&web_alert(Severity::Major).with_environment("Development"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_deduplicate_counts_and_merges() {
        let store = MemoryAlertStore::new();
        let created = store.create(&web_alert(Severity::Major).with_tag("a")).unwrap();

        let incoming = web_alert(Severity::Major)
            .with_tag("b")
            .with_value("503")
            .with_attribute("region", json!("eu"));
        let merged = store.deduplicate(&incoming, &created).unwrap();

        assert_eq!(merged.id, created.id);
        assert_eq!(merged.duplicate_count, 1);
        assert!(merged.repeat);
        assert_eq!(merged.value, "503");
        assert!(merged.tags.contains("a") && merged.tags.contains("b"));
        assert_eq!(merged.attributes["region"], json!("eu"));
    }

    #[test]
    fn test_correlated_by_severity_change_and_correlate_list() {
        let store = MemoryAlertStore::new();
        let created = store
            .create(&web_alert(Severity::Major).with_correlate(["HttpError", "HttpOK"]))
            .unwrap();

        let same_event = web_alert(Severity::Critical);
        assert_eq!(store.is_correlated(&same_event).unwrap().unwrap().id, created.id);

        let listed = Alert::new("web01", "HttpOK").with_severity(Severity::Normal);
        assert_eq!(store.is_correlated(&listed).unwrap().unwrap().id, created.id);

        let unrelated = Alert::new("web01", "DiskFull").with_severity(Severity::Major);
        assert!(store.is_correlated(&unrelated).unwrap().is_none());
    }

    #[test]
    fn test_update_tracks_trend_and_closes_on_clear() {
        let store = MemoryAlertStore::new();
        let created = store.create(&web_alert(Severity::Major)).unwrap();

        let cleared = web_alert(Severity::Normal);
        let updated = store.update(&cleared, &created).unwrap();

        assert_eq!(updated.previous_severity, Some(Severity::Major));
        assert_eq!(updated.trend_indication, Some(Trend::LessSevere));
        assert_eq!(updated.status, Status::Closed);
        assert_eq!(updated.history.len(), 2);
    }

    #[test]
    fn test_update_attributes_drops_null_keys() {
        let store = MemoryAlertStore::new();
        let created = store
            .create(&web_alert(Severity::Major).with_attribute("acked-by", json!("alice")))
            .unwrap();

        let mut attrs = Attributes::new();
        attrs.insert("acked-by".into(), serde_json::Value::Null);
        attrs.insert("ticket".into(), json!(42));

        let merged = store.update_attributes(&created, &attrs).unwrap();
        assert!(!merged.contains_key("acked-by"));
        assert_eq!(merged["ticket"], json!(42));
    }

    #[test]
    fn test_missing_alert_is_not_found() {
        let store = MemoryAlertStore::new();
        let alert = web_alert(Severity::Major);

        assert!(matches!(
            store.update_tags(&alert, &alert.tags),
            Err(StoreError::NotFound(_))
        ));
        assert!(!store.delete(&alert).unwrap());
    }

    #[test]
    fn test_create_rejects_existing_id() {
        let store = MemoryAlertStore::new();
        let alert = web_alert(Severity::Major);
        store.create(&alert).unwrap();
        assert!(matches!(store.create(&alert), Err(StoreError::AlreadyExists(_))));
    }
}
