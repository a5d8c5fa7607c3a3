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

use crate::config::{BlackoutConfig, BlackoutWindow};
use crate::hooks::{HookError, HookKind, HookReturn, HookSet};
use crate::plugin::{AlertPlugin, PluginConfig};
use alertrelay_core::{Alert, ControlSignal, Status};
use chrono::{DateTime, Utc};

/// Suppresses alerts that fall inside an active blackout window.
///
/// With notification blackout on, matching alerts are accepted with status
/// `blackout`, which stops every later hook. Otherwise they are refused with
/// [`ControlSignal::BlackoutPeriod`]. The `notification_blackout` key of the
/// routed plugin configuration, when present, overrides the configured mode.
pub struct BlackoutPlugin {
    notification_blackout: bool,
    windows: Vec<BlackoutWindow>,
}

impl BlackoutPlugin {
    pub fn from_config(config: &BlackoutConfig) -> Self {
        Self {
            notification_blackout: config.notification_blackout,
            windows: config.windows.clone(),
        }
    }

    fn in_blackout(&self, alert: &Alert, now: DateTime<Utc>) -> bool {
        self.windows
            .iter()
            .any(|window| window.is_active(now) && window.matches(alert))
    }

    fn notification_blackout(&self, config: Option<&PluginConfig>) -> bool {
        config
            .and_then(|c| c.get("notification_blackout"))
            .and_then(|v| v.as_bool())
            .unwrap_or(self.notification_blackout)
    }
}

impl AlertPlugin for BlackoutPlugin {
    fn name(&self) -> &str {
        "blackout"
    }

    fn hooks(&self) -> HookSet {
        HookSet::of(&[HookKind::PreReceive])
    }

    fn pre_receive(&self, alert: &Alert, config: Option<&PluginConfig>) -> Result<HookReturn, HookError> {
        if !self.in_blackout(alert, Utc::now()) {
            return Ok(alert.clone().into());
        }

        if self.notification_blackout(config) {
            tracing::debug!(alert_id = %alert.id, "Alert matched blackout, suppressing");
            Ok(alert.clone().with_status(Status::Blackout).into())
        } else {
            Err(ControlSignal::BlackoutPeriod("Suppressed alert during blackout period".to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn plugin(notification_blackout: bool, windows: Vec<BlackoutWindow>) -> BlackoutPlugin {
        BlackoutPlugin::from_config(&BlackoutConfig {
            notification_blackout,
            windows,
        })
    }

    fn web_alert() -> Alert {
        Alert::new("web01", "HttpError").with_service("Web")
    }

    fn returned_alert(ret: &HookReturn) -> Alert {
        match ret {
            HookReturn::Alert(alert) => alert.clone(),
            other => panic!("unexpected return: {:?}", other),
        }
    }

    #[test]
    fn test_outside_blackout_passes() {
        let plugin = plugin(false, vec![BlackoutWindow::new("Development")]);
        let alert = web_alert();
        let ret = plugin.pre_receive(&alert, None).unwrap();
        assert_eq!(ret, HookReturn::Alert(alert));
    }

    #[test]
    fn test_blackout_refuses() {
        let plugin = plugin(false, vec![BlackoutWindow::new("Production").with_service("Web")]);
        let err = plugin.pre_receive(&web_alert(), None).unwrap_err();
        match err {
            HookError::Signal(signal) => {
                assert_eq!(signal, ControlSignal::BlackoutPeriod("Suppressed alert during blackout period".into()));
                assert_eq!(signal.status_code(), 202);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_notification_blackout_suppresses() {
        let plugin = plugin(true, vec![BlackoutWindow::new("Production")]);
        let ret = plugin.pre_receive(&web_alert(), None).unwrap();
        let alert = returned_alert(&ret);
        assert_eq!(alert.status, Status::Blackout);
        assert!(alert.is_suppressed());
    }

    #[test]
    fn test_routed_config_overrides_mode() {
        let plugin = plugin(false, vec![BlackoutWindow::new("Production")]);
        let config = json!({"notification_blackout": true});
        let ret = plugin.pre_receive(&web_alert(), Some(&config)).unwrap();
        assert!(returned_alert(&ret).is_suppressed());
    }

    #[test]
    fn test_expired_window_is_ignored() {
        let now = Utc::now();
        let window = BlackoutWindow::new("Production").between(now - Duration::hours(2), now - Duration::hours(1));
        let plugin = plugin(false, vec![window]);
        assert!(plugin.pre_receive(&web_alert(), None).is_ok());
    }
}
