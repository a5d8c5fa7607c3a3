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

use crate::hooks::{HookError, HookKind, HookReturn, HookSet};
use crate::plugin::{AlertPlugin, PluginConfig};
use alertrelay_core::{Alert, Status};
use serde_json::Value;

const ACKED_BY: &str = "acked-by";

/// Records who acknowledged an alert in its `acked-by` attribute.
///
/// The login is read from the `login` key of the routed plugin
/// configuration. Unacknowledging or reopening clears the attribute; a
/// `null` value removes the key when attributes are written back.
pub struct AckedByPlugin;

fn login(config: Option<&PluginConfig>) -> Option<&str> {
    config
        .and_then(|c| c.get("login"))
        .and_then(Value::as_str)
        .filter(|login| !login.is_empty())
}

impl AlertPlugin for AckedByPlugin {
    fn name(&self) -> &str {
        "acked_by"
    }

    fn hooks(&self) -> HookSet {
        HookSet::of(&[HookKind::TakeAction, HookKind::StatusChange])
    }

    fn take_action(
        &self,
        alert: &Alert,
        action: &str,
        _text: &str,
        _timeout: Option<u64>,
        config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        let value = match (action, login(config)) {
            ("ack", Some(login)) => Value::String(login.to_string()),
            ("unack", _) => Value::Null,
            _ => return Ok(HookReturn::Unchanged),
        };
        Ok(alert.clone().with_attribute(ACKED_BY, value).into())
    }

    fn status_change(
        &self,
        alert: &Alert,
        status: Status,
        _text: &str,
        _config: Option<&PluginConfig>,
    ) -> Result<HookReturn, HookError> {
        if status != Status::Open {
            return Ok(HookReturn::Unchanged);
        }
        Ok(alert.clone().with_attribute(ACKED_BY, Value::Null).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attribute(ret: HookReturn) -> Option<Value> {
        match ret {
            HookReturn::Alert(alert) => alert.attributes.get(ACKED_BY).cloned(),
            _ => None,
        }
    }

    #[test]
    fn test_ack_records_login() {
        let alert = Alert::new("web01", "HttpError");
        let config = json!({"login": "alice"});
        let ret = AckedByPlugin.take_action(&alert, "ack", "", None, Some(&config)).unwrap();
        assert_eq!(attribute(ret), Some(json!("alice")));
    }

    #[test]
    fn test_ack_without_login_is_unchanged() {
        let alert = Alert::new("web01", "HttpError");
        let ret = AckedByPlugin.take_action(&alert, "ack", "", None, None).unwrap();
        assert_eq!(ret, HookReturn::Unchanged);
    }

    #[test]
    fn test_unack_and_reopen_clear() {
        let alert = Alert::new("web01", "HttpError").with_attribute(ACKED_BY, json!("alice"));

        let ret = AckedByPlugin.take_action(&alert, "unack", "", None, None).unwrap();
        assert_eq!(attribute(ret), Some(Value::Null));

        let ret = AckedByPlugin.status_change(&alert, Status::Open, "", None).unwrap();
        assert_eq!(attribute(ret), Some(Value::Null));

        let ret = AckedByPlugin.status_change(&alert, Status::Closed, "", None).unwrap();
        assert_eq!(ret, HookReturn::Unchanged);
    }
}
