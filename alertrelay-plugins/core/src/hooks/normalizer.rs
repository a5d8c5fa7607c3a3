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

//! Hook return values and the running state they are folded into.

use alertrelay_core::{Alert, Status};

/// What a hook hands back to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum HookReturn {
    /// No mutation; the running state is left as it was.
    Unchanged,
    /// Replace the alert, keep every auxiliary field.
    Alert(Alert),
    /// Replace the alert and any auxiliary field that is set.
    Update(HookUpdate),
}

impl From<Alert> for HookReturn {
    fn from(alert: Alert) -> Self {
        HookReturn::Alert(alert)
    }
}

impl From<HookUpdate> for HookReturn {
    fn from(update: HookUpdate) -> Self {
        HookReturn::Update(update)
    }
}

/// A replacement alert plus optional auxiliary fields.
///
/// Unset fields keep the value they had before the hook ran, so a plugin
/// that only rewrites the text leaves action, status and timeout alone.
#[derive(Debug, Clone, PartialEq)]
pub struct HookUpdate {
    pub alert: Alert,
    pub action: Option<String>,
    pub text: Option<String>,
    pub status: Option<Status>,
    /// `Some(None)` clears the timeout.
    pub timeout: Option<Option<u64>>,
}

impl HookUpdate {
    pub fn new(alert: Alert) -> Self {
        Self {
            alert,
            action: None,
            text: None,
            status: None,
            timeout: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Running state of one pipeline invocation.
///
/// Pipelines read only the auxiliary fields they own; the rest ride along
/// untouched.
#[derive(Debug, Clone)]
pub struct HookState {
    pub alert: Alert,
    pub action: String,
    pub text: String,
    pub status: Status,
    pub timeout: Option<u64>,
    /// Set once any hook returned a mutation; never reset.
    pub mutated: bool,
}

impl HookState {
    pub fn new(alert: Alert) -> Self {
        let status = alert.status;
        Self {
            alert,
            action: String::new(),
            text: String::new(),
            status,
            timeout: None,
            mutated: false,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fold a hook return into the state. Returns whether anything changed.
    pub fn apply(&mut self, ret: HookReturn) -> bool {
        match ret {
            HookReturn::Unchanged => return false,
            HookReturn::Alert(alert) => {
                self.alert = alert;
            }
            HookReturn::Update(update) => {
                self.alert = update.alert;
                if let Some(action) = update.action {
                    self.action = action;
                }
                if let Some(text) = update.text {
                    self.text = text;
                }
                if let Some(status) = update.status {
                    self.status = status;
                }
                if let Some(timeout) = update.timeout {
                    self.timeout = timeout;
                }
            }
        }
        self.mutated = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> HookState {
        HookState::new(Alert::new("web01", "HttpError"))
            .with_action("ack")
            .with_text("looking")
            .with_timeout(Some(3600))
    }

    #[test]
    fn test_unchanged_leaves_state() {
        let mut state = state();
        assert!(!state.apply(HookReturn::Unchanged));
        assert!(!state.mutated);
        assert_eq!(state.text, "looking");
    }

    #[test]
    fn test_bare_alert_keeps_auxiliary_fields() {
        let mut state = state();
        let replacement = Alert::new("web02", "HttpError");
        assert!(state.apply(replacement.clone().into()));

        assert_eq!(state.alert, replacement);
        assert_eq!(state.action, "ack");
        assert_eq!(state.text, "looking");
        assert_eq!(state.timeout, Some(3600));
        assert!(state.mutated);
    }

    #[test]
    fn test_partial_update_keeps_timeout() {
        let mut state = state();
        let alert = state.alert.clone();
        state.apply(HookUpdate::new(alert).with_action("close").with_text("fixed").into());

        assert_eq!(state.action, "close");
        assert_eq!(state.text, "fixed");
        assert_eq!(state.timeout, Some(3600));
    }

    #[test]
    fn test_full_update_can_clear_timeout() {
        let mut state = state();
        let alert = state.alert.clone();
        state.apply(HookUpdate::new(alert).with_timeout(None).into());
        assert_eq!(state.timeout, None);
    }

    #[test]
    fn test_mutated_is_sticky() {
        let mut state = state();
        let alert = state.alert.clone();
        state.apply(alert.into());
        state.apply(HookReturn::Unchanged);
        assert!(state.mutated);
    }
}
