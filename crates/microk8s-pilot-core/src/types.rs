//! Domain types for microk8s-pilot
//!
//! These types describe desired addon states and the outcome of bringing
//! an addon into one.

use serde::{Deserialize, Serialize};

/// Observed state of an addon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonState {
    Enabled,
    Disabled,
}

impl AddonState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddonState::Enabled => "enabled",
            AddonState::Disabled => "disabled",
        }
    }

    /// Interpret `microk8s status -a` output
    ///
    /// Only the first line counts, lowercased and trimmed. Anything outside
    /// the two known words is `None`.
    pub fn from_status_output(stdout: &str) -> Option<Self> {
        let first = stdout.lines().next().unwrap_or("").trim().to_lowercase();
        match first.as_str() {
            "enabled" => Some(AddonState::Enabled),
            "disabled" => Some(AddonState::Disabled),
            _ => None,
        }
    }
}

impl std::fmt::Display for AddonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with an addon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonAction {
    Enable,
    Disable,
}

impl AddonAction {
    /// Subcommand passed to microk8s
    pub fn verb(&self) -> &'static str {
        match self {
            AddonAction::Enable => "enable",
            AddonAction::Disable => "disable",
        }
    }

    /// State the addon is in once the action has succeeded
    pub fn target_state(&self) -> AddonState {
        match self {
            AddonAction::Enable => AddonState::Enabled,
            AddonAction::Disable => AddonState::Disabled,
        }
    }

    /// State the action moves the addon out of
    pub fn opposite_state(&self) -> AddonState {
        match self {
            AddonAction::Enable => AddonState::Disabled,
            AddonAction::Disable => AddonState::Enabled,
        }
    }

    /// Before/after pair recorded when the action changes something
    pub fn changes(&self) -> Changes {
        match self {
            AddonAction::Enable => Changes::transition(false, true),
            AddonAction::Disable => Changes::transition(true, false),
        }
    }

    /// Substring a successful run prints on stdout
    ///
    /// This is the verb form ("is enable"), not the target state. microk8s
    /// itself prints "is enabled", which contains it.
    pub fn confirmation(&self) -> String {
        format!("is {}", self.verb())
    }
}

impl std::fmt::Display for AddonAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Recorded state transition, `{}` when nothing changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn transition(old: bool, new: bool) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.old.is_none() && self.new.is_none()
    }
}

/// Human-readable explanation attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Comment {
    Single(String),
    Lines(Vec<String>),
}

impl Comment {
    /// All lines of the comment, in order
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Comment::Single(s) => vec![s.as_str()],
            Comment::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Outcome of one reconcile call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileResult {
    pub name: String,
    pub changes: Changes,
    /// `Some(true)` success, `Some(false)` failure, `None` test mode
    pub result: Option<bool>,
    pub comment: Comment,
}

impl ReconcileResult {
    pub fn unchanged(name: &str, comment: String) -> Self {
        Self {
            name: name.to_string(),
            changes: Changes::none(),
            result: Some(true),
            comment: Comment::Single(comment),
        }
    }

    pub fn changed(name: &str, changes: Changes, comment: String) -> Self {
        Self {
            name: name.to_string(),
            changes,
            result: Some(true),
            comment: Comment::Single(comment),
        }
    }

    pub fn pending(name: &str, comment: String) -> Self {
        Self {
            name: name.to_string(),
            changes: Changes::none(),
            result: None,
            comment: Comment::Single(comment),
        }
    }

    pub fn failed(name: &str, lines: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            changes: Changes::none(),
            result: Some(false),
            comment: Comment::Lines(lines),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.result == Some(false)
    }

    pub fn symbol(&self) -> &'static str {
        match self.result {
            Some(true) if self.changes.is_empty() => "●",
            Some(true) => "◆",
            Some(false) => "○",
            None => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_output_normalized() {
        assert_eq!(
            AddonState::from_status_output("  Enabled \n"),
            Some(AddonState::Enabled)
        );
        assert_eq!(
            AddonState::from_status_output("DISABLED"),
            Some(AddonState::Disabled)
        );
        assert_eq!(
            AddonState::from_status_output("disabled\ntrailing noise\n"),
            Some(AddonState::Disabled)
        );
        assert_eq!(AddonState::from_status_output(""), None);
        assert_eq!(AddonState::from_status_output("Addon foo not found"), None);
    }

    #[test]
    fn test_action_table() {
        assert_eq!(AddonAction::Enable.target_state(), AddonState::Enabled);
        assert_eq!(AddonAction::Enable.opposite_state(), AddonState::Disabled);
        assert_eq!(
            AddonAction::Enable.changes(),
            Changes::transition(false, true)
        );
        assert_eq!(AddonAction::Enable.confirmation(), "is enable");

        assert_eq!(AddonAction::Disable.target_state(), AddonState::Disabled);
        assert_eq!(AddonAction::Disable.opposite_state(), AddonState::Enabled);
        assert_eq!(
            AddonAction::Disable.changes(),
            Changes::transition(true, false)
        );
        assert_eq!(AddonAction::Disable.confirmation(), "is disable");
    }

    #[test]
    fn test_result_json_shape() {
        let ret = ReconcileResult::changed(
            "dns",
            AddonAction::Enable.changes(),
            "Successfully enabled addon dns".to_string(),
        );
        let json = serde_json::to_value(&ret).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "dns",
                "changes": {"old": false, "new": true},
                "result": true,
                "comment": "Successfully enabled addon dns",
            })
        );

        let pending = ReconcileResult::pending("dns", "Would enable addon dns".to_string());
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["changes"], serde_json::json!({}));
        assert!(json["result"].is_null());

        let failed = ReconcileResult::failed(
            "dns",
            vec!["Could not enable addon dns".to_string(), "boom".to_string()],
        );
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json["comment"],
            serde_json::json!(["Could not enable addon dns", "boom"])
        );
    }

    #[test]
    fn test_comment_display() {
        let comment = Comment::Lines(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(comment.to_string(), "a\nb");
        assert_eq!(Comment::Single("x".to_string()).lines(), vec!["x"]);
    }
}
