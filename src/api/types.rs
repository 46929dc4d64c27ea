//! Wire types for the task service.

use serde::{Deserialize, Serialize};

/// A server-owned to-do item.
///
/// The service is inconsistent about field names across endpoints: the
/// display name arrives as `name` or `title`, the completion flag as
/// `completed` or `marked_as_done`. Both spellings land in the same field.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default, alias = "marked_as_done")]
    pub completed: bool,
}

/// Login payload for the token endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Registration payload. The service expects camelCase for the password.
#[derive(Debug, Serialize)]
pub(crate) struct Registration<'a> {
    pub username: &'a str,
    pub firstname: &'a str,
    pub lastname: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Creation payload; new tasks always start open.
#[derive(Debug, Serialize)]
pub(crate) struct NewTask<'a> {
    pub title: &'a str,
    pub marked_as_done: bool,
}

/// Partial update for one task; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_as_done: Option<bool>,
}

impl TaskPatch {
    /// Patch that renames a task.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Patch that sets the completion flag.
    #[must_use]
    pub fn completed(done: bool) -> Self {
        Self {
            marked_as_done: Some(done),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_accepts_title_spelling() {
        let task: Task = serde_json::from_str(r#"{"id":7,"title":"Buy milk","completed":false}"#).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.name, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn test_task_accepts_name_spelling() {
        let task: Task = serde_json::from_str(r#"{"id":1,"name":"Water plants","completed":true}"#).unwrap();
        assert_eq!(task.name, "Water plants");
        assert!(task.completed);
    }

    #[test]
    fn test_task_accepts_marked_as_done() {
        let task: Task = serde_json::from_str(r#"{"id":2,"title":"Ship","marked_as_done":true}"#).unwrap();
        assert!(task.completed);
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let json = serde_json::to_string(&TaskPatch::completed(true)).unwrap();
        assert_eq!(json, r#"{"marked_as_done":true}"#);

        let json = serde_json::to_string(&TaskPatch::rename("new name")).unwrap();
        assert_eq!(json, r#"{"name":"new name"}"#);
    }

    #[test]
    fn test_registration_uses_camel_case_password() {
        let json = serde_json::to_string(&Registration {
            username: "ann",
            firstname: "Ann",
            lastname: "Lee",
            new_password: "secret",
        })
        .unwrap();
        assert!(json.contains(r#""newPassword":"secret""#));
    }
}
