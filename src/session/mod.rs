//! Session state and authentication operations.
//!
//! The session is the authenticated identity and token pair used to
//! authorize task API calls. It is persisted across runs in `auth.json`
//! under the user config dir.

mod storage;

pub use storage::SessionStore;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Authenticated identity. Token and username are both present or both
/// absent; `is_authenticated` is the only way view code should ask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn authenticated(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            token: Some(token.into()),
        }
    }

    /// True iff both token and username are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.username.is_some()
    }
}

/// Log in with the given credentials and persist the resulting session.
///
/// Empty fields are rejected before any network call. On failure the stored
/// state and the client token are left untouched.
pub async fn login(
    api: &mut ApiClient,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<Session> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::MissingField("username"));
    }
    if password.is_empty() {
        return Err(Error::MissingField("password"));
    }

    let token = api.get_token(username, password).await?;
    let session = Session::authenticated(username, token.clone());
    store.save(&session)?;
    api.set_token(Some(token));

    tracing::debug!(username, "logged in");
    Ok(session)
}

/// Register a new account; on success the service logs the user in, so this
/// behaves like `login`. Failures surface the server-provided message.
pub async fn register(
    api: &mut ApiClient,
    store: &SessionStore,
    username: &str,
    firstname: &str,
    lastname: &str,
    password: &str,
) -> Result<Session> {
    let username = username.trim();
    let firstname = firstname.trim();
    let lastname = lastname.trim();
    if username.is_empty() {
        return Err(Error::MissingField("username"));
    }
    if firstname.is_empty() {
        return Err(Error::MissingField("firstname"));
    }
    if lastname.is_empty() {
        return Err(Error::MissingField("lastname"));
    }
    if password.is_empty() {
        return Err(Error::MissingField("password"));
    }

    let token = api.register(username, firstname, lastname, password).await?;
    let session = Session::authenticated(username, token.clone());
    store.save(&session)?;
    api.set_token(Some(token));

    tracing::debug!(username, "registered");
    Ok(session)
}

/// Clear in-memory and durable session state unconditionally. Never fails;
/// a storage error is logged and swallowed.
pub fn logout(api: &mut ApiClient, store: &SessionStore) -> Session {
    if let Err(e) = store.clear() {
        tracing::warn!("failed to clear stored session: {e}");
    }
    api.set_token(None);
    Session::default()
}

/// Restore the persisted session at startup. A missing or unreadable file
/// yields the unauthenticated session.
pub fn restore(api: &mut ApiClient, store: &SessionStore) -> Session {
    let session = match store.load() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("failed to read stored session: {e}");
            Session::default()
        }
    };
    api.set_token(session.token.clone());
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at(dir.path().join("auth.json"))
    }

    #[test]
    fn test_is_authenticated_requires_both_fields() {
        assert!(!Session::default().is_authenticated());
        assert!(
            !Session {
                username: Some("ann".into()),
                token: None,
            }
            .is_authenticated()
        );
        assert!(
            !Session {
                username: None,
                token: Some("tok".into()),
            }
            .is_authenticated()
        );
        assert!(Session::authenticated("ann", "tok").is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/get-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new(server.uri());

        assert!(login(&mut api, &store, "", "pw").await.is_err());
        assert!(login(&mut api, &store, "   ", "pw").await.is_err());
        assert!(login(&mut api, &store, "ann", "").await.is_err());
        assert!(!api.has_token());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/get-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "tok-1"})),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new(server.uri());

        let session = login(&mut api, &store, "ann", "secret").await.unwrap();
        assert!(session.is_authenticated());
        assert!(api.has_token());

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, session);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/get-token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new(server.uri());

        assert!(login(&mut api, &store, "ann", "wrong").await.is_err());
        assert!(!api.has_token());
        assert!(!store.load().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new(server.uri());

        assert!(
            register(&mut api, &store, "ann", "", "Lee", "pw")
                .await
                .is_err()
        );
        assert!(
            register(&mut api, &store, "ann", "Ann", "Lee", "")
                .await
                .is_err()
        );
    }

    #[test]
    fn test_logout_clears_everything_from_any_state() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new("http://localhost");

        // From a logged-in state.
        store.save(&Session::authenticated("ann", "tok")).unwrap();
        api.set_token(Some("tok".into()));
        let session = logout(&mut api, &store);
        assert!(!session.is_authenticated());
        assert!(!api.has_token());
        assert!(!store.load().unwrap().is_authenticated());

        // Logging out again is still fine.
        let session = logout(&mut api, &store);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new("http://localhost");

        store.save(&Session::authenticated("ann", "tok")).unwrap();
        let session = restore(&mut api, &store);
        assert!(session.is_authenticated());
        assert_eq!(session.username.as_deref(), Some("ann"));
        assert!(api.has_token());
    }

    #[test]
    fn test_restore_without_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new("http://localhost");

        let session = restore(&mut api, &store);
        assert!(!session.is_authenticated());
        assert!(!api.has_token());
    }

    #[tokio::test]
    async fn test_login_then_load_populates_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/get-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "tok-1"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "title": "First", "completed": false},
                {"id": 2, "title": "Second", "completed": true},
                {"id": 3, "title": "Third", "completed": false}
            ])))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut api = ApiClient::new(server.uri());

        let session = login(&mut api, &store, "ann", "secret").await.unwrap();
        assert!(session.is_authenticated());

        let mut tasks = crate::tasks::TaskStore::new();
        let count = tasks.load(&api).await.unwrap();
        assert_eq!(count, 3);
        let names: Vec<&str> = tasks.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_restore_with_corrupt_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::at(path);
        let mut api = ApiClient::new("http://localhost");
        let session = restore(&mut api, &store);
        assert!(!session.is_authenticated());
    }
}
