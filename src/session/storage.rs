//! Durable storage for the session token and username.

use super::Session;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;

/// File-backed session storage (`auth.json` in the user config dir).
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the default config dir, creating it if needed.
    pub fn new() -> Result<Self> {
        let dir = crate::config::config_dir();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join("auth.json"),
        })
    }

    /// Store at an explicit path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the persisted session; a missing file is the logged-out state.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(session)
    }

    /// Persist the session.
    pub fn save(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;

        // Restrict to the owner on Unix; the file holds the auth token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Remove the persisted session. Removing an absent file is not an error.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("auth.json"));

        let session = Session::authenticated("ann", "tok-1");
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("auth.json"));
        assert_eq!(store.load().unwrap(), Session::default());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("auth.json"));

        store.save(&Session::authenticated("ann", "tok")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Session::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let store = SessionStore::at(path.clone());
        store.save(&Session::authenticated("ann", "tok")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
