use std::fs;
use std::io::{self, Write};
use std::path::Path;

use letters_core::SessionFlags;
use letters_logging::{letters_info, letters_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] ron::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
struct PersistedSession {
    #[serde(default)]
    viewer: bool,
    #[serde(default)]
    moderator: bool,
    #[serde(default)]
    token: Option<String>,
}

/// Reads the saved session. Missing or unreadable files yield a logged-out session.
pub(crate) fn load_session(path: &Path) -> SessionFlags {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return SessionFlags::default();
        }
        Err(err) => {
            letters_warn!("Failed to read session from {:?}: {}", path, err);
            return SessionFlags::default();
        }
    };

    let session: PersistedSession = match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            letters_warn!("Failed to parse session from {:?}: {}", path, err);
            return SessionFlags::default();
        }
    };

    letters_info!(
        "Loaded session from {:?} (viewer = {}, moderator = {})",
        path,
        session.viewer,
        session.moderator
    );
    SessionFlags {
        viewer: session.viewer,
        moderator: session.moderator,
        token: session.token,
    }
}

/// Writes the session atomically: temp file in the same directory, then rename.
pub(crate) fn save_session(path: &Path, session: &SessionFlags) -> Result<(), PersistError> {
    let persisted = PersistedSession {
        viewer: session.viewer,
        moderator: session.moderator,
        token: session.token.clone(),
    };
    let content = ron::ser::to_string_pretty(&persisted, ron::ser::PrettyConfig::new())?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|err| PersistError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = load_session(&dir.path().join("absent.ron"));
        assert_eq!(session, SessionFlags::default());
    }

    #[test]
    fn saved_session_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.ron");
        let session = SessionFlags {
            viewer: true,
            moderator: false,
            token: Some("jwt".to_string()),
        };

        save_session(&path, &session).unwrap();
        assert_eq!(load_session(&path), session);

        save_session(&path, &SessionFlags::default()).unwrap();
        assert_eq!(load_session(&path), SessionFlags::default());
    }

    #[test]
    fn garbage_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        fs::write(&path, "not ron at all {").unwrap();

        assert_eq!(load_session(&path), SessionFlags::default());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        fs::write(&path, "(viewer: true)").unwrap();

        let session = load_session(&path);
        assert!(session.viewer);
        assert!(!session.moderator);
        assert_eq!(session.token, None);
    }
}
