use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Everything git2mastodon remembers between runs
///
/// The aliases accept the field names written by earlier releases of the tool.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Base URL of the instance the app was registered with
    #[serde(alias = "Server")]
    pub server: String,
    #[serde(alias = "ClientID")]
    pub client_id: String,
    #[serde(alias = "ClientSecret")]
    pub client_secret: String,
    #[serde(alias = "AccessToken")]
    pub access_token: String,
    /// Hash of the most recently announced commit, empty if none
    #[serde(alias = "Commit", default)]
    pub last_commit: String,
}

/// Load the record at `path`, or `None` if no record has been saved yet
pub(crate) fn load(path: &Path) -> Result<Option<CredentialRecord>> {
    let contents = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no credential store at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(Error::StoreRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&contents)
        .map(Some)
        .map_err(|source| Error::StoreDecode {
            path: path.to_path_buf(),
            source,
        })
}

/// Overwrite the record at `path`, creating the file readable and writable by
/// owner and group only
pub(crate) fn save(path: &Path, record: &CredentialRecord) -> Result<()> {
    let write_err = |source| Error::StoreWrite {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_vec_pretty(record).map_err(|source| Error::StoreEncode {
        path: path.to_path_buf(),
        source,
    })?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o660);
    }

    let mut file = options.open(path).map_err(write_err)?;
    file.write_all(&json).map_err(write_err)?;
    debug!("saved credential store to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record() -> CredentialRecord {
        CredentialRecord {
            server: "https://example.social".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            access_token: "token".to_string(),
            last_commit: "abc123".to_string(),
        }
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("masto.cfg")).unwrap(), None);
    }

    #[test]
    fn saved_record_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("masto.cfg");

        save(&path, &record()).unwrap();
        assert_eq!(load(&path).unwrap(), Some(record()));
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("masto.cfg");
        save(&path, &record()).unwrap();

        let mut updated = record();
        updated.last_commit = "def456".to_string();
        save(&path, &updated).unwrap();

        assert_eq!(load(&path).unwrap().unwrap().last_commit, "def456");
    }

    #[test]
    fn reads_legacy_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("masto.cfg");
        std::fs::write(
            &path,
            r#"{"Server":"https://example.social","ClientID":"id","ClientSecret":"secret","AccessToken":"token","Commit":"abc123"}"#,
        )
        .unwrap();

        assert_eq!(load(&path).unwrap(), Some(record()));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("masto.cfg");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load(&path), Err(Error::StoreDecode { .. })));
    }

    #[test]
    fn encode_failure_is_reported_as_encoding() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = Error::StoreEncode {
            path: "masto.cfg".into(),
            source,
        };

        assert!(err.to_string().starts_with("could not encode masto.cfg"));
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_not_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("masto.cfg");
        save(&path, &record()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o007, 0);
    }
}
