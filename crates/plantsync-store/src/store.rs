//! Main store implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use plantsync_types::{EntitySet, Session};

use crate::error::{Error, Result};
use crate::models::{EntitySnapshot, StoredEntity};

const CREDENTIALS_FILE: &str = "credentials.json";
const ENTITIES_FILE: &str = "entities.json";

/// File-backed store for credentials and the entity snapshot.
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a crash mid-write never leaves a truncated snapshot.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| Error::CreateDirectory {
                path: dir.clone(),
                source: e,
            })?;
        }
        info!("Opening store at {}", dir.display());
        Ok(Self { dir })
    }

    /// Open the default store location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_data_dir())
    }

    /// Directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // === Credentials ===

    /// Load the persisted session, or `None` if no credentials file exists.
    pub fn load_session(&self) -> Result<Option<Session>> {
        let path = self.dir.join(CREDENTIALS_FILE);
        let Some(raw) = self.read_if_present(&path)? else {
            debug!("no credentials file at {}", path.display());
            return Ok(None);
        };
        let session =
            serde_json::from_str(&raw).map_err(|e| Error::CorruptSnapshot { path, source: e })?;
        Ok(Some(session))
    }

    /// Persist the session, replacing any previous credentials file.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        self.write_atomic(CREDENTIALS_FILE, &json)?;
        debug!("saved credentials for account {}", session.id);
        Ok(())
    }

    /// Delete the credentials file if it exists.
    pub fn clear_session(&self) -> Result<()> {
        let path = self.dir.join(CREDENTIALS_FILE);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("removed credentials file");
        }
        Ok(())
    }

    // === Entities ===

    /// Load the persisted entity set.
    ///
    /// A missing file yields an empty set. Entries with an unrecognized
    /// kind tag are skipped rather than failing the whole load.
    pub fn load_entities(&self) -> Result<EntitySet> {
        let path = self.dir.join(ENTITIES_FILE);
        let Some(raw) = self.read_if_present(&path)? else {
            debug!("no entities file at {}", path.display());
            return Ok(EntitySet::new());
        };
        let snapshot: EntitySnapshot =
            serde_json::from_str(&raw).map_err(|e| Error::CorruptSnapshot { path, source: e })?;

        let mut set = EntitySet::new();
        for (id, stored) in snapshot {
            match stored.into_entity(&id) {
                Some(entity) => {
                    set.insert(entity);
                }
                None => warn!("skipping entity {id} with unrecognized type"),
            }
        }
        debug!("loaded {} entities", set.len());
        Ok(set)
    }

    /// Persist the entity set, replacing any previous snapshot.
    pub fn save_entities(&self, entities: &EntitySet) -> Result<()> {
        let snapshot: EntitySnapshot = entities
            .iter()
            .map(|e| (e.id().to_string(), StoredEntity::from_entity(e)))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot)?;
        self.write_atomic(ENTITIES_FILE, &json)?;
        debug!("saved {} entities", entities.len());
        Ok(())
    }

    // === Internals ===

    fn read_if_present(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::ReadFile {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn write_atomic(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, contents).map_err(|e| Error::WriteFile {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| Error::WriteFile { path, source: e })?;
        Ok(())
    }
}
