//! Storage areas with automatic JSON serialization.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, SessionId};

/// Contents of one storage area: key to serialized JSON value.
type Area = BTreeMap<String, String>;

/// In-process storage shared by every handle cloned from it.
///
/// Two [`SessionStorage`] handles opened on the same store and session see
/// each other's writes, which is how tests simulate a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    areas: Rc<RefCell<HashMap<SessionId, Area>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the storage area for a session.
    pub fn session(&self, session: SessionId) -> SessionStorage {
        SessionStorage {
            session,
            backend: Backend::Memory(self.clone()),
            quota_bytes: None,
        }
    }

    /// Number of sessions holding a storage area.
    pub fn session_count(&self) -> usize {
        self.areas.borrow().len()
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Memory(MemoryStore),
    Directory(PathBuf),
}

/// Type-safe storage area for a single session.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Every operation reads the area fresh
/// from the backend, so concurrent handles follow last-write-wins.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    session: SessionId,
    backend: Backend,
    quota_bytes: Option<usize>,
}

impl SessionStorage {
    /// Open a storage area in a private in-memory store.
    pub fn in_memory(session: SessionId) -> Self {
        MemoryStore::new().session(session)
    }

    /// Open the storage area of `session` under a directory.
    ///
    /// The directory is created if missing. The area itself is a file named
    /// `<session>.json`, written on first `set`.
    pub fn open_dir(root: impl Into<PathBuf>, session: SessionId) -> Result<Self, CacheError> {
        if !session.is_valid() {
            return Err(CacheError::InvalidSessionId(session.as_str().to_string()));
        }
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            session,
            backend: Backend::Directory(root),
            quota_bytes: None,
        })
    }

    /// Limit the area to `quota_bytes`, counted as key plus serialized value
    /// lengths.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// The session this area belongs to.
    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    /// Configured quota, if any.
    pub fn quota_bytes(&self) -> Option<usize> {
        self.quota_bytes
    }

    /// Get a value from the area.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.read_area()?.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    /// Get the raw JSON text stored under a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.read_area()?.remove(key))
    }

    /// Set a value in the area, replacing any previous value.
    ///
    /// Fails with [`CacheError::QuotaExceeded`] when the area would outgrow
    /// its quota; the previous value is kept in that case.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        let mut area = self.read_area()?;
        area.insert(key.to_string(), raw);

        if let Some(quota) = self.quota_bytes {
            let needed = area_size(&area);
            if needed > quota {
                tracing::debug!(session = %self.session, key, needed, quota, "storage quota exceeded");
                return Err(CacheError::QuotaExceeded { needed, quota });
            }
        }

        self.write_area(&area)
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let mut area = self.read_area()?;
        if area.remove(key).is_none() {
            return Ok(false);
        }
        self.write_area(&area)?;
        Ok(true)
    }

    /// Check if a key exists in the area.
    pub fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read_area()?.contains_key(key))
    }

    /// All keys in the area, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.read_area()?.into_keys().collect())
    }

    /// Bytes currently counted against the quota.
    pub fn used_bytes(&self) -> Result<usize, CacheError> {
        Ok(area_size(&self.read_area()?))
    }

    /// Remove every key while keeping the session alive.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.write_area(&Area::new())
    }

    /// End the session, deleting its storage area.
    pub fn end_session(self) -> Result<(), CacheError> {
        match &self.backend {
            Backend::Memory(store) => {
                store.areas.borrow_mut().remove(&self.session);
                Ok(())
            }
            Backend::Directory(root) => match fs::remove_file(area_path(root, &self.session)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
        }
    }

    fn read_area(&self) -> Result<Area, CacheError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store
                .areas
                .borrow()
                .get(&self.session)
                .cloned()
                .unwrap_or_default()),
            Backend::Directory(root) => {
                let path = area_path(root, &self.session);
                match fs::read_to_string(&path) {
                    Ok(content) => serde_json::from_str(&content).map_err(|e| {
                        CacheError::Corrupt {
                            path,
                            reason: e.to_string(),
                        }
                    }),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Area::new()),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    fn write_area(&self, area: &Area) -> Result<(), CacheError> {
        match &self.backend {
            Backend::Memory(store) => {
                store
                    .areas
                    .borrow_mut()
                    .insert(self.session.clone(), area.clone());
                Ok(())
            }
            Backend::Directory(root) => {
                let path = area_path(root, &self.session);
                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, serde_json::to_vec_pretty(area)?)?;
                fs::rename(&tmp, &path)?;
                Ok(())
            }
        }
    }
}

fn area_path(root: &Path, session: &SessionId) -> PathBuf {
    root.join(format!("{}.json", session))
}

fn area_size(area: &Area) -> usize {
    area.iter().map(|(k, v)| k.len() + v.len()).sum()
}
