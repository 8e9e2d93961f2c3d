//! Persistent applet placement store
//!
//! The long-lived record of where each applet sits: one key-file section
//! per applet, keyed by its [`AppletId`], holding the position and an
//! optional explicit size. Loading is forgiving (broken records are
//! dropped, a missing file is an empty store); saving replaces the file
//! atomically so a failed write never corrupts the previous layout.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::applet::AppletId;
use crate::utils::{Area, Point, Size};

pub mod keyfile;

use self::keyfile::KeyFile;

const KEY_X: &str = "X";
const KEY_Y: &str = "Y";
const KEY_WIDTH: &str = "WIDTH";
const KEY_HEIGHT: &str = "HEIGHT";

/// Extent value standing for "use the applet's natural size"
const NATURAL_EXTENT: i32 = -1;

/// Stored placement of one applet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredGeometry {
    /// Top-left corner of the applet
    pub position: Point<i32, Area>,
    /// Explicit size, or `None` to use the applet's natural size
    ///
    /// Serialized as `WIDTH`/`HEIGHT` of `-1` when absent. A stored size
    /// counts only when both extents are positive.
    pub size: Option<Size<i32, Area>>,
}

/// Errors of the placement store edges
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file exists but could not be read
    #[error("failed to read placement store {path:?}")]
    Read {
        /// Path of the store file
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
    /// The store file could not be written
    #[error("failed to write placement store {path:?}")]
    Write {
        /// Path of the store file
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
}

/// The identifier to geometry mapping of a home area
///
/// Entry order is preserved and doubles as the z-order, back to front,
/// when a layout is loaded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlacementStore {
    entries: IndexMap<AppletId, StoredGeometry>,
}

impl PlacementStore {
    /// Create an empty store
    pub fn new() -> PlacementStore {
        PlacementStore::default()
    }

    /// Read the store from disk
    ///
    /// A missing file yields an empty store. Records without a usable
    /// position are dropped with a warning.
    pub fn load(path: &Path) -> Result<PlacementStore, StoreError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(?path, "No placement store yet, starting empty");
                return Ok(PlacementStore::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };

        let file = KeyFile::parse(&text);
        let mut store = PlacementStore::new();

        for name in file.section_names() {
            let (Some(x), Some(y)) = (file.get_i32(name, KEY_X), file.get_i32(name, KEY_Y)) else {
                warn!(section = name, "Placement record has no usable position, dropping it");
                continue;
            };

            let extent = |key| match file.get_i32(name, key) {
                Some(value) => Some(value),
                None if file.contains(name, key) => None,
                None => Some(NATURAL_EXTENT),
            };
            let (Some(w), Some(h)) = (extent(KEY_WIDTH), extent(KEY_HEIGHT)) else {
                warn!(section = name, "Placement record has an unparsable size, dropping it");
                continue;
            };

            let size = (w > 0 && h > 0).then(|| Size::from((w, h)));
            store.entries.insert(
                AppletId::new(name),
                StoredGeometry {
                    position: Point::from((x, y)),
                    size,
                },
            );
        }

        debug!(?path, applets = store.entries.len(), "Loaded placement store");
        Ok(store)
    }

    /// Write the store to disk, replacing the previous file atomically
    ///
    /// The new content goes to a temporary file next to the target first,
    /// so a full disk or an interrupted write leaves the old layout
    /// intact.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: path.to_owned(),
            source,
        };

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut file = match dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;

        file.write_all(self.to_keyfile().to_string().as_bytes())
            .map_err(write_err)?;
        file.flush().map_err(write_err)?;
        file.persist(path).map_err(|err| write_err(err.error))?;

        debug!(?path, applets = self.entries.len(), "Saved placement store");
        Ok(())
    }

    /// The stored geometry of an applet
    pub fn get(&self, id: &AppletId) -> Option<&StoredGeometry> {
        self.entries.get(id)
    }

    /// Insert or replace the geometry of an applet
    pub fn set(&mut self, id: AppletId, geometry: StoredGeometry) {
        self.entries.insert(id, geometry);
    }

    /// Drop the entry of an applet
    pub fn remove(&mut self, id: &AppletId) -> bool {
        self.entries.shift_remove(id).is_some()
    }

    /// Whether the store holds an entry for the applet
    pub fn contains(&self, id: &AppletId) -> bool {
        self.entries.contains_key(id)
    }

    /// Stored applet ids, back to front
    pub fn ids(&self) -> impl Iterator<Item = &AppletId> {
        self.entries.keys()
    }

    /// All entries, back to front
    pub fn iter(&self) -> impl Iterator<Item = (&AppletId, &StoredGeometry)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_keyfile(&self) -> KeyFile {
        let mut file = KeyFile::new();
        for (id, geometry) in &self.entries {
            let section = id.as_str();
            file.set(section, KEY_X, geometry.position.x);
            file.set(section, KEY_Y, geometry.position.y);
            let (w, h) = geometry
                .size
                .map(|s| (s.w, s.h))
                .unwrap_or((NATURAL_EXTENT, NATURAL_EXTENT));
            file.set(section, KEY_WIDTH, w);
            file.set(section, KEY_HEIGHT, h);
        }
        file
    }
}
