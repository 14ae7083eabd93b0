//! Persistence for farm ecosystems.
//!
//! The engine defines no storage format of its own. A store loads and saves
//! a whole [`FarmEcosystem`] and a [`RoomRecord`], both keyed by room id.
//! Two implementations are provided: [`MemoryStore`] for tests and
//! embedding, and [`JsonFileStore`], which keeps JSON files in a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use duofarm_types::{FarmEcosystem, RoomId, RoomRecord};

/// Errors that can occur in a farm store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored farm could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored file belongs to a different room than its name says.
    #[error("room mismatch: file for {expected} contains {found}")]
    RoomMismatch {
        /// The room that was requested.
        expected: RoomId,
        /// The room found in the file.
        found: RoomId,
    },

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Load/save of farm ecosystems and room records keyed by room.
pub trait EcosystemStore: Send + Sync {
    /// Load the farm for `room_id`, or `None` if it has never been saved.
    fn load(&self, room_id: RoomId) -> Result<Option<FarmEcosystem>, StoreError>;

    /// Save a farm, replacing any previous version for its room.
    fn save(&self, farm: &FarmEcosystem) -> Result<(), StoreError>;

    /// Load the record for `room_id`, or `None` if it has never been saved.
    fn load_room(&self, room_id: RoomId) -> Result<Option<RoomRecord>, StoreError>;

    /// Save a room record, replacing any previous version.
    fn save_room(&self, record: &RoomRecord) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A store that keeps farms and room records in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    farms: Mutex<BTreeMap<RoomId, FarmEcosystem>>,
    rooms: Mutex<BTreeMap<RoomId, RoomRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            farms: Mutex::new(BTreeMap::new()),
            rooms: Mutex::new(BTreeMap::new()),
        }
    }
}

impl EcosystemStore for MemoryStore {
    fn load(&self, room_id: RoomId) -> Result<Option<FarmEcosystem>, StoreError> {
        let farms = self.farms.lock().map_err(|_poisoned| StoreError::Poisoned)?;
        Ok(farms.get(&room_id).cloned())
    }

    fn save(&self, farm: &FarmEcosystem) -> Result<(), StoreError> {
        let mut farms = self.farms.lock().map_err(|_poisoned| StoreError::Poisoned)?;
        farms.insert(farm.room_id, farm.clone());
        Ok(())
    }

    fn load_room(&self, room_id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let rooms = self.rooms.lock().map_err(|_poisoned| StoreError::Poisoned)?;
        Ok(rooms.get(&room_id).copied())
    }

    fn save_room(&self, record: &RoomRecord) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().map_err(|_poisoned| StoreError::Poisoned)?;
        rooms.insert(record.room_id, *record);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A store that writes pretty-printed JSON files, two per room.
///
/// `<room_id>.json` holds the farm and `<room_id>.room.json` the room
/// record. Saves go through a temporary file and a rename so a crash
/// mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `room_id`'s farm.
    pub fn path_for(&self, room_id: RoomId) -> PathBuf {
        self.dir.join(format!("{room_id}.json"))
    }

    /// Path of the file holding `room_id`'s record.
    pub fn room_path_for(&self, room_id: RoomId) -> PathBuf {
        self.dir.join(format!("{room_id}.room.json"))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Read and decode `path`, or `None` if the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

fn check_room(expected: RoomId, found: RoomId) -> Result<(), StoreError> {
    if expected != found {
        return Err(StoreError::RoomMismatch { expected, found });
    }
    Ok(())
}

impl EcosystemStore for JsonFileStore {
    fn load(&self, room_id: RoomId) -> Result<Option<FarmEcosystem>, StoreError> {
        let path = self.path_for(room_id);
        let Some(farm) = read_json::<FarmEcosystem>(&path)? else {
            return Ok(None);
        };
        check_room(room_id, farm.room_id)?;

        tracing::debug!(%room_id, path = %path.display(), "Loaded farm");
        Ok(Some(farm))
    }

    fn save(&self, farm: &FarmEcosystem) -> Result<(), StoreError> {
        let path = self.path_for(farm.room_id);
        self.write_json(&path, farm)?;

        tracing::debug!(room_id = %farm.room_id, path = %path.display(), "Saved farm");
        Ok(())
    }

    fn load_room(&self, room_id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let path = self.room_path_for(room_id);
        let Some(record) = read_json::<RoomRecord>(&path)? else {
            return Ok(None);
        };
        check_room(room_id, record.room_id)?;

        tracing::debug!(%room_id, path = %path.display(), "Loaded room record");
        Ok(Some(record))
    }

    fn save_room(&self, record: &RoomRecord) -> Result<(), StoreError> {
        let path = self.room_path_for(record.room_id);
        self.write_json(&path, record)?;

        tracing::debug!(room_id = %record.room_id, path = %path.display(), "Saved room record");
        Ok(())
    }
}
