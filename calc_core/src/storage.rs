//! # Storage
//!
//! Key-value JSON storage for the few things a calculator keeps between
//! sessions: favorites, recently opened calculators and calculation history.
//! Each key maps to one `<key>.json` file under a data directory, the same
//! shape as the browser local-storage keys the site uses
//! (`calculator-favorites`, `calculator-recent`).
//!
//! Components never touch files directly. They take a [`Repository`], which is
//! either a [`JsonFileRepository`] or a [`MemoryRepository`] in tests.
//!
//! ## Write safety
//!
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Whole-value writes**: every save replaces the stored value wholesale
//! - **File locking**: a save holds an exclusive lock (fs2 OS lock plus a
//!   `.lock` sidecar describing the holder). A second process saving the same
//!   key at the same moment gets [`CalcError::FileLocked`] instead of silently
//!   interleaving; last writer wins otherwise.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::storage::{Repository, Storage};
//! use calc_core::preferences::Favorites;
//!
//! let storage = Storage::with_root("/tmp/calcdeck");
//! let repo = storage.repository::<Favorites>(Storage::FAVORITES_KEY);
//!
//! let mut favorites = repo.load()?;
//! favorites.toggle("loan-calculator")?;
//! repo.save(&favorites)?;
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use fs2::FileExt;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Current schema version for stored values
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CALCDECK_DATA_DIR";

// ============================================================================
// Repository
// ============================================================================

/// Load/save access to one stored value.
///
/// `load` returns `T::default()` when nothing has been stored yet. `save`
/// overwrites the stored value wholesale.
pub trait Repository<T> {
    fn load(&self) -> CalcResult<T>;
    fn save(&self, value: &T) -> CalcResult<()>;
}

/// In-memory repository for tests and for sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryRepository<T> {
    value: RefCell<Option<T>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        MemoryRepository {
            value: RefCell::new(None),
        }
    }

    pub fn with_value(value: T) -> Self {
        MemoryRepository {
            value: RefCell::new(Some(value)),
        }
    }
}

impl<T: Clone + Default> Repository<T> for MemoryRepository<T> {
    fn load(&self) -> CalcResult<T> {
        Ok(self.value.borrow().clone().unwrap_or_default())
    }

    fn save(&self, value: &T) -> CalcResult<()> {
        *self.value.borrow_mut() = Some(value.clone());
        Ok(())
    }
}

/// Stored JSON layout: the value plus the schema version that wrote it
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: String,
    value: T,
}

/// Repository backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

impl<T> JsonFileRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileRepository {
            path: path.into(),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Repository<T> for JsonFileRepository<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> CalcResult<T> {
        if !self.path.exists() {
            debug!("{} not found, using defaults", self.path.display());
            return Ok(T::default());
        }

        let contents = read_to_string(&self.path)?;
        let envelope: Envelope<T> = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", self.path.display(), e),
        })?;
        validate_version(&envelope.version)?;

        debug!("loaded {}", self.path.display());
        Ok(envelope.value)
    }

    fn save(&self, value: &T) -> CalcResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CalcError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
        }

        let _lock = FileLock::acquire(&self.path, current_user())?;
        let envelope = Envelope {
            version: SCHEMA_VERSION.to_string(),
            value,
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        write_atomic(&self.path, json.as_bytes())?;

        debug!("saved {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Keyed storage
// ============================================================================

/// A data directory holding one JSON file per key.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub const FAVORITES_KEY: &'static str = "calculator-favorites";
    pub const RECENT_KEY: &'static str = "calculator-recent";
    pub const HISTORY_KEY: &'static str = "calculator-history";

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Storage { root: root.into() }
    }

    /// Resolve the data directory: explicit path, then `CALCDECK_DATA_DIR`,
    /// then the platform's local data directory.
    pub fn resolve(explicit: Option<&Path>) -> CalcResult<Self> {
        if let Some(path) = explicit {
            return Ok(Storage::with_root(path));
        }
        if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
            return Ok(Storage::with_root(PathBuf::from(path)));
        }

        let dirs = ProjectDirs::from("dev", "Calcdeck", "Calcdeck").ok_or_else(|| CalcError::Internal {
            message: "unable to resolve local data directory".to_string(),
        })?;
        Ok(Storage::with_root(dirs.data_local_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    pub fn repository<T>(&self, key: &str) -> JsonFileRepository<T> {
        JsonFileRepository::new(self.path_for(key))
    }
}

// ============================================================================
// File locking
// ============================================================================

/// Lock file metadata stored in `.lock` sidecar files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Exclusive lock on a stored file, released on drop.
///
/// Holds both an OS-level lock (fs2) and a `.lock` sidecar with metadata so
/// a refused writer can report who holds it.
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] while another live process holds
    /// it. Stale locks (dead process on this machine, or older than 24 hours)
    /// are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(holder) = FileLock::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", holder.user_id, holder.machine),
                holder.locked_at.to_rfc3339(),
            ));
        }

        // No truncate on open: the sidecar belongs to the holder until the OS lock is ours
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process".to_string(), "unknown".to_string())
        })?;

        if let Ok(stale) = read_lock_info(&lock_path) {
            warn!("taking over stale lock on {} held by pid {}", path.display(), stale.pid);
        }

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .set_len(0)
            .and_then(|_| lock_file.write_all(lock_json.as_bytes()))
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;
        lock_file
            .sync_all()
            .map_err(|e| CalcError::file_error("sync lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(FileLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Who holds the lock on `path`, if anyone live does
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        read_lock_info(&lock_path).ok().filter(|info| !is_lock_stale(info))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released when _lock_file is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

// ============================================================================
// File helpers
// ============================================================================

fn read_to_string(path: &Path) -> CalcResult<String> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `bytes` to `path` via a synced temp file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(bytes)
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Check that a stored schema version can be read by this build.
///
/// The major version must match; in 0.x the stored minor may not be newer.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
