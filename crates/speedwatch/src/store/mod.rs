//! Day-partitioned append store for speed records.
//!
//! One JSON-array file per calendar day, named `DD.MM.YYYY.json` under the
//! store's data directory. Appends splice the new record in front of the
//! array's closing bracket, so a file is a well-formed JSON array at rest
//! after every append, and an append costs O(1) extra bytes regardless of
//! file size. Queries stream the file one record at a time.

mod scan;

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use serde_json::error::Category;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{day_key, Record};

use scan::ArrayReader;

/// Contract between the store and the business layer.
///
/// Implementations must be safe to share across request-handling threads.
pub trait RecordStore: Send + Sync {
    /// Append a record to the file for its calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the day file cannot be opened, created, or
    /// written.
    fn create_record(&self, record: &Record) -> Result<()>;

    /// All records for `date` with `speed` strictly above `threshold`,
    /// in file order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DayNotFound`] if no file exists for `date`, and a
    /// decode or I/O error if the file cannot be read.
    fn over_speed_by_date(&self, date: NaiveDate, threshold: f64) -> Result<Vec<Record>>;

    /// The lowest-speed record (slot 0) and highest-speed record (slot 1)
    /// for `date`.
    ///
    /// If the day file exists but holds no records, both slots are the
    /// zero-value [`Record`]. That shape is part of the wire contract;
    /// callers detect "no data" with [`Record::is_placeholder`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DayNotFound`] if no file exists for `date`, and a
    /// decode or I/O error if the file cannot be read.
    fn min_max_by_date(&self, date: NaiveDate) -> Result<[Record; 2]>;
}

/// File-backed implementation of [`RecordStore`].
///
/// Day files are opened fresh per call; the only persistent state is the
/// data directory path and the append lock. One mutex serializes all
/// appends: two unserialized appends would read the same file length and
/// both overwrite the same closing-bracket offset, losing a record and
/// corrupting the array. Scans take no lock; a scan racing an in-progress
/// append can observe a torn array and reports it as a decode error.
#[derive(Debug)]
pub struct DayFileStore {
    dir: PathBuf,
    append_lock: Mutex<()>,
}

impl DayFileStore {
    /// Open a store rooted at the given data directory, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }

        info!("Record store opened at {}", dir.display());
        Ok(Self {
            dir,
            append_lock: Mutex::new(()),
        })
    }

    /// Path of the day file for `date`.
    fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", day_key(date)))
    }

    /// Open the day file for writing, creating it as an empty array if it
    /// does not exist yet. Must be called with the append lock held.
    fn open_for_append(&self, path: &Path) -> Result<File> {
        let open = |path: &Path| {
            OpenOptions::new()
                .write(true)
                .open(path)
                .map_err(|source| Error::DayFileOpen {
                    path: path.to_path_buf(),
                    source,
                })
        };

        match open(path) {
            Err(Error::DayFileOpen { source, .. }) if source.kind() == ErrorKind::NotFound => {
                fs::write(path, b"[]").map_err(|source| Error::DayFileOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!("Created day file {}", path.display());
                open(path)
            }
            result => result,
        }
    }

    /// Open the day file for a streaming scan.
    fn open_for_scan(&self, date: NaiveDate) -> Result<(PathBuf, BufReader<File>)> {
        let path = self.day_path(date);
        match File::open(&path) {
            Ok(file) => Ok((path, BufReader::new(file))),
            Err(source) if source.kind() == ErrorKind::NotFound => Err(Error::DayNotFound { date }),
            Err(source) => Err(Error::DayFileOpen { path, source }),
        }
    }

    /// Map a scan failure onto the error taxonomy: transport faults stay
    /// I/O errors, everything else means the day file is not a valid
    /// record array.
    fn scan_error(path: &Path, err: serde_json::Error) -> Error {
        if err.classify() == Category::Io {
            Error::Io(err.into())
        } else {
            Error::DayFileCorrupt {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

impl RecordStore for DayFileStore {
    fn create_record(&self, record: &Record) -> Result<()> {
        let body = serde_json::to_vec(record)?;
        let path = self.day_path(record.day());

        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut file = self.open_for_append(&path)?;
        let len = file.metadata()?.len();

        // The insertion point is the closing bracket at offset len - 1.
        // A 2-byte file is an empty array; anything longer already has
        // elements and needs a separating comma. Off-by-one on this
        // threshold corrupts the array.
        if len > 2 {
            file.seek(SeekFrom::Start(len - 1))?;
            file.write_all(b",")?;
        } else if len == 2 {
            file.seek(SeekFrom::Start(len - 1))?;
        } else {
            // Shorter than `[]` is not a valid array (an interrupted
            // create can leave a zero-byte file behind). Rebuild from
            // offset 0 instead of splicing into garbage.
            file.seek(SeekFrom::Start(0))?;
            file.write_all(b"[")?;
        }
        file.write_all(&body)?;
        file.write_all(b"]")?;

        debug!(
            "Appended record for vehicle {} to {}",
            record.vehicle_number,
            path.display()
        );
        Ok(())
    }

    fn over_speed_by_date(&self, date: NaiveDate, threshold: f64) -> Result<Vec<Record>> {
        let (path, reader) = self.open_for_scan(date)?;
        let mut violators = Vec::new();

        for record in ArrayReader::new(reader) {
            let record: Record = record.map_err(|err| Self::scan_error(&path, err))?;
            if record.speed > threshold {
                violators.push(record);
            }
        }

        debug!(
            "Over-speed scan of {} found {} records above {}",
            path.display(),
            violators.len(),
            threshold
        );
        Ok(violators)
    }

    fn min_max_by_date(&self, date: NaiveDate) -> Result<[Record; 2]> {
        let (path, reader) = self.open_for_scan(date)?;
        let mut slowest: Option<Record> = None;
        let mut fastest: Option<Record> = None;

        for record in ArrayReader::new(reader) {
            let record: Record = record.map_err(|err| Self::scan_error(&path, err))?;

            if slowest.as_ref().map_or(true, |s| record.speed < s.speed) {
                slowest = Some(record.clone());
            }
            if fastest.as_ref().map_or(true, |f| record.speed > f.speed) {
                fastest = Some(record);
            }
        }

        match (slowest, fastest) {
            (Some(slowest), Some(fastest)) => Ok([slowest, fastest]),
            _ => Ok([Record::default(), Record::default()]),
        }
    }
}
