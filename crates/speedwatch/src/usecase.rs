//! Business logic for speed-camera requests.
//!
//! [`SpeedControl`] sits between the transport layer and the record store:
//! it rejects invalid input before it can reach disk and delegates
//! well-formed requests to the [`RecordStore`] contract.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::store::RecordStore;

/// The service use-cases: register an observation, query violators,
/// query the day's speed extremes.
#[derive(Clone)]
pub struct SpeedControl {
    store: Arc<dyn RecordStore>,
}

impl fmt::Debug for SpeedControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeedControl").finish_non_exhaustive()
    }
}

impl SpeedControl {
    /// Create the use-case layer over a record store.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validate and store a new observation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty vehicle number or a
    /// non-positive speed, otherwise whatever the store returns.
    pub fn register(&self, record: &Record) -> Result<()> {
        if record.vehicle_number.trim().is_empty() {
            return Err(Error::validation("vehicle number must not be empty"));
        }
        if record.speed <= 0.0 || record.speed.is_nan() {
            return Err(Error::validation("speed must be positive"));
        }

        self.store.create_record(record)
    }

    /// All records for `date` faster than `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a non-positive threshold,
    /// otherwise whatever the store returns.
    pub fn over_speed(&self, date: NaiveDate, threshold: f64) -> Result<Vec<Record>> {
        if threshold <= 0.0 || threshold.is_nan() {
            return Err(Error::validation("speed threshold must be positive"));
        }

        self.store.over_speed_by_date(date, threshold)
    }

    /// The slowest and fastest record for `date`.
    ///
    /// # Errors
    ///
    /// Returns whatever the store returns.
    pub fn min_max(&self, date: NaiveDate) -> Result<[Record; 2]> {
        self.store.min_max_by_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use tempfile::TempDir;

    use crate::record::parse_timestamp;
    use crate::store::DayFileStore;

    /// Store double that records what reaches it.
    #[derive(Default)]
    struct SpyStore {
        created: Mutex<Vec<Record>>,
    }

    impl RecordStore for SpyStore {
        fn create_record(&self, record: &Record) -> Result<()> {
            self.created.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn over_speed_by_date(&self, _date: NaiveDate, _threshold: f64) -> Result<Vec<Record>> {
            Ok(Vec::new())
        }

        fn min_max_by_date(&self, _date: NaiveDate) -> Result<[Record; 2]> {
            Ok([Record::default(), Record::default()])
        }
    }

    fn sample() -> Record {
        Record::new(
            parse_timestamp("14.03.2021 08:15:00").unwrap(),
            "6048 EC-3",
            62.8,
        )
    }

    fn spy_usecase() -> (Arc<SpyStore>, SpeedControl) {
        let store = Arc::new(SpyStore::default());
        let usecase = SpeedControl::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        (store, usecase)
    }

    #[test]
    fn test_register_delegates_valid_record() {
        let (store, usecase) = spy_usecase();

        usecase.register(&sample()).unwrap();

        assert_eq!(store.created.lock().unwrap().as_slice(), &[sample()]);
    }

    #[test]
    fn test_register_rejects_empty_vehicle_number() {
        let (store, usecase) = spy_usecase();
        let record = Record {
            vehicle_number: "  ".to_string(),
            ..sample()
        };

        let err = usecase.register(&record).unwrap_err();

        assert!(err.is_validation());
        assert!(store.created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_register_rejects_zero_speed() {
        let (_store, usecase) = spy_usecase();
        let record = Record {
            speed: 0.0,
            ..sample()
        };

        assert!(usecase.register(&record).unwrap_err().is_validation());
    }

    #[test]
    fn test_register_rejects_negative_speed() {
        let (_store, usecase) = spy_usecase();
        let record = Record {
            speed: -10.0,
            ..sample()
        };

        assert!(usecase.register(&record).unwrap_err().is_validation());
    }

    #[test]
    fn test_over_speed_rejects_zero_threshold() {
        let (_store, usecase) = spy_usecase();
        let date = sample().day();

        assert!(usecase.over_speed(date, 0.0).unwrap_err().is_validation());
    }

    #[test]
    fn test_round_trip_through_file_store() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(DayFileStore::open(dir.path()).unwrap());
        let usecase = SpeedControl::new(store);

        let record = sample();
        usecase.register(&record).unwrap();

        let violators = usecase.over_speed(record.day(), 60.0).unwrap();
        assert_eq!(violators, vec![record.clone()]);

        let [min, max] = usecase.min_max(record.day()).unwrap();
        assert_eq!(min, record);
        assert_eq!(max, record);
    }

    #[test]
    fn test_min_max_missing_day_propagates_not_found() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(DayFileStore::open(dir.path()).unwrap());
        let usecase = SpeedControl::new(store);

        let err = usecase.min_max(sample().day()).unwrap_err();
        assert!(err.is_day_not_found());
    }
}
