//! `speedwatch` - A service for recording and querying speed-camera
//! observations.
//!
//! This library provides a day-partitioned append store over per-day JSON
//! files, the business layer validating and querying it, and the HTTP
//! surface that exposes both.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod server;
pub mod store;
pub mod usecase;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::Record;
pub use store::{DayFileStore, RecordStore};
pub use usecase::SpeedControl;
