//! # b2-core
//!
//! Event model and scan aggregator for the B2HHH open-data tools.
//!
//! A decay record ([`Event`]) holds three hadron candidates with momentum,
//! PID probabilities, charge and a muon tag. [`scan_events`] drives the
//! sequential read-filter-reduce loop over a record stream: count every
//! record, drop muon-tagged ones, and accumulate the candidate kinematics
//! into a single running sum.
//!
//! ## Example
//!
//! ```
//! use b2_core::{scan_events, Event, ScanMode};
//!
//! let events = (0..3).map(|_| Ok(Event::default()));
//! let mut progress: Vec<u8> = Vec::new();
//! let summary = scan_events(events, ScanMode::Full, &mut progress).unwrap();
//! assert_eq!(summary.events, 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event;
pub mod scan;

pub use error::{Error, Result};
pub use event::{Event, KaonCandidate};
pub use scan::{scan_events, ScanMode, ScanSummary, PROGRESS_INTERVAL};
