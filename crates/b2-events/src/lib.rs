//! # b2-events
//!
//! Parquet event container I/O for the B2HHH open-data tools.
//!
//! A container file holds B→hhh decay records in a fixed 21-column layout
//! (see [`schema`]): per hadron candidate the momentum components, PID
//! probabilities, charge and muon tag, with the original ROOT branch names
//! as column names. [`EventReader`] streams records lazily and forward-only;
//! [`EventWriter`] produces files in the same layout.
//!
//! ## Example
//!
//! ```no_run
//! use b2_events::EventReader;
//!
//! let reader = EventReader::open("B2HHH.parquet").unwrap();
//! for event in reader {
//!     let event = event.unwrap();
//!     println!("{}", event.kinematic_sum());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::EventReader;
pub use schema::{decay_schema, Projection, DECAY_SCHEMA_VERSION};
pub use writer::{write_events, EventWriter};
