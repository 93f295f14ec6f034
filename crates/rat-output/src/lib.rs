//! `rat-output`: output writers for access-selection runs.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                    |
//! |-----------|---------|--------------------------------------------------|
//! | *(none)*  | CSV     | `transmissions.csv`, `update_summaries.csv`      |
//! | `sqlite`  | SQLite  | `output.db`                                      |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `rat_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rat_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut trajectory, ticks, &mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{TransmissionRow, UpdateSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
