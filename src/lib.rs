//! Item Tracker
//!
//! Loads a tracker layout (fonts, text styles, flags, inventories of items)
//! from XML into a validated model, and saves/restores the mutable session
//! state of that model through a human-readable snapshot file.

pub mod config;
pub mod display;
pub mod error;
pub mod state;
pub mod xml;

pub use config::Config;
pub use display::{DisplaySink, MemorySink};
pub use error::{Error, Result};
pub use state::{RestoreReport, Snapshot, StateStore};
