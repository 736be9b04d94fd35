//! XML document types for tracker layout files.
//!
//! These mirror the markup one-to-one and keep every attribute as raw text;
//! conversion into the typed schema model (and all validation) happens in
//! [`crate::config`].

mod parse;
mod types;

pub use parse::{parse_xml, parse_xml_file};
pub use types::*;
