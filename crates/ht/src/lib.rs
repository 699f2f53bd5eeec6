//! ht: issue filters from the command line
//!
//! ht reads issue lists stored as JSON and filters them with a compact query language
//! (`milestone:0.4 state:open OR label:urgent`). A filter that names a single field can also
//! be applied to an issue, setting that field. Frequently used filters can be saved in
//! `.ht.toml` and referred to as `@name`.

#![warn(missing_docs)]

pub mod cli;
pub mod issues;
