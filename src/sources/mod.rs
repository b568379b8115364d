//! Concrete sources the binary reports on.
//!
//! Each adapter turns configuration into a [`Source`](crate::pipeline::Source):
//! the request descriptor, the field map and the human-readable layout.

pub mod open_meteo;
pub mod wttr;
pub mod yahoo;
