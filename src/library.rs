//! Track records and the directory scanner that produces them.
//!
//! The scanner stands in for the player daemon: it reads tags with `lofty`
//! and hands out flat [`Track`] records for the display format engine.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;
