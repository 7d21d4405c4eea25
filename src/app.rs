//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current library,
//! display format, selection and filter state.

mod model;

pub use model::*;
