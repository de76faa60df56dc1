//! Output of the dashboard state.
//!
//! # Submodules
//!
//! - [`json`]: Writes the view contract to `snapshot.json`
//! - [`text`]: Renders the dashboard as plain text for the terminal host
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── snapshot.json   # replaced after every applied update
//! ```

pub mod json;
pub mod text;
