//! CLI-facing diagnostics, progress reporting, and outcome shaping.

pub(crate) mod diagnostics;
pub(crate) mod errors;
mod messages;
pub(crate) mod outcome;
pub(crate) mod reporter;
pub(crate) mod response;

pub(crate) use messages::*;
pub use messages::missing_argument_outcome;
