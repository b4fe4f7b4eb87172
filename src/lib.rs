#![warn(clippy::pedantic)]
// Noisy doc/signature lints
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference: keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
// Byte counts and elapsed milliseconds are cast for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]

pub mod bus;
pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod mirror;
pub mod transport;
pub(crate) mod utils;

pub use errors::GroupSyncError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
