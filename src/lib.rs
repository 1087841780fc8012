#![deny(warnings, rust_2024_compatibility)]
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Millisecond timestamps fit in i64/f64
    clippy::cast_precision_loss,      // Acceptable for fractional GELF timestamps
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

pub mod app;
pub mod domain;
pub mod sender;

pub use app::{App, Config};
pub use domain::{GelfError, GelfRecord};
pub use sender::Transport;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
