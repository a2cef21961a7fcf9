//! Core types and error handling for agenticc
//!
//! - [`error`] - [`AgenticcError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`request`] - [`BuildRequest`] and the injection [`Strategy`]

pub mod error;
pub mod request;

pub use error::{AgenticcError, ErrorContext, user_friendly_error};
pub use request::{BuildRequest, Strategy, derive_output_path};
