pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod host;
pub mod inputs;
pub mod notice;
pub mod tagging;
pub mod ui;
pub mod validate;

pub use error::{ReleaseError, Result};
