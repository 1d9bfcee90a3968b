//! Common utilities and shared components

pub mod error;

pub use error::*;
