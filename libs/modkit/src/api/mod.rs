//! HTTP-facing helpers shared by every REST module.

pub mod error;
pub mod json;
