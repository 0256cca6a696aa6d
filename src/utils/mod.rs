//! The `utils` module collects shared definitions used across the crate:
//! the bus error taxonomy and the tracing initialization helper.

pub mod error;
pub mod logging;
