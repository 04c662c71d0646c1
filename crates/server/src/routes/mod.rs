//! Route handlers.

pub mod catalog;
pub mod generate;
