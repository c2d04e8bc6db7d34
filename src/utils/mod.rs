//! Shared helpers for generators.

pub mod fs;
