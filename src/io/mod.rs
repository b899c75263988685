//! File format reader support.

pub mod ardf;
