//! View and detail rendering.

pub mod generator;

pub use generator::*;
