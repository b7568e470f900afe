//! Core data types shared across LocalSite crates.
//!
//! - [`Color`]: RGBA color parsed from hex strings, with blending and contrast helpers.

pub mod color;

pub use color::{Color, ColorParseError};
