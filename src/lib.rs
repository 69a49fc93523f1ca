// Library crate root.
//
// This crate is used both as a binary (src/main.rs) and as a library.

pub mod desc;
pub mod error;
pub mod im;
pub mod mat3;
pub mod plot;
pub mod point;
pub mod shape;

pub use error::{Error, Result};
pub use mat3::{Mat3, Transform3x3};
pub use point::Point;

#[cfg(test)]
pub mod test_helpers;
