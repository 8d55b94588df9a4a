//! Rule schema types with serde deserialization.
//!
//! The same types back every on-disk encoding (JSON lines and YAML
//! documents); the loader picks the decoder, these types define the shape.

mod effects;
mod rule;

pub use effects::*;
pub use rule::*;
