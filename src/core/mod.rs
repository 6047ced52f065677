//! Core value model and the tree builder.
//!
//! An ordered [`FieldMap`] of field names to [`FieldValue`]s is turned into a
//! sequence of [`ElementNode`]s by [`convert`]. Key order becomes sibling
//! order, nested maps become branches, and lists become repeated elements.

mod element;
mod error;
#[cfg(feature = "json")]
mod json;
mod tree;
mod value;

pub use element::*;
pub use error::*;
#[cfg(feature = "json")]
pub use json::field_map_from_json;
pub use tree::convert;
pub use value::*;
