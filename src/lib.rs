//! # fattura
//!
//! Italian FatturaPA e-invoicing built around a small, generic tree builder:
//! an ordered mapping of field names to values becomes a tree of XML
//! elements, with key order preserved as sibling order.
//!
//! Invoice amounts use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use fattura::{convert, field_map};
//!
//! let nodes = convert(&field_map! {
//!     "DettaglioLinee" => vec![
//!         field_map! { "NumeroLinea" => 1, "Descrizione" => "Consulenza" },
//!         field_map! { "NumeroLinea" => 2, "Descrizione" => "Trasferta" },
//!     ],
//! })
//! .unwrap();
//!
//! assert_eq!(nodes.len(), 2);
//! assert!(nodes.iter().all(|n| n.tag == "DettaglioLinee"));
//! assert_eq!(nodes[1].child("Descrizione").and_then(|n| n.text()), Some("Trasferta"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Field mappings, element nodes, tree builder |
//! | `xml` | quick-xml serialization and parsing of element trees |
//! | `fatturapa` | FatturaPA invoice model, validation, document assembly |
//! | `json` | Build field mappings from `serde_json` values |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "fatturapa")]
pub mod fatturapa;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
