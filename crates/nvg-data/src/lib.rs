//! Element tree for NATO Vector Graphics (NVG) documents.
//!
//! An NVG document is read into a tree of three element kinds:
//!
//! - [`RootElement`] for the `<nvg>` document element
//! - [`GroupElement`] for `<g>` groups and `<a>` hyperlinks
//! - [`PointElement`] for `<point>` features carrying a symbol code
//!
//! # Example
//!
//! ```rust
//! use nvg_data::{Attribute, Element, ElementKind, PointElement};
//!
//! let point = PointElement::from_attributes([
//!     Attribute::new("id", "P1"),
//!     Attribute::new("x", "10.0"),
//!     Attribute::new("y", "20.0"),
//!     Attribute::new("symbol", "app6a:SPSP----------C"),
//! ]);
//! assert_eq!(point.symbol_code, "SPSP----------C");
//!
//! let element = Element::Point(point);
//! assert_eq!(element.kind(), ElementKind::Point);
//! ```

pub mod element;
pub mod metadata;
pub mod symbol;

pub use element::{
    Attribute, Element, ElementKind, GroupElement, Iter, PointElement, RootElement,
};
pub use metadata::FileInfo;
pub use symbol::normalize_symbol_code;
