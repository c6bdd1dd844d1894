//! Streaming reader for NATO Vector Graphics (NVG) documents
//!
//! This crate turns NVG XML into the element tree of [`nvg_data`] without building a DOM:
//! quick-xml delivers start and end tags one at a time, and the reader rebuilds the nesting
//! from that flat stream.
//!
//! # Features
//!
//! - Pull-based reading with quick-xml, one top-level element per call
//! - ASCII case-insensitive tag and attribute matching
//! - Best-effort recovery from unbalanced tags and unparseable attribute values
//! - Loading whole files into layers with file-origin metadata
//!
//! # Example
//!
//! ```rust
//! use nvg_io::parse_nvg;
//!
//! let nvg = r#"<nvg version="0.3">
//!     <g href="http://x">
//!         <point id="P1" x="10.0" y="20.0" symbol="app6a:SPSP----------C" label="Ship"/>
//!     </g>
//! </nvg>"#;
//!
//! let root = parse_nvg(nvg).expect("Failed to read NVG").expect("no root");
//! assert_eq!(root.as_root().unwrap().version, "0.3");
//! assert_eq!(root.descendant_count(), 2);
//! ```

pub mod loader;
pub mod reader;
pub mod tag;
pub mod tokenizer;

pub use loader::{can_load, load_documents, load_file, NvgLayer};
pub use reader::{parse_nvg, parse_nvg_bytes, NvgReader, ReadError, TreeBuilder};
pub use tag::{tag_names_equal, TagKind};
pub use tokenizer::{Token, TokenSource, XmlTokenizer};
