//! Streaming NVG reader
//!
//! Start and end tags arrive as a flat stream. The reader keeps a stack of frames, one
//! per recognized start tag, and rebuilds the nesting when end tags close them:
//!
//! - a start tag of a recognized kind builds its element from the attributes right away
//!   and pushes an open frame; any other tag is transparent and pushes nothing
//! - an end tag closes the innermost *open* frame with the same name (ASCII
//!   case-insensitive); closed frames above it become its children in document order
//! - a closed frame stays on the stack until an enclosing scope closes and adopts it
//! - an end tag that matches no open frame is ignored
//!
//! When the closing frame is the bottom of the stack the finished element is handed to
//! the caller, so a stream holding several documents yields them one per call. If the
//! stream ends first, the most recently closed element still on the stack is returned.

use crate::tag::{tag_names_equal, TagKind};
use crate::tokenizer::{Token, TokenSource, XmlTokenizer};
use nvg_data::{Attribute, Element, GroupElement, PointElement, RootElement};
use quick_xml::events::attributes::AttrError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Invalid name encoding: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

/// An element whose start tag has been seen.
#[derive(Debug)]
struct Frame {
    element: Element,
    local_name: String,
    open: bool,
}

/// Rebuilds element nesting from start and end tags.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    frames: Vec<Frame>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames on the stack, open or closed.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames still waiting for their end tag.
    pub fn open_count(&self) -> usize {
        self.frames.iter().filter(|f| f.open).count()
    }

    /// Handles a start tag. Returns false when the tag is transparent.
    pub fn start(&mut self, local_name: &str, attributes: Vec<Attribute>) -> bool {
        let element = match TagKind::classify(local_name) {
            TagKind::Root => Element::Root(RootElement::from_attributes(attributes)),
            TagKind::Group => Element::Group(GroupElement::from_attributes(attributes)),
            TagKind::Point => Element::Point(PointElement::from_attributes(attributes)),
            TagKind::Unrecognized => return false,
        };

        self.frames.push(Frame {
            element,
            local_name: local_name.to_string(),
            open: true,
        });
        true
    }

    /// Handles an end tag, returning the finished element if it closed the bottom frame.
    pub fn end(&mut self, local_name: &str) -> Option<Element> {
        if !TagKind::classify(local_name).is_recognized() {
            return None;
        }

        let Some(target) = self
            .frames
            .iter()
            .rposition(|f| f.open && tag_names_equal(&f.local_name, local_name))
        else {
            trace!(tag = local_name, "end tag without open element");
            return None;
        };

        let mut inner = self.frames.split_off(target + 1);

        // An unclosed frame owns everything opened after it.
        if let Some(first_open) = inner.iter().position(|f| f.open) {
            debug!(
                tag = local_name,
                discarded = inner.len() - first_open,
                "dropping unclosed elements"
            );
            inner.truncate(first_open);
        }

        let frame = &mut self.frames[target];
        frame
            .element
            .children_mut()
            .extend(inner.into_iter().map(|f| f.element));
        frame.open = false;

        if target == 0 {
            self.frames.pop().map(|f| f.element)
        } else {
            None
        }
    }

    /// Empties the stack at end of stream, returning the most recently closed element.
    ///
    /// Open frames, and closed frames below the returned one, are discarded.
    pub fn finish(&mut self) -> Option<Element> {
        let last_closed = self.frames.iter().rposition(|f| !f.open);
        let element = last_closed.map(|index| self.frames.swap_remove(index).element);
        if !self.frames.is_empty() {
            debug!(
                discarded = self.frames.len(),
                "end of stream inside unclosed elements"
            );
        }
        self.frames.clear();
        element
    }
}

/// Reads NVG elements from a token stream.
///
/// The reader owns its source; dropping or [closing](NvgReader::close) it releases the
/// underlying file or stream.
pub struct NvgReader<S: TokenSource> {
    tokens: S,
    builder: TreeBuilder,
    exhausted: bool,
}

impl NvgReader<XmlTokenizer<BufReader<File>>> {
    /// Opens an NVG document on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReadError::FileNotFound(path.to_path_buf()),
            _ => ReadError::Io(e),
        })?;
        debug!(path = %path.display(), "opened NVG document");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> NvgReader<XmlTokenizer<R>> {
    pub fn from_reader(inner: R) -> Self {
        Self::with_tokens(XmlTokenizer::new(inner))
    }
}

impl<'a> NvgReader<XmlTokenizer<&'a [u8]>> {
    pub fn from_xml(xml: &'a str) -> Self {
        Self::from_reader(xml.as_bytes())
    }
}

impl<S: TokenSource> NvgReader<S> {
    pub fn with_tokens(tokens: S) -> Self {
        Self {
            tokens,
            builder: TreeBuilder::new(),
            exhausted: false,
        }
    }

    /// Reads the next top-level element, or `None` when the stream holds no more.
    ///
    /// A stream that ends inside an unclosed element yields the most recently closed
    /// element instead, if any.
    ///
    /// Tokenizer and I/O failures are returned as errors and end the stream; malformed
    /// nesting is not an error.
    pub fn read_next_element(&mut self) -> Result<Option<Element>, ReadError> {
        if self.exhausted {
            return Ok(None);
        }

        loop {
            let token = match self.tokens.next_token() {
                Ok(Some(token)) => token,
                Ok(None) => break,
                Err(e) => {
                    self.exhausted = true;
                    self.builder.finish();
                    return Err(e);
                }
            };

            match token {
                Token::Start {
                    local_name,
                    attributes,
                } => {
                    if !self.builder.start(&local_name, attributes) {
                        trace!(tag = %local_name, "transparent tag");
                    }
                }
                Token::End { local_name } => {
                    if let Some(element) = self.builder.end(&local_name) {
                        return Ok(Some(element));
                    }
                }
                Token::Other => {}
            }
        }

        self.exhausted = true;
        Ok(self.builder.finish())
    }

    /// Iterates over the remaining top-level elements.
    pub fn elements(&mut self) -> Elements<'_, S> {
        Elements { reader: self }
    }

    /// Closes the reader and releases its source.
    pub fn close(self) {
        trace!("closing NVG reader");
    }

    pub fn into_inner(self) -> S {
        self.tokens
    }
}

/// Iterator returned by [`NvgReader::elements`].
pub struct Elements<'r, S: TokenSource> {
    reader: &'r mut NvgReader<S>,
}

impl<S: TokenSource> Iterator for Elements<'_, S> {
    type Item = Result<Element, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_next_element().transpose()
    }
}

/// Parses the first top-level element of an NVG string.
pub fn parse_nvg(xml: &str) -> Result<Option<Element>, ReadError> {
    parse_nvg_bytes(xml.as_bytes())
}

/// Parses the first top-level element of NVG bytes.
pub fn parse_nvg_bytes(xml: &[u8]) -> Result<Option<Element>, ReadError> {
    NvgReader::from_reader(xml).read_next_element()
}
