//! Forward-only token stream feeding the tree builder

use crate::reader::ReadError;
use nvg_data::Attribute;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use std::collections::VecDeque;
use std::io::BufRead;

/// A single markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start tag with its attributes. Self-closing tags are delivered as `Start` + `End`.
    Start {
        local_name: String,
        attributes: Vec<Attribute>,
    },
    /// End tag
    End { local_name: String },
    /// Text, comments, declarations and everything else the tree builder ignores
    Other,
}

impl Token {
    pub fn start(local_name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Token::Start {
            local_name: local_name.into(),
            attributes,
        }
    }

    pub fn end(local_name: impl Into<String>) -> Self {
        Token::End {
            local_name: local_name.into(),
        }
    }
}

/// Pull-based source of tokens.
pub trait TokenSource {
    /// Returns the next token, or `None` at end of stream.
    fn next_token(&mut self) -> Result<Option<Token>, ReadError>;
}

/// Tokens from an in-memory sequence.
impl TokenSource for VecDeque<Token> {
    fn next_token(&mut self) -> Result<Option<Token>, ReadError> {
        Ok(self.pop_front())
    }
}

/// Tokenizer over quick-xml's pull reader.
///
/// End tag names are not checked against start tags and unmatched end tags are
/// allowed; balancing is the tree builder's concern.
pub struct XmlTokenizer<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> XmlTokenizer<R> {
    pub fn new(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        let config = reader.config_mut();
        config.trim_text(true);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.expand_empty_elements = true;

        Self {
            reader,
            buf: Vec::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: BufRead> TokenSource for XmlTokenizer<R> {
    fn next_token(&mut self) -> Result<Option<Token>, ReadError> {
        self.buf.clear();
        let token = match self.reader.read_event_into(&mut self.buf)? {
            XmlEvent::Start(e) => Token::Start {
                local_name: decode_name(e.local_name().as_ref())?,
                attributes: read_attributes(&e)?,
            },
            XmlEvent::End(e) => Token::End {
                local_name: decode_name(e.local_name().as_ref())?,
            },
            XmlEvent::Eof => return Ok(None),
            _ => Token::Other,
        };
        Ok(Some(token))
    }
}

fn read_attributes(element: &BytesStart<'_>) -> Result<Vec<Attribute>, ReadError> {
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr?;
        // xmlns declarations would otherwise surface under their prefix, e.g. "x"
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let local_name = decode_name(attr.key.local_name().as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        attributes.push(Attribute { local_name, value });
    }
    Ok(attributes)
}

/// Tag and attribute names must be valid UTF-8.
fn decode_name(bytes: &[u8]) -> Result<String, ReadError> {
    Ok(std::str::from_utf8(bytes)?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(xml: &str) -> Vec<Token> {
        let mut tokenizer = XmlTokenizer::new(xml.as_bytes());
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token().expect("tokenize") {
            out.push(token);
        }
        out
    }

    #[test]
    fn test_self_closing_expands() {
        let out = tokens(r#"<point id="P1"/>"#);
        assert_eq!(
            out,
            vec![
                Token::start("point", vec![Attribute::new("id", "P1")]),
                Token::end("point"),
            ]
        );
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let out = tokens(
            r#"<nvg:g xmlns:nvg="urn:nvg" xmlns:xlink="urn:xlink" xlink:href="http://x"></nvg:g>"#,
        );
        match &out[0] {
            Token::Start {
                local_name,
                attributes,
            } => {
                assert_eq!(local_name, "g");
                assert_eq!(attributes, &vec![Attribute::new("href", "http://x")]);
            }
            other => panic!("unexpected token {:?}", other),
        }
        assert_eq!(out[1], Token::end("g"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let out = tokens(r#"<a href="http://x/?a=1&amp;b=2"></a>"#);
        match &out[0] {
            Token::Start { attributes, .. } => assert_eq!(attributes[0].value, "http://x/?a=1&b=2"),
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_namespace_declarations_are_skipped() {
        let out = tokens(r#"<point xmlns="urn:nvg" xmlns:x="urn:x" x="8.5"/>"#);
        match &out[0] {
            Token::Start { attributes, .. } => {
                assert_eq!(attributes, &vec![Attribute::new("x", "8.5")])
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_other_markup() {
        let out = tokens("<?xml version=\"1.0\"?><!-- c --><nvg>text</nvg>");
        assert_eq!(out[0], Token::Other);
        assert_eq!(out[1], Token::Other);
        assert!(matches!(out[2], Token::Start { .. }));
        assert_eq!(out[3], Token::Other);
        assert_eq!(out[4], Token::end("nvg"));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_mismatched_end_is_tolerated() {
        let out = tokens("<nvg><g></nvg></g>");
        assert_eq!(out.len(), 4);
        assert_eq!(out[2], Token::end("nvg"));
        assert_eq!(out[3], Token::end("g"));
    }

    #[test]
    fn test_invalid_tag_name_bytes() {
        let xml: &[u8] = b"<nvg><g\xff><point/></g\xff></nvg>";
        let mut tokenizer = XmlTokenizer::new(xml);
        assert!(matches!(tokenizer.next_token(), Ok(Some(Token::Start { .. }))));
        let err = tokenizer.next_token().unwrap_err();
        assert!(matches!(err, ReadError::Encoding(_)));
    }

    #[test]
    fn test_invalid_attribute_name_bytes() {
        let xml: &[u8] = b"<point i\xffd=\"P\"/>";
        let err = XmlTokenizer::new(xml).next_token().unwrap_err();
        assert!(matches!(err, ReadError::Encoding(_)));
    }

    #[test]
    fn test_queue_source() {
        let mut source: VecDeque<Token> = vec![Token::end("g")].into();
        assert_eq!(source.next_token().unwrap(), Some(Token::end("g")));
        assert_eq!(source.next_token().unwrap(), None);
    }
}
