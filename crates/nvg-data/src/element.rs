//! NVG element structures and attribute-driven construction

use crate::metadata::FileInfo;
use crate::symbol::normalize_symbol_code;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// An attribute of an NVG tag, keyed by its local name (namespace prefix removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub local_name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(local_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            value: value.into(),
        }
    }

    /// ASCII case-insensitive match on the local name.
    pub fn is(&self, name: &str) -> bool {
        self.local_name.eq_ignore_ascii_case(name)
    }
}

/// The structural kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Root,
    Group,
    Point,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Root => write!(f, "nvg"),
            ElementKind::Group => write!(f, "group"),
            ElementKind::Point => write!(f, "point"),
        }
    }
}

/// A node of an NVG element tree.
///
/// Children are owned by their parent and kept in document order. Dropping a tree takes
/// constant stack space regardless of its depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Root(RootElement),
    Group(GroupElement),
    Point(PointElement),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Root(_) => ElementKind::Root,
            Element::Group(_) => ElementKind::Group,
            Element::Point(_) => ElementKind::Point,
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Element::Root(root) => &root.children,
            Element::Group(group) => &group.children,
            Element::Point(point) => &point.children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        match self {
            Element::Root(root) => &mut root.children,
            Element::Group(group) => &mut group.children,
            Element::Point(point) => &mut point.children,
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children_mut().push(child);
    }

    /// Populates this element from the attributes of its start tag.
    pub fn construct_from_attributes<I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = Attribute>,
    {
        match self {
            Element::Root(root) => root.construct_from_attributes(attributes),
            Element::Group(group) => group.construct_from_attributes(attributes),
            Element::Point(point) => point.construct_from_attributes(attributes),
        }
    }

    /// Pre-order traversal of this element and all of its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of elements below this one, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.iter().count() - 1
    }

    /// Every point in this subtree, in document order.
    pub fn points(&self) -> impl Iterator<Item = &PointElement> {
        self.iter().filter_map(Element::as_point)
    }

    pub fn as_root(&self) -> Option<&RootElement> {
        match self {
            Element::Root(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_root_mut(&mut self) -> Option<&mut RootElement> {
        match self {
            Element::Root(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupElement> {
        match self {
            Element::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&PointElement> {
        match self {
            Element::Point(point) => Some(point),
            _ => None,
        }
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // Flatten the subtree so each child is dropped with no children of its own.
        let mut pending = std::mem::take(self.children_mut());
        while let Some(mut child) = pending.pop() {
            pending.append(child.children_mut());
        }
    }
}

impl From<RootElement> for Element {
    fn from(root: RootElement) -> Self {
        Element::Root(root)
    }
}

impl From<GroupElement> for Element {
    fn from(group: GroupElement) -> Self {
        Element::Group(group)
    }
}

impl From<PointElement> for Element {
    fn from(point: PointElement) -> Self {
        Element::Point(point)
    }
}

/// Pre-order iterator over an element subtree. See [`Element::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children().iter().rev());
        Some(element)
    }
}

/// The `<nvg>` document element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootElement {
    /// NVG format version (e.g., "1.4")
    pub version: String,
    /// Set by the loader when the document came from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl RootElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes<I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        let mut root = Self::new();
        root.construct_from_attributes(attributes);
        root
    }

    /// Reads `version`; everything else is ignored.
    pub fn construct_from_attributes<I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = Attribute>,
    {
        for attr in attributes {
            if attr.is("version") {
                self.version = attr.value;
            }
        }
    }
}

/// A `<g>` group or `<a>` hyperlink. The format does not tell them apart structurally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupElement {
    /// Link target from `href`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl GroupElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes<I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        let mut group = Self::new();
        group.construct_from_attributes(attributes);
        group
    }

    pub fn construct_from_attributes<I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = Attribute>,
    {
        for attr in attributes {
            if attr.is("href") {
                self.url = Some(attr.value);
            }
        }
    }
}

/// A `<point>` feature.
///
/// Coordinates default to NaN and stay NaN when the attribute is missing or does not
/// parse. `x`/`y` are longitude/latitude in the format, but are not range checked here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointElement {
    /// Identifier from `id` or `uri`
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Symbol code with any scheme prefix removed
    pub symbol_code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Default for PointElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: None,
            x: f64::NAN,
            y: f64::NAN,
            symbol_code: String::new(),
            children: Vec::new(),
        }
    }
}

impl PointElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes<I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        let mut point = Self::new();
        point.construct_from_attributes(attributes);
        point
    }

    pub fn construct_from_attributes<I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = Attribute>,
    {
        for attr in attributes {
            if attr.is("id") || attr.is("uri") {
                self.id = attr.value;
            } else if attr.is("x") {
                if let Some(x) = parse_coordinate(&attr.value) {
                    self.x = x;
                }
            } else if attr.is("y") {
                if let Some(y) = parse_coordinate(&attr.value) {
                    self.y = y;
                }
            } else if attr.is("symbol") {
                match normalize_symbol_code(&attr.value) {
                    Some(code) => self.symbol_code = code,
                    None => trace!("point {:?} has an empty symbol code", self.id),
                }
            } else if attr.is("label") {
                self.label = Some(attr.value);
            }
        }
    }

    /// True only when id, both coordinates and the symbol code are all unset.
    ///
    /// A point with any one of them present is not empty.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.x.is_nan() && self.y.is_nan() && self.symbol_code.is_empty()
    }

    /// Both coordinates parsed.
    pub fn has_position(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }
}

/// Parses a coordinate using `.` as decimal separator, independent of host locale.
fn parse_coordinate(value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            trace!("ignoring unparseable coordinate {:?}", value);
            None
        }
    }
}
