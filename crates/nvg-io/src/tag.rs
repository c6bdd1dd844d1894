//! Classification of NVG tags by local name

/// The structural role a tag plays in an NVG document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<nvg>`
    Root,
    /// `<g>` or `<a>`
    Group,
    /// `<point>`
    Point,
    /// Anything else; such tags never produce elements
    Unrecognized,
}

impl TagKind {
    /// Classifies a tag by its local name, ignoring ASCII case.
    pub fn classify(local_name: &str) -> TagKind {
        if tag_names_equal(local_name, "nvg") {
            TagKind::Root
        } else if tag_names_equal(local_name, "g") || tag_names_equal(local_name, "a") {
            TagKind::Group
        } else if tag_names_equal(local_name, "point") {
            TagKind::Point
        } else {
            TagKind::Unrecognized
        }
    }

    pub fn is_recognized(self) -> bool {
        self != TagKind::Unrecognized
    }
}

/// Compares two tag names ordinally after ASCII lowercasing both.
pub fn tag_names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TagKind::classify("nvg"), TagKind::Root);
        assert_eq!(TagKind::classify("g"), TagKind::Group);
        assert_eq!(TagKind::classify("a"), TagKind::Group);
        assert_eq!(TagKind::classify("point"), TagKind::Point);
        assert_eq!(TagKind::classify("polyline"), TagKind::Unrecognized);
        assert_eq!(TagKind::classify(""), TagKind::Unrecognized);
    }

    #[test]
    fn test_classify_ignores_case() {
        assert_eq!(TagKind::classify("NVG"), TagKind::Root);
        assert_eq!(TagKind::classify("G"), TagKind::Group);
        assert_eq!(TagKind::classify("Point"), TagKind::Point);
    }

    #[test]
    fn test_classify_is_stable() {
        for name in ["nvg", "A", "point", "text", "pOiNt"] {
            assert_eq!(TagKind::classify(name), TagKind::classify(name));
            assert_eq!(
                TagKind::classify(name),
                TagKind::classify(&name.to_ascii_lowercase())
            );
        }
    }

    #[test]
    fn test_is_recognized() {
        assert!(!TagKind::Unrecognized.is_recognized());
        assert!(TagKind::Point.is_recognized());
    }

    #[test]
    fn test_tag_names_equal() {
        assert!(tag_names_equal("Point", "point"));
        assert!(tag_names_equal("g", "G"));
        assert!(!tag_names_equal("g", "a"));
        assert!(!tag_names_equal("point", "points"));
    }
}
