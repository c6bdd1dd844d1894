//! Symbol code normalization.

/// Strips an optional scheme prefix from a point's symbol code.
///
/// Returns `None` for an empty code. A code made of exactly two parts separated by a
/// single colon (`app6a:SPSP----------C`) yields the part after the colon; any other
/// shape is returned unchanged.
pub fn normalize_symbol_code(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let mut parts = raw.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(code), None) => Some(code.to_string()),
        _ => Some(raw.to_string()),
    }
}
