//! Query Parameter Sanitizers
//!
//! Pure functions that turn untrusted query-string values into safe ones.
//! Failure is encoded as "returned the default/None"; these never error.

// == Constants ==
/// Longest slug accepted from a request path or query.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Sort fields the upstream catalog accepts.
pub const SORTABLE_FIELDS: [&str; 8] = [
    "date",
    "id",
    "title",
    "slug",
    "price",
    "popularity",
    "rating",
    "menu_order",
];

// == Numeric Id ==
/// Parses a positive integer id.
///
/// Returns None for missing, unparseable, zero or negative input.
pub fn numeric_id(raw: Option<&str>) -> Option<u64> {
    let id: u64 = raw?.trim().parse().ok()?;
    if id == 0 {
        None
    } else {
        Some(id)
    }
}

// == Slug ==
/// Accepts a slug made of lowercase alphanumerics and hyphens.
///
/// Anything else (empty, over-long, other characters) yields None.
pub fn slug(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value.len() > MAX_SLUG_LENGTH {
        return None;
    }
    if value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Some(value.to_string())
    } else {
        None
    }
}

// == Limit ==
/// Parses a page-size value and clamps it to `[1, max]`.
///
/// Unparseable input yields exactly `default`.
pub fn limit(raw: Option<&str>, default: u32, max: u32) -> u32 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) => n.clamp(1, i64::from(max)) as u32,
        None => default,
    }
}

// == Page ==
/// Parses a page number, minimum 1, default 1.
pub fn page(raw: Option<&str>) -> u32 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) if n >= 1 => n.min(i64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

// == Order ==
/// Accepts exactly "asc" or "desc", defaulting to "desc".
pub fn order(raw: Option<&str>) -> &'static str {
    match raw {
        Some("asc") => "asc",
        Some("desc") => "desc",
        _ => "desc",
    }
}

// == Order By ==
/// Accepts a field from the sortable allow-list, defaulting to "date".
pub fn order_by(raw: Option<&str>) -> &'static str {
    match raw {
        Some(field) => SORTABLE_FIELDS
            .iter()
            .find(|allowed| **allowed == field)
            .copied()
            .unwrap_or("date"),
        None => "date",
    }
}

// == Strip Html ==
/// Removes HTML tags from free text and collapses the whitespace left
/// behind. Angle-bracket content is dropped wholesale; an unclosed tag
/// swallows the rest of the string rather than letting markup through.
pub fn strip_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
