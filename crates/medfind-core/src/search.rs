//! Medicine-name search term handling.
//!
//! Matching is a case-insensitive substring match on the medicine name only,
//! performed by the store. Case folding is whatever the database collation
//! does; diacritics are not folded.

/// Returns the term to search for, or `None` when the query is absent or empty.
///
/// An empty result set is the answer for `None`; it is not an error.
#[must_use]
pub fn search_term(query: Option<&str>) -> Option<&str> {
    query.filter(|q| !q.is_empty())
}

/// Builds an `ILIKE` pattern that matches `term` as a literal substring.
///
/// `%`, `_` and the escape character itself are escaped with `\`.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
