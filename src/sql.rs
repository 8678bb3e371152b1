//! SQL placeholder rewriting.

/// Replaces each occurrence of `placeholder`, left to right, with a positional
/// parameter `$1`, `$2`, ...
///
/// ```
/// assert_eq!(ops_util::replace_sql("a=? AND b=?", "?"), "a=$1 AND b=$2");
/// ```
pub fn replace_sql(query: &str, placeholder: &str) -> String {
    if placeholder.is_empty() {
        return query.to_string();
    }

    let mut out = String::with_capacity(query.len() + 8);
    for (n, part) in query.split(placeholder).enumerate() {
        if n > 0 {
            out.push('$');
            out.push_str(&n.to_string());
        }
        out.push_str(part);
    }
    out
}

/// Builds a `?,?,...` list with one placeholder per comma-separated column.
///
/// Whitespace is ignored. An empty list still yields one placeholder.
pub fn query_fill(query: &str) -> String {
    let columns: String = query.chars().filter(|c| !c.is_whitespace()).collect();
    vec!["?"; columns.split(',').count()].join(",")
}
