//! LaTeX escaping for literal text.

/// Escape characters that LaTeX treats specially in running text.
///
/// Straight double quotes become closing quote ligatures; single quotes are
/// left alone so apostrophes survive.
///
/// # Examples
/// ```
/// use longtex_core::escape::escape_latex;
///
/// assert_eq!(escape_latex("50% of $5"), "50\\% of \\$5");
/// assert_eq!(escape_latex("a_b"), "a\\_b");
/// ```
pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '%' => out.push_str("\\%"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '$' => out.push_str("\\$"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '^' => out.push_str("\\^{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            '|' => out.push_str("\\textbar{}"),
            '"' => out.push_str("''"),
            _ => out.push(c),
        }
    }
    out
}
