//! YAML front-matter handling.

use crate::types::Frontmatter;
use crate::Result;
use serde_yaml::Value;

/// Split a note into its front-matter and the markdown body that follows it.
///
/// The block must start on the first line (an optional BOM is skipped) with
/// `---` and end with `---` or `...`. A note without a closed block is returned
/// unchanged with empty front-matter.
pub fn split_frontmatter(input: &str) -> Result<(Frontmatter, &str)> {
    let text = input.trim_start_matches('\u{feff}');
    let Some(after_open) = strip_delimiter_line(text, "---") else {
        return Ok((Frontmatter::new(), input));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((parse_frontmatter(yaml)?, body));
        }
        offset += line.len();
    }

    Ok((Frontmatter::new(), input))
}

fn strip_delimiter_line<'a>(text: &'a str, delimiter: &str) -> Option<&'a str> {
    let (first, rest) = text.split_once('\n')?;
    (first.trim_end() == delimiter).then_some(rest)
}

/// Parse a YAML mapping into string values.
///
/// Scalars are stringified, sequences are joined with `", "`, anything else
/// becomes an empty string. An empty document yields an empty map.
pub fn parse_frontmatter(yaml: &str) -> Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::new());
    }
    let value: Value = serde_yaml::from_str(yaml)?;
    let mut fields = Frontmatter::new();
    if let Value::Mapping(map) = value {
        for (key, value) in map {
            if let Some(key) = scalar_to_string(&key) {
                fields.insert(key, value_to_string(&value));
            }
        }
    }
    Ok(fields)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
        other => scalar_to_string(other).unwrap_or_default(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn basic_frontmatter() {
        let input = "---\ntitle: A Paper\nauthor: Ada\n---\n# Intro\nBody";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert_eq!(fm["title"], "A Paper");
        assert_eq!(fm["author"], "Ada");
        assert_eq!(body, "# Intro\nBody");
    }

    #[test]
    fn frontmatter_with_lists_and_numbers() {
        let input = "---\nauthors:\n  - Ada\n  - Alan\nyear: 1843\ndraft: true\n---\n";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert_eq!(fm["authors"], "Ada, Alan");
        assert_eq!(fm["year"], "1843");
        assert_eq!(fm["draft"], "true");
        assert_eq!(body, "");
    }

    #[test]
    fn frontmatter_with_bom_and_dots_terminator() {
        let input = "\u{feff}---\ntitle: T\n...\ntext";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert_eq!(fm["title"], "T");
        assert_eq!(body, "text");
    }

    #[test]
    fn no_frontmatter() {
        let input = "# Just a heading\n---\n";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn unclosed_frontmatter_is_body() {
        let input = "---\ntitle: T\n# Heading";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn empty_frontmatter_block() {
        let (fm, body) = split_frontmatter("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = split_frontmatter("---\ntitle: [unclosed\n---\n");
        assert!(result.is_err());
    }

    #[test]
    fn null_and_nested_values_become_empty() {
        let (fm, _) = split_frontmatter("---\na:\nb:\n  c: 1\n---\n").unwrap();
        assert_eq!(fm["a"], "");
        assert_eq!(fm["b"], "");
    }
}
