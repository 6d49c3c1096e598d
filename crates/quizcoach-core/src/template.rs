//! Prompt template rendering.
//!
//! Templates are plain text with `{name}` placeholders. Every placeholder
//! found in the template must have a value supplied; a missing key is a
//! configuration error, never silently-malformed prompt text.

use crate::error::CoreError;

/// Substitute `{name}` placeholders with the supplied values.
///
/// Braces that do not wrap a plain identifier (`[A-Za-z0-9_]+`) are left
/// untouched, so literal JSON in a template survives rendering.
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, CoreError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match placeholder_name(after) {
            Some(name) => {
                let value = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| CoreError::Template(name.to_string()))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn placeholder_name(s: &str) -> Option<&str> {
    let end = s.find('}')?;
    let name = &s[..end];
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        Some(name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_placeholders() {
        let rendered = render(
            "The quiz is about {theme}. Goal: {goal}.",
            &[("theme", "arithmetic"), ("goal", "practice")],
        )
        .unwrap();
        assert_eq!(rendered, "The quiz is about arithmetic. Goal: practice.");
    }

    #[test]
    fn repeated_placeholder() {
        let rendered = render("{name} and {name}", &[("name", "twice")]).unwrap();
        assert_eq!(rendered, "twice and twice");
    }

    #[test]
    fn missing_key_fails_fast() {
        let err = render("Hello {name}", &[]).unwrap_err();
        assert!(matches!(err, CoreError::Template(ref key) if key == "name"));
    }

    #[test]
    fn extra_values_are_ignored() {
        let rendered = render("no placeholders", &[("unused", "x")]).unwrap();
        assert_eq!(rendered, "no placeholders");
    }

    #[test]
    fn non_identifier_braces_pass_through() {
        let rendered = render(r#"reply as {"json": true} about {topic}"#, &[("topic", "cats")])
            .unwrap();
        assert_eq!(rendered, r#"reply as {"json": true} about cats"#);
    }

    #[test]
    fn unclosed_brace_passes_through() {
        let rendered = render("dangling { brace", &[]).unwrap();
        assert_eq!(rendered, "dangling { brace");
    }
}
