//! Prompt templates with `{{ $name }}` placeholders.

use std::collections::BTreeMap;

/// Placeholder values keyed by name
pub type Bindings = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Var(String),
}

/// A prompt with named placeholders, parsed once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = parse_segments(&source);
        Self { source, segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Unique placeholder names in order of first occurrence
    pub fn placeholders(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for seg in &self.segments {
            if let Segment::Var(name) = seg {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
        }
        out
    }

    /// Substitute every placeholder.
    ///
    /// Returns the name of the first placeholder without a binding as the error.
    /// Values are inserted verbatim and never re-scanned.
    pub fn render(&self, bindings: &Bindings) -> Result<String, String> {
        let mut out = String::with_capacity(self.source.len());
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Var(name) => match bindings.get(name) {
                    Some(v) => out.push_str(v),
                    None => return Err(name.clone()),
                },
            }
        }
        Ok(out)
    }
}

fn parse_segments(src: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = src;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        text.push_str(&rest[..open]);
        match variable_name(&after_open[..close]) {
            Some(name) => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Var(name.to_string()));
            }
            // Not a `$variable` block: keep it as written
            None => text.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }
    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

fn variable_name(block: &str) -> Option<&str> {
    let name = block.trim().strip_prefix('$')?;
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_spaced_and_tight_placeholders() {
        let t = PromptTemplate::new("Translate into {{ $target_language }}: {{$text}}");
        let out = t
            .render(&bind(&[("target_language", "Spanish"), ("text", "Hello")]))
            .unwrap();
        assert_eq!(out, "Translate into Spanish: Hello");
    }

    #[test]
    fn placeholders_are_unique_and_ordered() {
        let t = PromptTemplate::new("{{ $b }} {{ $a }} {{ $b }}");
        assert_eq!(t.placeholders(), vec!["b", "a"]);
    }

    #[test]
    fn missing_binding_names_the_placeholder() {
        let t = PromptTemplate::new("About {{ $prompt }}.");
        assert_eq!(t.render(&Bindings::new()), Err("prompt".to_string()));
    }

    #[test]
    fn non_variable_blocks_and_unterminated_braces_stay_literal() {
        let t = PromptTemplate::new("{{ call fn }} and {{ $x }} then {{ open");
        assert_eq!(t.placeholders(), vec!["x"]);
        let out = t.render(&bind(&[("x", "1")])).unwrap();
        assert_eq!(out, "{{ call fn }} and 1 then {{ open");
    }

    #[test]
    fn bound_values_are_not_rescanned() {
        let t = PromptTemplate::new("{{ $a }}");
        let out = t.render(&bind(&[("a", "{{ $b }}")])).unwrap();
        assert_eq!(out, "{{ $b }}");
    }
}
