//! Syntax tree for parsed template text

pub use super::lexer::Span;

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A placeholder name such as `client_name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One piece of template text
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied to the output as-is
    Literal(String),
    /// A `{{name}}` token to be replaced with a live value
    Placeholder(Identifier),
}

/// Parsed template text: an ordered list of segments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateText {
    pub segments: Vec<Spanned<Segment>>,
}

impl TemplateText {
    /// Iterate over placeholder names in source order
    pub fn placeholders(&self) -> impl Iterator<Item = &Spanned<Segment>> {
        self.segments
            .iter()
            .filter(|s| matches!(s.node, Segment::Placeholder(_)))
    }

    /// True when the text contains no placeholder at all
    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Rebuild the text, asking `lookup` for each placeholder value.
    ///
    /// Placeholders for which `lookup` returns `None` are written back
    /// verbatim as `{{name}}`.
    pub fn expand<F>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::new();
        for seg in &self.segments {
            match &seg.node {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(id) => match lookup(id.as_str()) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(id.as_str());
                        out.push_str("}}");
                    }
                },
            }
        }
        out
    }
}
