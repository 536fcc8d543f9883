use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// A parse problem anchored to a byte range of one source file.
#[salsa::accumulator]
pub struct Diagnostic {
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    /// Renders the diagnostic against `text`, labelling the offending span.
    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let label = if self.range.is_empty() { "expected here" } else { "found here" };
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label(label))
                .fold(true),
        );
        renderer.render(message)
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    #[test]
    fn renders_message_and_origin() {
        let text = "namespace smithy.example\nstring Foo {\n";
        let start = TextSize::from(36);
        let diagnostic =
            Diagnostic::error("Expected a line break but found LBRACE('{')", TextRange::at(start, 1.into()));

        let rendered = diagnostic.render(&Renderer::plain(), "main.smithy", text).to_string();

        assert!(rendered.contains("error: Expected a line break but found LBRACE('{')"));
        assert!(rendered.contains("main.smithy"));
        assert!(rendered.contains("found here"));
    }

    #[test]
    fn empty_range_points_at_position() {
        let diagnostic = Diagnostic::error("Expected a namespace definition", TextRange::empty(0.into()));

        assert_eq!(diagnostic.range().len(), TextSize::from(0));
        let rendered = diagnostic.render(&Renderer::plain(), "a.smithy", "string A\n").to_string();
        assert!(rendered.contains("expected here"));
    }
}
