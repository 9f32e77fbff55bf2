//! Highlight adapter: wraps tree-sitter behind a small capability trait so the
//! rest of the app never touches parser types directly. Languages without a
//! bundled grammar (Dart, Unknown) simply produce no spans.

use tree_sitter::{Parser, Tree};

use super::language::Language;

/// Highlight category, one per text tag the editor styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Comment,
    String,
    Preproc,
    Keyword,
    Control,
    Type,
    Number,
    Function,
    Constant,
    Decorator,
}

impl SpanKind {
    pub fn tag(&self) -> &'static str {
        match self {
            SpanKind::Comment => "comment",
            SpanKind::String => "string",
            SpanKind::Preproc => "preproc",
            SpanKind::Keyword => "keyword",
            SpanKind::Control => "control",
            SpanKind::Type => "type",
            SpanKind::Number => "number",
            SpanKind::Function => "function",
            SpanKind::Constant => "constant",
            SpanKind::Decorator => "decorator",
        }
    }
}

/// Byte range of source text plus the category to style it with.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

/// Result of one highlight pass. The tree is cached alongside the spans and
/// dropped wholesale when the next pass replaces it.
pub struct ParseOutcome {
    pub spans: Vec<HighlightSpan>,
    pub tree: Tree,
}

/// The parsing capability: text + language in, tagged spans out. Returns None
/// when the language has no grammar or the text is empty.
pub trait Highlighter {
    fn parse(&mut self, text: &str, language: Language) -> Option<ParseOutcome>;
}

pub struct TreeSitterHighlighter {
    parser: Parser,
    loaded: Option<Language>,
}

impl TreeSitterHighlighter {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            loaded: None,
        }
    }
}

impl Default for TreeSitterHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for TreeSitterHighlighter {
    fn parse(&mut self, text: &str, language: Language) -> Option<ParseOutcome> {
        let grammar = grammar_for(language)?;
        if text.is_empty() {
            return None;
        }

        if self.loaded != Some(language) {
            if let Err(e) = self.parser.set_language(&grammar) {
                eprintln!("Failed to load {:?} grammar: {}", language, e);
                return None;
            }
            self.loaded = Some(language);
        }

        let tree = self.parser.parse(text, None)?;
        let spans = collect_spans(&tree, language);
        Some(ParseOutcome { spans, tree })
    }
}

/// Used in place of the real parser when highlighting is disabled.
pub struct NoopHighlighter;

impl Highlighter for NoopHighlighter {
    fn parse(&mut self, _text: &str, _language: Language) -> Option<ParseOutcome> {
        None
    }
}

fn grammar_for(language: Language) -> Option<tree_sitter::Language> {
    match language {
        Language::C => Some(tree_sitter_c::LANGUAGE.into()),
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        // No grammar crate published for Dart; it keeps its language tag but
        // takes the no-grammar path.
        Language::Dart | Language::Unknown => None,
    }
}

/// Pre-order walk over the syntax tree with an explicit stack, so deeply
/// nested sources cannot exhaust the call stack. Children are pushed in
/// reverse so they pop in document order.
fn collect_spans(tree: &Tree, language: Language) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut stack = vec![tree.root_node()];

    while let Some(node) = stack.pop() {
        if let Some(kind) = span_kind(language, node.kind()) {
            spans.push(HighlightSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                kind,
            });
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    spans
}

fn span_kind(language: Language, node_kind: &str) -> Option<SpanKind> {
    match language {
        Language::C => match node_kind {
            "comment" => Some(SpanKind::Comment),
            "string_literal" | "char_literal" => Some(SpanKind::String),
            k if k.contains("preproc") => Some(SpanKind::Preproc),
            "return" | "if" | "for" | "while" | "break" | "case" => Some(SpanKind::Control),
            "storage_class_specifier" | "type_qualifier" | "struct" | "typedef" => {
                Some(SpanKind::Keyword)
            }
            "primitive_type" | "type_identifier" => Some(SpanKind::Type),
            "number_literal" => Some(SpanKind::Number),
            _ => None,
        },
        Language::Python => match node_kind {
            "comment" => Some(SpanKind::Comment),
            "string" => Some(SpanKind::String),
            "from" | "import" | "as" => Some(SpanKind::Preproc),
            "if" | "for" | "while" | "return" | "in" | "try" | "except" => {
                Some(SpanKind::Control)
            }
            "def" | "class" | "pass" => Some(SpanKind::Keyword),
            "type" => Some(SpanKind::Type),
            "integer" | "float" => Some(SpanKind::Number),
            "decorator" => Some(SpanKind::Decorator),
            _ => None,
        },
        Language::Dart | Language::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_source_produces_spans() {
        let mut hl = TreeSitterHighlighter::new();
        let src = "/* hi */\nint main(void) {\n    return 42;\n}\n";
        let outcome = hl.parse(src, Language::C).unwrap();

        let kinds: Vec<SpanKind> = outcome.spans.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&SpanKind::Comment));
        assert!(kinds.contains(&SpanKind::Type));
        assert!(kinds.contains(&SpanKind::Control));
        assert!(kinds.contains(&SpanKind::Number));
    }

    #[test]
    fn test_c_comment_span_range() {
        let mut hl = TreeSitterHighlighter::new();
        let src = "/* hi */\nint x;\n";
        let outcome = hl.parse(src, Language::C).unwrap();

        let comment = outcome
            .spans
            .iter()
            .find(|s| s.kind == SpanKind::Comment)
            .unwrap();
        assert_eq!(&src[comment.start..comment.end], "/* hi */");
    }

    #[test]
    fn test_python_source_produces_spans() {
        let mut hl = TreeSitterHighlighter::new();
        let src = "@wraps\ndef f(n):\n    # doc\n    return n + 1\n";
        let outcome = hl.parse(src, Language::Python).unwrap();

        let kinds: Vec<SpanKind> = outcome.spans.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&SpanKind::Keyword));
        assert!(kinds.contains(&SpanKind::Comment));
        assert!(kinds.contains(&SpanKind::Control));
        assert!(kinds.contains(&SpanKind::Decorator));
    }

    #[test]
    fn test_spans_are_pre_order() {
        let mut hl = TreeSitterHighlighter::new();
        let src = "int a = 1;\nint b = 2;\n";
        let outcome = hl.parse(src, Language::C).unwrap();

        let starts: Vec<usize> = outcome.spans.iter().map(|s| s.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let mut hl = TreeSitterHighlighter::new();
        assert!(hl.parse("", Language::C).is_none());
    }

    #[test]
    fn test_grammarless_languages_yield_nothing() {
        let mut hl = TreeSitterHighlighter::new();
        assert!(hl.parse("void main() {}", Language::Dart).is_none());
        assert!(hl.parse("plain text", Language::Unknown).is_none());
    }

    #[test]
    fn test_switching_languages() {
        let mut hl = TreeSitterHighlighter::new();
        assert!(hl.parse("int x;", Language::C).is_some());
        assert!(hl.parse("x = 1", Language::Python).is_some());
        assert!(hl.parse("int y;", Language::C).is_some());
    }

    #[test]
    fn test_noop_highlighter() {
        let mut hl = NoopHighlighter;
        assert!(hl.parse("int x;", Language::C).is_none());
    }
}
