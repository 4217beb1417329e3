//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

lazy_static! {
    // Loaded on first render; every renderer shares them afterwards
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Default syntect theme for fenced code blocks
pub const DEFAULT_HIGHLIGHT_THEME: &str = "base16-ocean.dark";

/// Markdown renderer with syntax highlighting
///
/// Rendering is a pure function of the input text and the renderer settings.
/// Raw HTML in the markdown is passed through untouched unless `escape_html`
/// is set, so content must come from a trusted source.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    highlight: bool,
    theme_name: String,
    escape_html: bool,
}

struct CodeBlock {
    lang: Option<String>,
    source: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            highlight: true,
            theme_name: DEFAULT_HIGHLIGHT_THEME.to_string(),
            escape_html: false,
        }
    }

    /// Create with custom settings
    pub fn with_options(highlight: bool, theme: &str, escape_html: bool) -> Self {
        Self {
            highlight,
            theme_name: theme.to_string(),
            escape_html,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is stripped before we get here, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(CodeBlock {
                        lang,
                        source: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        events.push(Event::Html(CowStr::from(self.code_block_html(&block))));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.source.push_str(&text);
                    }
                }
                Event::Html(raw) | Event::InlineHtml(raw) if self.escape_html => {
                    events.push(Event::Text(raw));
                }
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn code_block_html(&self, block: &CodeBlock) -> String {
        let Some(lang) = block.lang.as_deref() else {
            return format!("<pre><code>{}</code></pre>\n", html_escape(&block.source));
        };

        if self.highlight {
            if let Some(highlighted) = self.highlight_code(&block.source, lang) {
                return format!(
                    r#"<figure class="highlight language-{}">{}</figure>"#,
                    html_escape(lang),
                    highlighted
                );
            }
        }

        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape(lang),
            html_escape(&block.source)
        )
    }

    /// Highlight a code block, or `None` when the language or theme is unknown
    fn highlight_code(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = SYNTAX_SET
            .find_syntax_by_token(lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))?;
        let theme = THEME_SET.themes.get(&self.theme_name)?;

        match highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme) {
            Ok(highlighted) => Some(highlighted),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                None
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render markdown with the default renderer settings
pub fn render_markdown(markdown: &str) -> String {
    MarkdownRenderer::default().render(markdown)
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
