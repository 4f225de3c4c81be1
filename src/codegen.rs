use crate::dom::DomNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration options for HTML output formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    /// Whether to include XHTML-style self-closing tags (`<br />`)
    pub xhtml_style: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { xhtml_style: true }
    }
}

/// Builder pattern for OutputConfig to make configuration easier
#[derive(Debug, Default)]
pub struct OutputConfigBuilder {
    config: OutputConfig,
}

impl OutputConfigBuilder {
    /// Creates a new OutputConfig builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable XHTML-style self-closing tags
    pub fn with_xhtml_style(mut self, enabled: bool) -> Self {
        self.config.xhtml_style = enabled;
        self
    }

    /// Build the final OutputConfig
    pub fn build(self) -> OutputConfig {
        self.config
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in text content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Low-level HTML writing utilities with proper escaping
#[derive(Debug, Default)]
pub struct HtmlWriter {
    buffer: String,
    config: OutputConfig,
}

impl HtmlWriter {
    /// Creates a new HTML writer with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self {
            buffer: String::new(),
            config,
        }
    }

    /// Writes an opening tag with attributes
    pub fn write_opening_tag(&mut self, tag: &str, attributes: &BTreeMap<String, String>) {
        self.buffer.push('<');
        self.buffer.push_str(tag);
        self.write_attributes(attributes);
        self.buffer.push('>');
    }

    /// Writes a self-closing element with attributes
    pub fn write_self_closing(&mut self, tag: &str, attributes: &BTreeMap<String, String>) {
        self.buffer.push('<');
        self.buffer.push_str(tag);
        self.write_attributes(attributes);

        if self.config.xhtml_style {
            self.buffer.push_str(" />");
        } else {
            self.buffer.push('>');
        }
    }

    fn write_attributes(&mut self, attributes: &BTreeMap<String, String>) {
        for (key, value) in attributes {
            self.buffer.push(' ');
            self.buffer.push_str(key);
            self.buffer.push_str("=\"");
            self.buffer.push_str(&escape_html(value));
            self.buffer.push('"');
        }
    }

    /// Writes escaped text content
    pub fn write_text(&mut self, text: &str) {
        self.buffer.push_str(&escape_html(text));
    }

    /// Writes a closing tag
    pub fn write_closing_tag(&mut self, tag: &str) {
        self.buffer.push_str("</");
        self.buffer.push_str(tag);
        self.buffer.push('>');
    }

    /// Gets the current buffer content
    pub fn get_output(&self) -> &str {
        &self.buffer
    }

    /// Clears the buffer, keeping its allocation
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Gets the current buffer content and clears it
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

/// Serializes DOM trees to HTML.
///
/// Pre-order: opening tag, escaped text, children, closing tag. The only
/// state kept between calls is the writer's scratch buffer.
#[derive(Debug, Default)]
pub struct HtmlGenerator {
    writer: HtmlWriter,
}

impl HtmlGenerator {
    /// Creates a new HTML generator with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self {
            writer: HtmlWriter::new(config),
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.writer.config
    }

    /// Renders `root` and everything below it.
    pub fn render(&mut self, root: &DomNode) -> String {
        self.writer.clear();
        self.render_node(root);
        self.writer.get_output().to_string()
    }

    /// Renders `root` without its closing tag.
    ///
    /// `render_open(root) + closing_tag(root)` equals `render(root)`.
    pub fn render_open(&mut self, root: &DomNode) -> String {
        self.writer.clear();
        self.render_open_node(root);
        self.writer.get_output().to_string()
    }

    /// The closing tag `render_open` leaves off; empty for self-closing nodes.
    pub fn closing_tag(&self, root: &DomNode) -> String {
        if root.self_closing {
            String::new()
        } else {
            format!("</{}>", root.tag_name)
        }
    }

    fn render_node(&mut self, node: &DomNode) {
        self.render_open_node(node);
        if !node.self_closing {
            self.writer.write_closing_tag(&node.tag_name);
        }
    }

    fn render_open_node(&mut self, node: &DomNode) {
        if node.self_closing {
            self.writer.write_self_closing(&node.tag_name, &node.attributes);
            return;
        }

        self.writer.write_opening_tag(&node.tag_name, &node.attributes);
        if let Some(text) = &node.text {
            self.writer.write_text(text);
        }
        for child in &node.children {
            self.render_node(child);
        }
    }
}

/// Generates the target code (HTML) from the intermediate representation (DOM).
pub fn generate_html(dom_root: &DomNode) -> String {
    HtmlGenerator::default().render(dom_root)
}
