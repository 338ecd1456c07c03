use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub use_colors: bool,
    pub indent_style: IndentStyle,
    /// Keep `{:sourceloc}` and `{:message}` attributes on assertions and procedures.
    pub include_source_attrs: bool,
    pub include_comments: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: false,
            indent_style: IndentStyle::Spaces(4),
            include_source_attrs: true,
            include_comments: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    /// Whitespace for one level of indentation.
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}
