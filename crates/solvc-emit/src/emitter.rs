use crate::config::EmitterConfig;
use anyhow::Result;
use colored::{Color, Colorize};
use std::io::Write;

pub type EmitResult = Result<()>;

/// Indentation state threaded through an emission.
#[derive(Debug, Clone)]
pub struct EmitContext {
    pub depth: usize,
    /// Text written once per level of depth.
    pub unit: String,
    pub use_colors: bool,
}

impl EmitContext {
    pub fn new() -> Self {
        Self::from_config(&EmitterConfig::default())
    }

    pub fn from_config(config: &EmitterConfig) -> Self {
        Self {
            depth: 0,
            unit: config.indent_style.unit(),
            use_colors: config.use_colors,
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Leading whitespace for a line at the current depth.
    pub fn prefix(&self) -> String {
        self.unit.repeat(self.depth)
    }

    /// A copy one level deeper, for lines like `modifies` that sit under a
    /// header without opening a block.
    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Emitter {
    type Item;

    fn emit<W: Write>(
        &self,
        item: &Self::Item,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult;

    /// Context a fresh emission starts from.
    fn context(&self) -> EmitContext {
        EmitContext::new()
    }

    fn emit_to_string(&self, item: &Self::Item) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = self.context();
        self.emit(item, &mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn write_line<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        writeln!(writer, "{}{}", context.prefix(), text)?;
        Ok(())
    }

    pub fn write_colored_line<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        text: &str,
        color: Color,
    ) -> EmitResult {
        if context.use_colors {
            writeln!(writer, "{}{}", context.prefix(), text.color(color))?;
        } else {
            Self::write_line(writer, context, text)?;
        }
        Ok(())
    }

    pub fn write_comment<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        comment: &str,
    ) -> EmitResult {
        Self::write_colored_line(writer, context, &format!("// {}", comment), Color::Green)
    }

    pub fn write_block<W: Write, F>(
        writer: &mut W,
        context: &mut EmitContext,
        header: &str,
        body: F,
    ) -> EmitResult
    where
        F: FnOnce(&mut W, &mut EmitContext) -> EmitResult,
    {
        let open = if header.is_empty() {
            "{".to_string()
        } else {
            format!("{} {{", header)
        };
        Self::write_line(writer, context, &open)?;
        context.indent();
        body(writer, context)?;
        context.dedent();
        Self::write_line(writer, context, "}")?;
        Ok(())
    }
}
