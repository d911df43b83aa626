/// Spaces per indentation level in generated Starlark.
pub const STARLARK_INDENT_WIDTH: usize = 4;

/// Tracks indentation while rendering nested Starlark values.
#[derive(Debug, Clone)]
pub struct EmitContext {
    /// Current indentation level
    indent_level: usize,
    /// Spaces per level
    indent_width: usize,
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new(STARLARK_INDENT_WIDTH)
    }
}

impl EmitContext {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_level: 0,
            indent_width,
        }
    }

    /// A context starting at the given level, e.g. 1 for target attributes.
    pub fn at_level(level: usize) -> Self {
        Self {
            indent_level: level,
            ..Self::default()
        }
    }

    /// Get the current indentation string.
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_level * self.indent_width)
    }

    /// Increase indentation by one level.
    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation by one level.
    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Current indent level.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_levels() {
        let mut ctx = EmitContext::default();
        assert_eq!(ctx.indent(), "");
        ctx.push_indent();
        assert_eq!(ctx.indent(), "    ");
        ctx.push_indent();
        assert_eq!(ctx.indent(), "        ");
        ctx.pop_indent();
        assert_eq!(ctx.indent(), "    ");
    }

    #[test]
    fn test_pop_saturates() {
        let mut ctx = EmitContext::at_level(1);
        ctx.pop_indent();
        ctx.pop_indent();
        assert_eq!(ctx.indent_level(), 0);
    }
}
