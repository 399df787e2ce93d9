//! Output Emitter
//!
//! Abstraction for output production during printing.

/// Trait for emitting printed output.
///
/// The printer writes to an emitter line by line. Different implementations
/// support in-memory strings or other destinations.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation as the given number of spaces.
    fn emit_indent(&mut self, spaces: usize);
}

/// String-based emitter for in-memory printing.
///
/// Output can be rolled back to a [`StringEmitter::mark`], so a tree that
/// fails halfway leaves nothing behind.
#[derive(Clone, Debug, Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    /// Create a new string emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current buffer contents without consuming.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Position of the end of the output, for a later [`StringEmitter::rewind`].
    pub fn mark(&self) -> usize {
        self.buffer.len()
    }

    /// Drop everything emitted since `mark`.
    pub fn rewind(&mut self, mark: usize) {
        self.buffer.truncate(mark);
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, spaces: usize) {
        for _ in 0..spaces {
            self.buffer.push(' ');
        }
    }
}

#[cfg(test)]
mod tests;
