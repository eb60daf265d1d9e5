//! Indentation-aware text sink used by every emission hook.

/// Spaces per nesting level in generated code.
const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Codegen {
    out: String,
    depth: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose first line starts `depth` levels deep, for blocks that
    /// are rendered separately and spliced in later.
    pub fn at_depth(depth: usize) -> Self {
        Codegen { out: String::new(), depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `text` and indent everything after it one level deeper.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Step one level back out and write `text`.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Write a line that closes one block and opens the next, e.g. `} else {`.
    pub fn reopen(&mut self, text: impl AsRef<str>) {
        self.close(text);
        self.depth += 1;
    }

    pub fn splice(&mut self, block: Codegen) {
        self.out.push_str(&block.out);
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
