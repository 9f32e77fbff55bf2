use ropey::Rope;

/// Matches the undo depth the editor widget was configured with historically.
const MAX_UNDO_LEVELS: usize = 100;

/// An edit applied to a document's buffer. Positions are char indices.
#[derive(Debug, Clone, PartialEq)]
pub enum TextDelta {
    Insert { at: usize, text: String },
    Remove { start: usize, end: usize },
}

/// One splice on the undo/redo stacks: at `at`, `removed` was replaced by
/// `inserted`. Undo applies the inverse splice, redo re-applies it.
#[derive(Debug, Clone)]
struct Splice {
    at: usize,
    inserted: String,
    removed: String,
}

/// Owned mutable text buffer with bounded undo/redo history.
///
/// Exclusively owned by one Document; never shared between tabs.
pub struct TextBuffer {
    rope: Rope,
    undo_stack: Vec<Splice>,
    redo_stack: Vec<Splice>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Buffer initialized from loaded file content. Loading is irreversible:
    /// the history starts empty, so undo can never unwind past the load.
    pub fn from_content(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Replace the whole content without recording history.
    pub fn set_text(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Apply an edit. Out-of-range positions are clamped rather than rejected;
    /// a new edit invalidates the redo stack.
    pub fn apply(&mut self, delta: TextDelta) {
        let splice = match delta {
            TextDelta::Insert { at, text } => {
                if text.is_empty() {
                    return;
                }
                let at = at.min(self.rope.len_chars());
                self.rope.insert(at, &text);
                Splice {
                    at,
                    inserted: text,
                    removed: String::new(),
                }
            }
            TextDelta::Remove { start, end } => {
                let end = end.min(self.rope.len_chars());
                let start = start.min(end);
                if start == end {
                    return;
                }
                let removed = self.rope.slice(start..end).to_string();
                self.rope.remove(start..end);
                Splice {
                    at: start,
                    inserted: String::new(),
                    removed,
                }
            }
        };

        self.undo_stack.push(splice);
        if self.undo_stack.len() > MAX_UNDO_LEVELS {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the most recent edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(splice) = self.undo_stack.pop() else {
            return false;
        };
        self.unapply(&splice);
        self.redo_stack.push(splice);
        true
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self) -> bool {
        let Some(splice) = self.redo_stack.pop() else {
            return false;
        };
        self.reapply(&splice);
        self.undo_stack.push(splice);
        true
    }

    fn unapply(&mut self, splice: &Splice) {
        let inserted_len = splice.inserted.chars().count();
        if inserted_len > 0 {
            self.rope.remove(splice.at..splice.at + inserted_len);
        }
        if !splice.removed.is_empty() {
            self.rope.insert(splice.at, &splice.removed);
        }
    }

    fn reapply(&mut self, splice: &Splice) {
        let removed_len = splice.removed.chars().count();
        if removed_len > 0 {
            self.rope.remove(splice.at..splice.at + removed_len);
        }
        if !splice.inserted.is_empty() {
            self.rope.insert(splice.at, &splice.inserted);
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
