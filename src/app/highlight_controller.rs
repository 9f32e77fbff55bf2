use super::document::Document;
use super::messages::Message;
use super::shell::Shell;
use super::syntax::Highlighter;

/// Debounced highlighting: typing schedules a pass after a quiet interval,
/// and each new request supersedes the pending one.
///
/// Cancellation is by generation. Every schedule bumps the document's
/// generation counter and stamps it into the timeout message; when a timeout
/// fires with a generation older than the document's current one, it is
/// stale and dropped. Only the latest pending pass ever runs.
pub struct HighlightController {
    highlighter: Box<dyn Highlighter>,
    pub enabled: bool,
}

impl HighlightController {
    pub fn new(highlighter: Box<dyn Highlighter>, enabled: bool) -> Self {
        Self {
            highlighter,
            enabled,
        }
    }

    /// Request a highlight pass for `doc` after the debounce interval.
    pub fn schedule(&mut self, doc: &mut Document, debounce_ms: u64, shell: &mut dyn Shell) {
        if !self.enabled {
            return;
        }
        doc.highlight_gen += 1;
        shell.schedule_timeout(
            debounce_ms,
            Message::HighlightTimeout(doc.id, doc.highlight_gen),
        );
    }

    /// Handle a debounce timeout. Stale generations and already-closed
    /// documents are ignored.
    pub fn on_timeout(&mut self, doc: Option<&mut Document>, generation: u64, shell: &mut dyn Shell) {
        let Some(doc) = doc else {
            return;
        };
        if generation != doc.highlight_gen {
            return;
        }
        self.refresh(doc, shell);
    }

    /// Run a highlight pass now. When disabled or the language has no
    /// grammar, any previous styling is cleared instead.
    pub fn refresh(&mut self, doc: &mut Document, shell: &mut dyn Shell) {
        if !self.enabled {
            doc.parse = None;
            shell.apply_highlight(doc.id, &[]);
            return;
        }

        let text = doc.buffer.text();
        match self.highlighter.parse(&text, doc.language()) {
            Some(outcome) => {
                shell.apply_highlight(doc.id, &outcome.spans);
                doc.parse = Some(outcome);
            }
            None => {
                doc.parse = None;
                shell.apply_highlight(doc.id, &[]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::document::DocumentId;
    use crate::app::shell::recording::{RecordingShell, ShellEvent};
    use crate::app::syntax::{NoopHighlighter, TreeSitterHighlighter};

    fn c_doc(id: u64, content: &str) -> Document {
        Document::new_from_file(DocumentId(id), "/tmp/t.c".into(), content)
    }

    #[test]
    fn test_schedule_bumps_generation_and_sets_timer() {
        let (mut shell, events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(NoopHighlighter), true);
        let mut doc = c_doc(1, "int x;");

        ctl.schedule(&mut doc, 150, &mut shell);
        ctl.schedule(&mut doc, 150, &mut shell);

        assert_eq!(doc.highlight_gen, 2);
        assert_eq!(
            *events.borrow(),
            vec![
                ShellEvent::Timeout(150, Message::HighlightTimeout(DocumentId(1), 1)),
                ShellEvent::Timeout(150, Message::HighlightTimeout(DocumentId(1), 2)),
            ]
        );
    }

    #[test]
    fn test_stale_timeout_is_dropped() {
        let (mut shell, events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(TreeSitterHighlighter::new()), true);
        let mut doc = c_doc(1, "int x;");

        ctl.schedule(&mut doc, 150, &mut shell);
        ctl.schedule(&mut doc, 150, &mut shell);
        events.borrow_mut().clear();

        // First timer fires with gen 1: superseded, nothing happens.
        ctl.on_timeout(Some(&mut doc), 1, &mut shell);
        assert!(events.borrow().is_empty());

        // Second fires with the current gen and runs the pass.
        ctl.on_timeout(Some(&mut doc), 2, &mut shell);
        assert_eq!(events.borrow().len(), 1);
        assert!(doc.parse.is_some());
    }

    #[test]
    fn test_timeout_for_closed_document_is_ignored() {
        let (mut shell, events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(NoopHighlighter), true);
        ctl.on_timeout(None, 1, &mut shell);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_disabled_controller_never_schedules() {
        let (mut shell, events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(NoopHighlighter), false);
        let mut doc = c_doc(1, "int x;");
        ctl.schedule(&mut doc, 150, &mut shell);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_disabled_refresh_clears_styling() {
        let (mut shell, events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(NoopHighlighter), false);
        let mut doc = c_doc(1, "int x;");

        ctl.refresh(&mut doc, &mut shell);
        assert!(doc.parse.is_none());
        assert_eq!(
            *events.borrow(),
            vec![ShellEvent::ApplyHighlight(DocumentId(1), 0)]
        );
    }

    #[test]
    fn test_refresh_stores_parse_and_sends_spans() {
        let (mut shell, events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(TreeSitterHighlighter::new()), true);
        let mut doc = c_doc(1, "int main(void) { return 0; }");

        ctl.refresh(&mut doc, &mut shell);
        assert!(doc.parse.is_some());
        let events = events.borrow();
        match &events[0] {
            ShellEvent::ApplyHighlight(id, n) => {
                assert_eq!(*id, DocumentId(1));
                assert!(*n > 0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_language_clears_previous_parse() {
        let (mut shell, _events) = RecordingShell::new();
        let mut ctl = HighlightController::new(Box::new(TreeSitterHighlighter::new()), true);
        let mut doc = c_doc(1, "int x;");

        ctl.refresh(&mut doc, &mut shell);
        assert!(doc.parse.is_some());

        doc.set_path("/tmp/t.txt".into());
        ctl.refresh(&mut doc, &mut shell);
        assert!(doc.parse.is_none());
    }
}
