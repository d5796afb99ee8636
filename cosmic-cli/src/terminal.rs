use cosmic_core::display::{DisplayState, DisplayUpdate};
use cosmic_engine::traits::DisplaySink;
use std::io::Write;
use std::sync::Mutex;

/// Renders display updates onto a line-oriented writer.
///
/// The terminal cannot un-print, so `Clear` only resets the tracked state;
/// a finished typewriter line or a fixed message ends with a newline.
pub struct TerminalDisplay<W: Write + Send> {
    inner: Mutex<Inner<W>>,
}

struct Inner<W> {
    state: DisplayState,
    out: W,
    // Characters were appended since the last newline.
    line_open: bool,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: DisplayState::default(),
                out,
                line_open: false,
            }),
        }
    }

    pub fn state(&self) -> DisplayState {
        self.lock().state.clone()
    }

    pub fn into_inner(self) -> W {
        match self.inner.into_inner() {
            Ok(i) => i.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<W>> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> DisplaySink for TerminalDisplay<W> {
    fn apply(&self, update: DisplayUpdate) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let was_loading = inner.state.is_loading;
        inner.state.apply(&update);

        // An interrupted typewriter line is closed before anything else prints.
        let ends_line = match &update {
            DisplayUpdate::SetLoading(true) => !was_loading,
            DisplayUpdate::SetText(_) | DisplayUpdate::SetTyping(false) => true,
            _ => false,
        };
        let out = &mut inner.out;
        if ends_line && inner.line_open {
            let _ = writeln!(out);
            inner.line_open = false;
        }

        // Output is best-effort; a closed pipe should not abort the request.
        let _ = match &update {
            DisplayUpdate::SetLoading(true) if !was_loading => writeln!(out, "… contacting the cosmos"),
            DisplayUpdate::SetText(text) => writeln!(out, "{text}"),
            DisplayUpdate::Append(c) => {
                inner.line_open = true;
                write!(out, "{c}")
            }
            _ => Ok(()),
        };
        let _ = out.flush();
    }
}
