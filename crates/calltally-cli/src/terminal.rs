use async_trait::async_trait;
use calltally_browser::PopupWindow;
use calltally_core::controller::{Phase, View, ViewSink};
use console::style;

/// Prints each output region when its text changes.
#[derive(Default)]
pub struct TerminalSink {
    shown: View,
}

impl TerminalSink {
    /// Forget the printed tally so the next result is shown even if it repeats.
    pub fn reset_tally(&mut self) {
        self.shown.tally.clear();
        self.shown.status.clear();
    }

    fn print_changes(&mut self, view: &View) {
        if view.status != self.shown.status && !view.status.is_empty() {
            println!("{}", style(&view.status).dim());
        }
        if view.master != self.shown.master && !view.master.is_empty() {
            println!("{}", style(&view.master).bold());
        }
        if view.tally != self.shown.tally && !view.tally.is_empty() {
            println!("{}", style(&view.tally).cyan());
        }
        self.shown = view.clone();
    }
}

#[async_trait]
impl ViewSink for TerminalSink {
    async fn render(&mut self, _phase: Phase, view: &View) {
        self.print_changes(view);
    }
}

/// Terminal output, mirrored into the popup window when one is open
pub struct PopupSink {
    pub terminal: TerminalSink,
    pub window: Option<PopupWindow>,
}

#[async_trait]
impl ViewSink for PopupSink {
    async fn render(&mut self, phase: Phase, view: &View) {
        self.terminal.render(phase, view).await;
        if let Some(window) = self.window.as_mut() {
            window.render(phase, view).await;
        }
    }
}
