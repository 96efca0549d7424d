use std::io::{self, Write};

use scanner_core::{AppViewModel, LifecyclePhase, Notice, ResultCard, StatusPanel};

/// Line-oriented renderer. The terminal is append-only, so it tracks what was
/// already printed and writes only what changed.
pub struct TerminalRenderer<W: Write> {
    out: W,
    show_hints: bool,
    shown_phase: Option<LifecyclePhase>,
    shown_cards: usize,
    shown_download: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, show_hints: bool) -> Self {
        Self {
            out,
            show_hints,
            shown_phase: None,
            shown_cards: 0,
            shown_download: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        // Fewer cards than printed means the result area was cleared.
        if view.cards.len() < self.shown_cards {
            self.shown_cards = 0;
        }
        for card in &view.cards[self.shown_cards..] {
            for line in card_lines(card) {
                writeln!(self.out, "{line}")?;
            }
        }
        self.shown_cards = view.cards.len();

        if self.shown_phase != Some(view.phase) {
            writeln!(self.out, "{}", status_line(&view.status))?;
            if self.show_hints {
                writeln!(self.out, "{}", controls_hint(view))?;
            }
            self.shown_phase = Some(view.phase);
        }

        if view.last_download != self.shown_download {
            if let Some(location) = &view.last_download {
                writeln!(self.out, "Saved report archive: {location}")?;
            }
            self.shown_download = view.last_download.clone();
        }

        self.out.flush()
    }

    pub fn notice(&mut self, notice: &Notice) -> io::Result<()> {
        writeln!(self.out, "! {notice}")?;
        self.out.flush()
    }
}

pub fn status_line(panel: &StatusPanel) -> String {
    let phase = panel.visible_phase();
    format!("[{}] {}", phase.label().to_uppercase(), phase.message())
}

pub fn card_lines(card: &ResultCard) -> Vec<String> {
    let mut lines = Vec::with_capacity(card.fields.len() + 1);
    lines.push(format!("{} {}", card.category.icon(), card.title));
    lines.extend(
        card.fields
            .iter()
            .map(|field| format!("    {}: {}", field.label, field.value)),
    );
    lines
}

fn controls_hint(view: &AppViewModel) -> &'static str {
    match (view.start_enabled, view.reset_enabled) {
        (true, true) => "Enter URLs to scan again, `reset` to clear, or `quit`.",
        (true, false) => "Enter URLs separated by spaces or commas, or `quit`.",
        (false, _) => "Type `stop` to cancel the scan.",
    }
}
