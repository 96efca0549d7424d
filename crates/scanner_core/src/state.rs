use crate::view_model::AppViewModel;
use crate::{render_card, show, LifecyclePhase, ResultCard, ScanResultEntry};

pub type ScanId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    phase: LifecyclePhase,
    cards: Vec<ResultCard>,
    in_flight: Option<ScanId>,
    last_scan_id: ScanId,
    reset_enabled: bool,
    last_download: Option<String>,
    pending_download: Option<ScanId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            status: show(self.phase),
            input: self.input.clone(),
            cards: self.cards.clone(),
            start_enabled: self.in_flight.is_none(),
            reset_enabled: self.reset_enabled,
            last_download: self.last_download.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The scan currently awaiting its reply, if any.
    pub fn in_flight(&self) -> Option<ScanId> {
        self.in_flight
    }

    /// The scan whose archive download is outstanding, if any. Cleared by
    /// reset and by the next start.
    pub fn pending_download(&self) -> Option<ScanId> {
        self.pending_download
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_scan(&mut self) -> ScanId {
        self.last_scan_id += 1;
        self.in_flight = Some(self.last_scan_id);
        self.reset_enabled = true;
        self.cards.clear();
        self.last_download = None;
        self.pending_download = None;
        self.phase = LifecyclePhase::Running;
        self.mark_dirty();
        self.last_scan_id
    }

    /// Ends the in-flight scan. The start control is available again afterwards.
    pub(crate) fn end_scan(&mut self, phase: LifecyclePhase) {
        self.in_flight = None;
        self.phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn append_cards<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a ScanResultEntry>,
    ) {
        self.cards.extend(entries.into_iter().map(render_card));
        self.mark_dirty();
    }

    pub(crate) fn reset(&mut self) {
        self.input.clear();
        self.cards.clear();
        self.in_flight = None;
        self.reset_enabled = false;
        self.last_download = None;
        self.pending_download = None;
        self.phase = LifecyclePhase::Idle;
        self.mark_dirty();
    }

    pub(crate) fn expect_download(&mut self, scan_id: ScanId) {
        self.pending_download = Some(scan_id);
    }

    /// Settles the outstanding download if it belongs to `scan_id`.
    pub(crate) fn take_download(&mut self, scan_id: ScanId) -> bool {
        if self.pending_download == Some(scan_id) {
            self.pending_download = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_last_download(&mut self, location: String) {
        self.last_download = Some(location);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
