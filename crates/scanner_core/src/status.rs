/// Exclusive top-level phase of the scan workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecyclePhase {
    #[default]
    Idle,
    Running,
    Success,
    Warning,
    Error,
}

impl LifecyclePhase {
    /// Indicator order, as laid out in the status panel.
    pub const ALL: [LifecyclePhase; 5] = [
        LifecyclePhase::Idle,
        LifecyclePhase::Running,
        LifecyclePhase::Success,
        LifecyclePhase::Warning,
        LifecyclePhase::Error,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LifecyclePhase::Idle => "Idle",
            LifecyclePhase::Running => "Running",
            LifecyclePhase::Success => "Success",
            LifecyclePhase::Warning => "Warning",
            LifecyclePhase::Error => "Error",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LifecyclePhase::Idle => "Ready. Enter one or more URLs to scan.",
            LifecyclePhase::Running => "Scanning... this can take a while.",
            LifecyclePhase::Success => "Scan complete. The report archive is downloading.",
            LifecyclePhase::Warning => "Scan finished, but no downloadable PDF findings were produced.",
            LifecyclePhase::Error => "Scan failed. Check the service and try again.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSlot {
    pub phase: LifecyclePhase,
    pub visible: bool,
}

/// One slot per phase; exactly one slot is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPanel {
    slots: [StatusSlot; 5],
}

impl StatusPanel {
    pub fn slots(&self) -> &[StatusSlot] {
        &self.slots
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.visible).count()
    }

    pub fn visible_phase(&self) -> LifecyclePhase {
        self.slots
            .iter()
            .find(|slot| slot.visible)
            .map(|slot| slot.phase)
            .unwrap_or_default()
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        show(LifecyclePhase::default())
    }
}

/// Maps a phase to the status panel showing only that phase's indicator.
pub fn show(phase: LifecyclePhase) -> StatusPanel {
    StatusPanel {
        slots: LifecyclePhase::ALL.map(|slot_phase| StatusSlot {
            phase: slot_phase,
            visible: slot_phase == phase,
        }),
    }
}
