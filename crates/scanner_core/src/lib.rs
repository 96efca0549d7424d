//! Scanner core: pure scan lifecycle state machine and view-model helpers.
mod effect;
mod input;
mod msg;
mod outcome;
mod result;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::{Effect, Notice};
pub use input::parse_urls;
pub use msg::{Msg, TransportFailure};
pub use outcome::{aggregate, has_qualifying_finding};
pub use result::{
    classify, render_card, CardField, ResultCard, ResultCategory, ScanResponse, ScanResultEntry,
};
pub use state::{AppState, ScanId};
pub use status::{show, LifecyclePhase, StatusPanel, StatusSlot};
pub use update::update;
pub use view_model::AppViewModel;
