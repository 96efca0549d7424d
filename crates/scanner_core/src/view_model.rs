use crate::{LifecyclePhase, ResultCard, StatusPanel};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: LifecyclePhase,
    pub status: StatusPanel,
    pub input: String,
    pub cards: Vec<ResultCard>,
    pub start_enabled: bool,
    pub reset_enabled: bool,
    pub last_download: Option<String>,
    pub dirty: bool,
}
