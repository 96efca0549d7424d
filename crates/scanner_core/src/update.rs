use crate::{aggregate, parse_urls, AppState, Effect, LifecyclePhase, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::StartClicked => {
            if state.in_flight().is_some() {
                return (state, vec![Effect::Notify(Notice::ScanAlreadyRunning)]);
            }
            let urls = parse_urls(state.input());
            if urls.is_empty() {
                return (state, vec![Effect::Notify(Notice::NoUrls)]);
            }
            let scan_id = state.begin_scan();
            vec![Effect::SubmitScan { scan_id, urls }]
        }
        Msg::StopClicked => {
            state.reset();
            vec![Effect::RequestStop]
        }
        Msg::ScanFinished { scan_id, outcome } => {
            // Replies for a scan that was reset or superseded are dropped.
            if state.in_flight() != Some(scan_id) {
                return (state, Vec::new());
            }
            match outcome {
                Err(_failure) => {
                    state.end_scan(LifecyclePhase::Error);
                    Vec::new()
                }
                Ok(response) => {
                    state.append_cards(&response.results);
                    let phase = aggregate(&response);
                    let effects = match (phase, response.download_link()) {
                        (LifecyclePhase::Success, Some(link)) => {
                            state.expect_download(scan_id);
                            vec![Effect::Download {
                                scan_id,
                                zip_file: link.to_owned(),
                            }]
                        }
                        _ => Vec::new(),
                    };
                    state.end_scan(phase);
                    effects
                }
            }
        }
        Msg::DownloadFinished { scan_id, result } => {
            // An archive from before a reset or a newer start is not shown.
            if !state.take_download(scan_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(location) => {
                    state.set_last_download(location);
                    Vec::new()
                }
                Err(reason) => vec![Effect::Notify(Notice::DownloadFailed { reason })],
            }
        }
    };

    (state, effects)
}
