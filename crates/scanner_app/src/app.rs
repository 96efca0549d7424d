use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use scanner_core::{update, AppState, Effect, LifecyclePhase, Msg, Notice, ScanId};
use scanner_logging::{scan_debug, scan_info};

use crate::cli::Command;
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::render::TerminalRenderer;

const EXIT_VALIDATION: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Msg(Msg),
    /// A line of URLs typed in interactive mode.
    Submit(String),
    Quit,
}

/// Bookkeeping for `scanner scan`, which exits once its scan has settled.
#[derive(Debug, Default)]
struct OneShot {
    started: bool,
    rejected: bool,
    pending_downloads: usize,
}

impl OneShot {
    fn is_settled(&self, state: &AppState) -> bool {
        self.started && state.in_flight().is_none() && self.pending_downloads == 0
    }
}

pub fn run(config: &AppConfig, mode: Command) -> anyhow::Result<ExitCode> {
    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config, loop_tx.clone())?;
    scan_info!("Using scan service at {}", config.service_url);

    let one_shot = matches!(mode, Command::Scan { .. });
    let mut renderer = TerminalRenderer::new(io::stdout(), !one_shot);
    let mut state = AppState::new();
    renderer.render(&state.view())?;
    state.consume_dirty();

    match mode {
        Command::Scan { urls } => {
            let _ = loop_tx.send(LoopEvent::Msg(Msg::InputChanged(urls.join(" "))));
            let _ = loop_tx.send(LoopEvent::Msg(Msg::StartClicked));
        }
        Command::Interactive => spawn_stdin_reader(loop_tx.clone()),
    }
    drop(loop_tx);

    let mut tracker = OneShot::default();
    while let Ok(event) = loop_rx.recv() {
        let msgs = match event {
            LoopEvent::Msg(msg) => vec![msg],
            LoopEvent::Submit(line) => submit_msgs(&state, line),
            LoopEvent::Quit => break,
        };

        for msg in msgs {
            if matches!(msg, Msg::DownloadFinished { .. }) {
                tracker.pending_downloads = tracker.pending_downloads.saturating_sub(1);
            }
            match stale_reply(&state, &msg) {
                Some(StaleReply::Scan(scan_id)) => {
                    scan_debug!("Ignoring reply for stale scan {}", scan_id)
                }
                Some(StaleReply::Download(scan_id)) => {
                    scan_debug!("Ignoring download for stale scan {}", scan_id)
                }
                None => {}
            }

            let (next, effects) = update(state, msg);
            state = next;

            for effect in effects {
                match &effect {
                    Effect::Notify(notice) => {
                        renderer.notice(notice)?;
                        tracker.rejected |= *notice == Notice::NoUrls;
                    }
                    Effect::SubmitScan { .. } => tracker.started = true,
                    Effect::Download { .. } => tracker.pending_downloads += 1,
                    Effect::RequestStop => {}
                }
                runner.run(effect);
            }
        }

        if state.consume_dirty() {
            renderer.render(&state.view())?;
        }

        if one_shot {
            if tracker.rejected {
                return Ok(ExitCode::from(EXIT_VALIDATION));
            }
            if tracker.is_settled(&state) {
                return Ok(exit_code(state.phase()));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(phase: LifecyclePhase) -> ExitCode {
    ExitCode::from(exit_status(phase))
}

fn exit_status(phase: LifecyclePhase) -> u8 {
    match phase {
        LifecyclePhase::Idle | LifecyclePhase::Success => 0,
        LifecyclePhase::Error | LifecyclePhase::Running => 1,
        LifecyclePhase::Warning => 2,
    }
}

fn spawn_stdin_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for event in command_events(&line) {
                if loop_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = loop_tx.send(LoopEvent::Quit);
    });
}

/// Maps one line of interactive input to loop events. Anything that is not
/// a command is submitted as URL input.
fn command_events(line: &str) -> Vec<LoopEvent> {
    match line.trim() {
        "stop" | "reset" => vec![LoopEvent::Msg(Msg::StopClicked)],
        "quit" | "exit" => vec![LoopEvent::Quit],
        _ => vec![LoopEvent::Submit(line.to_string())],
    }
}

/// A submitted line replaces the input and starts a scan. While a scan is in
/// flight only the start goes through, so the core rejects it and the running
/// scan keeps its input.
fn submit_msgs(state: &AppState, line: String) -> Vec<Msg> {
    if state.in_flight().is_some() {
        vec![Msg::StartClicked]
    } else {
        vec![Msg::InputChanged(line), Msg::StartClicked]
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StaleReply {
    Scan(ScanId),
    Download(ScanId),
}

/// Engine replies the core will drop because a stop or a newer start
/// happened after they were requested.
fn stale_reply(state: &AppState, msg: &Msg) -> Option<StaleReply> {
    match *msg {
        Msg::ScanFinished { scan_id, .. } if state.in_flight() != Some(scan_id) => {
            Some(StaleReply::Scan(scan_id))
        }
        Msg::DownloadFinished { scan_id, .. } if state.pending_download() != Some(scan_id) => {
            Some(StaleReply::Download(scan_id))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use scanner_core::TransportFailure;

    use super::*;

    #[test]
    fn commands_map_to_stop_and_quit() {
        assert_eq!(command_events(" stop "), vec![LoopEvent::Msg(Msg::StopClicked)]);
        assert_eq!(command_events("reset"), vec![LoopEvent::Msg(Msg::StopClicked)]);
        assert_eq!(command_events("quit"), vec![LoopEvent::Quit]);
    }

    #[test]
    fn other_lines_start_a_scan() {
        assert_eq!(
            command_events("a.com, b.com"),
            vec![LoopEvent::Submit("a.com, b.com".to_string())]
        );
        assert_eq!(
            submit_msgs(&AppState::new(), "a.com, b.com".to_string()),
            vec![
                Msg::InputChanged("a.com, b.com".to_string()),
                Msg::StartClicked,
            ]
        );
        // Blank lines still go through the core, which reports the empty input.
        assert_eq!(submit_msgs(&AppState::new(), String::new()).len(), 2);
    }

    #[test]
    fn line_typed_during_scan_keeps_running_input() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("a.com".to_string()));
        let (mut state, _) = update(state, Msg::StartClicked);

        let mut notices = Vec::new();
        for msg in submit_msgs(&state, "b.com".to_string()) {
            let (next, effects) = update(state, msg);
            state = next;
            notices.extend(effects);
        }

        assert_eq!(state.input(), "a.com");
        assert_eq!(state.in_flight(), Some(1));
        assert_eq!(notices, vec![Effect::Notify(Notice::ScanAlreadyRunning)]);
    }

    #[test]
    fn replies_for_reset_scans_are_stale() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("a.com".to_string()));
        let (state, _) = update(state, Msg::StartClicked);
        let reply = Msg::ScanFinished {
            scan_id: 1,
            outcome: Err(TransportFailure::new("refused")),
        };
        assert_eq!(stale_reply(&state, &reply), None);

        let (state, _) = update(state, Msg::StopClicked);
        assert_eq!(stale_reply(&state, &reply), Some(StaleReply::Scan(1)));

        let download = Msg::DownloadFinished {
            scan_id: 1,
            result: Ok("downloads/old.zip".to_string()),
        };
        assert_eq!(stale_reply(&state, &download), Some(StaleReply::Download(1)));
        assert_eq!(stale_reply(&state, &Msg::StopClicked), None);
    }

    #[test]
    fn exit_status_follows_phase() {
        assert_eq!(exit_status(LifecyclePhase::Success), 0);
        assert_eq!(exit_status(LifecyclePhase::Idle), 0);
        assert_eq!(exit_status(LifecyclePhase::Error), 1);
        assert_eq!(exit_status(LifecyclePhase::Warning), 2);
    }

    #[test]
    fn one_shot_waits_for_download() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("a.com".to_string()));
        let (state, _) = update(state, Msg::StartClicked);
        let mut tracker = OneShot {
            started: true,
            ..OneShot::default()
        };
        assert!(!tracker.is_settled(&state));

        let (state, _) = update(state, Msg::StopClicked);
        tracker.pending_downloads = 1;
        assert!(!tracker.is_settled(&state));

        tracker.pending_downloads = 0;
        assert!(tracker.is_settled(&state));
    }
}
