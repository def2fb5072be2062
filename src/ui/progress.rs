use crate::ui::progress_message::{ProgressMessage, ProgressPhase};
use crate::ui::Icons;
use indicatif::{MultiProgress, ProgressBar};
use std::thread;
use std::time::Duration;

/// Progress bars for one ingest run, fed from worker messages
pub struct ProgressManager {
    mp: MultiProgress,
    linking: ProgressBar,
    handle: Option<thread::JoinHandle<()>>,
}

fn visible(bar: ProgressBar) -> ProgressBar {
    if console::Term::stdout().is_term() {
        bar
    } else {
        ProgressBar::hidden()
    }
}

impl ProgressManager {
    pub fn new(total_files: usize) -> (Self, crossbeam::channel::Sender<ProgressMessage>) {
        let (tx, rx) = crossbeam::channel::unbounded::<ProgressMessage>();

        let mp = MultiProgress::new();
        let parsing = visible(mp.add(ProgressBar::new(total_files as u64).with_message("Parsing fragments")));
        let linking = visible(mp.add(ProgressBar::new_spinner().with_message("Linking scopes")));

        let parsing_clone = parsing.clone();
        let linking_clone = linking.clone();

        let handle = thread::spawn(move || {
            for msg in rx {
                match msg {
                    ProgressMessage::Started {
                        phase: ProgressPhase::Parsing,
                        total,
                    } => {
                        parsing_clone.set_length(total as u64);
                    }
                    ProgressMessage::Progress {
                        phase: ProgressPhase::Parsing,
                        current: _,
                        file,
                    } => {
                        parsing_clone.inc(1);
                        if let Some(ref f) = file {
                            parsing_clone.set_message(format!("Parsing: {}", f));
                        }
                    }
                    ProgressMessage::Started {
                        phase: ProgressPhase::Linking,
                        total: _,
                    } => {
                        linking_clone.enable_steady_tick(Duration::from_millis(100));
                    }
                    ProgressMessage::Finished {
                        phase: ProgressPhase::Parsing,
                    } => {
                        parsing_clone.finish_with_message("Done");
                    }
                    ProgressMessage::Finished {
                        phase: ProgressPhase::Linking,
                    } => {
                        linking_clone.finish_with_message("Done");
                    }
                    ProgressMessage::Error(e) => {
                        parsing_clone.inc(1);
                        parsing_clone.println(format!("{} {}", Icons::WARN, e));
                    }
                    _ => {}
                }
            }
        });

        (
            Self {
                mp,
                linking,
                handle: Some(handle),
            },
            tx,
        )
    }

    pub fn start_linking(&self) {
        self.linking.enable_steady_tick(Duration::from_millis(100));
    }

    pub fn finish_linking(&self) {
        self.linking.finish_with_message("Done");
    }

    /// Wait for queued messages to drain. Every sender must be dropped first.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn clear(&self) {
        self.mp.clear().ok();
    }
}

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        if console::Term::stdout().is_term() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Self { pb }
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}
