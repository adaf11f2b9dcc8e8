use crate::error::NarrationError;
use crate::models::WordItem;
use crossbeam_channel::{Receiver, Sender};
use std::process::{Command, Stdio};
use std::thread;

/// What to say for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub word: String,
    pub syllables: Vec<String>,
}

impl From<&WordItem> for NarrationRequest {
    fn from(item: &WordItem) -> Self {
        Self {
            word: item.word.clone(),
            syllables: item.syllable_hints.clone(),
        }
    }
}

impl NarrationRequest {
    /// Syllables first, pausing between them, then the whole word.
    pub fn spoken_text(&self) -> String {
        if self.syllables.is_empty() {
            self.word.clone()
        } else {
            format!("{}. {}", self.syllables.join(", "), self.word)
        }
    }
}

pub trait Narrator: Send {
    fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError>;
}

/// Used when no speech program is configured.
#[derive(Debug, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError> {
        log::debug!("Narration disabled, skipping '{}'", request.word);
        Ok(())
    }
}

/// Runs an external text-to-speech program such as `espeak` or `say`, with
/// the spoken text appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
}

impl CommandNarrator {
    /// Splits a command line like `espeak -s 120` on whitespace.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Narrator for CommandNarrator {
    fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(request.spoken_text())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(NarrationError::Failed(status))
        }
    }
}

pub fn narrator_for(command: Option<&str>) -> Box<dyn Narrator> {
    match command.and_then(CommandNarrator::from_command_line) {
        Some(narrator) => {
            log::info!("Narration via '{}'", narrator.program());
            Box::new(narrator)
        }
        None => Box::new(SilentNarrator),
    }
}

/// Handle to the background narration thread. Dropping it closes the
/// request channel and lets the worker exit.
pub struct NarrationHandle {
    requests: Sender<NarrationRequest>,
    failures: Receiver<String>,
}

impl NarrationHandle {
    pub fn say(&self, request: NarrationRequest) -> Result<(), NarrationError> {
        self.requests
            .send(request)
            .map_err(|_| NarrationError::Disconnected)
    }

    /// Most recent failure reported by the worker, if any.
    pub fn latest_failure(&self) -> Option<String> {
        self.failures.try_iter().last()
    }
}

pub fn spawn_narration_worker(narrator: Box<dyn Narrator>) -> std::io::Result<NarrationHandle> {
    let (request_tx, request_rx) = crossbeam_channel::unbounded::<NarrationRequest>();
    let (failure_tx, failure_rx) = crossbeam_channel::unbounded::<String>();

    thread::Builder::new()
        .name("spelling-drill::narration".to_string())
        .spawn(move || {
            for mut request in request_rx.iter() {
                // Only the newest queued word is worth saying.
                if let Some(latest) = request_rx.try_iter().last() {
                    log::debug!("Skipping stale narration for '{}'", request.word);
                    request = latest;
                }
                log::debug!("Narrating '{}'", request.word);
                if let Err(e) = narrator.speak(&request) {
                    log::warn!("Narration failed for '{}': {}", request.word, e);
                    let _ = failure_tx.send(format!("Narration failed: {}", e));
                }
            }
            log::debug!("Narration channel closed, worker exiting");
        })?;

    Ok(NarrationHandle {
        requests: request_tx,
        failures: failure_rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    struct Recording {
        spoken: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Narrator for Recording {
        fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError> {
            self.spoken.lock().unwrap().push(request.spoken_text());
            if self.fail {
                Err(NarrationError::Disconnected)
            } else {
                Ok(())
            }
        }
    }

    fn wait_for<F: FnMut() -> bool>(mut check: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_spoken_text_with_syllables() {
        let item = WordItem::new("banana").with_syllables(["ba", "na", "na"]);
        let request = NarrationRequest::from(&item);
        assert_eq!(request.spoken_text(), "ba, na, na. banana");

        let plain = NarrationRequest::from(&WordItem::new("cat"));
        assert_eq!(plain.spoken_text(), "cat");
    }

    #[test]
    fn test_command_line_parsing() {
        let narrator = CommandNarrator::from_command_line("espeak -s 120").unwrap();
        assert_eq!(narrator.program, "espeak");
        assert_eq!(narrator.args, vec!["-s", "120"]);
        assert!(CommandNarrator::from_command_line("   ").is_none());
    }

    #[test]
    fn test_missing_program_reports_spawn_error() {
        let narrator =
            CommandNarrator::from_command_line("definitely-not-a-real-tts-program").unwrap();
        let result = narrator.speak(&NarrationRequest::from(&WordItem::new("cat")));
        assert!(matches!(result, Err(NarrationError::Spawn(_))));
    }

    #[test]
    fn test_silent_narrator_succeeds() {
        assert!(SilentNarrator
            .speak(&NarrationRequest::from(&WordItem::new("cat")))
            .is_ok());
        assert!(narrator_for(None)
            .speak(&NarrationRequest::from(&WordItem::new("cat")))
            .is_ok());
    }

    #[test]
    fn test_worker_speaks_requests() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let handle = spawn_narration_worker(Box::new(Recording {
            spoken: Arc::clone(&spoken),
            fail: false,
        }))
        .unwrap();

        handle.say(NarrationRequest::from(&WordItem::new("cat"))).unwrap();
        assert!(wait_for(|| spoken.lock().unwrap().len() == 1));
        handle.say(NarrationRequest::from(&WordItem::new("dog"))).unwrap();

        assert!(wait_for(|| spoken.lock().unwrap().len() == 2));
        assert_eq!(*spoken.lock().unwrap(), vec!["cat", "dog"]);
        assert!(handle.latest_failure().is_none());
    }

    struct Gated {
        spoken: Arc<Mutex<Vec<String>>>,
        release: Receiver<()>,
    }

    impl Narrator for Gated {
        fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError> {
            self.spoken.lock().unwrap().push(request.spoken_text());
            if request.word == "cat" {
                let _ = self.release.recv();
            }
            Ok(())
        }
    }

    #[test]
    fn test_worker_skips_words_queued_behind_slow_narration() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        let handle = spawn_narration_worker(Box::new(Gated {
            spoken: Arc::clone(&spoken),
            release: release_rx,
        }))
        .unwrap();

        handle.say(NarrationRequest::from(&WordItem::new("cat"))).unwrap();
        assert!(wait_for(|| spoken.lock().unwrap().len() == 1));
        for word in ["dog", "owl", "emu"] {
            handle.say(NarrationRequest::from(&WordItem::new(word))).unwrap();
        }
        release_tx.send(()).unwrap();

        assert!(wait_for(|| spoken.lock().unwrap().len() == 2));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(*spoken.lock().unwrap(), vec!["cat", "emu"]);
    }

    #[test]
    fn test_worker_reports_failures() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let handle = spawn_narration_worker(Box::new(Recording {
            spoken: Arc::clone(&spoken),
            fail: true,
        }))
        .unwrap();

        handle.say(NarrationRequest::from(&WordItem::new("cat"))).unwrap();
        let mut failure = None;
        assert!(wait_for(|| {
            failure = failure.take().or_else(|| handle.latest_failure());
            failure.is_some()
        }));
        assert!(failure.unwrap().starts_with("Narration failed"));
        assert_eq!(spoken.lock().unwrap().len(), 1);
    }
}
