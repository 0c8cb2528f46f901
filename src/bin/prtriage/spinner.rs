//! Braille spinner on stderr.
//!
//! Implements the engine's [`Progress`] trait: a spinning frame while a
//! stage runs, a plain status line once it finishes. When stderr is not a
//! terminal (cron, pipes) nothing animates and only the status lines are
//! printed.

use std::{
    io::{IsTerminal, Write},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use prtriage::{Progress, Stage};

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

struct Spinner {
    stop: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl Spinner {
    fn start(message: String) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let mut frames = FRAMES.iter().cycle();
            while !stop_flag.load(Ordering::Relaxed) {
                let frame = frames.next().unwrap();
                eprint!("\r{frame} {message}");
                let _ = std::io::stderr().flush();
                thread::sleep(FRAME_INTERVAL);
            }
            // Clear the spinner line before the status line replaces it.
            eprint!("\r\x1b[2K");
            let _ = std::io::stderr().flush();
        });
        Self { stop, handle }
    }

    fn finish(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

pub struct SpinnerProgress {
    active: Mutex<Option<Spinner>>,
    animate: bool,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            animate: std::io::stderr().is_terminal(),
        }
    }
}

impl Progress for SpinnerProgress {
    fn begin(&self, _stage: Stage, message: &str) {
        if !self.animate {
            return;
        }
        let mut active = self.active.lock().unwrap();
        if let Some(previous) = active.take() {
            previous.finish();
        }
        *active = Some(Spinner::start(message.to_string()));
    }

    fn end(&self, _stage: Stage, summary: &str) {
        if let Some(spinner) = self.active.lock().unwrap().take() {
            spinner.finish();
        }
        eprintln!("  {summary}");
    }
}
