//! Spinner shown while a request is in flight

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const SPINNER_UPDATE_INTERVAL_MS: u64 = 100;
const CLEAR_LINE_WIDTH: usize = 100;

/// Simple spinner on stderr, so piped stdout output stays clean
pub struct ProgressSpinner {
    message: String,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProgressSpinner {
    /// Create new progress spinner with message
    pub fn new(message: String) -> Self {
        Self {
            message,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start spinner
    pub fn start(&mut self) {
        self.running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.running);
        let message = self.message.clone();

        let handle = thread::spawn(move || {
            let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut index = 0;
            let mut stderr = io::stderr();

            while running.load(Ordering::Relaxed) {
                let _ = write!(stderr, "\r{} {}", spinner_chars[index], message);
                let _ = stderr.flush();

                index = (index + 1) % spinner_chars.len();
                thread::sleep(Duration::from_millis(SPINNER_UPDATE_INTERVAL_MS));
            }

            let _ = write!(stderr, "\r{:<width$}\r", "", width = CLEAR_LINE_WIDTH);
            let _ = stderr.flush();
        });

        self.handle = Some(handle);
    }

    /// Stop spinner and display completion message
    pub fn stop(&mut self, completion_message: Option<&str>) {
        self.running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        if let Some(msg) = completion_message {
            eprintln!(" {}", msg);
        }
    }
}

impl Drop for ProgressSpinner {
    fn drop(&mut self) {
        self.stop(None);
    }
}
