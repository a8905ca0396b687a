//! Terminal progress line for the build pipeline.
//!
//! A background tokio task redraws `done/total spinner` on a fixed interval
//! until [`ProgressReporter::stop`] is called, then draws a final frame and
//! moves to a fresh line. In verbose mode nothing is drawn; per-file lines are
//! printed by the pipeline instead. The reporter is advisory only and has no
//! effect on the build result.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::WorkCounter;

/// Clears the current terminal line and returns the cursor to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Cycling spinner glyph sequence.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    position: usize,
}

impl Spinner {
    pub const GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current glyph and advances.
    pub fn next_glyph(&mut self) -> char {
        let glyph = Self::GLYPHS[self.position];
        self.position = (self.position + 1) % Self::GLYPHS.len();
        glyph
    }
}

/// Formats one progress frame.
pub fn render_line(done: usize, total: usize, glyph: char) -> String {
    format!("{}/{} {}", done, total, glyph)
}

/// Background redraw loop. Call [`ProgressReporter::stop`] to finish it.
pub struct ProgressReporter {
    stop: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Starts drawing to stdout.
    pub fn start(counter: WorkCounter, interval: Duration, verbose: bool) -> Self {
        Self::start_with_writer(counter, interval, verbose, std::io::stdout())
    }

    /// Starts drawing to `out`.
    pub fn start_with_writer<W>(
        counter: WorkCounter,
        interval: Duration,
        verbose: bool,
        mut out: W,
    ) -> Self
    where
        W: Write + Send + 'static,
    {
        let stop = Arc::new(Notify::new());
        let stopped = stop.clone();

        let handle = tokio::spawn(async move {
            let mut spinner = Spinner::new();
            let mut tick = tokio::time::interval(interval);

            loop {
                let finishing = tokio::select! {
                    _ = tick.tick() => false,
                    _ = stopped.notified() => true,
                };

                if !verbose {
                    let frame = render_line(counter.completed(), counter.total(), spinner.next_glyph());
                    // Terminal write failures are not worth surfacing.
                    let _ = write!(out, "{}{}", CLEAR_LINE, frame);
                    if finishing {
                        let _ = writeln!(out);
                    }
                    let _ = out.flush();
                }

                if finishing {
                    break;
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Draws the final frame and waits for the redraw task to exit.
    pub async fn stop(mut self) {
        self.stop.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
