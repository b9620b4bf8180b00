//! Application UI. For now, this is a progress bar that follows a pipeline.
//!
//! This is adapted from `substudy` by Eric Kidd, which is licensed under
//! Apache-2.0 OR MIT. Used with permission.

use std::{io, sync::Arc, time::Duration};

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::{sync::watch, task::JoinHandle};

use crate::pipeline::{Phase, PipelineStatus};

/// Application UI state.
#[derive(Clone)]
pub struct Ui {
    /// Our progress bars, shared with the stderr writer used by `tracing`.
    multi_progress: Arc<MultiProgress>,
}

impl Ui {
    /// Create a new UI.
    pub fn init() -> Ui {
        let multi_progress = Arc::new(MultiProgress::new());
        Ui { multi_progress }
    }

    /// Create a new UI for unit tests.
    #[cfg(test)]
    pub fn init_for_tests() -> Ui {
        let multi_progress =
            Arc::new(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()));
        Ui { multi_progress }
    }

    /// Hide all our progress bars completely, for when we're writing actual
    /// output to `stdout`.
    pub fn hide_progress_bars(&self) {
        self.multi_progress
            .set_draw_target(ProgressDrawTarget::hidden());
    }

    /// Get a writer than can be used to write to stderr, for use with `tracing`
    /// and other output code.
    pub fn get_stderr_writer(&self) -> SafeStderrWriter {
        SafeStderrWriter { ui: self.clone() }
    }

    /// Get a reference to our progress bars.
    pub fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }

    /// Show a progress bar that follows a pipeline's status until the
    /// pipeline is dropped.
    pub fn track_pipeline(
        &self,
        mut status: watch::Receiver<PipelineStatus>,
    ) -> JoinHandle<()> {
        let pb = self
            .multi_progress
            .add(ProgressBar::new_spinner().with_style(default_spinner_style()));
        #[cfg(test)]
        pb.set_draw_target(ProgressDrawTarget::hidden());
        pb.enable_steady_tick(Duration::from_millis(250));

        tokio::spawn(async move {
            loop {
                let current = *status.borrow_and_update();
                show_status(&pb, &current);
                if status.changed().await.is_err() {
                    break;
                }
            }
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        })
    }
}

/// Update `pb` to show `status`.
fn show_status(pb: &ProgressBar, status: &PipelineStatus) {
    let progress = &status.progress;
    match status.phase {
        Phase::LoadingModel => pb.set_message("Loading OCR model"),
        Phase::Ready => pb.set_message("OCR model ready"),
        Phase::Loading => pb.set_message("Reading document"),
        Phase::ProcessingPages => {
            if pb.length() != Some(progress.total_pages as u64) {
                pb.set_style(default_progress_style());
                pb.set_length(progress.total_pages as u64);
            }
            pb.set_position(progress.current_page.saturating_sub(1) as u64);
            pb.set_message(format!(
                "OCRing page {} of {}",
                progress.current_page, progress.total_pages
            ));
        }
        Phase::Done => {
            pb.set_position(progress.total_pages as u64);
            pb.finish_with_message("OCRed document");
        }
        Phase::Failed => pb.abandon_with_message("OCR failed"),
        Phase::ModelLoadFailed => pb.abandon_with_message("Could not load OCR model"),
    }
}

fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  📄 {msg:25} {pos:>4}/{len:4} {elapsed_precise} {wide_bar:.cyan/blue} {eta_precise}")
        .expect("bad progress bar template")
}

fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner} 📄 {msg}")
        .expect("bad progress bar template")
}

/// A writer which can used to write to `stderr`. It will hide and show progress
/// bars as needed, so that they don't interfere with the output.
#[derive(Clone)]
pub struct SafeStderrWriter {
    ui: Ui,
}

// The `tracing-indicatif` crate suggests that we should implement the following
// methods.
impl io::Write for SafeStderrWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ui.multi_progress().suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ui.multi_progress().suspend(|| io::stderr().flush())
    }

    fn write_vectored(&mut self, bufs: &[io::IoSlice<'_>]) -> io::Result<usize> {
        self.ui
            .multi_progress()
            .suspend(|| io::stderr().write_vectored(bufs))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.ui
            .multi_progress()
            .suspend(|| io::stderr().write_all(buf))
    }

    fn write_fmt(&mut self, fmt: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.ui
            .multi_progress()
            .suspend(|| io::stderr().write_fmt(fmt))
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SafeStderrWriter {
    type Writer = SafeStderrWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
