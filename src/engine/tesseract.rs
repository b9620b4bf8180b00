//! Tesseract OCR engine.

use std::io::Cursor;

use image::ImageFormat;
use tokio::process::Command;

use super::RecognitionEngine;
use crate::{
    async_utils::{check_for_command_failure, spawn_blocking_propagating_panics},
    document::PageImage,
    prelude::*,
};

/// OCR engine wrapping the `tesseract` CLI tool.
///
/// Each recognition is a separate `tesseract` process, which is killed if the
/// recognition is abandoned. The "current image" lives in a private scratch
/// directory, which [`destroy`] removes.
///
/// [`destroy`]: RecognitionEngine::destroy
#[derive(Debug)]
pub struct TesseractEngine {
    /// The `tesseract` executable.
    program: PathBuf,
    /// The loaded language model, like `eng` or `eng+deu`.
    model: Option<String>,
    /// Holds the current image.
    scratch: Option<tempfile::TempDir>,
    /// The current image, if any.
    image_path: Option<PathBuf>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::with_program("tesseract")
    }

    /// Use a specific `tesseract` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            model: None,
            scratch: None,
            image_path: None,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true);
        cmd
    }

    fn scratch_dir(&self) -> Result<&Path> {
        self.scratch
            .as_ref()
            .map(|tmpdir| tmpdir.path())
            .ok_or_else(|| anyhow!("tesseract engine has no model loaded"))
    }
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    #[instrument(level = "debug", skip(self))]
    async fn load_model(&mut self, model: &str) -> Result<()> {
        let output = self
            .command()
            .arg("--list-langs")
            .output()
            .await
            .context("cannot run tesseract")?;
        check_for_command_failure("tesseract", &output, None)?;

        // Older versions of tesseract print the list to standard error.
        let mut listing = String::from_utf8_lossy(&output.stdout).into_owned();
        listing.push_str(&String::from_utf8_lossy(&output.stderr));
        let installed = parse_language_list(&listing);
        for language in model.split('+') {
            if !installed.iter().any(|l| l == language) {
                return Err(anyhow!(
                    "tesseract language {:?} is not installed (installed: {})",
                    language,
                    installed.join(", ")
                ));
            }
        }

        self.scratch = Some(tempfile::TempDir::with_prefix("tesseract")?);
        self.model = Some(model.to_owned());
        info!(model, "Loaded OCR model");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(page = image.page))]
    async fn load_image(&mut self, image: &PageImage) -> Result<()> {
        let path = self.scratch_dir()?.join("current.png");
        let pixels = image.pixels.clone();
        let png = spawn_blocking_propagating_panics(move || -> Result<Vec<u8>> {
            let mut png = vec![];
            pixels
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .context("cannot encode page as PNG")?;
            Ok(png)
        })
        .await?;
        tokio::fs::write(&path, png)
            .await
            .context("cannot write tesseract input file")?;
        self.image_path = Some(path);
        Ok(())
    }

    #[instrument(level = "debug", skip_all)]
    async fn get_text(&mut self) -> Result<String> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| anyhow!("tesseract engine has no model loaded"))?;
        let image_path = self
            .image_path
            .take()
            .ok_or_else(|| anyhow!("no image loaded into tesseract engine"))?;

        let output = self
            .command()
            .arg(&image_path)
            .arg("stdout")
            .arg("-l")
            .arg(model)
            .output()
            .await
            .context("cannot run tesseract")?;
        check_for_command_failure("tesseract", &output, None)?;

        tokio::fs::remove_file(&image_path)
            .await
            .context("cannot delete tesseract input file")?;
        String::from_utf8(output.stdout).context("tesseract output was not valid UTF-8")
    }

    fn destroy(&mut self) -> Result<()> {
        self.model = None;
        self.image_path = None;
        if let Some(scratch) = self.scratch.take() {
            scratch
                .close()
                .context("failed to delete tesseract scratch directory")?;
        }
        debug!("Destroyed tesseract engine");
        Ok(())
    }
}

/// Parse the output of `tesseract --list-langs`.
fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(' ') && !line.ends_with(':'))
        .map(str::to_owned)
        .collect()
}
