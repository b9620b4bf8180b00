//! PDF support using Poppler's `pdfinfo` and `pdftocairo` CLI tools.

use std::{any::Any, collections::BTreeMap, io::Cursor, sync::LazyLock};

use image::{ImageFormat, ImageReader, RgbaImage, imageops::FilterType};
use regex::Regex;
use tokio::process::Command;

use super::{
    DocumentHandle, DocumentLoader, PageImage, PageRasterizer, PageRef, RenderScale,
    check_page_index,
};
use crate::{
    async_utils::{check_for_command_failure, is_error_line, spawn_blocking_propagating_panics},
    prelude::*,
};

/// The only MIME type we know how to paginate.
const PDF_MIME_TYPE: &str = "application/pdf";

/// Matches `pdfinfo` page geometry lines, like `Page    1 size: 612 x 792 pts (letter)`.
static PAGE_SIZE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Page\s+(\d+)\s+size:\s+([0-9.]+)\s+x\s+([0-9.]+)\s+pts")
        .expect("failed to compile regex")
});

/// Matches `pdfinfo` page rotation lines, like `Page    1 rot:  90`.
static PAGE_ROT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Page\s+(\d+)\s+rot:\s+(-?\d+)").expect("failed to compile regex")
});

/// Loads PDFs by writing them to a private temporary directory and asking
/// `pdfinfo` about them.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct PopplerDocumentLoader {}

impl PopplerDocumentLoader {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl DocumentLoader for PopplerDocumentLoader {
    #[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
    async fn load(
        &self,
        bytes: Vec<u8>,
        password: Option<&str>,
    ) -> Result<Box<dyn DocumentHandle>> {
        check_is_pdf(&bytes)?;

        // Poppler wants a real file.
        let tmpdir = tempfile::TempDir::with_prefix("document")?;
        let path = tmpdir.path().join("input.pdf");
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write {:?}", path.display()))?;

        let page_count = get_pdf_page_count(&path, password).await?;
        let pages = if page_count > 0 {
            get_pdf_page_geometry(&path, password, page_count).await?
        } else {
            vec![]
        };
        debug!(page_count, "Loaded PDF");

        Ok(Box::new(PopplerDocument {
            tmpdir: Some(tmpdir),
            path,
            password: password.map(str::to_owned),
            pages,
        }))
    }
}

/// A PDF living in a temporary directory.
#[derive(Debug)]
pub struct PopplerDocument {
    /// Holds our copy of the PDF, plus any rendered pages.
    ///
    /// This is released by [`Drop`].
    tmpdir: Option<tempfile::TempDir>,
    /// Our copy of the PDF.
    path: PathBuf,
    /// The password needed to open the PDF, if any.
    password: Option<String>,
    /// Geometry of each page, in order.
    pages: Vec<PageRef>,
}

impl PopplerDocument {
    /// The directory where we may write scratch files.
    fn scratch_dir(&self) -> Result<&Path> {
        self.tmpdir
            .as_ref()
            .map(|tmpdir| tmpdir.path())
            .ok_or_else(|| anyhow!("document scratch directory already released"))
    }
}

impl DocumentHandle for PopplerDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageRef> {
        check_page_index(index, self.pages.len())?;
        Ok(self.pages[index - 1].clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for PopplerDocument {
    fn drop(&mut self) {
        // Delete our temporary directory, if we have one.
        if let Some(tmpdir) = self.tmpdir.take() {
            let tmpdir_path = tmpdir.path().to_owned();
            if let Err(err) = tmpdir.close() {
                error!(
                    directory = ?tmpdir_path.display(),
                    "failed to delete temporary directory: {}",
                    err
                );
            }
        }
    }
}

/// Renders pages of a [`PopplerDocument`] with `pdftocairo`.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct PopplerRasterizer {}

impl PopplerRasterizer {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl PageRasterizer for PopplerRasterizer {
    #[instrument(level = "debug", skip_all, fields(page = page.index, scale = scale.factor()))]
    async fn rasterize(
        &self,
        document: &dyn DocumentHandle,
        page: &PageRef,
        scale: RenderScale,
    ) -> Result<PageImage> {
        let document = document
            .as_any()
            .downcast_ref::<PopplerDocument>()
            .ok_or_else(|| anyhow!("PopplerRasterizer can only render Poppler documents"))?;
        check_page_index(page.index, document.page_count())?;
        let (width, height) = scale.pixel_size(page);

        // `-singlefile` stops pdftocairo from adding a page number to the name.
        let out_base = document
            .scratch_dir()?
            .join(format!("page-{:05}", page.index));
        let out_path = out_base.with_extension("png");
        let mut cmd = Command::new("pdftocairo");
        cmd.kill_on_drop(true)
            .arg("-png")
            .arg("-singlefile")
            .arg("-f")
            .arg(page.index.to_string())
            .arg("-l")
            .arg(page.index.to_string())
            .arg("-scale-to-x")
            .arg(width.to_string())
            .arg("-scale-to-y")
            .arg(height.to_string());
        add_password_args(&mut cmd, document.password.as_deref());
        let output = cmd
            .arg(&document.path)
            .arg(&out_base)
            .output()
            .await
            .context("failed to run pdftocairo")?;
        check_for_command_failure("pdftocairo", &output, Some(&is_error_line))?;

        // Read the PNG, and delete it to recover space a bit early.
        let png = tokio::fs::read(&out_path)
            .await
            .with_context(|| format!("failed to read file {:?}", out_path.display()))?;
        tokio::fs::remove_file(&out_path)
            .await
            .with_context(|| format!("failed to delete file {:?}", out_path.display()))?;

        let pixels = spawn_blocking_propagating_panics(move || {
            decode_png_exact(&png, width, height)
        })
        .await?;
        Ok(PageImage {
            page: page.index,
            pixels,
        })
    }
}

/// Decode a PNG, resizing it if the renderer rounded its dimensions
/// differently than we did.
fn decode_png_exact(png: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
    let mut reader = ImageReader::new(Cursor::new(png));
    reader.set_format(ImageFormat::Png);
    let pixels = reader
        .decode()
        .context("failed to decode rendered page")?
        .to_rgba8();
    if pixels.dimensions() == (width, height) {
        Ok(pixels)
    } else {
        debug!(
            rendered = ?pixels.dimensions(),
            expected = ?(width, height),
            "Resizing rendered page"
        );
        Ok(image::imageops::resize(
            &pixels,
            width,
            height,
            FilterType::Triangle,
        ))
    }
}

/// Fail unless `bytes` look like a PDF.
fn check_is_pdf(bytes: &[u8]) -> Result<()> {
    match infer::get(bytes) {
        Some(kind) if kind.mime_type() == PDF_MIME_TYPE => Ok(()),
        Some(kind) => Err(anyhow!(
            "unsupported MIME type {} (supported: PDF)",
            kind.mime_type()
        )),
        None => Err(anyhow!("unknown file type (supported: PDF)")),
    }
}

/// Pass a password to a Poppler tool. We don't know whether we were given the
/// owner or the user password, and Poppler will try both.
fn add_password_args(cmd: &mut Command, password: Option<&str>) {
    if let Some(password) = password {
        cmd.arg("-opw").arg(password).arg("-upw").arg(password);
    }
}

/// Run `pdfinfo` with extra arguments and return its standard output.
async fn run_pdfinfo(path: &Path, password: Option<&str>, args: &[String]) -> Result<String> {
    let mut cmd = Command::new("pdfinfo");
    cmd.kill_on_drop(true).args(args);
    add_password_args(&mut cmd, password);
    let output = cmd
        .arg(path)
        .output()
        .await
        .with_context(|| format!("failed to run pdfinfo on {:?}", path.display()))?;
    check_for_command_failure("pdfinfo", &output, None)?;
    String::from_utf8(output.stdout).context("pdfinfo output was not valid UTF-8")
}

/// Get the number of pages in a PDF file.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
async fn get_pdf_page_count(path: &Path, password: Option<&str>) -> Result<usize> {
    let output = run_pdfinfo(path, password, &[]).await?;
    parse_page_count(&output)
}

/// Get the size of every page in a PDF file.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
async fn get_pdf_page_geometry(
    path: &Path,
    password: Option<&str>,
    page_count: usize,
) -> Result<Vec<PageRef>> {
    let args = [
        "-f".to_owned(),
        "1".to_owned(),
        "-l".to_owned(),
        page_count.to_string(),
    ];
    let output = run_pdfinfo(path, password, &args).await?;
    parse_page_geometry(&output, page_count)
}

/// Parse the `Pages:` property from `pdfinfo` output.
fn parse_page_count(output: &str) -> Result<usize> {
    let mut properties = BTreeMap::new();
    for line in output.lines() {
        let mut parts = line.splitn(2, ':');
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        properties.insert(key.to_string(), value.to_string());
    }

    let page_count_str = properties
        .get("Pages")
        .ok_or_else(|| anyhow!("failed to find page count in pdfinfo output"))?;
    page_count_str
        .parse::<usize>()
        .with_context(|| format!("failed to parse page count {:?}", page_count_str))
}

/// Parse per-page size and rotation lines from `pdfinfo -f 1 -l N` output.
///
/// Pages rotated by 90 or 270 degrees have their width and height swapped,
/// because that's how they are rendered.
fn parse_page_geometry(output: &str, page_count: usize) -> Result<Vec<PageRef>> {
    let mut sizes = BTreeMap::new();
    let mut rotations = BTreeMap::new();
    for line in output.lines() {
        if let Some(caps) = PAGE_SIZE_REGEX.captures(line) {
            let index = caps[1].parse::<usize>()?;
            let width = caps[2].parse::<f64>()?;
            let height = caps[3].parse::<f64>()?;
            sizes.insert(index, (width, height));
        } else if let Some(caps) = PAGE_ROT_REGEX.captures(line) {
            let index = caps[1].parse::<usize>()?;
            let rotation = caps[2].parse::<i32>()?;
            rotations.insert(index, rotation);
        }
    }

    (1..=page_count)
        .map(|index| {
            let &(width, height) = sizes.get(&index).ok_or_else(|| {
                anyhow!("pdfinfo did not report a size for page {}", index)
            })?;
            let rotation = rotations.get(&index).copied().unwrap_or(0);
            let (width_pts, height_pts) = if rotation.rem_euclid(180) == 90 {
                (height, width)
            } else {
                (width, height)
            };
            Ok(PageRef {
                index,
                width_pts,
                height_pts,
            })
        })
        .collect()
}
