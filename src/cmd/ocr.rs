//! The `ocr` subcommand.

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::{
    async_utils::io::write_output,
    byte_loader::SourceFile,
    config::PipelineConfig,
    pipeline::RunReport,
    prelude::*,
    ui::Ui,
};

use super::local_pipeline;

/// Output formats for recognized text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Just the text.
    #[default]
    Text,
    /// A JSON object with the path, page count and text.
    Json,
}

/// `ocr` command line arguments.
#[derive(Debug, Args)]
pub struct OcrOpts {
    /// The PDF to OCR. Reads standard input if omitted or `-`.
    pub input_path: Option<PathBuf>,

    /// Where to write the text. Writes to standard output if omitted.
    #[clap(short = 'o', long = "out")]
    pub output_path: Option<PathBuf>,

    /// The output format.
    #[clap(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[clap(flatten)]
    pub pipeline: PipelineConfig,
}

/// JSON output record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
struct OcrOutput<'a> {
    /// The input path, or `null` for standard input.
    path: Option<&'a Path>,
    /// The number of pages in the document.
    page_count: usize,
    /// The recognized text of every page, in order.
    text: &'a str,
}

/// Format a finished run for output.
fn format_output(
    format: OutputFormat,
    input_path: Option<&Path>,
    report: &RunReport,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Text => Ok(report.text.clone().into_bytes()),
        OutputFormat::Json => {
            let output = OcrOutput {
                path: input_path.filter(|p| *p != Path::new("-")),
                page_count: report.page_count,
                text: &report.text,
            };
            let mut json =
                serde_json::to_vec(&output).context("failed to serialize output")?;
            json.push(b'\n');
            Ok(json)
        }
    }
}

/// The `ocr` subcommand.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_ocr(ui: &Ui, opts: &OcrOpts) -> Result<()> {
    // Start loading the model right away, while we set up everything else.
    let mut controller = local_pipeline(opts.pipeline.clone());
    let tracker = ui.track_pipeline(controller.subscribe());

    let input_path = opts.input_path.as_deref();
    let file = SourceFile::from_path_or_stdin(input_path);
    let result = async {
        controller.wait_until_ready().await?;
        controller.run(file).await
    }
    .await;

    // Dropping the controller ends the progress tracker.
    drop(controller);
    tracker.await.context("progress tracker failed")?;

    let report = result?;
    let output = format_output(opts.format, input_path, &report)?;
    write_output(opts.output_path.as_deref(), &output).await
}
