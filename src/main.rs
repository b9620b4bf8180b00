use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::{
    EnvFilter, Layer as _, filter::Directive, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt as _,
};

use self::{prelude::*, ui::Ui};

mod async_utils;
mod byte_loader;
mod cmd;
mod config;
mod document;
mod engine;
mod error;
mod pipeline;
mod prelude;
#[cfg(test)]
mod test_support;
mod ui;

/// OCR PDFs into plain text, without sending them anywhere.
#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    after_help = r#"
External Tools:
  - pdfinfo and pdftocairo (from poppler-utils) read and render PDFs.
  - tesseract, with the language data for --model, recognizes text.

Environment Variables:
  - RUST_LOG (optional): Logging filter, like `debug` or `local_ocr=trace`.

  These variables may be set in a standard `.env` file.
"#
)]
struct Opts {
    #[clap(subcommand)]
    subcmd: Cmd,
}

/// The subcommands we support.
#[derive(Debug, Subcommand)]
enum Cmd {
    /// OCR a PDF, printing the text of every page in order.
    Ocr(cmd::ocr::OcrOpts),
    /// Check that the OCR engine and its language model are installed.
    Check(cmd::check::CheckOpts),
}

impl Cmd {
    /// Are we using stdout for output?
    fn using_stdout_for_output(&self) -> bool {
        match self {
            Cmd::Ocr(opts) => opts
                .output_path
                .as_deref()
                .is_none_or(|path| path == Path::new("-")),
            Cmd::Check(_) => false,
        }
    }
}

/// Our entry point, which can return an error. [`anyhow::Result`] will
/// automatically print a nice error message with optional backtrace.
#[tokio::main]
async fn main() -> Result<()> {
    let ui = Ui::init();

    // Initialize tracing.
    let directive =
        Directive::from_str("info").expect("built-in directive should be valid");
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_writer(ui.get_stderr_writer())
        .with_filter(env_filter);

    // We can stack multiple layers here if we need to.
    tracing_subscriber::registry().with(subscriber).init();

    // Call our real `main` function now that logging is set up.
    real_main(ui).await
}

/// Our real entry point.
#[instrument(level = "debug", name = "main", skip_all)]
async fn real_main(ui: Ui) -> Result<()> {
    // Load environment variables from a `.env` file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let opts = Opts::parse();
    debug!("Parsed options: {:?}", opts);

    // Hide the progress bar if we're using stdout for output.
    if opts.subcmd.using_stdout_for_output() {
        ui.hide_progress_bars();
    }

    // Run the appropriate subcommand.
    match &opts.subcmd {
        Cmd::Ocr(ocr_opts) => {
            cmd::ocr::cmd_ocr(&ui, ocr_opts).await?;
        }
        Cmd::Check(check_opts) => {
            cmd::check::cmd_check(&ui, check_opts).await?;
        }
    }
    Ok(())
}
