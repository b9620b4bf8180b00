//! The `check` subcommand.

use clap::Args;

use crate::{
    config::{DEFAULT_MODEL, PipelineConfig},
    prelude::*,
    ui::Ui,
};

use super::local_pipeline;

/// `check` command line arguments.
#[derive(Debug, Args)]
pub struct CheckOpts {
    /// The OCR language model to check for.
    #[clap(long, default_value = DEFAULT_MODEL)]
    pub model: String,
}

/// The `check` subcommand. Makes sure we can load the OCR model, and then
/// shuts the engine down again.
#[instrument(level = "debug", skip_all, fields(model = %opts.model))]
pub async fn cmd_check(ui: &Ui, opts: &CheckOpts) -> Result<()> {
    let config = PipelineConfig {
        model: opts.model.clone(),
        ..PipelineConfig::default()
    };
    let mut controller = local_pipeline(config);
    let tracker = ui.track_pipeline(controller.subscribe());
    let result = controller.wait_until_ready().await;
    drop(controller);
    tracker.await.context("progress tracker failed")?;
    result?;
    info!(model = %opts.model, "OCR model is installed and loads correctly");
    Ok(())
}
