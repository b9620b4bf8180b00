//! Pipeline configuration.

use std::time::Duration;

use clap::Args;

use crate::document::RenderScale;

/// The language model we load when none is specified.
pub const DEFAULT_MODEL: &str = "eng";

/// The viewport scale used when none is specified. Text rendered at 1.5x is
/// comfortably legible to Tesseract.
pub const DEFAULT_SCALE: f64 = 1.5;

/// Options for constructing a [`PipelineController`](crate::pipeline::PipelineController).
#[derive(Args, Clone, Debug)]
pub struct PipelineConfig {
    /// The OCR language model to load (a Tesseract language code).
    #[clap(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Scale factor applied to each page's size in points before rendering.
    #[clap(long, default_value_t = DEFAULT_SCALE, value_parser = parse_scale)]
    pub scale: f64,

    /// Additional pixel density multiplier, for matching a HiDPI display.
    #[clap(long, default_value_t = 1.0, value_parser = parse_scale)]
    pub device_pixel_ratio: f64,

    /// Give up on a page if rendering and recognition take longer than this
    /// many seconds.
    #[clap(long = "page-timeout", value_name = "SECS")]
    pub page_timeout_secs: Option<u64>,

    /// The password to decrypt the PDF file, if any.
    #[clap(long)]
    pub password: Option<String>,
}

impl PipelineConfig {
    /// The scale at which pages are rendered.
    pub fn render_scale(&self) -> RenderScale {
        RenderScale {
            base: self.scale,
            device_pixel_ratio: self.device_pixel_ratio,
        }
    }

    /// The per-page timeout, if any.
    pub fn page_timeout(&self) -> Option<Duration> {
        self.page_timeout_secs.map(Duration::from_secs)
    }
}

/// Parse a scale factor. Anything but a positive, finite number would give us
/// empty or meaningless page images.
fn parse_scale(s: &str) -> Result<f64, String> {
    let value = s
        .parse::<f64>()
        .map_err(|err| format!("{:?} is not a number: {}", s, err))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("scale must be a positive number, not {}", value))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            scale: DEFAULT_SCALE,
            device_pixel_ratio: 1.0,
            page_timeout_secs: None,
            password: None,
        }
    }
}
