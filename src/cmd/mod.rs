//! Command-line entry points.

use crate::{
    config::PipelineConfig,
    document::poppler::{PopplerDocumentLoader, PopplerRasterizer},
    engine::tesseract::TesseractEngine,
    pipeline::PipelineController,
};

pub mod check;
pub mod ocr;

/// Build a controller using Tesseract and Poppler. This starts loading the
/// OCR model immediately.
pub fn local_pipeline(config: PipelineConfig) -> PipelineController {
    PipelineController::new(
        config,
        Box::new(TesseractEngine::new()),
        Box::new(PopplerDocumentLoader::new()),
        Box::new(PopplerRasterizer::new()),
    )
}
