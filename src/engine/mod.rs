//! OCR engine interface.
//!
//! A [`RecognitionEngine`] is stateful: it loads a model once, then
//! recognizes one image at a time, and must be destroyed when we're done with
//! it. [`EngineHandle`] enforces that lifecycle.

use crate::{document::PageImage, prelude::*};

pub use self::handle::{EngineHandle, EngineState};

mod handle;
pub mod tesseract;

/// Interface to an OCR engine.
///
/// Callers use these methods in a fixed order: [`load_model`] once, then one
/// [`load_image`] / [`get_text`] pair per image, then [`destroy`] once.
///
/// [`load_model`]: RecognitionEngine::load_model
/// [`load_image`]: RecognitionEngine::load_image
/// [`get_text`]: RecognitionEngine::get_text
/// [`destroy`]: RecognitionEngine::destroy
#[async_trait]
pub trait RecognitionEngine: Send + 'static {
    /// Load the language model named `model`.
    async fn load_model(&mut self, model: &str) -> Result<()>;

    /// Make `image` the current image.
    async fn load_image(&mut self, image: &PageImage) -> Result<()>;

    /// Recognize the text in the current image, in reading order.
    async fn get_text(&mut self) -> Result<String>;

    /// Release the model and any background resources.
    fn destroy(&mut self) -> Result<()>;
}
