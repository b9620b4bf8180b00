//! Lifecycle guard for a [`RecognitionEngine`].

use std::fmt;

use super::RecognitionEngine;
use crate::{document::PageImage, error::EngineLifecycleError, prelude::*};

/// Where an [`EngineHandle`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No model has been loaded yet.
    Uninitialized,
    /// The model is loaded, and no image has been recognized yet.
    Ready,
    /// At least one image has been recognized.
    Processing,
    /// The engine has been destroyed. This is terminal.
    Destroyed,
}

/// Owns a [`RecognitionEngine`] and makes sure it is used in the right order,
/// and destroyed exactly once.
///
/// If a handle is dropped without being destroyed (for example, because the
/// future running a pipeline was dropped), [`Drop`] destroys the engine.
pub struct EngineHandle {
    engine: Box<dyn RecognitionEngine>,
    state: EngineState,
}

impl EngineHandle {
    pub fn new(engine: Box<dyn RecognitionEngine>) -> Self {
        Self {
            engine,
            state: EngineState::Uninitialized,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Load the language model. Only allowed once.
    #[instrument(level = "debug", skip(self))]
    pub async fn load_model(&mut self, model: &str) -> Result<()> {
        match self.state {
            EngineState::Uninitialized => {}
            EngineState::Ready | EngineState::Processing => {
                return Err(EngineLifecycleError::AlreadyLoaded.into());
            }
            EngineState::Destroyed => return Err(EngineLifecycleError::Destroyed.into()),
        }
        self.engine.load_model(model).await?;
        self.state = EngineState::Ready;
        Ok(())
    }

    /// Recognize the text in `image`.
    ///
    /// Fails immediately, without touching the engine, if the model has not
    /// been loaded or the engine has been destroyed.
    pub async fn recognize(&mut self, image: &PageImage) -> Result<String> {
        match self.state {
            EngineState::Ready | EngineState::Processing => {}
            EngineState::Uninitialized => return Err(EngineLifecycleError::NotLoaded.into()),
            EngineState::Destroyed => return Err(EngineLifecycleError::Destroyed.into()),
        }
        self.state = EngineState::Processing;
        self.engine.load_image(image).await?;
        self.engine.get_text().await
    }

    /// Destroy the engine.
    ///
    /// The handle is `Destroyed` afterwards even if the engine reports an
    /// error, so that we never try to destroy it twice.
    #[instrument(level = "debug", skip(self), fields(state = ?self.state))]
    pub fn destroy(&mut self) -> Result<()> {
        if self.state == EngineState::Destroyed {
            return Err(EngineLifecycleError::Destroyed.into());
        }
        self.state = EngineState::Destroyed;
        self.engine.destroy()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == EngineState::Destroyed
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if !self.is_destroyed() {
            debug!(state = ?self.state, "Destroying OCR engine on drop");
            if let Err(err) = self.destroy() {
                error!("failed to destroy OCR engine: {:#}", err);
            }
        }
    }
}
