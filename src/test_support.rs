//! Scripted collaborators for testing the pipeline without Poppler or
//! Tesseract.

use std::{
    any::Any,
    sync::{Arc, Mutex, OnceLock},
};

use image::RgbaImage;
use tokio::sync::{oneshot, watch};

use crate::{
    document::{
        DocumentHandle, DocumentLoader, PageImage, PageRasterizer, PageRef, RenderScale,
        check_page_index,
    },
    engine::RecognitionEngine,
    pipeline::{PipelineStatus, ProgressState},
    prelude::*,
};

/// Something one of our fakes was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    LoadDocument,
    Rasterize(usize),
    SawProgress(ProgressState),
    LoadModel(String),
    LoadImage(usize),
    GetText(usize),
    Destroy,
}

/// A shared, ordered record of calls.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().expect("lock poisoned").push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().expect("lock poisoned").clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Calls made to the OCR engine, ignoring documents.
    pub fn engine_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::LoadDocument | Call::Rasterize(_) | Call::SawProgress(_)
                )
            })
            .collect()
    }
}

/// An OCR engine which "recognizes" a fixed string for each page.
pub struct ScriptedEngine {
    log: CallLog,
    pages: Vec<String>,
    current_page: Option<usize>,
    fail_text_on_page: Option<usize>,
    fail_load_model: bool,
    fail_destroy: bool,
    load_gate: Option<oneshot::Receiver<()>>,
}

impl ScriptedEngine {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            pages: vec![],
            current_page: None,
            fail_text_on_page: None,
            fail_load_model: false,
            fail_destroy: false,
            load_gate: None,
        }
    }

    /// The text to return for each page, in order.
    pub fn with_pages<const N: usize>(mut self, pages: [&str; N]) -> Self {
        self.pages = pages.iter().map(|&p| p.to_owned()).collect();
        self
    }

    pub fn fail_text_on_page(mut self, page: usize) -> Self {
        self.fail_text_on_page = Some(page);
        self
    }

    pub fn fail_load_model(mut self) -> Self {
        self.fail_load_model = true;
        self
    }

    pub fn fail_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    /// Don't finish loading the model until the returned sender fires.
    pub fn gated(mut self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.load_gate = Some(rx);
        (self, tx)
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    async fn load_model(&mut self, model: &str) -> Result<()> {
        if let Some(gate) = self.load_gate.take() {
            gate.await.context("load gate dropped")?;
        }
        self.log.push(Call::LoadModel(model.to_owned()));
        if self.fail_load_model {
            Err(anyhow!("no such model: {}", model))
        } else {
            Ok(())
        }
    }

    async fn load_image(&mut self, image: &PageImage) -> Result<()> {
        self.log.push(Call::LoadImage(image.page));
        self.current_page = Some(image.page);
        Ok(())
    }

    async fn get_text(&mut self) -> Result<String> {
        let page = self
            .current_page
            .take()
            .ok_or_else(|| anyhow!("no image loaded"))?;
        self.log.push(Call::GetText(page));
        if self.fail_text_on_page == Some(page) {
            return Err(anyhow!("engine crashed on page {}", page));
        }
        self.pages
            .get(page - 1)
            .cloned()
            .ok_or_else(|| anyhow!("no scripted text for page {}", page))
    }

    fn destroy(&mut self) -> Result<()> {
        self.log.push(Call::Destroy);
        if self.fail_destroy {
            Err(anyhow!("worker refused to exit"))
        } else {
            Ok(())
        }
    }
}

/// A document with `page_count` tiny 8 x 6 point pages.
pub struct ScriptedDocument {
    page_count: usize,
}

impl DocumentHandle for ScriptedDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page(&self, index: usize) -> Result<PageRef> {
        check_page_index(index, self.page_count)?;
        Ok(PageRef {
            index,
            width_pts: 8.0,
            height_pts: 6.0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Loads [`ScriptedDocument`]s, or fails to.
pub struct ScriptedLoader {
    log: CallLog,
    page_count: Option<usize>,
}

impl ScriptedLoader {
    pub fn with_pages(log: &CallLog, page_count: usize) -> Self {
        Self {
            log: log.clone(),
            page_count: Some(page_count),
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            page_count: None,
        }
    }
}

#[async_trait]
impl DocumentLoader for ScriptedLoader {
    async fn load(
        &self,
        _bytes: Vec<u8>,
        _password: Option<&str>,
    ) -> Result<Box<dyn DocumentHandle>> {
        self.log.push(Call::LoadDocument);
        let page_count = self
            .page_count
            .ok_or_else(|| anyhow!("xref table is corrupt"))?;
        Ok(Box::new(ScriptedDocument { page_count }))
    }
}

/// Renders blank images of the right size, or fails or hangs on request.
pub struct ScriptedRasterizer {
    log: CallLog,
    fail_on_page: Option<usize>,
    hang_on_page: Option<usize>,
    observer: Arc<OnceLock<watch::Receiver<PipelineStatus>>>,
    sizes: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl ScriptedRasterizer {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail_on_page: None,
            hang_on_page: None,
            observer: Arc::default(),
            sizes: Arc::default(),
        }
    }

    /// Once set, every render records the progress it observed.
    pub fn observer(&self) -> Arc<OnceLock<watch::Receiver<PipelineStatus>>> {
        self.observer.clone()
    }

    /// The size of every image we rendered.
    pub fn sizes(&self) -> Arc<Mutex<Vec<(u32, u32)>>> {
        self.sizes.clone()
    }

    pub fn fail_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn hang_on_page(mut self, page: usize) -> Self {
        self.hang_on_page = Some(page);
        self
    }
}

#[async_trait]
impl PageRasterizer for ScriptedRasterizer {
    async fn rasterize(
        &self,
        document: &dyn DocumentHandle,
        page: &PageRef,
        scale: RenderScale,
    ) -> Result<PageImage> {
        check_page_index(page.index, document.page_count())?;
        if let Some(observer) = self.observer.get() {
            let progress = observer.borrow().progress;
            self.log.push(Call::SawProgress(progress));
        }
        self.log.push(Call::Rasterize(page.index));
        if self.fail_on_page == Some(page.index) {
            return Err(anyhow!("canvas exploded"));
        }
        if self.hang_on_page == Some(page.index) {
            std::future::pending::<()>().await;
        }
        let (width, height) = scale.pixel_size(page);
        self.sizes
            .lock()
            .expect("lock poisoned")
            .push((width, height));
        Ok(PageImage {
            page: page.index,
            pixels: RgbaImage::new(width, height),
        })
    }
}
