//! The OCR pipeline controller.
//!
//! A [`PipelineController`] owns one OCR engine and processes exactly one
//! document with it:
//!
//! 1. On construction, it starts loading the OCR model in the background.
//! 2. Once the model is loaded, [`PipelineController::run`] reads the document,
//!    then renders and recognizes each page in turn, strictly one at a time.
//! 3. When the last page is done, or as soon as anything fails, the engine is
//!    destroyed.
//!
//! Progress is published through a [`watch`] channel, so a UI can follow
//! along without touching the controller.

use std::{fmt, sync::Arc};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{Instrument as _, info_span};

use crate::{
    byte_loader::{self, SourceFile},
    config::PipelineConfig,
    document::{DocumentHandle, DocumentLoader, PageRasterizer, RenderScale},
    engine::{EngineHandle, RecognitionEngine},
    error::PipelineError,
    prelude::*,
};

/// What the controller is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The OCR model is loading. No document may be processed yet.
    LoadingModel,
    /// The OCR model failed to load. This is terminal.
    ModelLoadFailed,
    /// Waiting for a document.
    Ready,
    /// Reading and parsing the document.
    Loading,
    /// Rendering and recognizing pages.
    ProcessingPages,
    /// The document has been processed. This is terminal.
    Done,
    /// Processing the document failed. This is terminal.
    Failed,
}

/// How far through the document we are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// The 1-based page being processed, or 0 before the first page starts.
    pub current_page: usize,
    /// The number of pages in the document, once known.
    pub total_pages: usize,
    /// Are we currently processing pages?
    pub is_processing: bool,
}

/// Everything a UI needs to display the controller's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineStatus {
    pub phase: Phase,
    pub progress: ProgressState,
}

/// The result of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// The number of pages in the document.
    pub page_count: usize,
    /// The text of every page, concatenated in page order.
    pub text: String,
}

/// Where our engine currently lives.
enum EngineSlot {
    /// A background task is loading the model.
    Loading(JoinHandle<(EngineHandle, Result<()>)>),
    /// The model is loaded and the engine is waiting for pages.
    Ready(EngineHandle),
    /// The model failed to load, and the engine has been destroyed.
    Unusable,
    /// A run has taken the engine.
    Taken,
}

/// Runs one document through the OCR pipeline.
pub struct PipelineController {
    config: PipelineConfig,
    loader: Box<dyn DocumentLoader>,
    rasterizer: Box<dyn PageRasterizer>,
    engine: EngineSlot,
    status: Arc<watch::Sender<PipelineStatus>>,
}

impl PipelineController {
    /// Create a new controller, and start loading `config.model` into
    /// `engine` in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        config: PipelineConfig,
        engine: Box<dyn RecognitionEngine>,
        loader: Box<dyn DocumentLoader>,
        rasterizer: Box<dyn PageRasterizer>,
    ) -> Self {
        let (status, _) = watch::channel(PipelineStatus {
            phase: Phase::LoadingModel,
            progress: ProgressState::default(),
        });
        let status = Arc::new(status);

        let mut handle = EngineHandle::new(engine);
        let model = config.model.clone();
        let task_status = status.clone();
        let span = info_span!("load_model", model = %model);
        let task = tokio::spawn(
            async move {
                let result = handle.load_model(&model).await;
                match &result {
                    Ok(()) => {
                        info!("OCR model loaded");
                        task_status.send_modify(|s| s.phase = Phase::Ready);
                    }
                    Err(err) => {
                        error!("failed to load OCR model: {:#}", err);
                        if let Err(err) = handle.destroy() {
                            error!("failed to destroy OCR engine: {:#}", err);
                        }
                        task_status.send_modify(|s| s.phase = Phase::ModelLoadFailed);
                    }
                }
                (handle, result)
            }
            .instrument(span),
        );

        Self {
            config,
            loader,
            rasterizer,
            engine: EngineSlot::Loading(task),
            status,
        }
    }

    /// Watch our status as it changes.
    pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> PipelineStatus {
        *self.status.borrow()
    }

    pub fn phase(&self) -> Phase {
        self.status.borrow().phase
    }

    pub fn progress(&self) -> ProgressState {
        self.status.borrow().progress
    }

    /// Is the model loaded, and are we waiting for a document?
    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    /// Wait for the OCR model to finish loading.
    ///
    /// If loading fails, this returns [`PipelineError::ModelLoad`] once, and
    /// [`PipelineError::Unusable`] after that.
    pub async fn wait_until_ready(&mut self) -> Result<(), PipelineError> {
        match std::mem::replace(&mut self.engine, EngineSlot::Taken) {
            EngineSlot::Loading(task) => match task.await {
                Ok((handle, Ok(()))) => {
                    self.engine = EngineSlot::Ready(handle);
                    Ok(())
                }
                Ok((_destroyed, Err(source))) => {
                    self.engine = EngineSlot::Unusable;
                    Err(PipelineError::ModelLoad {
                        model: self.config.model.clone(),
                        source,
                    })
                }
                Err(join_err) => {
                    self.engine = EngineSlot::Unusable;
                    self.status
                        .send_modify(|s| s.phase = Phase::ModelLoadFailed);
                    Err(PipelineError::ModelLoad {
                        model: self.config.model.clone(),
                        source: anyhow!(join_err).context("model loading task failed"),
                    })
                }
            },
            EngineSlot::Ready(handle) => {
                self.engine = EngineSlot::Ready(handle);
                Ok(())
            }
            EngineSlot::Unusable => {
                self.engine = EngineSlot::Unusable;
                Err(PipelineError::Unusable)
            }
            EngineSlot::Taken => Err(PipelineError::AlreadyUsed),
        }
    }

    /// OCR `file`, returning the text of all its pages.
    ///
    /// Fails with [`PipelineError::NotReady`] if the model is still loading,
    /// and with [`PipelineError::AlreadyUsed`] if this controller has already
    /// been given a document.
    ///
    /// The engine is destroyed before this returns, except when the file
    /// cannot be read. In that case the engine is never touched during the
    /// run, and is destroyed when the controller is dropped.
    #[instrument(level = "debug", skip_all, fields(file = %file.description()))]
    pub async fn run(&mut self, file: SourceFile) -> Result<RunReport, PipelineError> {
        self.ensure_ready().await?;
        self.status.send_modify(|s| s.phase = Phase::Loading);

        let result = self.run_document(file).await;
        let phase = match &result {
            Ok(report) => {
                info!(page_count = report.page_count, "Finished OCR");
                Phase::Done
            }
            Err(err) => {
                error!(stage = err.stage(), page = ?err.page(), "OCR failed: {:#}", err);
                Phase::Failed
            }
        };
        self.status.send_modify(|s| {
            s.phase = phase;
            s.progress.is_processing = false;
        });
        result
    }

    /// Make sure we can start a run right now, without waiting.
    async fn ensure_ready(&mut self) -> Result<(), PipelineError> {
        if let EngineSlot::Loading(task) = &self.engine
            && !task.is_finished()
        {
            return Err(PipelineError::NotReady);
        }
        // The loading task is finished, so this won't block.
        self.wait_until_ready().await?;
        match self.phase() {
            Phase::Ready => Ok(()),
            _ => Err(PipelineError::AlreadyUsed),
        }
    }

    /// Take the engine for the duration of a run.
    fn take_engine(&mut self) -> Result<EngineHandle, PipelineError> {
        match std::mem::replace(&mut self.engine, EngineSlot::Taken) {
            EngineSlot::Ready(handle) => Ok(handle),
            other => {
                self.engine = other;
                Err(PipelineError::AlreadyUsed)
            }
        }
    }

    /// Destroy the engine after a run that failed before reaching any pages.
    /// Teardown errors are logged, because the run has already failed.
    fn release_engine(&mut self) {
        if let Ok(mut engine) = self.take_engine()
            && let Err(err) = engine.destroy()
        {
            error!(
                "failed to destroy OCR engine after an earlier error: {:#}",
                err
            );
        }
    }

    /// Everything that happens in a run, from reading bytes to destroying
    /// the engine.
    async fn run_document(&mut self, file: SourceFile) -> Result<RunReport, PipelineError> {
        let bytes = byte_loader::load(file).await?;
        let document = match self
            .loader
            .load(bytes, self.config.password.as_deref())
            .await
        {
            Ok(document) => document,
            Err(source) => {
                self.release_engine();
                return Err(PipelineError::Parse(source));
            }
        };
        let page_count = document.page_count();
        info!(page_count, "Loaded document");

        // From here on, the engine must be destroyed no matter what happens.
        // If this future is dropped early, `EngineHandle`'s `Drop` does it.
        let mut engine = self.take_engine()?;
        self.status.send_modify(|s| {
            s.phase = Phase::ProcessingPages;
            s.progress = ProgressState {
                current_page: 0,
                total_pages: page_count,
                is_processing: true,
            };
        });

        let pages_result = self.process_pages(&mut engine, &*document).await;
        let teardown_result = engine.destroy();
        match (pages_result, teardown_result) {
            (Ok(text), Ok(())) => Ok(RunReport { page_count, text }),
            (Ok(_), Err(err)) => Err(PipelineError::Teardown(err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(teardown_err)) => {
                error!(
                    "failed to destroy OCR engine after an earlier error: {:#}",
                    teardown_err
                );
                Err(err)
            }
        }
    }

    /// Render and recognize every page, one at a time, in order.
    async fn process_pages(
        &self,
        engine: &mut EngineHandle,
        document: &dyn DocumentHandle,
    ) -> Result<String, PipelineError> {
        let scale = self.config.render_scale();
        let mut text = String::new();
        for page in 1..=document.page_count() {
            self.status.send_modify(|s| s.progress.current_page = page);
            debug!(page, total = document.page_count(), "Processing page");

            let work = self.process_page(engine, document, page, scale);
            let page_text = match self.config.page_timeout() {
                Some(timeout) => tokio::time::timeout(timeout, work)
                    .await
                    .map_err(|_| PipelineError::PageTimeout { page, timeout })??,
                None => work.await?,
            };
            text.push_str(&page_text);
        }
        Ok(text)
    }

    /// Render and recognize a single page.
    #[instrument(level = "debug", skip(self, engine, document, scale))]
    async fn process_page(
        &self,
        engine: &mut EngineHandle,
        document: &dyn DocumentHandle,
        page: usize,
        scale: RenderScale,
    ) -> Result<String, PipelineError> {
        let page_ref = document
            .page(page)
            .map_err(|source| PipelineError::Render { page, source })?;
        let image = self
            .rasterizer
            .rasterize(document, &page_ref, scale)
            .await
            .map_err(|source| PipelineError::Render { page, source })?;
        trace!(width = image.width(), height = image.height(), "Rendered page");
        engine
            .recognize(&image)
            .await
            .map_err(|source| PipelineError::Recognition { page, source })
    }
}

impl fmt::Debug for PipelineController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineController")
            .field("config", &self.config)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::{
        Call, CallLog, ScriptedEngine, ScriptedLoader, ScriptedRasterizer,
    };

    fn controller(
        engine: ScriptedEngine,
        loader: ScriptedLoader,
        rasterizer: ScriptedRasterizer,
    ) -> PipelineController {
        PipelineController::new(
            PipelineConfig::default(),
            Box::new(engine),
            Box::new(loader),
            Box::new(rasterizer),
        )
    }

    fn pdf() -> SourceFile {
        SourceFile::from_bytes("test.pdf", b"%PDF-1.7".to_vec())
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["A", "B"]),
            ScriptedLoader::with_pages(&log, 2),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let report = controller.run(pdf()).await?;
        assert_eq!(report.text, "AB");
        assert_eq!(report.page_count, 2);
        assert_eq!(controller.phase(), Phase::Done);
        assert_eq!(
            log.calls(),
            vec![
                Call::LoadModel("eng".to_owned()),
                Call::LoadDocument,
                Call::Rasterize(1),
                Call::LoadImage(1),
                Call::GetText(1),
                Call::Rasterize(2),
                Call::LoadImage(2),
                Call::GetText(2),
                Call::Destroy,
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn progress_visits_every_page_once_in_order() -> Result<()> {
        let log = CallLog::default();
        let rasterizer = ScriptedRasterizer::new(&log);
        let observer = rasterizer.observer();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["a", "b", "c", "d"]),
            ScriptedLoader::with_pages(&log, 4),
            rasterizer,
        );
        observer
            .set(controller.subscribe())
            .map_err(|_| anyhow!("observer already set"))?;
        controller.wait_until_ready().await?;
        controller.run(pdf()).await?;

        let seen = log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SawProgress(progress) => Some(progress),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(seen.len(), 4);
        for (i, progress) in seen.iter().enumerate() {
            assert_eq!(progress.current_page, i + 1);
            assert_eq!(progress.total_pages, 4);
            assert!(progress.is_processing);
        }

        let progress = controller.progress();
        assert_eq!(progress.current_page, 4);
        assert!(!progress.is_processing);
        Ok(())
    }

    #[tokio::test]
    async fn failure_on_page_two_stops_and_destroys_once() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log)
                .with_pages(["one", "two", "three"])
                .fail_text_on_page(2),
            ScriptedLoader::with_pages(&log, 3),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("page 2 should fail");
        assert!(matches!(err, PipelineError::Recognition { page: 2, .. }));
        assert_eq!(controller.phase(), Phase::Failed);
        assert_eq!(
            log.engine_calls(),
            vec![
                Call::LoadModel("eng".to_owned()),
                Call::LoadImage(1),
                Call::GetText(1),
                Call::LoadImage(2),
                Call::GetText(2),
                Call::Destroy,
            ]
        );
        assert_eq!(log.count(&Call::Rasterize(3)), 0);
        Ok(())
    }

    #[tokio::test]
    async fn render_failure_reports_page_and_destroys_engine() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["one", "two"]),
            ScriptedLoader::with_pages(&log, 2),
            ScriptedRasterizer::new(&log).fail_on_page(1),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("render should fail");
        assert_eq!(err.stage(), "render");
        assert_eq!(err.page(), Some(1));
        assert_eq!(
            log.engine_calls(),
            vec![Call::LoadModel("eng".to_owned()), Call::Destroy]
        );
        Ok(())
    }

    #[tokio::test]
    async fn run_is_rejected_while_model_is_loading() -> Result<()> {
        let log = CallLog::default();
        let (engine, gate) = ScriptedEngine::new(&log).with_pages(["x"]).gated();
        let mut controller = controller(
            engine,
            ScriptedLoader::with_pages(&log, 1),
            ScriptedRasterizer::new(&log),
        );
        assert!(!controller.is_ready());
        let err = controller.run(pdf()).await.expect_err("should not be ready");
        assert!(matches!(err, PipelineError::NotReady));
        assert!(log.calls().is_empty());

        gate.send(()).map_err(|_| anyhow!("gate closed"))?;
        controller.wait_until_ready().await?;
        assert!(controller.is_ready());
        assert_eq!(controller.run(pdf()).await?.text, "x");
        Ok(())
    }

    #[tokio::test]
    async fn zero_page_document_still_destroys_engine() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log),
            ScriptedLoader::with_pages(&log, 0),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let report = controller.run(pdf()).await?;
        assert_eq!(report.text, "");
        assert_eq!(report.page_count, 0);
        assert_eq!(
            log.engine_calls(),
            vec![Call::LoadModel("eng".to_owned()), Call::Destroy]
        );
        Ok(())
    }

    #[tokio::test]
    async fn read_failure_never_touches_engine() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["x"]),
            ScriptedLoader::with_pages(&log, 1),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let err = controller
            .run(SourceFile::from_path("/no/such/file.pdf"))
            .await
            .expect_err("read should fail");
        assert!(matches!(err, PipelineError::Read { .. }));
        assert_eq!(controller.phase(), Phase::Failed);
        assert_eq!(log.calls(), vec![Call::LoadModel("eng".to_owned())]);

        // The engine is still released when the controller goes away.
        drop(controller);
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn parse_failure_releases_engine_without_using_it() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log),
            ScriptedLoader::failing(&log),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("parse should fail");
        assert!(matches!(err, PipelineError::Parse(_)));
        assert_eq!(controller.phase(), Phase::Failed);
        assert_eq!(
            log.engine_calls(),
            vec![Call::LoadModel("eng".to_owned()), Call::Destroy]
        );

        drop(controller);
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn parse_failure_with_failing_teardown_reports_parse_error() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).fail_destroy(),
            ScriptedLoader::failing(&log),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("parse should fail");
        assert!(matches!(err, PipelineError::Parse(_)));
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn second_run_is_rejected() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["x"]),
            ScriptedLoader::with_pages(&log, 1),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        controller.run(pdf()).await?;
        let err = controller.run(pdf()).await.expect_err("second run");
        assert!(matches!(err, PipelineError::AlreadyUsed));
        assert_eq!(log.count(&Call::LoadDocument), 1);
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn run_after_failed_run_is_rejected() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["x"]),
            ScriptedLoader::failing(&log),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        assert!(controller.run(pdf()).await.is_err());
        let err = controller.run(pdf()).await.expect_err("second run");
        assert!(matches!(err, PipelineError::AlreadyUsed));
        Ok(())
    }

    #[tokio::test]
    async fn model_load_failure_makes_controller_unusable() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).fail_load_model(),
            ScriptedLoader::with_pages(&log, 1),
            ScriptedRasterizer::new(&log),
        );
        let err = controller
            .wait_until_ready()
            .await
            .expect_err("model should fail");
        assert!(matches!(err, PipelineError::ModelLoad { .. }));
        assert_eq!(controller.phase(), Phase::ModelLoadFailed);
        assert!(!controller.is_ready());

        assert!(matches!(
            controller.wait_until_ready().await,
            Err(PipelineError::Unusable)
        ));
        assert!(matches!(
            controller.run(pdf()).await,
            Err(PipelineError::Unusable)
        ));
        assert_eq!(log.count(&Call::LoadDocument), 0);
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn teardown_failure_after_success_is_reported() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log).with_pages(["x"]).fail_destroy(),
            ScriptedLoader::with_pages(&log, 1),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("teardown should fail");
        assert!(matches!(err, PipelineError::Teardown(_)));
        Ok(())
    }

    #[tokio::test]
    async fn teardown_failure_does_not_mask_page_error() -> Result<()> {
        let log = CallLog::default();
        let mut controller = controller(
            ScriptedEngine::new(&log)
                .with_pages(["x", "y"])
                .fail_text_on_page(1)
                .fail_destroy(),
            ScriptedLoader::with_pages(&log, 2),
            ScriptedRasterizer::new(&log),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("page 1 should fail");
        assert!(matches!(err, PipelineError::Recognition { page: 1, .. }));
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn hung_page_times_out_and_destroys_engine() -> Result<()> {
        let log = CallLog::default();
        let config = PipelineConfig {
            page_timeout_secs: Some(1),
            ..PipelineConfig::default()
        };
        let mut controller = PipelineController::new(
            config,
            Box::new(ScriptedEngine::new(&log).with_pages(["x", "y"])),
            Box::new(ScriptedLoader::with_pages(&log, 2)),
            Box::new(ScriptedRasterizer::new(&log).hang_on_page(2)),
        );
        controller.wait_until_ready().await?;
        let err = controller.run(pdf()).await.expect_err("page 2 should hang");
        match err {
            PipelineError::PageTimeout { page, timeout } => {
                assert_eq!(page, 2);
                assert_eq!(timeout, Duration::from_secs(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(log.count(&Call::Destroy), 1);
        Ok(())
    }

    #[tokio::test]
    async fn rasterizer_receives_configured_scale() -> Result<()> {
        let log = CallLog::default();
        let config = PipelineConfig {
            scale: 2.0,
            device_pixel_ratio: 1.5,
            ..PipelineConfig::default()
        };
        let rasterizer = ScriptedRasterizer::new(&log);
        let sizes = rasterizer.sizes();
        let mut controller = PipelineController::new(
            config,
            Box::new(ScriptedEngine::new(&log).with_pages(["x"])),
            Box::new(ScriptedLoader::with_pages(&log, 1)),
            Box::new(rasterizer),
        );
        controller.wait_until_ready().await?;
        controller.run(pdf()).await?;
        // Scripted pages are 8 x 6 points.
        assert_eq!(*sizes.lock().expect("lock poisoned"), vec![(24, 18)]);
        Ok(())
    }
}
