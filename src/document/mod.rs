//! Interfaces for parsing documents and rendering their pages.
//!
//! The pipeline only talks to documents through [`DocumentLoader`],
//! [`DocumentHandle`] and [`PageRasterizer`]. The implementations we ship are
//! in [`poppler`].

use std::any::Any;

use image::RgbaImage;

use crate::prelude::*;

pub mod poppler;

/// The scale at which we render a page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderScale {
    /// Scale applied to the page's size in points to get its viewport.
    pub base: f64,
    /// Pixel density multiplier applied on top of the viewport.
    pub device_pixel_ratio: f64,
}

impl RenderScale {
    /// The combined scale factor.
    pub fn factor(&self) -> f64 {
        self.base * self.device_pixel_ratio
    }

    /// The exact pixel dimensions of `page` when rendered at this scale.
    ///
    /// This is `floor(viewport × device_pixel_ratio)` in each direction.
    /// Degenerate pages still get at least one pixel.
    pub fn pixel_size(&self, page: &PageRef) -> (u32, u32) {
        let to_pixels = |points: f64| {
            let viewport = points * self.base;
            let pixels = (viewport * self.device_pixel_ratio).floor();
            pixels.clamp(1.0, f64::from(u32::MAX)) as u32
        };
        (to_pixels(page.width_pts), to_pixels(page.height_pts))
    }
}

/// A reference to one page of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRef {
    /// The 1-based page number.
    pub index: usize,
    /// Width of the page in points.
    pub width_pts: f64,
    /// Height of the page in points.
    pub height_pts: f64,
}

/// A rendered page, ready for recognition.
#[derive(Debug)]
pub struct PageImage {
    /// The 1-based page number this image was rendered from.
    pub page: usize,
    /// RGBA pixels.
    pub pixels: RgbaImage,
}

impl PageImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Parses raw bytes into a document.
#[async_trait]
pub trait DocumentLoader: Send + Sync + 'static {
    /// Parse `bytes`. `password` unlocks encrypted documents.
    async fn load(
        &self,
        bytes: Vec<u8>,
        password: Option<&str>,
    ) -> Result<Box<dyn DocumentHandle>>;
}

/// A parsed document.
///
/// Dropping the handle releases anything the loader allocated for it.
pub trait DocumentHandle: Send + Sync + 'static {
    /// The number of pages. Stable for the lifetime of the handle.
    fn page_count(&self) -> usize;

    /// Get page `index`, where `1 <= index <= page_count()`.
    fn page(&self, index: usize) -> Result<PageRef>;

    /// Lets a [`PageRasterizer`] recover the concrete document type its
    /// matching [`DocumentLoader`] produced.
    fn as_any(&self) -> &dyn Any;
}

/// Renders pages of a document to pixels.
#[async_trait]
pub trait PageRasterizer: Send + Sync + 'static {
    /// Render `page` of `document`. The result must measure exactly
    /// [`RenderScale::pixel_size`].
    async fn rasterize(
        &self,
        document: &dyn DocumentHandle,
        page: &PageRef,
        scale: RenderScale,
    ) -> Result<PageImage>;
}

/// Check that a page number is in range for a document with `page_count`
/// pages.
pub fn check_page_index(index: usize, page_count: usize) -> Result<()> {
    if index == 0 || index > page_count {
        Err(anyhow!(
            "page {} is out of range (document has {} pages)",
            index,
            page_count
        ))
    } else {
        Ok(())
    }
}
