//! Raster export and the handle a canvas owner gives to its parent.

use crate::raster::encode_png;
use crate::renderer::{RenderError, RenderResult};
use crate::retained::RetainedRenderer;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Result of exporting a side: straight-alpha RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportImage {
    pub rgba_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportImage {
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.rgba_data, self.width, self.height)
    }
}

/// Lets the page trigger an export without owning the renderer.
///
/// The canvas owner creates the handle from its shared renderer and passes
/// it up. The handle does not keep the renderer alive.
#[derive(Debug, Clone)]
pub struct ExportHandle {
    renderer: Weak<RefCell<RetainedRenderer>>,
    scale: f64,
}

impl ExportHandle {
    /// `scale` is the supersampling factor, usually `EditorConfig::export_scale`.
    pub fn new(renderer: &Rc<RefCell<RetainedRenderer>>, scale: f64) -> Self {
        Self {
            renderer: Rc::downgrade(renderer),
            scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_attached(&self) -> bool {
        self.renderer.strong_count() > 0
    }

    /// Export at the handle's scale.
    pub fn export(&self) -> RenderResult<ExportImage> {
        self.export_at(self.scale)
    }

    pub fn export_at(&self, scale: f64) -> RenderResult<ExportImage> {
        let renderer = self.renderer.upgrade().ok_or(RenderError::Detached)?;
        let renderer = renderer.try_borrow().map_err(|_| RenderError::Busy)?;
        renderer.export(scale)
    }

    /// Export and encode as PNG.
    pub fn export_png(&self) -> RenderResult<Vec<u8>> {
        self.export()?.to_png()
    }
}
