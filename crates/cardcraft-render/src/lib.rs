//! CardCraft Render Library
//!
//! Turns a [`cardcraft_core::SceneView`] into visuals. Two backends share one
//! display-list builder: a retained-mode reconciler that keeps a visual per
//! key and can export to PNG, and an immediate one that rebuilds every time.

pub mod export;
pub mod frame;
pub mod images;
pub mod immediate;
pub mod primitive;
pub mod raster;
mod renderer;
pub mod retained;
pub mod scene;

pub use export::{ExportHandle, ExportImage};
pub use frame::frame_primitives;
pub use images::{DecodeQueue, ImageStore, decode_reference};
pub use immediate::ImmediateRenderer;
pub use primitive::{DisplayList, Layer, Paint, Primitive, StrokeStyle, Visual, VisualKey};
pub use raster::{Rasterizer, encode_png, rasterize};
pub use renderer::{Effect, Reconciler, RenderError, RenderResult};
pub use retained::RetainedRenderer;
pub use scene::{SceneOptions, build_display_list};
