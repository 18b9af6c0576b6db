//! CardCraft Core Library
//!
//! Platform-agnostic model and interaction logic for the card canvas editor:
//! coordinate mapping, the gesture state machine, element manipulation,
//! selection and the editor session that owns the design.

pub mod config;
pub mod design;
pub mod editor;
pub mod elements;
pub mod error;
pub mod gesture;
pub mod handles;
pub mod history;
pub mod input;
pub mod manipulate;
pub mod mapper;
pub mod properties;
pub mod selection;
pub mod view;

pub use config::{EditorConfig, LockPolicy, ScaleBounds, WheelSensitivity};
pub use design::{Background, CardCategory, CardDesign, CardSide, FrameStyle, Orientation, SideId};
pub use editor::{DecodeRequest, EditorEvent, EditorMessage, EditorSession};
pub use elements::{
    ElementId, ElementKind, ElementRef, GraphicElement, GraphicKind, ImageRef, Logo, PhotoPlacement,
    SerializableColor, ShapeKind, TextElement, TextStyle,
};
pub use error::{CoreError, CoreResult};
pub use gesture::{GestureEngine, GestureIntent, GestureMode, GesturePhase, GestureTarget, PinchQuantity};
pub use handles::{Corner, Handle, HandleKind};
pub use input::{PointerEvent, PointerId};
pub use manipulate::{ManipulationOutcome, apply_intent};
pub use mapper::CoordinateMapper;
pub use properties::PropertyEdit;
pub use selection::{SelectionController, WidgetState};
pub use view::{ImageSlot, SceneView};
