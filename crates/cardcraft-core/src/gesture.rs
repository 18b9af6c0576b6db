//! Gesture Engine: turns pointer events into manipulation intents.
//!
//! Idle → Panning (one pointer) → Pinching (two pointers) → Resolved → Idle.
//! Intents carry absolute values computed from the gesture-start snapshot, so
//! discarding a session never leaves a partial delta behind.

use crate::config::{EditorConfig, ScaleBounds};
use crate::elements::{ElementId, ElementRef, wrap_rotation};
use crate::handles::Corner;
use crate::input::{PointerEvent, PointerId};
use crate::mapper::{CoordinateMapper, clamp_percent, clamp_position, from_percent, to_percent};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pointers beyond this count are ignored.
pub const MAX_POINTERS: usize = 2;

/// The single thing a gesture session manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureTarget {
    Text(ElementId),
    Graphic(ElementId),
    Logo,
    Photo,
}

impl GestureTarget {
    /// Quantity a pinch on this target changes.
    pub fn pinch_quantity(&self) -> PinchQuantity {
        match self {
            GestureTarget::Text(_) => PinchQuantity::FontSize,
            GestureTarget::Graphic(_) => PinchQuantity::GraphicSize,
            GestureTarget::Logo => PinchQuantity::LogoScale,
            GestureTarget::Photo => PinchQuantity::PhotoZoom,
        }
    }

    pub fn element(&self) -> Option<ElementRef> {
        match *self {
            GestureTarget::Text(id) => Some(ElementRef::text(id)),
            GestureTarget::Graphic(id) => Some(ElementRef::graphic(id)),
            GestureTarget::Logo | GestureTarget::Photo => None,
        }
    }
}

/// A bounded quantity changed by pinch or wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinchQuantity {
    PhotoZoom,
    FontSize,
    GraphicSize,
    LogoScale,
}

impl PinchQuantity {
    pub fn bounds(&self, config: &EditorConfig) -> ScaleBounds {
        match self {
            PinchQuantity::PhotoZoom => config.photo_zoom,
            PinchQuantity::FontSize => config.font_size,
            PinchQuantity::GraphicSize => config.graphic_size,
            PinchQuantity::LogoScale => config.logo_scale,
        }
    }

    pub fn wheel_sensitivity(&self, config: &EditorConfig) -> f64 {
        match self {
            PinchQuantity::PhotoZoom => config.wheel.photo_zoom,
            PinchQuantity::FontSize => config.wheel.font_size,
            PinchQuantity::GraphicSize => config.wheel.graphic_size,
            PinchQuantity::LogoScale => config.wheel.logo_scale,
        }
    }
}

/// What a single-pointer drag does to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureMode {
    Move,
    /// Aspect-preserving resize around the center, started from a corner handle.
    Resize(Corner),
    Rotate,
}

/// State of the target when the gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub target: GestureTarget,
    pub mode: GestureMode,
    /// Position (center for graphics and the logo) in design pixels.
    pub position: Point,
    /// Current value of the target's pinch quantity.
    pub scale: f64,
    /// Degrees.
    pub rotation: f64,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    Idle,
    Panning,
    Pinching,
    Resolved,
}

/// A committed result of pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    /// New absolute position in design pixels (unclamped).
    Move { target: GestureTarget, position: Point },
    /// New value of the pinch quantity (already clamped).
    Scale {
        target: GestureTarget,
        quantity: PinchQuantity,
        value: f64,
    },
    /// New rotation in degrees, in `[0, 360)`.
    Rotate { target: GestureTarget, degrees: f64 },
    /// Released without ever passing the drag threshold.
    Tap { target: GestureTarget },
    /// Released after a committed drag or pinch.
    Finished { target: GestureTarget },
    /// Forced cancellation; everything since the start must be discarded.
    Cancelled { target: GestureTarget },
}

impl GestureIntent {
    pub fn target(&self) -> GestureTarget {
        match *self {
            GestureIntent::Move { target, .. }
            | GestureIntent::Scale { target, .. }
            | GestureIntent::Rotate { target, .. }
            | GestureIntent::Tap { target }
            | GestureIntent::Finished { target }
            | GestureIntent::Cancelled { target } => target,
        }
    }

    /// True for intents that end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GestureIntent::Tap { .. } | GestureIntent::Finished { .. } | GestureIntent::Cancelled { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct PinchBaseline {
    initial_distance: f64,
    baseline: f64,
}

/// Transient state of one interaction, dropped when it resolves.
#[derive(Debug, Clone)]
struct GestureSession {
    snapshot: TargetSnapshot,
    phase: GesturePhase,
    mode: GestureMode,
    /// Latest screen position per active pointer.
    pointers: HashMap<PointerId, Point>,
    primary: PointerId,
    secondary: Option<PointerId>,
    /// Screen position the current pan is measured from.
    origin: Point,
    /// Target position the current pan is applied to.
    item_start: Point,
    has_moved: bool,
    pinched: bool,
    pinch: Option<PinchBaseline>,
    current_position: Point,
    current_scale: f64,
}

impl GestureSession {
    fn new(pointer: PointerId, position: Point, snapshot: TargetSnapshot) -> Self {
        let mut pointers = HashMap::with_capacity(MAX_POINTERS);
        pointers.insert(pointer, position);
        Self {
            snapshot,
            phase: GesturePhase::Panning,
            mode: snapshot.mode,
            pointers,
            primary: pointer,
            secondary: None,
            origin: position,
            item_start: snapshot.position,
            has_moved: false,
            pinched: false,
            pinch: None,
            current_position: snapshot.position,
            current_scale: snapshot.scale,
        }
    }

    fn target(&self) -> GestureTarget {
        self.snapshot.target
    }

    fn press(&mut self, pointer: PointerId, position: Point) {
        if self.pointers.contains_key(&pointer) || self.pointers.len() >= MAX_POINTERS {
            log::trace!("Ignoring extra pointer {pointer}");
            return;
        }
        let Some(&first) = self.pointers.get(&self.primary) else {
            return;
        };
        self.pointers.insert(pointer, position);
        self.secondary = Some(pointer);
        self.phase = GesturePhase::Pinching;
        self.pinched = true;
        self.pinch = Some(PinchBaseline {
            initial_distance: first.distance(position),
            baseline: self.current_scale,
        });
        log::debug!("Gesture on {:?}: panning -> pinching", self.target());
    }

    fn track(
        &mut self,
        pointer: PointerId,
        position: Point,
        mapper: &CoordinateMapper,
        config: &EditorConfig,
    ) -> Option<GestureIntent> {
        let slot = self.pointers.get_mut(&pointer)?;
        *slot = position;
        match self.phase {
            GesturePhase::Panning if pointer == self.primary => self.pan(position, mapper, config),
            GesturePhase::Pinching => self.pinch(config),
            _ => None,
        }
    }

    fn pan(&mut self, position: Point, mapper: &CoordinateMapper, config: &EditorConfig) -> Option<GestureIntent> {
        let delta = position - self.origin;
        if !self.has_moved {
            if delta.x.abs() + delta.y.abs() <= config.drag_threshold {
                return None;
            }
            self.has_moved = true;
            log::debug!("Gesture on {:?} passed drag threshold", self.target());
        }
        let target = self.target();
        match self.mode {
            GestureMode::Move => {
                let next = self.item_start + mapper.delta_to_design(delta);
                self.current_position = resting_position(target, next, mapper.canvas);
                log::trace!("Move {target:?} to ({:.1}, {:.1})", next.x, next.y);
                Some(GestureIntent::Move { target, position: next })
            }
            GestureMode::Resize(_) => {
                let center = self.item_start;
                let start = mapper.to_design(self.origin).distance(center);
                if start < f64::EPSILON {
                    return None;
                }
                let now = mapper.to_design(position).distance(center);
                let quantity = target.pinch_quantity();
                let value = quantity.bounds(config).clamp(self.snapshot.scale * now / start);
                self.current_scale = value;
                Some(GestureIntent::Scale { target, quantity, value })
            }
            GestureMode::Rotate => {
                let v = mapper.to_design(position) - self.item_start;
                if v.hypot() < f64::EPSILON {
                    return None;
                }
                // 0° points up
                let mut degrees = v.y.atan2(v.x).to_degrees() + 90.0;
                let snap = config.rotate_snap_degrees;
                if snap > 0.0 {
                    degrees = (degrees / snap).round() * snap;
                }
                Some(GestureIntent::Rotate {
                    target,
                    degrees: wrap_rotation(degrees),
                })
            }
        }
    }

    fn pinch(&mut self, config: &EditorConfig) -> Option<GestureIntent> {
        let a = *self.pointers.get(&self.primary)?;
        let b = *self.pointers.get(&self.secondary?)?;
        let distance = a.distance(b);
        let target = self.target();
        let quantity = target.pinch_quantity();
        let baseline = self.pinch.as_mut()?;
        if baseline.initial_distance < f64::EPSILON {
            // Both contacts landed on the same spot; measure from here on.
            baseline.initial_distance = distance;
            return None;
        }
        let value = quantity
            .bounds(config)
            .clamp(baseline.baseline * distance / baseline.initial_distance);
        self.current_scale = value;
        log::trace!("Pinch {target:?}: {quantity:?} = {value:.3}");
        Some(GestureIntent::Scale { target, quantity, value })
    }

    fn release(&mut self, pointer: PointerId) {
        if self.pointers.remove(&pointer).is_none() {
            return;
        }
        if pointer == self.primary {
            if let Some(next) = self.secondary.take() {
                self.primary = next;
            }
        } else if self.secondary == Some(pointer) {
            self.secondary = None;
        }
        if self.phase == GesturePhase::Pinching {
            if let Some(&remaining) = self.pointers.get(&self.primary) {
                self.phase = GesturePhase::Panning;
                self.mode = GestureMode::Move;
                self.pinch = None;
                self.origin = remaining;
                self.item_start = self.current_position;
                log::debug!("Gesture on {:?}: pinching -> panning", self.target());
            }
        }
    }
}

/// Where a move to `position` actually leaves the target once clamped.
fn resting_position(target: GestureTarget, position: Point, canvas: Size) -> Point {
    match target {
        GestureTarget::Photo => from_percent(clamp_percent(to_percent(position, canvas)), canvas),
        _ => clamp_position(position, canvas),
    }
}

/// Pointer state machine. Holds at most one session.
#[derive(Debug, Clone, Default)]
pub struct GestureEngine {
    session: Option<GestureSession>,
}

impl GestureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.session.as_ref().map_or(GesturePhase::Idle, |s| s.phase)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<GestureTarget> {
        self.session.as_ref().map(|s| s.target())
    }

    /// Number of pointers the current session tracks.
    pub fn active_pointers(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.pointers.len())
    }

    /// Start a session for a first pointer press on a target.
    ///
    /// Refused while another session is active or when the target is locked.
    pub fn begin(&mut self, pointer: PointerId, position: Point, snapshot: TargetSnapshot) -> bool {
        if let Some(active) = &self.session {
            log::debug!(
                "Ignoring press on {:?}: gesture on {:?} still active",
                snapshot.target,
                active.target()
            );
            return false;
        }
        if snapshot.locked {
            log::debug!("Ignoring press on locked {:?}", snapshot.target);
            return false;
        }
        log::debug!("Gesture on {:?}: idle -> panning ({:?})", snapshot.target, snapshot.mode);
        self.session = Some(GestureSession::new(pointer, position, snapshot));
        true
    }

    /// Feed a pointer event to the active session.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        mapper: &CoordinateMapper,
        config: &EditorConfig,
    ) -> Vec<GestureIntent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match *event {
            PointerEvent::Down { pointer, position } => {
                session.press(pointer, position);
                Vec::new()
            }
            PointerEvent::Move { pointer, position } => {
                session.track(pointer, position, mapper, config).into_iter().collect()
            }
            PointerEvent::Up { pointer, position } => {
                let Some(&last) = session.pointers.get(&pointer) else {
                    return Vec::new();
                };
                let mut intents = Vec::new();
                if last != position {
                    intents.extend(session.track(pointer, position, mapper, config));
                }
                session.release(pointer);
                if session.pointers.is_empty() {
                    session.phase = GesturePhase::Resolved;
                    let target = session.target();
                    let tap = !session.has_moved && !session.pinched;
                    log::debug!("Gesture on {target:?} resolved ({})", if tap { "tap" } else { "drag" });
                    intents.push(if tap {
                        GestureIntent::Tap { target }
                    } else {
                        GestureIntent::Finished { target }
                    });
                    self.session = None;
                }
                intents
            }
            PointerEvent::Cancel { pointer } => {
                if !session.pointers.contains_key(&pointer) {
                    return Vec::new();
                }
                let target = session.target();
                log::debug!("Gesture on {target:?} cancelled");
                self.session = None;
                vec![GestureIntent::Cancelled { target }]
            }
            PointerEvent::Wheel { .. } => Vec::new(),
        }
    }

    /// Drop the session without a terminal intent (e.g. the target vanished).
    pub fn abort(&mut self) -> Option<GestureTarget> {
        let session = self.session.take()?;
        log::debug!("Gesture on {:?} aborted", session.target());
        Some(session.target())
    }
}

/// Stateless wheel step: `clamp(current + delta * sensitivity)`.
pub fn wheel_value(quantity: PinchQuantity, current: f64, delta: f64, config: &EditorConfig) -> f64 {
    quantity
        .bounds(config)
        .clamp(current + delta * quantity.wheel_sensitivity(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(zoom: f64) -> CoordinateMapper {
        CoordinateMapper::new(Point::ZERO, zoom, Size::new(400.0, 260.0))
    }

    fn snapshot(target: GestureTarget, mode: GestureMode, scale: f64) -> TargetSnapshot {
        TargetSnapshot {
            target,
            mode,
            position: Point::new(200.0, 130.0),
            scale,
            rotation: 0.0,
            locked: false,
        }
    }

    fn down(pointer: PointerId, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down { pointer, position: Point::new(x, y) }
    }

    fn mv(pointer: PointerId, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move { pointer, position: Point::new(x, y) }
    }

    fn up(pointer: PointerId, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up { pointer, position: Point::new(x, y) }
    }

    #[test]
    fn test_sub_threshold_release_is_tap() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let text = GestureTarget::Text(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        assert!(engine.begin(1, Point::new(200.0, 130.0), snapshot(text, GestureMode::Move, 24.0)));
        assert!(engine.handle(&mv(1, 201.0, 131.0), &m, &config).is_empty());
        let intents = engine.handle(&up(1, 201.5, 131.0), &m, &config);
        assert_eq!(intents, vec![GestureIntent::Tap { target: text }]);
        assert_eq!(engine.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_drag_past_threshold_moves() {
        let config = EditorConfig::default();
        let m = mapper(2.0);
        let text = GestureTarget::Text(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(100.0, 100.0), snapshot(text, GestureMode::Move, 24.0));
        let intents = engine.handle(&mv(1, 120.0, 110.0), &m, &config);
        assert_eq!(
            intents,
            vec![GestureIntent::Move { target: text, position: Point::new(210.0, 135.0) }]
        );
        let intents = engine.handle(&up(1, 120.0, 110.0), &m, &config);
        assert_eq!(intents.last(), Some(&GestureIntent::Finished { target: text }));
    }

    #[test]
    fn test_scenario_photo_pinch() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(100.0, 100.0), snapshot(GestureTarget::Photo, GestureMode::Move, 1.0));
        engine.handle(&down(2, 200.0, 100.0), &m, &config);
        assert_eq!(engine.phase(), GesturePhase::Pinching);
        let mid = engine.handle(&mv(2, 250.0, 100.0), &m, &config);
        assert_eq!(
            mid,
            vec![GestureIntent::Scale {
                target: GestureTarget::Photo,
                quantity: PinchQuantity::PhotoZoom,
                value: 1.5
            }]
        );
        let last = engine.handle(&mv(2, 300.0, 100.0), &m, &config);
        assert_eq!(
            last,
            vec![GestureIntent::Scale {
                target: GestureTarget::Photo,
                quantity: PinchQuantity::PhotoZoom,
                value: 2.0
            }]
        );
    }

    #[test]
    fn test_pinch_monotonic_until_clamp() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let graphic = GestureTarget::Graphic(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(0.0, 0.0), snapshot(graphic, GestureMode::Move, 60.0));
        engine.handle(&down(2, 100.0, 0.0), &m, &config);

        let mut previous = 60.0;
        for x in (110..=400).step_by(10) {
            let intents = engine.handle(&mv(2, x as f64, 0.0), &m, &config);
            let Some(GestureIntent::Scale { value, .. }) = intents.first() else {
                panic!("expected a scale intent");
            };
            if previous < 200.0 {
                assert!(*value > previous);
            } else {
                assert_eq!(*value, 200.0);
            }
            previous = *value;
        }
        for x in (10..=390).rev().step_by(10) {
            let intents = engine.handle(&mv(2, x as f64, 0.0), &m, &config);
            let Some(GestureIntent::Scale { value, .. }) = intents.first() else {
                panic!("expected a scale intent");
            };
            assert!(*value <= previous);
            if *value > 20.0 && previous > 20.0 && previous < 200.0 {
                assert!(*value < previous);
            }
            previous = *value;
        }
        assert_eq!(previous, 20.0);
    }

    #[test]
    fn test_pinch_then_lift_continues_panning() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let logo = GestureTarget::Logo;
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(0.0, 0.0), snapshot(logo, GestureMode::Move, 1.0));
        engine.handle(&down(2, 100.0, 0.0), &m, &config);
        engine.handle(&mv(2, 150.0, 0.0), &m, &config);
        assert!(engine.handle(&up(1, 0.0, 0.0), &m, &config).is_empty());
        assert_eq!(engine.phase(), GesturePhase::Panning);
        let intents = engine.handle(&mv(2, 160.0, 5.0), &m, &config);
        assert_eq!(
            intents,
            vec![GestureIntent::Move { target: logo, position: Point::new(210.0, 135.0) }]
        );
        let end = engine.handle(&up(2, 160.0, 5.0), &m, &config);
        assert_eq!(end.last(), Some(&GestureIntent::Finished { target: logo }));
    }

    #[test]
    fn test_pinch_lift_resumes_from_clamped_position() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let text = GestureTarget::Text(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(0.0, 0.0), snapshot(text, GestureMode::Move, 24.0));
        // Dragged 300px right: the text rests at the 380px margin, not at 500.
        engine.handle(&mv(1, 300.0, 0.0), &m, &config);
        engine.handle(&down(2, 300.0, 50.0), &m, &config);
        engine.handle(&up(2, 300.0, 50.0), &m, &config);
        assert_eq!(engine.phase(), GesturePhase::Panning);
        let intents = engine.handle(&mv(1, 290.0, 0.0), &m, &config);
        assert_eq!(
            intents,
            vec![GestureIntent::Move { target: text, position: Point::new(370.0, 130.0) }]
        );
    }

    #[test]
    fn test_third_pointer_ignored() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::ZERO, snapshot(GestureTarget::Photo, GestureMode::Move, 1.0));
        engine.handle(&down(2, 100.0, 0.0), &m, &config);
        engine.handle(&down(3, 50.0, 50.0), &m, &config);
        assert_eq!(engine.active_pointers(), 2);
        assert!(engine.handle(&mv(3, 90.0, 90.0), &m, &config).is_empty());
    }

    #[test]
    fn test_cancel_discards_session() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let text = GestureTarget::Text(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        engine.begin(7, Point::ZERO, snapshot(text, GestureMode::Move, 24.0));
        engine.handle(&mv(7, 50.0, 0.0), &m, &config);
        let intents = engine.handle(&PointerEvent::Cancel { pointer: 7 }, &m, &config);
        assert_eq!(intents, vec![GestureIntent::Cancelled { target: text }]);
        assert!(!engine.is_active());
        assert_eq!(engine.active_pointers(), 0);
    }

    #[test]
    fn test_locked_and_busy_refused() {
        let mut engine = GestureEngine::new();
        let graphic = GestureTarget::Graphic(uuid::Uuid::new_v4());
        let mut locked = snapshot(graphic, GestureMode::Move, 60.0);
        locked.locked = true;
        assert!(!engine.begin(1, Point::ZERO, locked));
        assert!(engine.begin(1, Point::ZERO, snapshot(graphic, GestureMode::Move, 60.0)));
        assert!(!engine.begin(2, Point::ZERO, snapshot(GestureTarget::Logo, GestureMode::Move, 1.0)));
        assert_eq!(engine.target(), Some(graphic));
    }

    #[test]
    fn test_rotate_snaps() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let graphic = GestureTarget::Graphic(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(200.0, 75.0), snapshot(graphic, GestureMode::Rotate, 60.0));
        // Directly right of the center: 90 degrees, with a small wobble snapped away.
        let intents = engine.handle(&mv(1, 260.0, 132.0), &m, &config);
        assert_eq!(intents, vec![GestureIntent::Rotate { target: graphic, degrees: 90.0 }]);
    }

    #[test]
    fn test_corner_resize_scales_about_center() {
        let config = EditorConfig::default();
        let m = mapper(1.0);
        let graphic = GestureTarget::Graphic(uuid::Uuid::new_v4());
        let mut engine = GestureEngine::new();
        engine.begin(1, Point::new(230.0, 160.0), snapshot(graphic, GestureMode::Resize(Corner::BottomRight), 60.0));
        let intents = engine.handle(&mv(1, 260.0, 190.0), &m, &config);
        let Some(GestureIntent::Scale { quantity, value, .. }) = intents.first() else {
            panic!("expected a scale intent");
        };
        assert_eq!(*quantity, PinchQuantity::GraphicSize);
        assert!((value - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_value_clamped() {
        let config = EditorConfig::default();
        assert!((wheel_value(PinchQuantity::PhotoZoom, 1.0, 500.0, &config) - 1.5).abs() < 1e-9);
        assert_eq!(wheel_value(PinchQuantity::PhotoZoom, 2.9, 5000.0, &config), 3.0);
        assert_eq!(wheel_value(PinchQuantity::FontSize, 9.0, -1000.0, &config), 8.0);
    }
}
