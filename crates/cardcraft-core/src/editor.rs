//! Editor session: owns the design and funnels every write through
//! [`EditorSession::update`].

use crate::config::EditorConfig;
use crate::design::{Background, CardDesign, CardSide, Orientation, SideId};
use crate::elements::{
    ElementId, ElementKind, ElementRef, GraphicKind, ImageRef, LOGO_BASE_SIZE, Logo, PhotoPlacement,
};
use crate::error::CoreResult;
use crate::gesture::{GestureEngine, GestureIntent, GestureMode, GesturePhase, GestureTarget, TargetSnapshot, wheel_value};
use crate::handles::{HANDLE_HIT_TOLERANCE, HandleKind, hit_test_handles};
use crate::history::History;
use crate::input::PointerEvent;
use crate::manipulate::{ManipulationOutcome, apply_intent};
use crate::mapper::{CoordinateMapper, clamp_percent, clamp_position};
use crate::properties::{PropertyEdit, apply_property};
use crate::selection::SelectionController;
use crate::view::{ImageSlot, SceneView};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Element hit tolerance in screen pixels.
pub const ELEMENT_HIT_TOLERANCE: f64 = 4.0;

/// One image decode the session is waiting for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub side: SideId,
    pub slot: ImageSlot,
    pub reference: ImageRef,
}

/// Input to the session. User input, property edits and renderer feedback
/// all arrive here.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMessage {
    Pointer(PointerEvent),
    /// Canvas placement on screen changed.
    Viewport { origin: Point, zoom: f64 },
    AddText(String),
    AddGraphic(GraphicKind),
    Delete(ElementId),
    DeleteSelected,
    Duplicate(ElementId),
    BringToFront(ElementId),
    SendToBack(ElementId),
    Select(ElementRef),
    ClearSelection,
    ExitEdit,
    Edit(PropertyEdit),
    SwitchSide(SideId),
    SetOrientation(Orientation),
    ResetSide,
    ResetAll,
    /// The upload collaborator produced a reference for a slot on the active side.
    ImageSelected { slot: ImageSlot, reference: ImageRef },
    ImageDecoded(DecodeRequest),
    ImageDecodeFailed { request: DecodeRequest, reason: String },
    /// Retained renderer finished dragging the logo (design pixels).
    LogoDragEnd { position: Point },
    /// Retained renderer panned or zoomed the photo.
    PhotoTransform { x_pct: f64, y_pct: f64, zoom: f64 },
    Undo,
    Redo,
}

/// Output of the session for renderers and the surrounding page.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SceneChanged,
    SelectionChanged,
    EditModeEntered(ElementId),
    /// Edit mode on this text ended.
    EditCommitted(ElementId),
    DecodeRequested(DecodeRequest),
    /// The active gesture ended early: its target vanished or another
    /// write arrived. What it already moved is kept as one undo step.
    GestureDropped(GestureTarget),
}

impl EditorMessage {
    /// True for messages that write the design outside the gesture engine.
    fn writes_design(&self) -> bool {
        !matches!(
            self,
            EditorMessage::Pointer(_)
                | EditorMessage::Viewport { .. }
                | EditorMessage::Select(_)
                | EditorMessage::ClearSelection
                | EditorMessage::ExitEdit
                | EditorMessage::ImageSelected { .. }
                | EditorMessage::ImageDecodeFailed { .. }
        )
    }
}

pub struct EditorSession {
    config: EditorConfig,
    design: CardDesign,
    active_side: SideId,
    mapper: CoordinateMapper,
    engine: GestureEngine,
    selection: SelectionController,
    history: History,
    /// Design at the start of the active gesture.
    gesture_start: Option<CardDesign>,
    pending: HashMap<(SideId, ImageSlot), ImageRef>,
    /// Pending slots of the active side, for [`SceneView`].
    pending_view: Vec<ImageSlot>,
}

impl EditorSession {
    pub fn new(mut design: CardDesign, config: EditorConfig) -> Self {
        design.normalize(&config);
        let mapper = CoordinateMapper::new(Point::ZERO, 1.0, design.canvas_size());
        Self {
            config,
            design,
            active_side: SideId::Front,
            mapper,
            engine: GestureEngine::new(),
            selection: SelectionController::new(),
            history: History::new(),
            gesture_start: None,
            pending: HashMap::new(),
            pending_view: Vec::new(),
        }
    }

    /// Load a persisted design.
    pub fn load(json: &str, config: EditorConfig) -> CoreResult<Self> {
        let design = CardDesign::from_json(json, &config)?;
        Ok(Self::new(design, config))
    }

    pub fn design(&self) -> &CardDesign {
        &self.design
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn active_side(&self) -> SideId {
        self.active_side
    }

    pub fn side(&self) -> &CardSide {
        self.design.side(self.active_side)
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.engine.phase()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn to_json(&self) -> CoreResult<String> {
        self.design.to_json()
    }

    /// Images the session can still show: the design, its undo/redo
    /// states and decodes in flight. Anything else may be dropped from a
    /// decoded-image cache.
    pub fn live_images(&self) -> HashSet<ImageRef> {
        let mut live: HashSet<ImageRef> = self.design.image_refs().cloned().collect();
        for snapshot in self.history.snapshots() {
            live.extend(snapshot.image_refs().cloned());
        }
        live.extend(self.pending.values().cloned());
        live
    }

    /// What renderers draw.
    pub fn scene_view(&self) -> SceneView<'_> {
        SceneView {
            side_id: self.active_side,
            side: self.side(),
            canvas: self.design.canvas_size(),
            selected: self.selection.selected(),
            editing: self.selection.editing(),
            pending: &self.pending_view,
        }
    }

    /// The single entry point for every change.
    pub fn update(&mut self, message: EditorMessage) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        // A gesture never spans another write, so cancel and undo only ever
        // see its own changes.
        if message.writes_design() {
            if let Some(target) = self.end_gesture() {
                events.push(EditorEvent::GestureDropped(target));
            }
        }
        match message {
            EditorMessage::Pointer(event) => self.pointer(event, &mut events),
            EditorMessage::Viewport { origin, zoom } => {
                self.mapper = CoordinateMapper::new(origin, zoom, self.design.canvas_size());
            }
            EditorMessage::AddText(content) => {
                let mut next = self.side().clone();
                let id = next.add_text(content, self.design.canvas_size());
                self.commit(next, &mut events);
                self.select(ElementRef::text(id), &mut events);
            }
            EditorMessage::AddGraphic(kind) => {
                let mut next = self.side().clone();
                let id = next.add_graphic(kind, self.design.canvas_size());
                self.commit(next, &mut events);
                self.select(ElementRef::graphic(id), &mut events);
            }
            EditorMessage::Delete(id) => self.delete(id, &mut events),
            EditorMessage::DeleteSelected => {
                if let Some(id) = self.selection.selected_id() {
                    self.delete(id, &mut events);
                }
            }
            EditorMessage::Duplicate(id) => {
                let mut next = self.side().clone();
                if let Some(copy) = next.duplicate(id, self.design.canvas_size()) {
                    let kind = next.kind_of(copy);
                    self.commit(next, &mut events);
                    if let Some(kind) = kind {
                        self.select(ElementRef { kind, id: copy }, &mut events);
                    }
                }
            }
            EditorMessage::BringToFront(id) => {
                let mut next = self.side().clone();
                if next.bring_to_front(id) && next != *self.side() {
                    self.commit(next, &mut events);
                }
            }
            EditorMessage::SendToBack(id) => {
                let mut next = self.side().clone();
                if next.send_to_back(id) && next != *self.side() {
                    self.commit(next, &mut events);
                }
            }
            EditorMessage::Select(element) => {
                if self.side().kind_of(element.id) == Some(element.kind) {
                    self.select(element, &mut events);
                }
            }
            EditorMessage::ClearSelection => self.clear_selection(&mut events),
            EditorMessage::ExitEdit => {
                if let Some(id) = self.selection.exit_edit() {
                    events.push(EditorEvent::EditCommitted(id));
                    events.push(EditorEvent::SelectionChanged);
                }
            }
            EditorMessage::Edit(edit) => {
                let canvas = self.design.canvas_size();
                if let Some(next) = apply_property(self.side(), canvas, &edit, &self.config) {
                    self.commit(next, &mut events);
                }
            }
            EditorMessage::SwitchSide(side) => {
                if side != self.active_side {
                    self.clear_selection(&mut events);
                    self.active_side = side;
                    self.refresh_pending_view();
                    log::debug!("Switched to {side:?} side");
                    events.push(EditorEvent::SceneChanged);
                }
            }
            EditorMessage::SetOrientation(orientation) => {
                let before = self.design.clone();
                if self.design.switch_orientation(orientation) {
                    self.history.push(before);
                    self.mapper.canvas = self.design.canvas_size();
                    events.push(EditorEvent::SceneChanged);
                }
            }
            EditorMessage::ResetSide => {
                self.history.push(self.design.clone());
                self.design.reset_side(self.active_side);
                let active = self.active_side;
                self.pending.retain(|(side, _), _| *side != active);
                self.after_reset(&mut events);
            }
            EditorMessage::ResetAll => {
                self.history.push(self.design.clone());
                self.design.reset_all();
                self.pending.clear();
                self.after_reset(&mut events);
            }
            EditorMessage::ImageSelected { slot, reference } => self.request_decode(slot, reference, &mut events),
            EditorMessage::ImageDecoded(request) => self.image_decoded(request, &mut events),
            EditorMessage::ImageDecodeFailed { request, reason } => {
                if self.take_pending(&request) {
                    log::warn!("Image for {:?} on {:?} failed to decode: {reason}", request.slot, request.side);
                    events.push(EditorEvent::SceneChanged);
                }
            }
            EditorMessage::LogoDragEnd { position } => {
                let intent = GestureIntent::Move {
                    target: GestureTarget::Logo,
                    position,
                };
                let canvas = self.design.canvas_size();
                if let ManipulationOutcome::Updated(next) = apply_intent(self.side(), canvas, &intent, &self.config) {
                    self.commit(next, &mut events);
                }
            }
            EditorMessage::PhotoTransform { x_pct, y_pct, zoom } => {
                let mut next = self.side().clone();
                if let Some(photo) = &mut next.photo {
                    photo.set_position_pct(clamp_percent(Point::new(x_pct, y_pct)));
                    photo.zoom = self.config.photo_zoom.clamp(zoom);
                }
                if next != *self.side() {
                    self.commit(next, &mut events);
                }
            }
            EditorMessage::Undo => {
                if let Some(previous) = self.history.undo(&self.design) {
                    self.restore(previous, &mut events);
                }
            }
            EditorMessage::Redo => {
                if let Some(next) = self.history.redo(&self.design) {
                    self.restore(next, &mut events);
                }
            }
        }
        events
    }

    fn pointer(&mut self, event: PointerEvent, events: &mut Vec<EditorEvent>) {
        match event {
            PointerEvent::Down { pointer, position } if !self.engine.is_active() => {
                let point = self.mapper.to_design(position);
                let Some(snapshot) = self.press_target(point) else {
                    self.clear_selection(events);
                    return;
                };
                match snapshot.target.element() {
                    Some(element) => self.select(element, events),
                    None => self.clear_selection(events),
                }
                if self.engine.begin(pointer, position, snapshot) {
                    self.gesture_start = Some(self.design.clone());
                }
            }
            PointerEvent::Wheel { position, delta } => self.wheel(position, delta, events),
            _ => {
                for intent in self.engine.handle(&event, &self.mapper, &self.config) {
                    self.apply_gesture_intent(intent, events);
                }
            }
        }
    }

    /// What a press at a design point grabs: a handle of the selected
    /// graphic, then elements front to back, then the logo, then the photo.
    fn press_target(&self, point: Point) -> Option<TargetSnapshot> {
        let side = self.side();
        let zoom = self.mapper.effective_zoom();
        if let Some(ElementRef {
            kind: ElementKind::Graphic,
            id,
        }) = self.selection.selected()
        {
            let handle = side
                .graphic(id)
                .and_then(|g| hit_test_handles(g, point, HANDLE_HIT_TOLERANCE / zoom));
            if let Some(handle) = handle {
                let mode = match handle {
                    HandleKind::Corner(corner) => GestureMode::Resize(corner),
                    HandleKind::Rotate => GestureMode::Rotate,
                };
                return self.snapshot(GestureTarget::Graphic(id), mode);
            }
        }
        let tolerance = ELEMENT_HIT_TOLERANCE / zoom;
        if let Some(element) = side.element_at(point, tolerance) {
            let target = match element.kind {
                ElementKind::Text => GestureTarget::Text(element.id),
                ElementKind::Graphic => GestureTarget::Graphic(element.id),
            };
            return self.snapshot(target, GestureMode::Move);
        }
        if side.logo.as_ref().is_some_and(|logo| logo.hit_test(point, tolerance)) {
            return self.snapshot(GestureTarget::Logo, GestureMode::Move);
        }
        let canvas = self.design.canvas_size();
        if side.photo.as_ref().is_some_and(|photo| photo.hit_test(point, canvas, tolerance)) {
            return self.snapshot(GestureTarget::Photo, GestureMode::Move);
        }
        None
    }

    fn snapshot(&self, target: GestureTarget, mode: GestureMode) -> Option<TargetSnapshot> {
        let side = self.side();
        let (position, scale, rotation, locked) = match target {
            GestureTarget::Text(id) => {
                let text = side.text(id)?;
                (text.position(), text.style.font_size, 0.0, false)
            }
            GestureTarget::Graphic(id) => {
                let graphic = side.graphic(id)?;
                (graphic.position(), graphic.size(), graphic.rotation, graphic.locked)
            }
            GestureTarget::Logo => {
                let logo = side.logo.as_ref()?;
                (logo.position(), logo.scale, 0.0, false)
            }
            GestureTarget::Photo => {
                let photo = side.photo.as_ref()?;
                (self.mapper.from_percent(photo.position_pct()), photo.zoom, 0.0, false)
            }
        };
        Some(TargetSnapshot {
            target,
            mode,
            position,
            scale,
            rotation,
            locked,
        })
    }

    fn wheel(&mut self, position: Point, delta: Vec2, events: &mut Vec<EditorEvent>) {
        if self.engine.is_active() {
            return;
        }
        let Some(snapshot) = self.press_target(self.mapper.to_design(position)) else {
            return;
        };
        let target = snapshot.target;
        let quantity = target.pinch_quantity();
        // Scrolling up (negative y) grows the target.
        let value = wheel_value(quantity, snapshot.scale, -delta.y, &self.config);
        let intent = GestureIntent::Scale { target, quantity, value };
        let canvas = self.design.canvas_size();
        if let ManipulationOutcome::Updated(next) = apply_intent(self.side(), canvas, &intent, &self.config) {
            self.commit(next, events);
        }
    }

    fn apply_gesture_intent(&mut self, intent: GestureIntent, events: &mut Vec<EditorEvent>) {
        let canvas = self.design.canvas_size();
        match apply_intent(self.side(), canvas, &intent, &self.config) {
            ManipulationOutcome::Updated(next) => {
                *self.design.side_mut(self.active_side) = next;
                events.push(EditorEvent::SceneChanged);
            }
            ManipulationOutcome::EnterEditMode(id) => {
                if let Some(committed) = self.selection.enter_edit(id) {
                    events.push(EditorEvent::EditCommitted(committed));
                }
                events.push(EditorEvent::EditModeEntered(id));
                events.push(EditorEvent::SelectionChanged);
            }
            ManipulationOutcome::Unchanged => {}
            ManipulationOutcome::MissingElement(target) => {
                self.engine.abort();
                self.finish_gesture();
                events.push(EditorEvent::GestureDropped(target));
                return;
            }
        }
        match intent {
            GestureIntent::Tap { .. } | GestureIntent::Finished { .. } => self.finish_gesture(),
            GestureIntent::Cancelled { .. } => self.revert_gesture(events),
            _ => {}
        }
    }

    /// Record one undo entry for the whole gesture, if it changed anything.
    fn finish_gesture(&mut self) {
        if let Some(start) = self.gesture_start.take() {
            if start != self.design {
                self.history.push(start);
            }
        }
    }

    /// Put the active side back to its gesture-start state.
    fn revert_gesture(&mut self, events: &mut Vec<EditorEvent>) {
        let Some(start) = self.gesture_start.take() else {
            return;
        };
        let restored = start.side(self.active_side).clone();
        if restored != *self.side() {
            *self.design.side_mut(self.active_side) = restored;
            events.push(EditorEvent::SceneChanged);
        }
    }

    /// End any gesture, keeping what it already committed.
    fn end_gesture(&mut self) -> Option<GestureTarget> {
        let target = self.engine.abort()?;
        self.finish_gesture();
        Some(target)
    }

    fn commit(&mut self, next: CardSide, events: &mut Vec<EditorEvent>) {
        let before = self.design.clone();
        *self.design.side_mut(self.active_side) = next;
        self.history.push(before);
        events.push(EditorEvent::SceneChanged);
    }

    fn restore(&mut self, design: CardDesign, events: &mut Vec<EditorEvent>) {
        self.design = design;
        self.mapper.canvas = self.design.canvas_size();
        let before = self.selection.clone();
        self.selection.prune(self.design.side(self.active_side));
        if self.selection != before {
            events.push(EditorEvent::SelectionChanged);
        }
        events.push(EditorEvent::SceneChanged);
    }

    fn select(&mut self, element: ElementRef, events: &mut Vec<EditorEvent>) {
        if self.selection.selected() == Some(element) {
            return;
        }
        if let Some(committed) = self.selection.select(element) {
            events.push(EditorEvent::EditCommitted(committed));
        }
        events.push(EditorEvent::SelectionChanged);
    }

    fn clear_selection(&mut self, events: &mut Vec<EditorEvent>) {
        if self.selection.selected().is_none() {
            return;
        }
        if let Some(committed) = self.selection.clear() {
            events.push(EditorEvent::EditCommitted(committed));
        }
        events.push(EditorEvent::SelectionChanged);
    }

    fn delete(&mut self, id: ElementId, events: &mut Vec<EditorEvent>) {
        let mut next = self.side().clone();
        if next.remove(id).is_none() {
            return;
        }
        self.commit(next, events);
        if self.selection.selected_id() == Some(id) {
            self.selection.element_removed(id);
            events.push(EditorEvent::SelectionChanged);
        }
        if self.pending.remove(&(self.active_side, ImageSlot::Graphic(id))).is_some() {
            self.refresh_pending_view();
        }
    }

    fn after_reset(&mut self, events: &mut Vec<EditorEvent>) {
        self.clear_selection(events);
        self.refresh_pending_view();
        events.push(EditorEvent::SceneChanged);
    }

    fn request_decode(&mut self, slot: ImageSlot, reference: ImageRef, events: &mut Vec<EditorEvent>) {
        if let ImageSlot::Graphic(id) = slot {
            let is_image = self
                .side()
                .graphic(id)
                .is_some_and(|g| matches!(g.kind, GraphicKind::Image { .. }));
            if !is_image {
                log::warn!("Ignoring image for {slot:?}: no image graphic with that id");
                return;
            }
        }
        let request = DecodeRequest {
            side: self.active_side,
            slot,
            reference,
        };
        self.pending.insert((request.side, slot), request.reference.clone());
        self.refresh_pending_view();
        events.push(EditorEvent::DecodeRequested(request));
        events.push(EditorEvent::SceneChanged);
    }

    /// Clear a pending slot if `request` is still the one it waits for.
    fn take_pending(&mut self, request: &DecodeRequest) -> bool {
        let key = (request.side, request.slot);
        if self.pending.get(&key) != Some(&request.reference) {
            log::debug!("Ignoring stale decode result for {:?}", request.slot);
            return false;
        }
        self.pending.remove(&key);
        self.refresh_pending_view();
        true
    }

    fn image_decoded(&mut self, request: DecodeRequest, events: &mut Vec<EditorEvent>) {
        if !self.take_pending(&request) {
            return;
        }
        let canvas = self.design.canvas_size();
        let mut next = self.design.side(request.side).clone();
        let reference = request.reference;
        match request.slot {
            ImageSlot::Background => next.background = Background::Custom { image: reference },
            ImageSlot::Logo => match &mut next.logo {
                Some(logo) => logo.source = reference,
                None => {
                    let corner = clamp_position(Point::new(LOGO_BASE_SIZE, LOGO_BASE_SIZE), canvas);
                    next.logo = Some(Logo::new(reference, corner));
                }
            },
            ImageSlot::Photo => match &mut next.photo {
                Some(photo) => photo.source = reference,
                None => next.photo = Some(PhotoPlacement::new(reference)),
            },
            ImageSlot::Graphic(id) => match next.graphic_mut(id).map(|g| &mut g.kind) {
                Some(GraphicKind::Image { source }) => *source = Some(reference),
                _ => {
                    log::warn!("Decoded image for {id} arrived after the graphic was removed");
                    events.push(EditorEvent::SceneChanged);
                    return;
                }
            },
        }
        let before = self.design.clone();
        *self.design.side_mut(request.side) = next;
        self.history.push(before);
        events.push(EditorEvent::SceneChanged);
    }

    fn refresh_pending_view(&mut self) {
        let active = self.active_side;
        self.pending_view = self
            .pending
            .keys()
            .filter(|(side, _)| *side == active)
            .map(|(_, slot)| *slot)
            .collect();
    }
}
