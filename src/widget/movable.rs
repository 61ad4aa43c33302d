//! Drag engine: makes one element follow mouse or touch drags while staying
//! inside the viewport.
//!
//! Press listeners live on the root element while the engine is enabled.
//! Move and release listeners live on the document only for the duration of a
//! drag session.

use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::algorithm::anchoring::{clamp_to_viewport, resolve_anchor, MovableOrigin};
use crate::models::events::{ElementId, InputEvent, MoveEvent, TouchId};
use crate::models::position::{AnchorPosition, XyPosition};
use crate::surface::{ListenerKind, ListenerTarget, Surface};
use crate::widget::emitter::Emitter;

const PRESS_LISTENERS: [ListenerKind; 2] = [ListenerKind::MouseDown, ListenerKind::TouchStart];

const SESSION_LISTENERS: [ListenerKind; 4] = [
    ListenerKind::MouseMove,
    ListenerKind::TouchMove,
    ListenerKind::MouseUp,
    ListenerKind::TouchEnd,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovableOptions {
    #[serde(default)]
    pub origin: MovableOrigin,
    /// When non-empty, a press must land inside one of these elements.
    #[serde(default)]
    pub handler_elements: Vec<ElementId>,
}

/// Partial update for `Movable::apply_options`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovableOptionsPatch {
    pub origin: Option<MovableOrigin>,
    pub handler_elements: Option<Vec<ElementId>>,
}

/// What the host should do with an input event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Default action prevented and propagation stopped.
    Stop,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    /// Pointer position relative to the element's top-left corner at press.
    grab_offset: XyPosition,
    touch_id: Option<TouchId>,
}

pub struct Movable {
    element: ElementId,
    options: MovableOptions,
    enabled: bool,
    session: Option<DragSession>,
    events: Emitter<MoveEvent>,
}

impl Movable {
    pub fn new(element: ElementId, options: Option<MovableOptions>) -> Self {
        Self {
            element,
            options: options.unwrap_or_default(),
            enabled: false,
            session: None,
            events: Emitter::new(),
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn options(&self) -> &MovableOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: MovableOptions) {
        self.options = options;
    }

    pub fn apply_options(&mut self, patch: MovableOptionsPatch) {
        if let Some(origin) = patch.origin {
            self.options.origin = origin;
        }
        if let Some(handler_elements) = patch.handler_elements {
            self.options.handler_elements = handler_elements;
        }
    }

    pub fn subscribe(&self) -> Receiver<MoveEvent> {
        self.events.subscribe()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn enable(&mut self, surface: &mut impl Surface) {
        if self.enabled {
            return;
        }
        for kind in PRESS_LISTENERS {
            surface.add_listener(ListenerTarget::Element(self.element), kind);
        }
        self.enabled = true;
    }

    /// Removes every listener and drops an in-progress session.
    pub fn disable(&mut self, surface: &mut impl Surface) {
        if self.session.take().is_some() {
            log::debug!("movable {}: session dropped by disable", self.element);
        }
        for kind in PRESS_LISTENERS {
            surface.remove_listener(ListenerTarget::Element(self.element), kind);
        }
        for kind in SESSION_LISTENERS {
            surface.remove_listener(ListenerTarget::Document, kind);
        }
        self.enabled = false;
    }

    /// Routes one input event the way the registered listeners would see it.
    pub fn handle_input(&mut self, surface: &mut impl Surface, event: &InputEvent) -> Propagation {
        if event.is_press() {
            if self.enabled && surface.contains(self.element, event.target()) {
                return self.on_press(surface, event);
            }
        } else if event.is_move() {
            self.on_move(surface, event);
        } else if event.is_release() {
            self.on_release(surface, event);
        }
        Propagation::Continue
    }

    /// Moves the element so its top-left corner lands at `(x, y)`, clamped to
    /// the viewport and anchored per the origin preference.
    pub fn set_position(&mut self, surface: &mut impl Surface, x: f64, y: f64) -> AnchorPosition {
        let viewport = surface.viewport_size();
        let element = surface.bounding_rect(self.element).size();

        let clamped = clamp_to_viewport(XyPosition::new(x, y), element, viewport);
        let anchor = resolve_anchor(clamped, element, viewport, self.options.origin);
        surface.apply_anchor(self.element, &anchor);

        self.events.emit(MoveEvent::Moving);
        anchor
    }

    /// Live top-left corner of the element.
    pub fn position(&self, surface: &impl Surface) -> XyPosition {
        let rect = surface.bounding_rect(self.element);
        XyPosition::new(rect.x, rect.y)
    }

    fn on_press(&mut self, surface: &mut impl Surface, event: &InputEvent) -> Propagation {
        if self.session.is_some() {
            return Propagation::Continue;
        }

        let handlers = &self.options.handler_elements;
        if !handlers.is_empty()
            && !handlers
                .iter()
                .any(|handler| surface.contains(*handler, event.target()))
        {
            return Propagation::Continue;
        }

        let Some(sample) = event.sample(None) else {
            return Propagation::Continue;
        };

        let rect = surface.bounding_rect(self.element);
        self.session = Some(DragSession {
            grab_offset: XyPosition::new(sample.x - rect.x, sample.y - rect.y),
            touch_id: sample.touch_id,
        });
        for kind in SESSION_LISTENERS {
            surface.add_listener(ListenerTarget::Document, kind);
        }

        log::debug!(
            "movable {}: move-start at ({:.1}, {:.1}) touch={:?}",
            self.element,
            sample.x,
            sample.y,
            sample.touch_id
        );
        self.events.emit(MoveEvent::MoveStart);
        Propagation::Stop
    }

    fn on_move(&mut self, surface: &mut impl Surface, event: &InputEvent) {
        let Some(session) = self.session else {
            return;
        };
        if !event.matches_touch(session.touch_id) {
            return;
        }

        if !surface.is_connected(self.element) {
            log::warn!("movable {}: element detached during drag", self.element);
            self.end_session(surface);
            return;
        }

        if let Some(sample) = event.sample(session.touch_id) {
            self.set_position(
                surface,
                sample.x - session.grab_offset.x,
                sample.y - session.grab_offset.y,
            );
        }
    }

    fn on_release(&mut self, surface: &mut impl Surface, event: &InputEvent) {
        let Some(session) = self.session else {
            return;
        };
        if !event.matches_touch(session.touch_id) {
            return;
        }
        self.end_session(surface);
    }

    fn end_session(&mut self, surface: &mut impl Surface) {
        self.session = None;
        for kind in SESSION_LISTENERS {
            surface.remove_listener(ListenerTarget::Document, kind);
        }
        log::debug!("movable {}: move-end", self.element);
        self.events.emit(MoveEvent::MoveEnd);
    }
}
