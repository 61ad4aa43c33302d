//! Pointer input and widget event schema.
//!
//! `InputEvent` is the raw stream a host feeds into the widget components.
//! Mouse and touch input share one normalized `PointerSample`.

use serde::{Deserialize, Serialize};

/// Opaque handle of an element owned by the host surface.
pub type ElementId = u32;

/// Identifier of a single touch contact.
pub type TouchId = i64;

/// Normalized pointer position in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Set when the sample comes from a touch contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touch_id: Option<TouchId>,
}

impl PointerSample {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            touch_id: None,
        }
    }

    pub fn touch(id: TouchId, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            touch_id: Some(id),
        }
    }
}

/// One entry of a touch event's changed-touches list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub id: TouchId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseEventKind {
    Down,
    Move,
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchEventKind {
    Start,
    Move,
    End,
    Cancel,
}

/// Raw input event as dispatched by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    Mouse {
        kind: MouseEventKind,
        /// Element the event was dispatched at.
        target: ElementId,
        x: f64,
        y: f64,
    },
    Touch {
        kind: TouchEventKind,
        target: ElementId,
        #[serde(rename = "changedTouches", alias = "changed_touches")]
        changed_touches: Vec<TouchPoint>,
    },
}

impl InputEvent {
    pub fn target(&self) -> ElementId {
        match self {
            InputEvent::Mouse { target, .. } => *target,
            InputEvent::Touch { target, .. } => *target,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(
            self,
            InputEvent::Mouse {
                kind: MouseEventKind::Down,
                ..
            } | InputEvent::Touch {
                kind: TouchEventKind::Start,
                ..
            }
        )
    }

    pub fn is_move(&self) -> bool {
        matches!(
            self,
            InputEvent::Mouse {
                kind: MouseEventKind::Move,
                ..
            } | InputEvent::Touch {
                kind: TouchEventKind::Move,
                ..
            }
        )
    }

    pub fn is_release(&self) -> bool {
        matches!(
            self,
            InputEvent::Mouse {
                kind: MouseEventKind::Up,
                ..
            } | InputEvent::Touch {
                kind: TouchEventKind::End | TouchEventKind::Cancel,
                ..
            }
        )
    }

    /// Pointer sample for this event.
    ///
    /// For touch events the sample is taken from the changed touch with id
    /// `tracked`, or from the first changed touch when nothing is tracked yet.
    pub fn sample(&self, tracked: Option<TouchId>) -> Option<PointerSample> {
        match self {
            InputEvent::Mouse { x, y, .. } => Some(PointerSample::mouse(*x, *y)),
            InputEvent::Touch {
                changed_touches, ..
            } => {
                let touch = match tracked {
                    Some(id) => changed_touches.iter().find(|touch| touch.id == id),
                    None => changed_touches.first(),
                }?;
                Some(PointerSample::touch(touch.id, touch.x, touch.y))
            }
        }
    }

    /// True when the event concerns the tracked contact.
    /// Mouse events and untracked sessions always match.
    pub fn matches_touch(&self, tracked: Option<TouchId>) -> bool {
        match (self, tracked) {
            (
                InputEvent::Touch {
                    changed_touches, ..
                },
                Some(id),
            ) => changed_touches.iter().any(|touch| touch.id == id),
            _ => true,
        }
    }
}

/// Events emitted by the drag engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveEvent {
    MoveStart,
    Moving,
    MoveEnd,
}

/// Events emitted by the gesture classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PetEvent {
    PettingStart,
    PettingEnd,
}

/// Any event a widget component can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetEvent {
    Move(MoveEvent),
    Pet(PetEvent),
}

impl From<MoveEvent> for WidgetEvent {
    fn from(event: MoveEvent) -> Self {
        WidgetEvent::Move(event)
    }
}

impl From<PetEvent> for WidgetEvent {
    fn from(event: PetEvent) -> Self {
        WidgetEvent::Pet(event)
    }
}
