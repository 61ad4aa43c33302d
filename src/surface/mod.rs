//! Host environment the widget components are attached to.

pub mod headless;

use crate::models::events::ElementId;
use crate::models::geometry::{Rect, Size};
use crate::models::position::AnchorPosition;

pub use headless::HeadlessSurface;

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Element(ElementId),
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    MouseDown,
    MouseMove,
    MouseUp,
    MouseLeave,
    TouchStart,
    TouchMove,
    TouchEnd,
}

/// Layout and listener access for the components.
///
/// Listener registration is idempotent per `(target, kind)`: adding an
/// already registered pair or removing a missing one changes nothing.
pub trait Surface {
    fn viewport_size(&self) -> Size;

    /// Live rendered rectangle of the element.
    fn bounding_rect(&self, element: ElementId) -> Rect;

    /// Writes anchored offsets into the element style; the opposite sides
    /// become `auto`.
    fn apply_anchor(&mut self, element: ElementId, anchor: &AnchorPosition);

    /// `target` is `ancestor` itself or one of its descendants.
    fn contains(&self, ancestor: ElementId, target: ElementId) -> bool;

    fn is_connected(&self, element: ElementId) -> bool;

    fn add_listener(&mut self, target: ListenerTarget, kind: ListenerKind);

    fn remove_listener(&mut self, target: ListenerTarget, kind: ListenerKind);
}
