//! In-memory surface: fixed-size elements, anchor styles resolved against the
//! current viewport on every read, and an inspectable listener registry.

use std::collections::{HashMap, HashSet};

use super::{ListenerKind, ListenerTarget, Surface};
use crate::models::events::ElementId;
use crate::models::geometry::{Rect, Size};
use crate::models::position::{AnchorPosition, HorizontalSide, VerticalSide};

#[derive(Debug, Clone)]
struct HeadlessElement {
    parent: Option<ElementId>,
    size: Size,
    /// Style position of a top-level element.
    anchor: AnchorPosition,
    /// Offset from the parent's top-left corner for nested elements.
    local_x: f64,
    local_y: f64,
    connected: bool,
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Size,
    elements: HashMap<ElementId, HeadlessElement>,
    listeners: HashSet<(ListenerTarget, ListenerKind)>,
    next_id: ElementId,
}

impl HeadlessSurface {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            elements: HashMap::new(),
            listeners: HashSet::new(),
            next_id: 1,
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Adds a top-level element with its top-left corner at `rect.x, rect.y`.
    pub fn add_element(&mut self, rect: Rect) -> ElementId {
        self.insert(HeadlessElement {
            parent: None,
            size: rect.size(),
            anchor: AnchorPosition::left_top(rect.x, rect.y),
            local_x: 0.0,
            local_y: 0.0,
            connected: true,
        })
    }

    /// Adds an element nested in `parent`, offset by `local.x, local.y`.
    pub fn add_child(&mut self, parent: ElementId, local: Rect) -> ElementId {
        self.insert(HeadlessElement {
            parent: Some(parent),
            size: local.size(),
            anchor: AnchorPosition::left_top(0.0, 0.0),
            local_x: local.x,
            local_y: local.y,
            connected: true,
        })
    }

    /// Direct style write, bypassing any component.
    pub fn place(&mut self, element: ElementId, left: f64, top: f64) {
        if let Some(entry) = self.elements.get_mut(&element) {
            entry.anchor = AnchorPosition::left_top(left, top);
        }
    }

    /// Detaches the element (and therefore its descendants) from the document.
    pub fn remove_element(&mut self, element: ElementId) {
        if let Some(entry) = self.elements.get_mut(&element) {
            entry.connected = false;
        }
    }

    pub fn anchor(&self, element: ElementId) -> Option<AnchorPosition> {
        self.elements.get(&element).map(|entry| entry.anchor)
    }

    pub fn has_listener(&self, target: ListenerTarget, kind: ListenerKind) -> bool {
        self.listeners.contains(&(target, kind))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn document_listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(target, _)| *target == ListenerTarget::Document)
            .count()
    }

    fn insert(&mut self, element: HeadlessElement) -> ElementId {
        let id = self.next_id;
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }
}

impl Surface for HeadlessSurface {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        let Some(entry) = self.elements.get(&element) else {
            return Rect::default();
        };

        match entry.parent {
            Some(parent) => {
                let parent_rect = self.bounding_rect(parent);
                Rect::new(
                    parent_rect.x + entry.local_x,
                    parent_rect.y + entry.local_y,
                    entry.size.width,
                    entry.size.height,
                )
            }
            None => {
                let x = match entry.anchor.horizontal.side {
                    HorizontalSide::Left => entry.anchor.horizontal.offset,
                    HorizontalSide::Right => {
                        self.viewport.width - entry.anchor.horizontal.offset - entry.size.width
                    }
                };
                let y = match entry.anchor.vertical.side {
                    VerticalSide::Top => entry.anchor.vertical.offset,
                    VerticalSide::Bottom => {
                        self.viewport.height - entry.anchor.vertical.offset - entry.size.height
                    }
                };
                Rect::new(x, y, entry.size.width, entry.size.height)
            }
        }
    }

    fn apply_anchor(&mut self, element: ElementId, anchor: &AnchorPosition) {
        if let Some(entry) = self.elements.get_mut(&element) {
            entry.anchor = *anchor;
        }
    }

    fn contains(&self, ancestor: ElementId, target: ElementId) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|entry| entry.parent);
        }
        false
    }

    fn is_connected(&self, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            match self.elements.get(&id) {
                Some(entry) if entry.connected => current = entry.parent,
                _ => return false,
            }
        }
        true
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: ListenerKind) {
        self.listeners.insert((target, kind));
    }

    fn remove_listener(&mut self, target: ListenerTarget, kind: ListenerKind) {
        self.listeners.remove(&(target, kind));
    }
}
