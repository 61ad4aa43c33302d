use serde::{Deserialize, Serialize};

use crate::models::geometry::Size;
use crate::models::position::{
    AnchorPosition, HorizontalAnchor, HorizontalSide, VerticalAnchor, VerticalSide, XyPosition,
};

/// Edge a computed position is anchored to on one axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrigin {
    /// Nearer edge, taking the element size into account.
    #[default]
    Auto,
    /// Left or top.
    Start,
    /// Right or bottom.
    End,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MovableOrigin {
    #[serde(default)]
    pub x: AxisOrigin,
    #[serde(default)]
    pub y: AxisOrigin,
}

/// Keeps the whole element inside the viewport.
///
/// The upper bound is applied first, so a viewport smaller than the element
/// pins it to the start edge.
pub fn clamp_to_viewport(position: XyPosition, element: Size, viewport: Size) -> XyPosition {
    XyPosition {
        x: clamp_axis(position.x, element.width, viewport.width),
        y: clamp_axis(position.y, element.height, viewport.height),
    }
}

fn clamp_axis(value: f64, size: f64, viewport: f64) -> f64 {
    value.min(viewport - size).max(0.0)
}

/// Picks the anchor side per axis for an already clamped position.
pub fn resolve_anchor(
    clamped: XyPosition,
    element: Size,
    viewport: Size,
    origin: MovableOrigin,
) -> AnchorPosition {
    let horizontal = if anchors_to_start(origin.x, clamped.x, element.width, viewport.width) {
        HorizontalAnchor {
            side: HorizontalSide::Left,
            offset: clamped.x,
        }
    } else {
        HorizontalAnchor {
            side: HorizontalSide::Right,
            offset: viewport.width - clamped.x - element.width,
        }
    };
    let vertical = if anchors_to_start(origin.y, clamped.y, element.height, viewport.height) {
        VerticalAnchor {
            side: VerticalSide::Top,
            offset: clamped.y,
        }
    } else {
        VerticalAnchor {
            side: VerticalSide::Bottom,
            offset: viewport.height - clamped.y - element.height,
        }
    };

    AnchorPosition::new(horizontal, vertical)
}

fn anchors_to_start(origin: AxisOrigin, start: f64, size: f64, viewport: f64) -> bool {
    match origin {
        AxisOrigin::Start => true,
        AxisOrigin::End => false,
        AxisOrigin::Auto => start + start + size < viewport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELEMENT: Size = Size {
        width: 80.0,
        height: 80.0,
    };
    const VIEWPORT: Size = Size {
        width: 1000.0,
        height: 800.0,
    };

    fn anchor_for(x: f64, y: f64, origin: MovableOrigin) -> AnchorPosition {
        let clamped = clamp_to_viewport(XyPosition::new(x, y), ELEMENT, VIEWPORT);
        resolve_anchor(clamped, ELEMENT, VIEWPORT, origin)
    }

    #[test]
    fn near_corner_anchors_to_start_edges() {
        let anchor = anchor_for(5.0, 5.0, MovableOrigin::default());
        assert_eq!(anchor, AnchorPosition::left_top(5.0, 5.0));
    }

    #[test]
    fn clamps_before_choosing_end_edge() {
        let anchor = anchor_for(960.0, 5.0, MovableOrigin::default());
        assert_eq!(anchor.right(), Some(0.0));
        assert_eq!(anchor.top(), Some(5.0));
    }

    #[test]
    fn clamp_keeps_element_inside_viewport() {
        for (x, y) in [(-50.0, -1.0), (5000.0, 5000.0), (460.0, 360.0)] {
            let clamped = clamp_to_viewport(XyPosition::new(x, y), ELEMENT, VIEWPORT);
            assert!(clamped.x >= 0.0 && clamped.x + ELEMENT.width <= VIEWPORT.width);
            assert!(clamped.y >= 0.0 && clamped.y + ELEMENT.height <= VIEWPORT.height);
        }
    }

    #[test]
    fn degenerate_viewport_pins_to_start() {
        let clamped = clamp_to_viewport(XyPosition::new(30.0, 30.0), ELEMENT, Size::new(0.0, 50.0));
        assert_eq!(clamped, XyPosition::new(0.0, 0.0));
    }

    #[test]
    fn auto_uses_doubled_start_offset_including_size() {
        // 460 + 460 + 80 == 1000 is not strictly less, so the right edge wins.
        let anchor = anchor_for(460.0, 359.0, MovableOrigin::default());
        assert_eq!(anchor.right(), Some(460.0));
        assert_eq!(anchor.top(), Some(359.0));
    }

    #[test]
    fn explicit_origin_overrides_distance() {
        let origin = MovableOrigin {
            x: AxisOrigin::End,
            y: AxisOrigin::Start,
        };
        let anchor = anchor_for(5.0, 700.0, origin);
        assert_eq!(anchor.right(), Some(915.0));
        assert_eq!(anchor.top(), Some(700.0));
    }

    #[test]
    fn deserializes_origin_with_defaults() {
        let origin: MovableOrigin = serde_json::from_str(r#"{"y":"end"}"#).expect("origin");
        assert_eq!(origin.x, AxisOrigin::Auto);
        assert_eq!(origin.y, AxisOrigin::End);
        assert!(serde_json::from_str::<MovableOrigin>(r#"{"x":"middle"}"#).is_err());
    }
}
