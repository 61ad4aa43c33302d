//! Anchor-relative widget placement and its persisted form.
//!
//! The persisted record keeps exactly one key per axis:
//! `{"left": 12, "top": 40}`, `{"right": 0, "bottom": 96}` and so on.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalSide {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalAnchor {
    pub side: HorizontalSide,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalAnchor {
    pub side: VerticalSide,
    pub offset: f64,
}

/// Absolute top-left position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct XyPosition {
    pub x: f64,
    pub y: f64,
}

impl XyPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("missing x-anchor in anchor position record")]
    MissingHorizontalAnchor,
    #[error("missing y-anchor in anchor position record")]
    MissingVerticalAnchor,
}

/// Offset of an element from the nearer viewport edge on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnchorRecord", into = "AnchorRecord")]
pub struct AnchorPosition {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl AnchorPosition {
    pub fn new(horizontal: HorizontalAnchor, vertical: VerticalAnchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn left_top(left: f64, top: f64) -> Self {
        Self::new(
            HorizontalAnchor {
                side: HorizontalSide::Left,
                offset: left,
            },
            VerticalAnchor {
                side: VerticalSide::Top,
                offset: top,
            },
        )
    }

    /// Encoding used when persisting a position after a drag: each axis is
    /// anchored to the half of the viewport the point falls in.
    pub fn from_xy(position: XyPosition, viewport: Size) -> Self {
        let horizontal = if position.x < viewport.width / 2.0 {
            HorizontalAnchor {
                side: HorizontalSide::Left,
                offset: position.x,
            }
        } else {
            HorizontalAnchor {
                side: HorizontalSide::Right,
                offset: viewport.width - position.x,
            }
        };
        let vertical = if position.y < viewport.height / 2.0 {
            VerticalAnchor {
                side: VerticalSide::Top,
                offset: position.y,
            }
        } else {
            VerticalAnchor {
                side: VerticalSide::Bottom,
                offset: viewport.height - position.y,
            }
        };

        Self::new(horizontal, vertical)
    }

    /// Widget placement used when nothing was persisted yet.
    pub fn default_for(viewport: Size) -> Self {
        Self::left_top(
            (viewport.width / 2.0).round(),
            (viewport.height / 2.0).round(),
        )
    }

    /// Absolute position the record stands for in the given viewport.
    pub fn resolve(&self, viewport: Size) -> XyPosition {
        let x = match self.horizontal.side {
            HorizontalSide::Left => self.horizontal.offset,
            HorizontalSide::Right => viewport.width - self.horizontal.offset,
        };
        let y = match self.vertical.side {
            VerticalSide::Top => self.vertical.offset,
            VerticalSide::Bottom => viewport.height - self.vertical.offset,
        };
        XyPosition { x, y }
    }

    pub fn left(&self) -> Option<f64> {
        (self.horizontal.side == HorizontalSide::Left).then_some(self.horizontal.offset)
    }

    pub fn right(&self) -> Option<f64> {
        (self.horizontal.side == HorizontalSide::Right).then_some(self.horizontal.offset)
    }

    pub fn top(&self) -> Option<f64> {
        (self.vertical.side == VerticalSide::Top).then_some(self.vertical.offset)
    }

    pub fn bottom(&self) -> Option<f64> {
        (self.vertical.side == VerticalSide::Bottom).then_some(self.vertical.offset)
    }
}

/// Wire form of `AnchorPosition`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AnchorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bottom: Option<f64>,
}

impl TryFrom<AnchorRecord> for AnchorPosition {
    type Error = PositionError;

    fn try_from(record: AnchorRecord) -> Result<Self, Self::Error> {
        let horizontal = match (record.left, record.right) {
            (Some(offset), _) => HorizontalAnchor {
                side: HorizontalSide::Left,
                offset,
            },
            (None, Some(offset)) => HorizontalAnchor {
                side: HorizontalSide::Right,
                offset,
            },
            (None, None) => return Err(PositionError::MissingHorizontalAnchor),
        };
        let vertical = match (record.top, record.bottom) {
            (Some(offset), _) => VerticalAnchor {
                side: VerticalSide::Top,
                offset,
            },
            (None, Some(offset)) => VerticalAnchor {
                side: VerticalSide::Bottom,
                offset,
            },
            (None, None) => return Err(PositionError::MissingVerticalAnchor),
        };

        Ok(AnchorPosition::new(horizontal, vertical))
    }
}

impl From<AnchorPosition> for AnchorRecord {
    fn from(position: AnchorPosition) -> Self {
        AnchorRecord {
            left: position.left(),
            right: position.right(),
            top: position.top(),
            bottom: position.bottom(),
        }
    }
}

// ─── Legacy settings ─────────────────────────────────────────────────────────

/// Reads a persisted `widgetPosition` value.
///
/// Accepts the anchor record, and the older record that stored the top-left
/// corner as viewport fractions (`{"x": 0.25, "y": 0.5}`). Anything else is
/// treated as corrupt and dropped so the default position applies.
pub fn migrate_widget_position(value: &Value, viewport: Size) -> Option<AnchorPosition> {
    if value.is_null() {
        return None;
    }

    if let Ok(position) = serde_json::from_value::<AnchorPosition>(value.clone()) {
        return Some(position);
    }

    let has_anchor_key = ["left", "right", "top", "bottom"]
        .iter()
        .any(|key| value.get(key).is_some());
    if !has_anchor_key {
        if let Some(fraction) = xy_from_value(value) {
            return Some(AnchorPosition::from_xy(
                XyPosition::new(fraction.x * viewport.width, fraction.y * viewport.height),
                viewport,
            ));
        }
    }

    log::warn!("corrupt widget position setting detected, resetting: {value}");
    None
}

/// Reads the pre-widget `overlayPosition` value (absolute pixels).
pub fn migrate_overlay_position(value: &Value, viewport: Size) -> Option<AnchorPosition> {
    xy_from_value(value).map(|xy| AnchorPosition::from_xy(xy, viewport))
}

fn xy_from_value(value: &Value) -> Option<XyPosition> {
    let x = value.get("x")?.as_f64()?;
    let y = value.get("y")?.as_f64()?;
    Some(XyPosition { x, y })
}
