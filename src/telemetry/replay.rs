//! Offline replay of recorded pointer traces.
//!
//! A trace describes the viewport, the widget rectangle, an optional drag
//! handle nested in it, and timestamped input. The replay surface assigns
//! element id `1` to the widget root and `2` to the handle; any other target
//! id counts as a point outside the widget.
//!
//! Classifier ticks run on a virtual clock at every multiple of
//! `sampleRateMs`. A tick due at the same timestamp as an input event runs
//! before the event.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::gesture::GestureClassifier;
use crate::models::config::{load_json, LoadError, WidgetConfig};
use crate::models::events::{InputEvent, WidgetEvent};
use crate::models::geometry::{Rect, Size};
use crate::models::position::AnchorPosition;
use crate::surface::HeadlessSurface;
use crate::widget::movable::{Movable, MovableOptions};
use crate::widget::pet::track_pointer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedInput {
    /// Milliseconds from the start of the trace.
    pub ts: u64,
    pub input: InputEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub viewport: Size,
    /// Widget root rectangle at the start of the trace.
    pub element: Rect,
    /// Drag handle, relative to the widget root. Petting is tracked on the
    /// handle when present, on the root otherwise.
    #[serde(default)]
    pub handle: Option<Rect>,
    /// Persisted position applied before replaying input.
    #[serde(default)]
    pub initial_position: Option<AnchorPosition>,
    /// Keep ticking until this timestamp; defaults to the last event.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub events: Vec<TimedInput>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let trace: Trace = load_json(path)?;
        log::info!(
            "loaded trace: path={} events={}",
            path.display(),
            trace.events.len()
        );
        Ok(trace)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedWidgetEvent {
    pub ts: u64,
    pub event: WidgetEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub events: Vec<TimedWidgetEvent>,
    /// Final widget position in its persisted form.
    pub final_position: AnchorPosition,
}

pub fn replay_trace(trace: &Trace, config: &WidgetConfig) -> ReplayReport {
    let mut surface = HeadlessSurface::new(trace.viewport);
    let root = surface.add_element(trace.element);
    let handle = trace.handle.map(|local| surface.add_child(root, local));

    let mut movable = Movable::new(
        root,
        Some(MovableOptions {
            origin: config.origin,
            handler_elements: handle.into_iter().collect(),
        }),
    );
    let move_events = movable.subscribe();
    movable.enable(&mut surface);

    if let Some(initial) = trace.initial_position {
        let start = initial.resolve(trace.viewport);
        movable.set_position(&mut surface, start.x, start.y);
        move_events.try_iter().for_each(drop);
    }

    let pet_element = handle.unwrap_or(root);
    let mut classifier = GestureClassifier::new(config.pet.clone());
    let mut clock = VirtualClock::new(config.pet.sample_rate_ms);
    let mut report = Vec::new();

    let mut inputs: Vec<&TimedInput> = trace.events.iter().collect();
    inputs.sort_by_key(|input| input.ts);

    for input in &inputs {
        clock.advance(input.ts, &mut classifier, &mut report);

        movable.handle_input(&mut surface, &input.input);
        report.extend(move_events.try_iter().map(|event| TimedWidgetEvent {
            ts: input.ts,
            event: event.into(),
        }));

        track_pointer(&mut classifier, &surface, pet_element, &input.input);
    }

    let last_ts = inputs.last().map(|input| input.ts).unwrap_or(0);
    let end_ts = trace.duration_ms.unwrap_or(last_ts).max(last_ts);
    clock.advance(end_ts, &mut classifier, &mut report);

    movable.disable(&mut surface);
    let final_position = AnchorPosition::from_xy(movable.position(&surface), trace.viewport);
    log::debug!(
        "replay finished: events={} final={:?}",
        report.len(),
        final_position
    );

    ReplayReport {
        events: report,
        final_position,
    }
}

/// Fixed-period tick schedule starting one period after zero.
struct VirtualClock {
    period: u64,
    next_tick: u64,
}

impl VirtualClock {
    fn new(sample_rate_ms: u64) -> Self {
        let period = sample_rate_ms.max(1);
        Self {
            period,
            next_tick: period,
        }
    }

    /// Runs every tick due at or before `until`.
    fn advance(
        &mut self,
        until: u64,
        classifier: &mut GestureClassifier,
        report: &mut Vec<TimedWidgetEvent>,
    ) {
        while self.next_tick <= until {
            if let Some(event) = classifier.sample() {
                report.push(TimedWidgetEvent {
                    ts: self.next_tick,
                    event: event.into(),
                });
            }
            self.next_tick += self.period;
        }
    }
}
