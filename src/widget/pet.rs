//! Petting detector component: tracks the pointer over one element and ticks
//! a `GestureClassifier` on a tokio interval.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::algorithm::gesture::{GestureClassifier, PetOptions};
use crate::models::events::{ElementId, InputEvent, MouseEventKind, PetEvent, PointerSample};
use crate::surface::{ListenerKind, ListenerTarget, Surface};
use crate::widget::emitter::Emitter;

const ELEMENT_LISTENERS: [ListenerKind; 2] = [ListenerKind::MouseMove, ListenerKind::MouseLeave];

#[derive(Debug, Error)]
pub enum PetError {
    #[error("pet sampler requires a running tokio runtime")]
    NoRuntime,
}

struct SamplerState {
    classifier: GestureClassifier,
    /// Cleared by `stop`; a tick that loses the race sees it and emits nothing.
    active: bool,
}

pub struct Pet {
    element: ElementId,
    state: Arc<Mutex<SamplerState>>,
    events: Arc<Emitter<PetEvent>>,
    sampler: Option<JoinHandle<()>>,
}

impl Pet {
    /// Creates a stopped detector; call `start` to begin sampling.
    pub fn new(element: ElementId, options: PetOptions) -> Self {
        Self {
            element,
            state: Arc::new(Mutex::new(SamplerState {
                classifier: GestureClassifier::new(options),
                active: false,
            })),
            events: Arc::new(Emitter::new()),
            sampler: None,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn subscribe(&self) -> Receiver<PetEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn is_petting(&self) -> bool {
        lock(&self.state).classifier.is_petting()
    }

    /// Registers the element listeners and spawns the sampling loop on the
    /// current tokio runtime. Starting a running detector does nothing.
    pub fn start(&mut self, surface: &mut impl Surface) -> Result<(), PetError> {
        if self.sampler.is_some() {
            return Ok(());
        }
        let runtime = Handle::try_current().map_err(|_| PetError::NoRuntime)?;

        let period = {
            let mut state = lock(&self.state);
            state.classifier.clear();
            state.active = true;
            Duration::from_millis(state.classifier.options().sample_rate_ms.max(1))
        };

        for kind in ELEMENT_LISTENERS {
            surface.add_listener(ListenerTarget::Element(self.element), kind);
        }

        let shared = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        let element = self.element;
        self.sampler = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let mut state = lock(&shared);
                if !state.active {
                    break;
                }
                if let Some(event) = state.classifier.sample() {
                    events.emit(event);
                }
            }
            log::debug!("pet {element}: sampler exited");
        }));

        log::debug!("pet {}: sampling every {:?}", self.element, period);
        Ok(())
    }

    /// Stops sampling and removes the element listeners. Safe to repeat.
    pub fn stop(&mut self, surface: &mut impl Surface) {
        lock(&self.state).active = false;
        if let Some(sampler) = self.sampler.take() {
            sampler.abort();
            log::debug!("pet {}: stopped", self.element);
        }
        for kind in ELEMENT_LISTENERS {
            surface.remove_listener(ListenerTarget::Element(self.element), kind);
        }
    }

    /// Feeds pointer input seen by the element listeners.
    pub fn handle_input(&self, surface: &impl Surface, event: &InputEvent) {
        if self.sampler.is_none() {
            return;
        }
        track_pointer(&mut lock(&self.state).classifier, surface, self.element, event);
    }
}

/// Updates the tracked pointer from the element's `mousemove`/`mouseleave`
/// traffic.
pub fn track_pointer(
    classifier: &mut GestureClassifier,
    surface: &impl Surface,
    element: ElementId,
    event: &InputEvent,
) {
    let InputEvent::Mouse { kind, target, x, y } = event else {
        return;
    };

    match kind {
        MouseEventKind::Move if surface.contains(element, *target) => {
            classifier.track(PointerSample::mouse(*x, *y));
        }
        MouseEventKind::Leave if *target == element => classifier.clear(),
        _ => {}
    }
}

impl Drop for Pet {
    fn drop(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.abort();
        }
    }
}

fn lock(state: &Mutex<SamplerState>) -> MutexGuard<'_, SamplerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::{Rect, Size};
    use crate::surface::HeadlessSurface;

    fn setup() -> (HeadlessSurface, ElementId, Pet) {
        let mut surface = HeadlessSurface::new(Size::new(800.0, 600.0));
        let element = surface.add_element(Rect::new(0.0, 0.0, 200.0, 200.0));
        let pet = Pet::new(element, PetOptions::default());
        (surface, element, pet)
    }

    fn mouse(kind: MouseEventKind, target: ElementId, x: f64, y: f64) -> InputEvent {
        InputEvent::Mouse { kind, target, x, y }
    }

    /// Horizontal strokes with a slight downward drift: reversals of ~170°.
    fn stroke_points(count: usize) -> Vec<(f64, f64)> {
        (0..count)
            .map(|idx| {
                let x = if idx % 2 == 0 { 60.0 } else { 140.0 };
                (x, 50.0 + idx as f64 * 3.5)
            })
            .collect()
    }

    #[test]
    fn start_outside_runtime_fails() {
        let (mut surface, _, mut pet) = setup();
        assert!(matches!(pet.start(&mut surface), Err(PetError::NoRuntime)));
        assert!(!pet.is_running());
        assert_eq!(surface.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sampler_reports_petting_and_stops_cleanly() {
        let (mut surface, element, mut pet) = setup();
        let events = pet.subscribe();
        pet.start(&mut surface).expect("start pet");
        pet.start(&mut surface).expect("second start is a no-op");
        assert_eq!(surface.listener_count(), 2);

        // Moves land between ticks so every tick sees exactly one new sample.
        tokio::time::sleep(Duration::from_millis(50)).await;
        for (x, y) in stroke_points(12) {
            pet.handle_input(&surface, &mouse(MouseEventKind::Move, element, x, y));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![PetEvent::PettingStart]);
        assert!(pet.is_petting());

        pet.handle_input(&surface, &mouse(MouseEventKind::Leave, element, 0.0, 0.0));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(events.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![PetEvent::PettingEnd]);

        pet.stop(&mut surface);
        pet.stop(&mut surface);
        assert!(!pet.is_running());
        assert_eq!(surface.listener_count(), 0);

        for (x, y) in stroke_points(20) {
            pet.handle_input(&surface, &mouse(MouseEventKind::Move, element, x, y));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn ignores_moves_outside_the_element() {
        let (mut surface, _, mut pet) = setup();
        let elsewhere = surface.add_element(Rect::new(300.0, 300.0, 50.0, 50.0));
        let events = pet.subscribe();
        pet.start(&mut surface).expect("start pet");

        tokio::time::sleep(Duration::from_millis(50)).await;
        for (x, y) in stroke_points(20) {
            pet.handle_input(&surface, &mouse(MouseEventKind::Move, elsewhere, x, y));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(events.try_recv().is_err());
        assert!(!pet.is_petting());
        pet.stop(&mut surface);
    }
}
