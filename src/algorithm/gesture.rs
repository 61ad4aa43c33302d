//! Back-and-forth stroke ("petting") detection over sampled pointer motion.
//!
//! Each tick compares the latest pointer position with the previous tick's.
//! A direction reversal close to 180° feeds `scratch_energy`; sustained energy
//! above `threshold` raises `activation_level`, and only a fully raised
//! activation level counts as petting.

use serde::{Deserialize, Serialize};

use crate::models::events::{PetEvent, PointerSample};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PetOptions {
    /// Tick period of the sampling loop.
    pub sample_rate_ms: u64,
    /// Ceiling of the scratch energy.
    pub max: f64,
    /// Energy above which a tick counts as scratching.
    pub threshold: f64,
    /// Scratching ticks needed to confirm petting; also the activation ceiling.
    pub activation: f64,
    /// Energy decay per tick.
    pub neglect: f64,
    /// Lower bound of a reversal's deviation from 180°, in degrees.
    pub angle_min: f64,
    /// Upper bound of a reversal's deviation from 180°, in degrees.
    pub angle_max: f64,
}

impl Default for PetOptions {
    fn default() -> Self {
        Self {
            sample_rate_ms: 100,
            max: 10.0,
            threshold: 2.5,
            activation: 3.0,
            neglect: 0.5,
            angle_min: -20.0,
            angle_max: 20.0,
        }
    }
}

/// Activation decay per tick while the pointer is outside the element.
const ABSENT_ACTIVATION_DECAY: f64 = 0.75;

/// Direction of travel between two samples, bearing-style: `atan2(dx, dy)`.
pub fn travel_angle_degrees(from: PointerSample, to: PointerSample) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    dx.atan2(dy).to_degrees()
}

/// Absolute shortest angular distance between two bearings, in `[0, 180]`.
pub fn angular_distance_degrees(previous: f64, current: f64) -> f64 {
    ((previous - current + 180.0).rem_euclid(360.0) - 180.0).abs()
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    options: PetOptions,
    current: Option<PointerSample>,
    last: Option<PointerSample>,
    last_angle: Option<f64>,
    scratch_energy: f64,
    activation_level: f64,
    is_petting: bool,
}

impl GestureClassifier {
    pub fn new(options: PetOptions) -> Self {
        Self {
            options,
            current: None,
            last: None,
            last_angle: None,
            scratch_energy: 0.0,
            activation_level: 0.0,
            is_petting: false,
        }
    }

    pub fn options(&self) -> &PetOptions {
        &self.options
    }

    /// Latest pointer position inside the tracked element.
    pub fn track(&mut self, sample: PointerSample) {
        self.current = Some(sample);
    }

    /// Pointer left the element.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn scratch_energy(&self) -> f64 {
        self.scratch_energy
    }

    pub fn activation_level(&self) -> f64 {
        self.activation_level
    }

    pub fn is_petting(&self) -> bool {
        self.is_petting
    }

    /// Runs one sampling tick and returns the transition it caused, if any.
    pub fn sample(&mut self) -> Option<PetEvent> {
        let transition = match (self.last, self.current) {
            (Some(last), Some(current)) => self.sample_motion(last, current),
            _ => self.sample_absent(),
        };

        self.last = self.current;
        self.scratch_energy = (self.scratch_energy - self.options.neglect).max(0.0);

        log::trace!(
            "pet tick: energy={:.2} activation={:.2} petting={}",
            self.scratch_energy,
            self.activation_level,
            self.is_petting
        );

        transition
    }

    fn sample_motion(&mut self, last: PointerSample, current: PointerSample) -> Option<PetEvent> {
        let angle = travel_angle_degrees(last, current);
        let mut transition = None;

        if let Some(last_angle) = self.last_angle {
            let distance = angular_distance_degrees(last_angle, angle);
            if distance > self.options.angle_min + 180.0 && distance < self.options.angle_max + 180.0
            {
                self.scratch_energy = (self.scratch_energy + 1.0).min(self.options.max);
            }

            if self.scratch_energy > self.options.threshold {
                self.activation_level = (self.activation_level + 1.0).min(self.options.activation);
            } else {
                self.activation_level = (self.activation_level - 1.0).max(0.0);
            }

            let fully_activated = self.activation_level >= self.options.activation;
            if fully_activated && !self.is_petting {
                transition = Some(self.transition(PetEvent::PettingStart));
            } else if !fully_activated && self.is_petting {
                transition = Some(self.transition(PetEvent::PettingEnd));
            }
        }

        self.last_angle = Some(angle);
        transition
    }

    fn sample_absent(&mut self) -> Option<PetEvent> {
        self.last_angle = None;
        self.activation_level = (self.activation_level - ABSENT_ACTIVATION_DECAY).max(0.0);

        if self.activation_level == 0.0 && self.is_petting {
            return Some(self.transition(PetEvent::PettingEnd));
        }
        None
    }

    fn transition(&mut self, event: PetEvent) -> PetEvent {
        self.is_petting = event == PetEvent::PettingStart;
        log::debug!("pet transition: {event:?}");
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_options() -> PetOptions {
        PetOptions {
            sample_rate_ms: 100,
            max: 10.0,
            threshold: 2.5,
            activation: 3.0,
            neglect: 0.5,
            angle_min: -20.0,
            angle_max: 20.0,
        }
    }

    /// Zig-zag path whose consecutive strokes reverse direction by 170°.
    fn zigzag(len: usize) -> Vec<PointerSample> {
        let (sin, cos) = 85f64.to_radians().sin_cos();
        let mut points = vec![PointerSample::mouse(50.0, 50.0)];
        for idx in 0..len {
            let previous = points[idx];
            // Bearings alternate between +85° and -85°.
            let dx = 20.0 * sin * if idx % 2 == 0 { 1.0 } else { -1.0 };
            let dy = 20.0 * cos;
            points.push(PointerSample::mouse(previous.x + dx, previous.y + dy));
        }
        points
    }

    fn feed(classifier: &mut GestureClassifier, sample: PointerSample) -> Option<PetEvent> {
        classifier.track(sample);
        classifier.sample()
    }

    #[test]
    fn bearing_uses_dx_before_dy() {
        let origin = PointerSample::mouse(0.0, 0.0);
        let angle = travel_angle_degrees(origin, PointerSample::mouse(10.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
        let angle = travel_angle_degrees(origin, PointerSample::mouse(0.0, 10.0));
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn angular_distance_wraps_around() {
        assert!((angular_distance_degrees(170.0, -170.0) - 20.0).abs() < 1e-9);
        assert!((angular_distance_degrees(85.0, -85.0) - 170.0).abs() < 1e-9);
        assert!((angular_distance_degrees(0.0, 180.0) - 180.0).abs() < 1e-9);
        assert!(angular_distance_degrees(42.0, 42.0).abs() < 1e-9);
    }

    #[test]
    fn petting_starts_once_and_ends_after_pointer_leaves() {
        let mut classifier = GestureClassifier::new(scenario_options());
        let path = zigzag(12);

        // Entering the element and the first stroke only prime the state.
        assert_eq!(feed(&mut classifier, path[0]), None);
        assert_eq!(feed(&mut classifier, path[1]), None);

        let mut starts = Vec::new();
        for (reversal, sample) in path[2..].iter().enumerate() {
            if let Some(event) = feed(&mut classifier, *sample) {
                starts.push((reversal + 1, event));
            }
        }
        // Energy nets +0.5 per tick and must stay above 2.5 for three ticks.
        assert_eq!(starts, vec![(7, PetEvent::PettingStart)]);
        assert!(classifier.is_petting());
        assert_eq!(classifier.activation_level(), 3.0);

        classifier.clear();
        let mut absent = Vec::new();
        for tick in 1..=5 {
            absent.push((tick, classifier.sample()));
        }
        assert_eq!(
            absent,
            vec![
                (1, None),
                (2, None),
                (3, None),
                (4, Some(PetEvent::PettingEnd)),
                (5, None),
            ]
        );
        assert!(!classifier.is_petting());
    }

    #[test]
    fn straight_motion_never_pets() {
        let mut classifier = GestureClassifier::new(scenario_options());
        for step in 0..50 {
            let sample = PointerSample::mouse(step as f64 * 3.0, 10.0);
            assert_eq!(feed(&mut classifier, sample), None);
        }
        assert_eq!(classifier.scratch_energy(), 0.0);
        assert_eq!(classifier.activation_level(), 0.0);
    }

    #[test]
    fn counters_stay_within_bounds() {
        let mut classifier = GestureClassifier::new(scenario_options());
        for sample in zigzag(200) {
            feed(&mut classifier, sample);
            assert!(classifier.scratch_energy() >= 0.0);
            assert!(classifier.scratch_energy() <= 10.0);
            assert!(classifier.activation_level() >= 0.0);
            assert!(classifier.activation_level() <= 3.0);
        }
        classifier.clear();
        for _ in 0..100 {
            classifier.sample();
            assert!(classifier.scratch_energy() >= 0.0);
            assert!(classifier.activation_level() >= 0.0);
        }
        assert_eq!(classifier.scratch_energy(), 0.0);
        assert_eq!(classifier.activation_level(), 0.0);
    }

    #[test]
    fn continuous_petting_emits_no_duplicates() {
        let mut classifier = GestureClassifier::new(scenario_options());
        let events: Vec<PetEvent> = zigzag(100)
            .into_iter()
            .filter_map(|sample| feed(&mut classifier, sample))
            .collect();
        assert_eq!(events, vec![PetEvent::PettingStart]);
    }

    #[test]
    fn stopping_in_place_ends_petting() {
        let mut classifier = GestureClassifier::new(scenario_options());
        let path = zigzag(20);
        let last = *path.last().expect("path");
        for sample in path {
            feed(&mut classifier, sample);
        }
        assert!(classifier.is_petting());

        // A pointer resting inside the element yields zero displacement, whose
        // bearing never reverses.
        let mut events = Vec::new();
        for _ in 0..40 {
            if let Some(event) = feed(&mut classifier, last) {
                events.push(event);
            }
        }
        assert_eq!(events, vec![PetEvent::PettingEnd]);
    }

    #[test]
    fn gap_breaks_angle_continuity() {
        let mut classifier = GestureClassifier::new(scenario_options());
        let path = zigzag(3);
        feed(&mut classifier, path[0]);
        feed(&mut classifier, path[1]);
        classifier.clear();
        classifier.sample();
        // Re-entering needs two fresh samples before a reversal can count.
        feed(&mut classifier, path[2]);
        feed(&mut classifier, path[3]);
        assert_eq!(classifier.scratch_energy(), 0.0);
    }
}
