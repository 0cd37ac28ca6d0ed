// SPDX-License-Identifier: Apache-2.0

//! Demo wearable telemetry. Fabricated random-walk packets, seeded per
//! athlete so repeated demo views look like the same device. Every packet is
//! flagged `simulated`; this never represents hardware data.

use chrono::{DateTime, Duration, Utc};
use motus_api::WearableSampleDto;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const HR_FLOOR: f64 = 45.0;
const HR_CEILING: f64 = 190.0;

pub struct WearableSimulator {
    rng: StdRng,
}

impl WearableSimulator {
    /// Stable seed per athlete id: the same athlete replays the same trace.
    #[must_use]
    pub fn seeded_for(athlete_id: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        athlete_id.hash(&mut hasher);
        Self {
            rng: StdRng::seed_from_u64(hasher.finish()),
        }
    }

    /// Generate `count` packets ending at `now`, spaced one second apart.
    pub fn sample_burst(&mut self, count: usize, now: DateTime<Utc>) -> Vec<WearableSampleDto> {
        let mut heart_rate: f64 = self.rng.gen_range(62.0..78.0);
        let mut acceleration: f64 = self.rng.gen_range(0.9..1.2);
        let mut signal_quality: f64 = self.rng.gen_range(0.7..0.95);
        let mut load = 0.0_f64;

        let mut samples = Vec::with_capacity(count);
        for offset in 0..count {
            heart_rate =
                (heart_rate + self.rng.gen_range(-2.5..2.5)).clamp(HR_FLOOR, HR_CEILING);
            acceleration = (acceleration + self.rng.gen_range(-0.3..0.3)).clamp(0.0, 6.0);
            signal_quality = (signal_quality + self.rng.gen_range(-0.05..0.05)).clamp(0.0, 1.0);
            load += acceleration * self.rng.gen_range(0.5..1.5);

            let captured_at = now - Duration::seconds((count - 1 - offset) as i64);
            samples.push(WearableSampleDto {
                captured_at,
                heart_rate_bpm: (heart_rate * 10.0).round() / 10.0,
                acceleration_g: (acceleration * 100.0).round() / 100.0,
                load_au: (load * 10.0).round() / 10.0,
                signal_quality: (signal_quality * 100.0).round() / 100.0,
                trust_grade: trust_grade(signal_quality).to_string(),
                simulated: true,
            });
        }
        samples
    }
}

/// UI confidence label derived from simulated signal quality.
#[must_use]
pub fn trust_grade(signal_quality: f64) -> &'static str {
    if signal_quality >= 0.8 {
        "A"
    } else if signal_quality >= 0.5 {
        "B"
    } else {
        "C"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_are_deterministic_per_athlete() {
        let now = Utc::now();
        let a = WearableSimulator::seeded_for("athlete-1").sample_burst(10, now);
        let b = WearableSimulator::seeded_for("athlete-1").sample_burst(10, now);
        let c = WearableSimulator::seeded_for("athlete-2").sample_burst(10, now);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn every_packet_is_flagged_simulated_and_in_range() {
        let samples = WearableSimulator::seeded_for("x").sample_burst(60, Utc::now());
        assert_eq!(samples.len(), 60);
        for sample in &samples {
            assert!(sample.simulated);
            assert!((HR_FLOOR..=HR_CEILING).contains(&sample.heart_rate_bpm));
            assert!((0.0..=1.0).contains(&sample.signal_quality));
            assert!(["A", "B", "C"].contains(&sample.trust_grade.as_str()));
        }
    }

    #[test]
    fn timestamps_ascend_one_second_apart() {
        let now = Utc::now();
        let samples = WearableSimulator::seeded_for("x").sample_burst(3, now);
        assert_eq!(samples[2].captured_at, now);
        assert_eq!(samples[1].captured_at, now - Duration::seconds(1));
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(trust_grade(0.85), "A");
        assert_eq!(trust_grade(0.8), "A");
        assert_eq!(trust_grade(0.79), "B");
        assert_eq!(trust_grade(0.5), "B");
        assert_eq!(trust_grade(0.49), "C");
    }
}
