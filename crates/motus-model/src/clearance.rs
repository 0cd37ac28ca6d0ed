// SPDX-License-Identifier: Apache-2.0

//! Limb-symmetry clearance scoring.
//!
//! Pure arithmetic over optionally captured symmetry/strength ratios. The
//! aggregate score weights movement tests at 0.7 and strength tests at 0.3;
//! when one family is absent its weight shifts to the other. Clearance
//! additionally requires every individual ratio to sit above a component
//! floor, so a single weak limb cannot be averaged away.

use serde::{Deserialize, Serialize};

/// Aggregate LSI required for clearance.
pub const CLEARANCE_THRESHOLD: f64 = 0.90;
/// Minimum any single captured ratio may be for clearance.
pub const COMPONENT_FLOOR: f64 = 0.85;

const MOVEMENT_WEIGHT: f64 = 0.7;
const STRENGTH_WEIGHT: f64 = 0.3;

/// Per-test limb-symmetry ratios (injured / healthy), each expected in [0, 1].
/// Out-of-range inputs are clamped before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymmetryMetrics {
    pub single_leg_hop: Option<f64>,
    pub triple_hop: Option<f64>,
    pub squat: Option<f64>,
    pub lunge: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrengthMetrics {
    pub quadriceps: Option<f64>,
    pub hamstring: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceDecision {
    pub limb_symmetry_score: f64,
    pub cleared: bool,
    pub concerns: Vec<String>,
    pub recommended_exercises: Vec<String>,
}

fn clamp_ratio(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn exercise_for(component: &str) -> &'static str {
    match component {
        "single_leg_hop" => "Single-leg hop progressions with soft-landing focus",
        "triple_hop" => "Triple hop for distance, submaximal to maximal progression",
        "squat" => "Tempo split squats with heel elevation",
        "lunge" => "Walking lunge series with trunk-control cues",
        "quadriceps" => "Eccentric-bias isolated quadriceps strengthening",
        "hamstring" => "Nordic hamstring curl progression",
        _ => "Graded bilateral-to-unilateral loading progression",
    }
}

/// Compute the clearance decision for one rehab session.
///
/// The returned score is always in [0, 1]. With no captured metrics the score
/// is 0.0 and the athlete is never cleared.
#[must_use]
pub fn evaluate_clearance(
    symmetry: &SymmetryMetrics,
    strength: &StrengthMetrics,
) -> ClearanceDecision {
    let movement: Vec<(&'static str, f64)> = [
        ("single_leg_hop", symmetry.single_leg_hop),
        ("triple_hop", symmetry.triple_hop),
        ("squat", symmetry.squat),
        ("lunge", symmetry.lunge),
    ]
    .into_iter()
    .filter_map(|(name, v)| v.map(|v| (name, clamp_ratio(v))))
    .collect();
    let strength_components: Vec<(&'static str, f64)> = [
        ("quadriceps", strength.quadriceps),
        ("hamstring", strength.hamstring),
    ]
    .into_iter()
    .filter_map(|(name, v)| v.map(|v| (name, clamp_ratio(v))))
    .collect();

    let movement_mean = mean(&movement.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    let strength_mean = mean(
        &strength_components
            .iter()
            .map(|(_, v)| *v)
            .collect::<Vec<_>>(),
    );

    let limb_symmetry_score = match (movement_mean, strength_mean) {
        (Some(m), Some(s)) => MOVEMENT_WEIGHT * m + STRENGTH_WEIGHT * s,
        (Some(m), None) => m,
        (None, Some(s)) => s,
        (None, None) => 0.0,
    };

    let mut concerns = Vec::new();
    let mut recommended_exercises = Vec::new();
    let mut component_floor_met = true;
    for (name, value) in movement.iter().chain(strength_components.iter()) {
        if *value < COMPONENT_FLOOR {
            component_floor_met = false;
            concerns.push(format!(
                "{name} symmetry at {:.0}% is below the {:.0}% component floor",
                value * 100.0,
                COMPONENT_FLOOR * 100.0
            ));
            let exercise = exercise_for(name);
            if !recommended_exercises.iter().any(|e| e == exercise) {
                recommended_exercises.push(exercise.to_string());
            }
        }
    }

    let any_metric = !movement.is_empty() || !strength_components.is_empty();
    if !any_metric {
        concerns.push("no objective limb-symmetry metrics captured for this session".to_string());
    }

    let cleared = any_metric && component_floor_met && limb_symmetry_score >= CLEARANCE_THRESHOLD;

    ClearanceDecision {
        limb_symmetry_score,
        cleared,
        concerns,
        recommended_exercises,
    }
}
