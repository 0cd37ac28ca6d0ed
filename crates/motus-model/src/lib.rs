#![forbid(unsafe_code)]
//! Motus domain model SSOT.
//!
//! Entities, identifier newtypes, and the pure rehab-clearance scoring logic
//! shared by the store and server crates. Nothing in this crate performs I/O.

mod account;
mod athlete;
mod clearance;
mod enums;
mod ids;
mod rehab;
mod rewrite;
mod screen;

pub use account::User;
pub use athlete::{Athlete, AthleteContact, NAME_MAX_LEN};
pub use clearance::{
    evaluate_clearance, ClearanceDecision, StrengthMetrics, SymmetryMetrics, CLEARANCE_THRESHOLD,
    COMPONENT_FLOOR,
};
pub use enums::{Audience, RehabTestType, Sex, SurgicalSide};
pub use ids::{
    AthleteId, ContactId, InterventionId, MovementAssessmentId, ParseError, RehabAssessmentId,
    RehabVideoId, RewriteId, RiskSnapshotId, UserId, ID_MAX_LEN,
};
pub use rehab::{RehabAssessment, RehabVideo};
pub use rewrite::AudienceRewrite;
pub use screen::{Intervention, MovementAssessment, RiskBand, RiskSnapshot};

pub const CRATE_NAME: &str = "motus-model";
