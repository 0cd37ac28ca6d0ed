#![forbid(unsafe_code)]
//! REST contract for the Motus service: DTOs, the error envelope, and
//! query-parameter validation shared by the server and its contract tests.

mod dto;
mod error_codes;
mod errors;
pub mod params;

pub use dto::{
    CreateAthleteDto, CreateContactDto, CreateInterventionDto, CreateMovementAssessmentDto,
    CreateRehabAssessmentDto, CreateRehabVideoDto, CreateRewriteDto, CreateRiskSnapshotDto,
    CreateUserDto, FieldError, RehabDetailResponseDto, RehabHistoryResponseDto, UpdateAthleteDto,
    WearableResponseDto, WearableSampleDto,
};
pub use error_codes::ApiErrorCode;
pub use errors::ApiError;

pub const API_VERSION: &str = "v1";
pub const CRATE_NAME: &str = "motus-api";
