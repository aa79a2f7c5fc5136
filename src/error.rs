use thiserror::Error;

use crate::station::Mode;

pub type Result<T> = std::result::Result<T, TransitError>;

/// Failures surfaced by the station registry, cards, fare engine and controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitError {
    #[error("station `{0}` not found")]
    NotFound(String),
    #[error("card `{0}` not found")]
    CardNotFound(String),
    #[error("card `{0}` already issued")]
    DuplicateCard(String),
    #[error("station `{station}` is not a {expected} station")]
    InvalidStationType { station: String, expected: Mode },
    #[error("cannot exit tube for a journey starting at non tube station `{0}`")]
    InvalidJourneyStart(String),
    #[error("no journeys")]
    NoJourneys,
    #[error("station zone empty")]
    EmptyZoneSet,
    #[error("both start and end stations being multi zone is not supported")]
    UnsupportedMultiZonePair,
    #[error("invalid zone {0}, zones start at 1")]
    InvalidZone(u32),
    #[error("minimum top up is 1, got {0}")]
    InvalidAmount(i64),
    #[error("card `{0}` is already travelling")]
    AlreadyTraveling(String),
    #[error("card `{0}` has no journey in progress")]
    NotTraveling(String),
    #[error("invalid station `{station}`: {reason}")]
    InvalidStation { station: String, reason: String },
    #[error("invalid fare table: {0}")]
    InvalidFareTable(String),
}
