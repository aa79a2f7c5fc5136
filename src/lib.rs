//! Transit smartcard fares: station zones, card balances and journeys, and
//! the zone-based fare engine that prices each tap-in/tap-out pair.

pub mod card;
pub mod currency;
pub mod error;
pub mod fare;
pub mod journey;
pub mod station;
pub mod transit;

pub use card::{Card, TravelState};
pub use currency::format_minor;
pub use error::{Result, TransitError};
pub use fare::{FareRule, FareTable, ZoneOne, count_zones, zone_diff};
pub use journey::Journey;
pub use station::{Mode, Station, StationRegistry};
pub use transit::TransitSystem;
