use crate::{
    currency::format_minor,
    station::{Mode, Station},
};

/// A single trip and the fare applied to it, in minor units.
///
/// While `end` is absent on a tube journey the fare is the provisional hold;
/// it becomes final when the matching exit tap sets `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Journey {
    pub start: Station,
    pub end: Option<Station>,
    pub fare: i64,
}

impl Journey {
    pub fn new(start: Station, fare: i64) -> Self {
        Self {
            start,
            end: None,
            fare,
        }
    }

    pub fn is_bus(&self) -> bool {
        self.start.mode == Mode::Bus
    }

    /// A tube journey that has been tapped into but not out of.
    pub fn is_open(&self) -> bool {
        self.start.mode == Mode::Tube && self.end.is_none()
    }

    /// One statement line, e.g. `(£2.50) Earl's Court -> Holborn`.
    pub fn describe(&self) -> String {
        let fare = format_minor(self.fare);
        if self.is_bus() {
            return format!("({fare}) {}", self.start.name);
        }

        let end = self.end.as_ref().map_or("...", |s| s.name.as_str());
        format!("({fare}) {} -> {end}", self.start.name)
    }
}
