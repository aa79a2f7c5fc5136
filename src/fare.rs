//! Zone counting and fare tier lookup.
//!
//! Fares are a pure function of a [`Journey`] and a [`FareTable`]. A journey's
//! zone count is the inclusive span between its start and end zones; when one
//! side spans several zones the smallest span is charged.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{io::Read, path::Path};
use tracing::debug;

use crate::{
    error::{Result, TransitError},
    journey::Journey,
    station::{Mode, Station},
};

/// Zone 1 membership a rule requires of the journey's two stations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneOne {
    Both,
    Either,
    Any,
}

impl ZoneOne {
    fn matches(self, start: &Station, end: &Station) -> bool {
        match self {
            ZoneOne::Both => start.in_zone(1) && end.in_zone(1),
            ZoneOne::Either => start.in_zone(1) || end.in_zone(1),
            ZoneOne::Any => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FareRule {
    pub zones: u32,
    pub zone_one: ZoneOne,
    pub fare: i64,
}

impl FareRule {
    pub const fn new(zones: u32, zone_one: ZoneOne, fare: i64) -> Self {
        Self {
            zones,
            zone_one,
            fare,
        }
    }
}

/// Ordered fare rules plus the flat bus fare and the provisional tube hold.
///
/// Rules are tried in order and the first match wins, so zone 1 inclusive
/// rules must precede the exclusive rule for the same zone count.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FareTable {
    pub bus_fare: i64,
    pub max_fare: i64,
    pub rules: Vec<FareRule>,
}

impl Default for FareTable {
    fn default() -> Self {
        Self {
            bus_fare: 180,
            max_fare: 320,
            rules: vec![
                // Anywhere in zone 1
                FareRule::new(1, ZoneOne::Both, 250),
                // Any one zone outside zone 1
                FareRule::new(1, ZoneOne::Any, 200),
                FareRule::new(2, ZoneOne::Either, 300),
                FareRule::new(2, ZoneOne::Any, 225),
                FareRule::new(3, ZoneOne::Any, 320),
            ],
        }
    }
}

impl FareTable {
    pub fn new(bus_fare: i64, max_fare: i64, rules: Vec<FareRule>) -> Result<Self> {
        let table = Self {
            bus_fare,
            max_fare,
            rules,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn from_reader<R: Read>(r: R) -> anyhow::Result<Self> {
        let table: FareTable = serde_json::from_reader(r).context("parsing fare table")?;
        table.validate()?;
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(&path)
            .with_context(|| format!("opening {:?}", path.as_ref()))?;
        Self::from_reader(file)
    }

    fn validate(&self) -> Result<()> {
        if self.max_fare < 0 {
            return Err(TransitError::InvalidFareTable(format!(
                "negative max fare {}",
                self.max_fare
            )));
        }

        if !(0..=self.max_fare).contains(&self.bus_fare) {
            return Err(TransitError::InvalidFareTable(format!(
                "bus fare {} outside 0..={}",
                self.bus_fare, self.max_fare
            )));
        }

        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.fare < 0 || r.fare > self.max_fare)
        {
            return Err(TransitError::InvalidFareTable(format!(
                "fare {} for {} zones outside 0..={}",
                rule.fare, rule.zones, self.max_fare
            )));
        }

        Ok(())
    }

    /// Fare owed for `journey`.
    pub fn compute_fare(&self, journey: &Journey) -> Result<i64> {
        if journey.start.mode == Mode::Bus {
            return Ok(self.bus_fare);
        }

        let Some(end) = &journey.end else {
            return Ok(self.max_fare);
        };

        // Tapped in and out of the same station: no travel. Timestamps are not considered.
        if journey.start.name == end.name {
            return Ok(0);
        }

        let zones = count_zones(&journey.start, end)?;
        let fare = self.tier_fare(zones, &journey.start, end);
        debug!(
            start = %journey.start.name,
            end = %end.name,
            zones,
            fare,
            "computed fare"
        );

        Ok(fare)
    }

    /// Fare of the first rule matching `zones`, or zero when no rule covers it.
    pub fn tier_fare(&self, zones: u32, start: &Station, end: &Station) -> i64 {
        self.rules
            .iter()
            .find(|r| r.zones == zones && r.zone_one.matches(start, end))
            .map(|r| r.fare)
            .unwrap_or(0)
    }
}

/// Number of zones visited travelling between `start` and `end`.
///
/// If exactly one station spans several zones, each of its zones is compared
/// with the other station's zone and the lowest count is used.
pub fn count_zones(start: &Station, end: &Station) -> Result<u32> {
    if start.zones.is_empty() || end.zones.is_empty() {
        return Err(TransitError::EmptyZoneSet);
    }

    if start.is_multi_zone() && end.is_multi_zone() {
        return Err(TransitError::UnsupportedMultiZonePair);
    }

    let (single, multi) = if start.is_multi_zone() {
        (end.zones[0], &start.zones)
    } else {
        (start.zones[0], &end.zones)
    };

    multi
        .iter()
        .map(|&z| zone_diff(single, z).ok_or(TransitError::InvalidZone(single.min(z))))
        .try_fold(u32::MAX, |min, diff| diff.map(|d| min.min(d)))
}

/// Inclusive count of zones between `z1` and `z2`; zones 1 and 2 span two zones.
/// `None` if either zone is below 1.
pub fn zone_diff(z1: u32, z2: u32) -> Option<u32> {
    if z1 < 1 || z2 < 1 {
        return None;
    }
    Some(z1.abs_diff(z2) + 1)
}
