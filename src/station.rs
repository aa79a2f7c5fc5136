use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    io::Read,
    path::Path,
    str::FromStr,
};

use crate::error::{Result, TransitError};

pub const BUS_STOP_EARLS_COURT: &str = "Earls Court Bus Stop";
pub const STATION_HOLBORN: &str = "Holborn";
pub const STATION_EARLS_COURT: &str = "Earl's Court";
pub const STATION_WIMBLEDON: &str = "Wimbledon";
pub const STATION_HAMMERSMITH: &str = "Hammersmith";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Bus,
    Tube,
}

impl FromStr for Mode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        Ok(match s {
            "BUS" => Mode::Bus,
            "TUBE" => Mode::Tube,
            _ => anyhow::bail!("unexpected value for mode: {s}"),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Bus => f.write_str("BUS"),
            Mode::Tube => f.write_str("TUBE"),
        }
    }
}

/// A tube station or bus stop. Bus stops carry no zones and are priced at a flat rate.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Station {
    pub name: String,
    #[serde(default)]
    pub zones: Vec<u32>,
    pub mode: Mode,
}

impl Station {
    pub fn tube(name: impl Into<String>, zones: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            zones,
            mode: Mode::Tube,
        }
    }

    pub fn bus(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zones: vec![],
            mode: Mode::Bus,
        }
    }

    /// Returns true if `zone` is one of the zones assigned to the station.
    pub fn in_zone(&self, zone: u32) -> bool {
        self.zones.contains(&zone)
    }

    pub fn is_multi_zone(&self) -> bool {
        self.zones.len() > 1
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| TransitError::InvalidStation {
            station: self.name.clone(),
            reason: reason.to_owned(),
        };

        match self.mode {
            Mode::Tube if self.zones.is_empty() => Err(invalid("tube station without zones")),
            Mode::Bus if !self.zones.is_empty() => Err(invalid("bus stop with zones")),
            _ if self.zones.contains(&0) => Err(invalid("zones start at 1")),
            _ => Ok(()),
        }
    }
}

/// Immutable lookup from station identifier to [`Station`].
#[derive(Clone, Debug)]
pub struct StationRegistry {
    stations: HashMap<String, Station>,
}

impl StationRegistry {
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Result<Self> {
        let mut map = HashMap::new();
        for station in stations {
            station.validate()?;
            if map.contains_key(&station.name) {
                return Err(TransitError::InvalidStation {
                    station: station.name,
                    reason: "duplicate name".to_owned(),
                });
            }
            map.insert(station.name.clone(), station);
        }

        Ok(Self { stations: map })
    }

    /// The five London stations and stops the system ships with.
    pub fn london() -> Self {
        let stations = [
            Station::tube(STATION_HOLBORN, vec![1]),
            Station::tube(STATION_EARLS_COURT, vec![1, 2]),
            Station::tube(STATION_WIMBLEDON, vec![3]),
            Station::tube(STATION_HAMMERSMITH, vec![2]),
            Station::bus(BUS_STOP_EARLS_COURT),
        ];

        Self {
            stations: stations.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }

    /// Parse a JSON array of stations from any reader.
    pub fn from_reader<R: Read>(r: R) -> anyhow::Result<Self> {
        let stations: Vec<Station> =
            serde_json::from_reader(r).context("parsing station registry")?;
        Ok(Self::new(stations)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(&path)
            .with_context(|| format!("opening {:?}", path.as_ref()))?;
        Self::from_reader(file)
    }

    pub fn lookup(&self, id: &str) -> Result<&Station> {
        self.stations
            .get(id)
            .ok_or_else(|| TransitError::NotFound(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_zone() {
        assert!(Station::tube("a", vec![1, 2]).is_multi_zone());
        assert!(!Station::tube("b", vec![1]).is_multi_zone());
        assert!(!Station::bus("c").is_multi_zone());
    }

    #[test]
    fn in_zone() {
        let cases = [
            (Station::tube("a", vec![1, 2]), 1, true),
            (Station::tube("a", vec![1, 2]), 5, false),
            (Station::tube("a", vec![1, 2]), 0, false),
            (Station::bus("b"), 1, false),
        ];

        for (station, zone, expected) in cases {
            assert_eq!(station.in_zone(zone), expected, "{station:?} zone {zone}");
        }
    }

    #[test]
    fn london_lookup() {
        let registry = StationRegistry::london();
        let earls_court = registry.lookup(STATION_EARLS_COURT).unwrap();
        assert_eq!(earls_court.zones, vec![1, 2]);
        assert_eq!(earls_court.mode, Mode::Tube);

        let bus = registry.lookup(BUS_STOP_EARLS_COURT).unwrap();
        assert_eq!(bus.mode, Mode::Bus);
        assert!(bus.zones.is_empty());
    }

    #[test]
    fn unknown_station() {
        let registry = StationRegistry::london();
        assert_eq!(
            registry.lookup("Bank"),
            Err(TransitError::NotFound("Bank".into()))
        );
    }

    #[test]
    fn rejects_broken_stations() {
        let tube_without_zones = StationRegistry::new([Station::tube("a", vec![])]);
        assert!(matches!(
            tube_without_zones,
            Err(TransitError::InvalidStation { .. })
        ));

        let zoned_bus = StationRegistry::new([Station {
            name: "b".into(),
            zones: vec![1],
            mode: Mode::Bus,
        }]);
        assert!(matches!(zoned_bus, Err(TransitError::InvalidStation { .. })));

        let zone_zero = StationRegistry::new([Station::tube("c", vec![0])]);
        assert!(matches!(zone_zero, Err(TransitError::InvalidStation { .. })));

        let duplicate =
            StationRegistry::new([Station::tube("d", vec![1]), Station::tube("d", vec![2])]);
        assert!(matches!(duplicate, Err(TransitError::InvalidStation { .. })));
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("BUS".parse::<Mode>().unwrap(), Mode::Bus);
        assert_eq!("TUBE".parse::<Mode>().unwrap(), Mode::Tube);
        assert!("FERRY".parse::<Mode>().is_err());
    }

    #[test]
    fn from_reader() {
        let json = r#"[
            {"name": "Bank", "zones": [1], "mode": "TUBE"},
            {"name": "Stop A", "mode": "BUS"}
        ]"#;
        let registry = StationRegistry::from_reader(json.as_bytes()).unwrap();
        assert_eq!(registry.lookup("Bank").unwrap().zones, vec![1]);
        assert_eq!(registry.lookup("Stop A").unwrap().mode, Mode::Bus);

        let broken = r#"[{"name": "Bank", "zones": [], "mode": "TUBE"}]"#;
        assert!(StationRegistry::from_reader(broken.as_bytes()).is_err());
    }
}
