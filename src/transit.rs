use std::collections::HashMap;

use tracing::{info, warn};

use crate::{
    card::{Card, TravelState},
    error::{Result, TransitError},
    fare::FareTable,
    journey::Journey,
    station::{Mode, Station, StationRegistry},
};

/// Processes taps against the cards issued by the system.
///
/// Each call runs to completion and either applies all of its changes to the
/// card or none of them. Calls for the same card must be serialised by the caller.
pub struct TransitSystem {
    stations: StationRegistry,
    fares: FareTable,
    cards: HashMap<String, Card>,
}

impl TransitSystem {
    /// Fails with `DuplicateCard` if two of `cards` share an id.
    pub fn new(
        stations: StationRegistry,
        fares: FareTable,
        cards: impl IntoIterator<Item = Card>,
    ) -> Result<Self> {
        let mut system = Self {
            stations,
            fares,
            cards: HashMap::new(),
        };
        for card in cards {
            system.issue_card(card)?;
        }
        Ok(system)
    }

    pub fn fares(&self) -> &FareTable {
        &self.fares
    }

    pub fn issue_card(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(TransitError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    pub fn card(&self, card_id: &str) -> Result<&Card> {
        self.cards
            .get(card_id)
            .ok_or_else(|| TransitError::CardNotFound(card_id.to_owned()))
    }

    fn card_mut(&mut self, card_id: &str) -> Result<&mut Card> {
        self.cards
            .get_mut(card_id)
            .ok_or_else(|| TransitError::CardNotFound(card_id.to_owned()))
    }

    pub fn top_up(&mut self, card_id: &str, amount: i64) -> Result<()> {
        let card = self.card_mut(card_id)?;
        card.top_up(amount)?;
        info!(card = card_id, amount, balance = card.balance(), "topped up");
        Ok(())
    }

    /// Tap onto a bus. The flat fare is charged immediately and no exit tap follows.
    pub fn enter_bus(&mut self, stop_id: &str, card_id: &str) -> Result<()> {
        let stop = self.station_of_mode(stop_id, Mode::Bus)?.clone();
        let fare = self.fares.bus_fare;
        let card = self.idle_card_mut(card_id)?;

        card.append_journey(Journey::new(stop, fare));
        card.adjust_balance(-fare);
        info!(card = card_id, stop = stop_id, fare, balance = card.balance(), "entered bus");

        Ok(())
    }

    /// Tap into a tube station, holding the maximum fare until the exit tap.
    pub fn enter_tube(&mut self, station_id: &str, card_id: &str) -> Result<()> {
        let station = self.station_of_mode(station_id, Mode::Tube)?.clone();
        let hold = self.fares.max_fare;
        let card = self.idle_card_mut(card_id)?;

        card.append_journey(Journey::new(station, hold));
        card.adjust_balance(-hold);
        info!(card = card_id, station = station_id, hold, balance = card.balance(), "entered tube");

        Ok(())
    }

    /// Tap out of a tube station: release the hold and charge the actual fare.
    pub fn exit_tube(&mut self, station_id: &str, card_id: &str) -> Result<()> {
        let end = self.stations.lookup(station_id)?.clone();
        let card = self.card(card_id)?;

        let mut journey = card.last_journey()?.clone();
        if journey.start.mode != Mode::Tube {
            warn!(card = card_id, station = station_id, "exit without tube entry");
            return Err(TransitError::InvalidJourneyStart(journey.start.name));
        }
        if card.state() == TravelState::Idle {
            warn!(card = card_id, station = station_id, "exit without open journey");
            return Err(TransitError::NotTraveling(card_id.to_owned()));
        }
        if end.mode != Mode::Tube {
            warn!(card = card_id, station = station_id, "exit at a bus stop");
            return Err(TransitError::InvalidStationType {
                station: end.name,
                expected: Mode::Tube,
            });
        }

        let hold = journey.fare;
        journey.end = Some(end);
        let fare = self.fares.compute_fare(&journey)?;
        journey.fare = fare;

        let card = self.card_mut(card_id)?;
        card.adjust_balance(hold);
        card.replace_last_journey(journey)?;
        card.adjust_balance(-fare);
        info!(card = card_id, station = station_id, fare, balance = card.balance(), "exited tube");

        Ok(())
    }

    fn station_of_mode(&self, id: &str, mode: Mode) -> Result<&Station> {
        let station = self.stations.lookup(id)?;
        if station.mode != mode {
            warn!(station = id, expected = %mode, "wrong station type");
            return Err(TransitError::InvalidStationType {
                station: station.name.clone(),
                expected: mode,
            });
        }
        Ok(station)
    }

    fn idle_card_mut(&mut self, card_id: &str) -> Result<&mut Card> {
        let card = self.card_mut(card_id)?;
        if let TravelState::InTransit { .. } = card.state() {
            warn!(card = card_id, "entry while a tube journey is open");
            return Err(TransitError::AlreadyTraveling(card_id.to_owned()));
        }
        Ok(card)
    }
}
