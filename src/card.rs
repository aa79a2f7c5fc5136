use uuid::Uuid;

use crate::{
    error::{Result, TransitError},
    journey::Journey,
};

/// Whether a card is between journeys or inside the gates of a tube journey.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TravelState {
    #[default]
    Idle,
    /// Index into the card's journeys of the open tube journey.
    InTransit { journey: usize },
}

/// Payment card holding a balance in minor units and its journey history.
///
/// Not thread safe: callers handling concurrent taps must serialise access per card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    balance: i64,
    journeys: Vec<Journey>,
}

impl Card {
    /// New card with a random identifier and zero balance.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: 0,
            journeys: vec![],
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    /// In transit while the last journey is a tube journey without an exit.
    pub fn state(&self) -> TravelState {
        match self.journeys.last() {
            Some(last) if last.is_open() => TravelState::InTransit {
                journey: self.journeys.len() - 1,
            },
            _ => TravelState::Idle,
        }
    }

    pub fn top_up(&mut self, amount: i64) -> Result<()> {
        if amount < 1 {
            return Err(TransitError::InvalidAmount(amount));
        }
        self.adjust_balance(amount);
        Ok(())
    }

    /// Adds `delta` to the balance. No floor: the balance may go negative.
    pub fn adjust_balance(&mut self, delta: i64) {
        self.balance += delta;
    }

    /// Appends a journey and returns its index.
    pub fn append_journey(&mut self, journey: Journey) -> usize {
        self.journeys.push(journey);
        self.journeys.len() - 1
    }

    pub fn last_journey(&self) -> Result<&Journey> {
        self.journeys.last().ok_or(TransitError::NoJourneys)
    }

    pub fn replace_last_journey(&mut self, journey: Journey) -> Result<()> {
        let last = self.journeys.last_mut().ok_or(TransitError::NoJourneys)?;
        *last = journey;
        Ok(())
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    fn card_with_balance(balance: i64) -> Card {
        let mut card = Card::with_id("card-id");
        card.adjust_balance(balance);
        card
    }

    #[test]
    fn adjust_balance() {
        let cases = [(100, 100, 200), (0, 0, 0), (100, -100, 0), (0, -100, -100)];

        for (start, delta, expected) in cases {
            let mut card = card_with_balance(start);
            card.adjust_balance(delta);
            assert_eq!(card.balance(), expected);
        }
    }

    #[test]
    fn top_up() {
        let mut card = Card::with_id("card-id");
        card.top_up(1).unwrap();
        card.top_up(3000).unwrap();
        assert_eq!(card.balance(), 3001);

        assert_eq!(card.top_up(0), Err(TransitError::InvalidAmount(0)));
        assert_eq!(card.top_up(-50), Err(TransitError::InvalidAmount(-50)));
        assert_eq!(card.balance(), 3001);
    }

    #[test]
    fn new_cards_get_distinct_ids() {
        let a = Card::new();
        let b = Card::new();
        assert_ne!(a.id, b.id);
        assert_eq!(a.balance(), 0);
        assert!(a.journeys().is_empty());
        assert_eq!(a.state(), TravelState::Idle);
    }

    #[test]
    fn journey_history() {
        let mut card = Card::with_id("card-id");
        assert_eq!(card.last_journey(), Err(TransitError::NoJourneys));
        assert_eq!(
            card.replace_last_journey(Journey::new(Station::bus("stop"), 180)),
            Err(TransitError::NoJourneys)
        );

        let first = card.append_journey(Journey::new(Station::bus("stop"), 180));
        let second = card.append_journey(Journey::new(Station::tube("Holborn", vec![1]), 320));
        assert_eq!((first, second), (0, 1));
        assert_eq!(card.last_journey().unwrap().start.name, "Holborn");

        let mut closed = card.last_journey().unwrap().clone();
        closed.end = Some(Station::tube("Holborn", vec![1]));
        closed.fare = 0;
        card.replace_last_journey(closed).unwrap();

        assert_eq!(card.journeys().len(), 2);
        assert_eq!(card.journeys()[0].fare, 180);
        assert_eq!(card.last_journey().unwrap().fare, 0);
    }

    #[test]
    fn state_follows_last_journey() {
        let mut card = Card::with_id("card-id");
        assert_eq!(card.state(), TravelState::Idle);

        card.append_journey(Journey::new(Station::bus("stop"), 180));
        assert_eq!(card.state(), TravelState::Idle);

        card.append_journey(Journey::new(Station::tube("Holborn", vec![1]), 320));
        assert_eq!(card.state(), TravelState::InTransit { journey: 1 });

        let mut closed = card.last_journey().unwrap().clone();
        closed.end = Some(Station::tube("Hammersmith", vec![2]));
        card.replace_last_journey(closed).unwrap();
        assert_eq!(card.state(), TravelState::Idle);
    }
}
