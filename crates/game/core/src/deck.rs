//! Per-player card piles: draw, hand, discard and exhaust.
//!
//! The four piles partition the player's cards. Drawing, playing and
//! discarding move cards between piles without changing the total; exhausting
//! moves a card to a pile it never leaves.

use std::collections::VecDeque;

use crate::card::{Card, CardId};
use crate::rng::CombatRng;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    draw_pile: VecDeque<Card>,
    hand: Vec<Card>,
    discard_pile: Vec<Card>,
    exhaust_pile: Vec<Card>,
    max_hand_size: usize,
}

/// Card ids per pile, for snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeckView {
    pub draw_pile: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub discard_pile: Vec<CardId>,
    pub exhaust_pile: Vec<CardId>,
    pub max_hand_size: usize,
}

impl Deck {
    pub const DEFAULT_MAX_HAND_SIZE: usize = 10;

    /// Creates a deck whose draw pile holds `cards` in the given order.
    pub fn new(cards: impl IntoIterator<Item = Card>, max_hand_size: usize) -> Self {
        Self {
            draw_pile: cards.into_iter().collect(),
            hand: Vec::new(),
            discard_pile: Vec::new(),
            exhaust_pile: Vec::new(),
            max_hand_size,
        }
    }

    /// Reorders the draw pile with `rng`.
    pub fn shuffle(&mut self, rng: &mut CombatRng) {
        let cards: Vec<Card> = self.draw_pile.drain(..).collect();
        self.draw_pile = rng.shuffle(&cards).into();
    }

    /// Moves up to `count` cards from the draw pile into the hand.
    ///
    /// Stops early once the hand is full. An empty draw pile is refilled by
    /// reshuffling the discard pile; when both are empty drawing just stops.
    /// Returns the ids of the cards drawn.
    pub fn draw(&mut self, count: usize, rng: &mut CombatRng) -> Vec<CardId> {
        let mut drawn = Vec::new();

        for _ in 0..count {
            if self.hand.len() >= self.max_hand_size {
                break;
            }

            if self.draw_pile.is_empty() {
                if self.discard_pile.is_empty() {
                    break;
                }
                self.draw_pile.extend(self.discard_pile.drain(..));
                self.shuffle(rng);
            }

            let Some(card) = self.draw_pile.pop_front() else {
                break;
            };
            drawn.push(card.id.clone());
            self.hand.push(card);
        }

        drawn
    }

    /// Removes the first hand card with `card_id` and returns it.
    pub fn play_card(&mut self, card_id: &str) -> Option<Card> {
        let index = self.hand.iter().position(|card| card.id == card_id)?;
        Some(self.hand.remove(index))
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn exhaust(&mut self, card: Card) {
        self.exhaust_pile.push(card);
    }

    /// Moves the whole hand to the discard pile.
    pub fn discard_hand(&mut self) {
        self.discard_pile.append(&mut self.hand);
    }

    /// Adds a card straight to the hand; hands the card back if the hand is full.
    pub fn add_to_hand(&mut self, card: Card) -> Result<(), Card> {
        if self.hand.len() >= self.max_hand_size {
            return Err(card);
        }
        self.hand.push(card);
        Ok(())
    }

    pub fn card_in_hand(&self, card_id: &str) -> Option<&Card> {
        self.hand.iter().find(|card| card.id == card_id)
    }

    pub fn has_card(&self, card_id: &str) -> bool {
        self.card_in_hand(card_id).is_some()
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn exhaust_pile(&self) -> &[Card] {
        &self.exhaust_pile
    }

    pub fn max_hand_size(&self) -> usize {
        self.max_hand_size
    }

    /// Cards across all four piles.
    pub fn total_cards(&self) -> usize {
        self.draw_pile.len() + self.hand.len() + self.discard_pile.len() + self.exhaust_pile.len()
    }

    pub fn view(&self) -> DeckView {
        fn ids<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Vec<CardId> {
            cards.into_iter().map(|card| card.id.clone()).collect()
        }

        DeckView {
            draw_pile: ids(&self.draw_pile),
            hand: ids(&self.hand),
            discard_pile: ids(&self.discard_pile),
            exhaust_pile: ids(&self.exhaust_pile),
            max_hand_size: self.max_hand_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(count: usize) -> Vec<Card> {
        (1..=count).map(|i| Card::new(format!("card{i}"), 1)).collect()
    }

    #[test]
    fn starts_with_everything_in_draw_pile() {
        let deck = Deck::new(cards(2), 10);
        assert_eq!(deck.draw_pile_len(), 2);
        assert!(deck.hand().is_empty());
        assert!(deck.discard_pile().is_empty());
        assert_eq!(deck.max_hand_size(), 10);
    }

    #[test]
    fn draw_moves_cards_in_order() {
        let mut deck = Deck::new(cards(3), 10);
        let mut rng = CombatRng::new(12345);

        let drawn = deck.draw(2, &mut rng);

        assert_eq!(drawn, vec!["card1".to_string(), "card2".to_string()]);
        assert_eq!(deck.hand().len(), 2);
        assert_eq!(deck.draw_pile_len(), 1);
    }

    #[test]
    fn draw_reshuffles_discard_when_empty() {
        let mut deck = Deck::new(cards(2), 10);
        let mut rng = CombatRng::new(12345);

        deck.draw(2, &mut rng);
        let card = deck.play_card("card1").unwrap();
        deck.discard(card);
        assert_eq!(deck.draw_pile_len(), 0);
        assert_eq!(deck.discard_pile().len(), 1);

        let drawn = deck.draw(1, &mut rng);

        assert_eq!(drawn, vec!["card1".to_string()]);
        assert!(deck.discard_pile().is_empty());
        assert_eq!(deck.hand().len(), 2);
    }

    #[test]
    fn draw_stops_silently_when_exhausted() {
        let mut deck = Deck::new(cards(2), 10);
        let mut rng = CombatRng::new(1);

        assert_eq!(deck.draw(5, &mut rng).len(), 2);
        assert!(deck.draw(1, &mut rng).is_empty());
    }

    #[test]
    fn draw_respects_max_hand_size() {
        let mut deck = Deck::new(cards(15), 10);
        let mut rng = CombatRng::new(12345);

        deck.draw(15, &mut rng);

        assert_eq!(deck.hand().len(), 10);
        assert_eq!(deck.total_cards(), 15);
        assert!(deck.add_to_hand(Card::new("extra", 0)).is_err());
    }

    #[test]
    fn play_card_removes_from_hand() {
        let mut deck = Deck::new(cards(2), 10);
        let mut rng = CombatRng::new(12345);
        deck.draw(2, &mut rng);

        let card = deck.play_card("card1").unwrap();

        assert_eq!(card.id, "card1");
        assert_eq!(deck.hand().len(), 1);
        assert!(!deck.has_card("card1"));
        assert!(deck.play_card("card999").is_none());
    }

    #[test]
    fn exhausted_cards_never_return() {
        let mut deck = Deck::new(cards(2), 10);
        let mut rng = CombatRng::new(12345);
        deck.draw(2, &mut rng);

        let first = deck.play_card("card1").unwrap();
        deck.exhaust(first);
        let second = deck.play_card("card2").unwrap();
        deck.discard(second);

        assert_eq!(deck.total_cards(), 2);
        assert_eq!(deck.draw(5, &mut rng), vec!["card2".to_string()]);
        assert_eq!(deck.exhaust_pile().len(), 1);
    }

    #[test]
    fn discard_hand_moves_everything() {
        let mut deck = Deck::new(cards(3), 10);
        let mut rng = CombatRng::new(12345);
        deck.draw(3, &mut rng);

        deck.discard_hand();

        assert!(deck.hand().is_empty());
        assert_eq!(deck.discard_pile().len(), 3);
    }

    #[test]
    fn total_is_invariant_across_cycles() {
        let mut deck = Deck::new(cards(6), 4);
        let mut rng = CombatRng::new(99);

        for round in 0..20 {
            deck.draw(3, &mut rng);
            assert!(deck.hand().len() <= 4);
            if let Some(id) = deck.hand().first().map(|card| card.id.clone()) {
                let card = deck.play_card(&id).unwrap();
                deck.discard(card);
            }
            if round % 5 == 0 {
                deck.discard_hand();
            }
            assert_eq!(deck.total_cards(), 6);
        }
    }

    #[test]
    fn view_lists_ids_per_pile() {
        let mut deck = Deck::new(cards(2), 10);
        let mut rng = CombatRng::new(12345);
        deck.draw(1, &mut rng);

        let view = deck.view();

        assert_eq!(view.hand, vec!["card1".to_string()]);
        assert_eq!(view.draw_pile, vec!["card2".to_string()]);
        assert_eq!(view.max_hand_size, 10);
    }
}
