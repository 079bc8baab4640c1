//! Playing cards and the pile they are drawn from.
//!
//! These are deliberately simple value types: a [`Card`] is an
//! immutable suit/rank pair compared by value, and a [`Pile`] is an
//! unordered bag of cards supporting add, draw-one-or-empty, count,
//! and shuffle-in-place.
use rand::{seq::SliceRandom, Rng};
use std::fmt;

/// The number of cards in a full deck.
pub const DECK_SIZE: usize = Suit::ALL.len() * Rank::ALL.len();

/// A card's suit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

/// A card's rank, deuce through ace.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// An immutable playing card, compared by value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Card {
    suit: Suit,
    rank: Rank,
}

/// An unordered pile of cards.
///
/// Draw order is unspecified; callers that care about which card goes
/// to whom must [`shuffle`](Pile::shuffle) and accept the luck of the
/// draw.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pile {
    cards: Vec<Card>,
}

// === impl Suit ===

impl Suit {
    /// Every suit, in a fixed order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn as_char(&self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

// === impl Rank ===

impl Rank {
    /// Every rank, in a fixed order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

// === impl Card ===

impl Card {
    /// Returns the card with the given suit and rank.
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Returns this card's suit.
    #[must_use]
    pub const fn suit(&self) -> Suit {
        self.suit
    }

    /// Returns this card's rank.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }
}

impl fmt::Display for Card {
    /// Formats as a right-aligned rank followed by the suit letter,
    /// such as `10H` or ` AS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}{}", self.rank.as_str(), self.suit.as_char())
    }
}

// === impl Pile ===

impl Pile {
    /// Returns a new, empty pile.
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Returns a full, unshuffled deck of every suit/rank combination.
    #[must_use]
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Self { cards }
    }

    /// Returns the number of cards currently in the pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the pile holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Adds a card to the pile.
    ///
    /// This does not check for duplicates; a pile may hold several
    /// copies of the same card.
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Draws one card from the pile, transferring ownership to the
    /// caller, or returns [`None`] if the pile is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Randomizes the order of the cards in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn drain(mut pile: Pile) -> Vec<Card> {
        let mut cards = Vec::with_capacity(pile.len());
        while let Some(card) = pile.draw() {
            cards.push(card);
        }
        cards
    }

    #[test]
    fn standard_deck_has_fifty_two_unique_cards() {
        let mut cards = drain(Pile::standard());
        assert_eq!(cards.len(), DECK_SIZE);
        cards.sort();
        cards.dedup();
        assert_eq!(cards.len(), DECK_SIZE);
    }

    #[test]
    fn display_matches_table_format() {
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_string(), "10H");
        assert_eq!(Card::new(Suit::Spades, Rank::Ace).to_string(), " AS");
        assert_eq!(Card::new(Suit::Clubs, Rank::Two).to_string(), " 2C");
    }

    #[test]
    fn draw_empties_the_pile() {
        let mut pile = Pile::new();
        assert!(pile.draw().is_none());
        pile.add(Card::new(Suit::Diamonds, Rank::Queen));
        assert_eq!(pile.len(), 1);
        assert_eq!(pile.draw(), Some(Card::new(Suit::Diamonds, Rank::Queen)));
        assert!(pile.is_empty());
    }

    proptest! {
        /// Shuffling must reorder the same multiset of cards: nothing
        /// created, dropped, or duplicated.
        #[test]
        fn shuffle_is_a_permutation(
            seed: u64,
            picks in proptest::collection::vec((0usize..4, 0usize..13), 0..52),
        ) {
            let mut pile = Pile::new();
            for (suit, rank) in picks {
                pile.add(Card::new(Suit::ALL[suit], Rank::ALL[rank]));
            }

            let mut before = drain(pile.clone());
            pile.shuffle(&mut StdRng::seed_from_u64(seed));
            let mut after = drain(pile);

            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }
    }
}
