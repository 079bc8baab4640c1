//! Multi-threaded three-card monte.
//!
//! A contrived version of the traditional three-card monte, played to
//! demonstrate coordinating worker threads around a shared table with a
//! [barrier](monte_sync::Barrier) and a mutex. Every thread draws a
//! card from a shared pile, one of them draws the monte card, and the
//! player tries to guess which thread will end up holding it. You don't
//! get to watch the cards move around the table; that's what the
//! debugger is for.
use clap::Parser;

pub use color_eyre::eyre::Result;

pub mod cards;
pub mod game;
pub mod term;

/// Command-line options for the game.
#[derive(Debug, Parser)]
#[command(name = "monte", version, about = "multi-threaded three-card monte")]
pub struct Options {
    /// How many cards are dealt into the pile (one worker thread per
    /// card).
    pub cards: usize,

    /// Which thread, 1-based in spawn order, you think will draw the
    /// monte card.
    pub guess: usize,

    #[clap(flatten)]
    pub output: term::OutputOptions,
}

/// A user error detected before any game state is built.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// Too few cards for a non-trivial guess.
    #[error("cards must be greater than or equal to 3 (got {0})")]
    TooFewCards(usize),

    /// More cards than the deck holds.
    #[error("cards must be at most {deck} (got {cards})", deck = crate::cards::DECK_SIZE)]
    TooManyCards {
        /// The requested card count.
        cards: usize,
    },

    /// The guess does not name one of the players.
    #[error("guess must be between 1 and {cards} (got {guess})")]
    GuessOutOfRange {
        /// The requested guess.
        guess: usize,
        /// The number of players it must index into.
        cards: usize,
    },
}

// === impl Options ===

impl Options {
    /// Checks the argument ranges before any threads or synchronization
    /// objects exist.
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.cards < 3 {
            return Err(UsageError::TooFewCards(self.cards));
        }
        if self.cards > cards::DECK_SIZE {
            return Err(UsageError::TooManyCards { cards: self.cards });
        }
        if self.guess < 1 || self.guess > self.cards {
            return Err(UsageError::GuessOutOfRange {
                guess: self.guess,
                cards: self.cards,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn opts(cards: usize, guess: usize) -> Options {
        Options::parse_from(["monte", &cards.to_string(), &guess.to_string()])
    }

    #[test]
    fn accepts_valid_arguments() {
        assert!(opts(3, 1).validate().is_ok());
        assert!(opts(52, 52).validate().is_ok());
    }

    #[test]
    fn rejects_too_few_cards() {
        assert!(matches!(
            opts(2, 1).validate(),
            Err(UsageError::TooFewCards(2))
        ));
    }

    #[test]
    fn rejects_too_many_cards() {
        assert!(matches!(
            opts(53, 1).validate(),
            Err(UsageError::TooManyCards { cards: 53 })
        ));
    }

    #[test]
    fn rejects_out_of_range_guesses() {
        assert!(matches!(
            opts(3, 0).validate(),
            Err(UsageError::GuessOutOfRange { guess: 0, cards: 3 })
        ));
        assert!(matches!(
            opts(3, 4).validate(),
            Err(UsageError::GuessOutOfRange { guess: 4, cards: 3 })
        ));
    }

    #[test]
    fn requires_both_arguments() {
        assert!(Options::try_parse_from(["monte", "3"]).is_err());
        assert!(Options::try_parse_from(["monte"]).is_err());
    }
}
