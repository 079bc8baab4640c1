//! The game itself: shared table state, the per-thread player routine,
//! and the orchestrator that deals, spawns, joins, and declares the
//! outcome.
//!
//! The protocol has exactly two critical sections per player and one
//! rendezvous between them:
//!
//! 1. draw a card from the shared pile, under the table lock;
//! 2. wait at the barrier until *every* player has drawn;
//! 3. reveal the card and record a win, under the table lock again.
//!
//! The barrier is what makes the reveal honest: no player may see
//! another's card, or the thinned-out pile, until all draws have
//! committed. The table lock is released before waiting at the barrier;
//! holding it across the rendezvous would deadlock every player still
//! trying to draw.
use crate::{
    cards::{Card, Pile},
    term::OwoColorize,
    Options,
};
use monte_sync::Barrier;
use std::{
    sync::Mutex,
    thread,
};

/// An unrecoverable failure during a round.
///
/// The whole design assumes a closed, cooperative set of players; any
/// synchronization failure mid-round has no meaningful recovery, so the
/// orchestrator tears the round down and reports it rather than
/// retrying.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The barrier could not be allocated; no threads were spawned.
    #[error("failed to set up the barrier: {0}")]
    Resource(#[from] monte_sync::ResourceError),

    /// The barrier failed mid-rendezvous.
    #[error("barrier failed mid-round: {0}")]
    Sync(#[from] monte_sync::SyncError),

    /// The table lock was poisoned by a panicked player.
    #[error("table lock was poisoned by a panicked player")]
    Poisoned,

    /// A player thread panicked.
    #[error("a player thread panicked")]
    Panicked,

    /// The deck ran out while dealing.
    #[error("the deck ran out of cards")]
    DeckExhausted,

    /// A player found the pile empty; by construction the pile holds
    /// one card per player, so this is a protocol defect.
    #[error("the pile ran out of cards")]
    EmptyPile,
}

/// Everything the table shares: the monte card, the guessed seat, the
/// barrier, and the lock-guarded mutable parts.
///
/// The orchestrator owns this for the whole round; players borrow it,
/// and `thread::scope` guarantees no player outlives the join.
struct Shared {
    barrier: Barrier,
    table: Mutex<Table>,
    /// The card the player is trying to find.
    monte: Card,
    /// The 1-based seat the player guessed, fixed before any thread is
    /// spawned.
    guess: usize,
}

/// The mutable state under the table lock.
struct Table {
    pile: Pile,
    /// Whether the guessed seat drew the monte card. Write-once-true:
    /// a non-matching player never clears an earlier match.
    matched: bool,
}

// === impl Shared ===

impl Shared {
    /// Builds the shared state for one round over a fully dealt pile.
    /// The barrier threshold is the pile size: one player per card.
    fn new(pile: Pile, monte: Card, guess: usize) -> Result<Self, GameError> {
        let players = pile.len();
        Ok(Self {
            barrier: Barrier::new(players)?,
            table: Mutex::new(Table {
                pile,
                matched: false,
            }),
            monte,
            guess,
        })
    }

    /// Tears down the round's synchronization objects and returns
    /// whether the guessed seat drew the monte card.
    fn finish(self) -> Result<bool, GameError> {
        self.barrier.shutdown()?;
        let table = self.table.into_inner().map_err(|_| GameError::Poisoned)?;
        Ok(table.matched)
    }
}

// === player routine ===

/// Phase 1: draw one card from the pile under the table lock. The card
/// is owned by this player from here on.
fn draw(seat: usize, shared: &Shared) -> Result<Card, GameError> {
    let mut table = shared.table.lock().map_err(|_| GameError::Poisoned)?;
    let card = table.pile.draw().ok_or(GameError::EmptyPile)?;
    tracing::debug!(seat, %card, "drew a card");
    Ok(card)
}

/// Phase 2: reveal the drawn card under the table lock, recording a win
/// if it is the monte card *and* this seat is the guessed one. Consumes
/// the card; the player who drew it disposes of it.
fn reveal(seat: usize, card: Card, shared: &Shared) -> Result<(), GameError> {
    let mut table = shared.table.lock().map_err(|_| GameError::Poisoned)?;

    let guessed = seat == shared.guess;
    let matched = card == shared.monte;
    println!(
        "[{}] {card} {}= {}",
        if guessed { '*' } else { ' ' },
        if matched { '=' } else { '!' },
        shared.monte,
    );

    table.matched |= matched && guessed;
    Ok(())
}

/// One player's full round: draw, rendezvous, reveal.
fn play(seat: usize, shared: &Shared) -> Result<(), GameError> {
    let card = draw(seat, shared)?;

    // With our card drawn, wait until every other player has drawn
    // theirs. The table lock must not be held here.
    shared.barrier.wait()?;

    reveal(seat, card, shared)
}

// === orchestrator ===

/// Deals the monte card and then `count - 1` more from `deck` into a
/// fresh pile, echoing each draw.
fn deal(deck: &mut Pile, count: usize) -> Result<(Card, Pile), GameError> {
    let monte = deck.draw().ok_or(GameError::DeckExhausted)?;
    println!("Drawing \"monte\" card: {monte}");

    let mut pile = Pile::new();
    pile.add(monte);

    print!("Drawing remaining cards:");
    for _ in 1..count {
        let card = deck.draw().ok_or(GameError::DeckExhausted)?;
        print!(" {card}");
        pile.add(card);
    }
    println!();

    Ok((monte, pile))
}

/// Spawns one thread per seat, joins them all, and propagates the first
/// player failure.
fn play_round(shared: &Shared) -> Result<(), GameError> {
    let players = shared.barrier.threshold();
    thread::scope(|scope| {
        let handles = (1..=players)
            .map(|seat| scope.spawn(move || play(seat, shared)))
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().map_err(|_| GameError::Panicked)??;
        }
        Ok(())
    })
}

/// Runs one full game: deal, shuffle, play, verdict.
///
/// Returns `true` if the guessed seat drew the monte card. `opts` must
/// already be [validated](crate::Options::validate).
pub fn run(opts: &Options) -> Result<bool, GameError> {
    println!("Cards: {}", opts.cards);
    println!("Guess: {}", opts.guess);

    let mut rng = rand::thread_rng();

    let mut deck = Pile::standard();
    deck.shuffle(&mut rng);

    let (monte, mut pile) = deal(&mut deck, opts.cards)?;
    // Shuffle the pile so a player's position in spawn order says
    // nothing about whether it will draw the monte card.
    pile.shuffle(&mut rng);

    let shared = Shared::new(pile, monte, opts.guess)?;
    play_round(&shared)?;
    let won = shared.finish()?;

    tracing::debug!(remaining = deck.len(), "returning undrawn cards to the box");

    let verdict = if won { "WON" } else { "LOST" };
    let style = opts
        .output
        .color
        .if_color_stdout(crate::term::style().bold().green());
    println!("You {}!", verdict.style(style));

    Ok(won)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    const MONTE: Card = Card::new(Suit::Spades, Rank::Ace);

    fn pile_of(cards: &[Card]) -> Pile {
        let mut pile = Pile::new();
        for &card in cards {
            pile.add(card);
        }
        pile
    }

    /// The spec scenario, run serially so the pile-to-seat assignment
    /// is deterministic: seat 1 draws the monte card. The pile pops
    /// from the back, so the monte card is pushed last.
    fn scenario(guess: usize) -> bool {
        let pile = pile_of(&[
            Card::new(Suit::Diamonds, Rank::Three),
            Card::new(Suit::Clubs, Rank::Two),
            MONTE,
        ]);
        let shared = Shared::new(pile, MONTE, guess).unwrap();

        let cards = (1..=3)
            .map(|seat| draw(seat, &shared).unwrap())
            .collect::<Vec<_>>();
        for (seat, card) in (1..=3).zip(cards) {
            reveal(seat, card, &shared).unwrap();
        }

        shared.finish().unwrap()
    }

    #[test]
    fn guessing_the_monte_holder_wins() {
        assert!(scenario(1));
    }

    #[test]
    fn guessing_any_other_seat_loses() {
        assert!(!scenario(2));
        assert!(!scenario(3));
    }

    #[test]
    fn deal_yields_count_distinct_cards() {
        let mut deck = Pile::standard();
        let (monte, pile) = deal(&mut deck, 5).unwrap();
        assert_eq!(pile.len(), 5);
        assert_eq!(deck.len(), crate::cards::DECK_SIZE - 5);

        let mut cards = Vec::new();
        let mut pile = pile;
        while let Some(card) = pile.draw() {
            cards.push(card);
        }
        assert!(cards.contains(&monte));
        cards.sort();
        cards.dedup();
        assert_eq!(cards.len(), 5, "dealt cards must be distinct");
    }

    /// With every card in the pile equal to the monte card, whichever
    /// seat we guess must draw it, under any schedule.
    #[test]
    fn stacked_pile_always_wins() {
        let shared = Shared::new(pile_of(&[MONTE, MONTE, MONTE]), MONTE, 2).unwrap();
        play_round(&shared).unwrap();
        assert!(shared.finish().unwrap());
    }

    /// The flag can never become true when the monte card is not in
    /// the pile at all.
    #[test]
    fn absent_monte_never_wins() {
        let pile = pile_of(&[
            Card::new(Suit::Hearts, Rank::Four),
            Card::new(Suit::Hearts, Rank::Five),
            Card::new(Suit::Hearts, Rank::Six),
        ]);
        let shared = Shared::new(pile, MONTE, 1).unwrap();
        play_round(&shared).unwrap();
        assert!(!shared.finish().unwrap());
    }

    /// One deliberately slow drawer must hold everyone at the barrier:
    /// by the time any player reveals, all draws have completed.
    #[test]
    fn slow_draw_holds_the_reveal() {
        const PLAYERS: usize = 4;

        let pile = pile_of(&[MONTE; PLAYERS]);
        let shared = Shared::new(pile, MONTE, 1).unwrap();
        let draws = AtomicUsize::new(0);

        thread::scope(|scope| {
            for seat in 1..=PLAYERS {
                let (shared, draws) = (&shared, &draws);
                scope.spawn(move || {
                    if seat == 1 {
                        thread::sleep(Duration::from_millis(50));
                    }
                    let card = draw(seat, shared).unwrap();
                    draws.fetch_add(1, Ordering::SeqCst);

                    shared.barrier.wait().unwrap();

                    assert_eq!(
                        draws.load(Ordering::SeqCst),
                        PLAYERS,
                        "revealed before every player had drawn",
                    );
                    reveal(seat, card, shared).unwrap();
                });
            }
        });

        assert!(shared.finish().unwrap());
    }

    #[test]
    fn full_run_completes() {
        use clap::Parser;
        let opts = crate::Options::parse_from(["monte", "5", "2"]);
        opts.validate().unwrap();
        run(&opts).unwrap();
    }
}
