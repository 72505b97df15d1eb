//! # bracket-engine-core
//!
//! This crate turns an ordered list of participants into the complete set of matches of a
//! tournament. Three formats are built in: [`SingleElimination`], [`DoubleElimination`] and
//! [`RoundRobin`].
//!
//! Important types:
//! - [`Participant`]: An entrant with an opaque id, a display name and a seed.
//! - [`SeedAssigner`]: Arranges participants into bracket [`Slot`]s and hands out byes.
//! - [`MatchGraph`]: The generated matches, stored in generation order and addressed by
//! [`MatchId`].
//! - [`Match`]: A *match* of two parties, linked to the matches its winner and loser advance to.
//! - [`EntrantSpot`]: A *spot* within a match, which can contain an entrant, be permanently empty
//! or contain a to-be-done spot.
//! - [`System`]: The trait implemented by every format.
//!
//! Generation is pure: [`generate`] either returns a complete, consistently linked
//! [`MatchGraph`] or an [`enum@Error`], and never mutates a match after it returns. Filling
//! spots with results is left to the caller, guided by [`MatchGraph::next_matches`].
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all public data types.
//!
pub mod options;
pub mod standings;

mod double_elimination;
mod graph;
mod id;
mod round_robin;
mod seeding;
mod single_elimination;
mod tournament;
mod utils;

pub use double_elimination::DoubleElimination;
pub use graph::{MatchGraph, NextMatches};
pub use id::{MatchId, ParticipantId, TournamentId};
pub use round_robin::RoundRobin;
pub use seeding::{SeedAssigner, Slot};
pub use single_elimination::SingleElimination;
pub use tournament::{generate, generate_cancellable, Format, Tournament};

use thiserror::Error;

use std::result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An entrant of a tournament.
///
/// Seed `1` is the strongest. Seeds do not have to be contiguous, but they must be unique within
/// a single generation call of an elimination format.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub seed: u32,
}

impl Participant {
    #[inline]
    pub fn new<I, S>(id: I, display_name: S, seed: u32) -> Self
    where
        I: Into<ParticipantId>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            seed,
        }
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient participants: at least 2 are required, found {found}")]
    InsufficientParticipants { found: usize },
    #[error("participant {id} is listed more than once")]
    DuplicateParticipant { id: ParticipantId },
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid seed {seed}: seeds start at 1")]
    InvalidSeed { seed: u32 },
    #[error("invalid seed {seed}: seed is used by more than one participant")]
    DuplicateSeed { seed: u32 },
    #[error("invalid options: {0}")]
    Options(#[from] options::Error),
    #[error("unknown match {0}")]
    UnknownMatch(MatchId),
    #[error("match {0} is a bye and has already advanced its entrant")]
    ByeMatch(MatchId),
    #[error("spot {spot} of match {target} was written twice during generation")]
    SlotConflict { target: MatchId, spot: usize },
    #[error("generation was cancelled")]
    Cancelled,
}

/// The state of a [`Match`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
    /// The match can never be played because neither spot will ever receive an entrant.
    Cancelled,
}

/// The part of a bracket a [`Match`] belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BracketSection {
    /// Formats without sections, i.e. round robin.
    #[default]
    None,
    Winners,
    Losers,
    GrandFinal,
}

/// The spot an entrant is written to when advancing out of a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    pub target: MatchId,
    /// Either `0` or `1`.
    pub spot: usize,
}

impl Link {
    #[inline]
    pub const fn new(target: MatchId, spot: usize) -> Self {
        Self { target, spot }
    }
}

/// A match between two parties.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// The round within the [`BracketSection`], starting at 1.
    pub round: usize,
    /// The position in generation order, starting at 1.
    pub sequence_number: usize,
    pub entrants: [EntrantSpot<ParticipantId>; 2],
    pub winner: Option<ParticipantId>,
    pub loser: Option<ParticipantId>,
    pub status: MatchStatus,
    /// Where the winner advances to. `None` for terminal matches.
    pub next: Option<Link>,
    /// Where the loser drops to. Only set in the winners bracket of a double elimination.
    pub loser_next: Option<Link>,
    pub section: BracketSection,
}

impl Match {
    #[inline]
    pub fn participant1(&self) -> Option<ParticipantId> {
        self.entrants[0].entrant()
    }

    #[inline]
    pub fn participant2(&self) -> Option<ParticipantId> {
        self.entrants[1].entrant()
    }

    #[inline]
    pub fn next_match_id(&self) -> Option<MatchId> {
        self.next.map(|link| link.target)
    }

    #[inline]
    pub fn loser_next_match_id(&self) -> Option<MatchId> {
        self.loser_next.map(|link| link.target)
    }

    /// Returns `true` if the match was completed at generation time because one side was
    /// permanently empty.
    pub fn is_bye(&self) -> bool {
        self.status == MatchStatus::Completed
            && self.entrants.iter().filter(|e| e.is_empty()).count() == 1
    }

    /// Returns `true` if the match is still pending but one side will never be filled. The
    /// entrant arriving at the other spot advances without playing.
    pub fn is_walkover(&self) -> bool {
        self.status == MatchStatus::Pending && self.entrants.iter().any(|e| e.is_empty())
    }
}

/// A spot for an Entrant in the bracket.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    Empty,
    #[default]
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Creates a new `EntrantSpot` from an [`Option`]. A `Some(T)` value will translate into
    /// a `Entrant(T)` value, a `None` value will translate into a `Empty` value.
    pub fn new(entrant: Option<T>) -> Self {
        match entrant {
            Some(entrant) => Self::Entrant(entrant),
            None => Self::Empty,
        }
    }

    /// Returns `true` if the `EntrantSpot` is [`Entrant`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bracket_engine_core::EntrantSpot;
    /// let spot = EntrantSpot::Entrant(());
    /// assert!(spot.is_entrant());
    /// ```
    /// [`Entrant`]: Self::Entrant
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns `true` if the `EntrantSpot` is [`Empty`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bracket_engine_core::EntrantSpot;
    /// let spot: EntrantSpot<()> = EntrantSpot::Empty;
    /// assert!(spot.is_empty());
    /// ```
    ///
    /// [`Empty`]: Self::Empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the `EntrantSpot` is [`TBD`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bracket_engine_core::EntrantSpot;
    /// let spot: EntrantSpot<()> = EntrantSpot::TBD;
    /// assert!(spot.is_tbd());
    /// ```
    ///
    /// [`TBD`]: Self::TBD
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Converts an `&EntrantSpot<T>` into an `EntrantSpot<&T>`.
    pub fn as_ref(&self) -> EntrantSpot<&T> {
        match *self {
            Self::Entrant(ref entrant) => EntrantSpot::Entrant(entrant),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }

    /// Maps `EntrantSpot<T>` to `EntrantSpot<U>` by applying `f` on it.
    pub fn map<U, F>(self, f: F) -> EntrantSpot<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Entrant(entrant) => EntrantSpot::Entrant(f(entrant)),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }
}

impl<T> EntrantSpot<T>
where
    T: Copy,
{
    /// Returns the contained entrant, or `None` if the spot is [`Empty`] or [`TBD`].
    ///
    /// [`Empty`]: Self::Empty
    /// [`TBD`]: Self::TBD
    #[inline]
    pub fn entrant(&self) -> Option<T> {
        match self {
            Self::Entrant(entrant) => Some(*entrant),
            _ => None,
        }
    }
}

/// A tournament system.
pub trait System: Sized {
    /// Returns the participants in the order they were handed to the system.
    fn participants(&self) -> &[Participant];

    /// Returns a reference to the generated [`MatchGraph`].
    fn graph(&self) -> &MatchGraph;

    /// Consumes the system, returning the generated [`MatchGraph`].
    fn into_graph(self) -> MatchGraph;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{BracketSection, MatchGraph, MatchStatus};

    #[macro_export]
    macro_rules! participants {
        ($($seed:expr),*$(,)?) => {
            vec![$($crate::Participant::new(
                $seed as u64 * 100,
                format!("Participant {}", $seed),
                $seed,
            )),*]
        };
    }

    #[macro_export]
    macro_rules! option_values {
        ($($key:expr => $val:expr),*$(,)?) => {{
            let mut options = $crate::options::TournamentOptionValues::new();
            $(
                options.set($key, $val);
            )*

            options
        }};
    }

    /// Asserts the structural invariants shared by every elimination graph.
    pub fn assert_linked(graph: &MatchGraph) {
        for (index, m) in graph.iter().enumerate() {
            assert_eq!(m.id.index(), index);
            assert_eq!(m.sequence_number, index + 1);

            if let Some(link) = m.next {
                let next = &graph[link.target];
                assert!(link.target > m.id, "{:?} links backwards", m.id);
                assert!(link.spot < 2);

                if next.section == m.section {
                    assert!(next.round > m.round, "{:?} does not advance a round", m.id);
                }
            }

            if m.section == BracketSection::GrandFinal {
                assert_eq!(m.loser_next, None);
            }

            if m.is_bye() {
                let winner = m.winner.unwrap();
                let link = m.next.unwrap();
                assert_eq!(graph[link.target].entrants[link.spot].entrant(), Some(winner));
            }
        }

        // No spot is fed by more than one link.
        let mut fed = HashSet::new();
        for m in graph.iter() {
            for link in m.next.iter().chain(m.loser_next.iter()) {
                assert!(fed.insert(*link), "{:?} is fed twice", link);
            }
        }

        // Exactly one terminal match per section chain, unless a section has no matches.
        let terminal = graph
            .iter()
            .filter(|m| m.next.is_none() && m.status != MatchStatus::Cancelled)
            .count();
        assert!(terminal <= 1);
    }
}
