use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::standings::Standings;
use crate::{
    DoubleElimination, Error, MatchGraph, Participant, Result, RoundRobin, SeedAssigner,
    SingleElimination, System, TournamentId,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generates all matches of a tournament in `format` for `participants`.
///
/// The returned [`MatchGraph`] is complete: every link is set and all byes are resolved.
///
/// # Errors
///
/// Returns an [`enum@Error`] if fewer than two participants are given, a participant id is used
/// twice, the seeds are invalid for an elimination format or `options` contains an unknown or
/// ill-typed key. No matches are
/// produced in that case.
pub fn generate<I, O>(
    tournament_id: TournamentId,
    format: Format,
    participants: I,
    options: O,
) -> Result<MatchGraph>
where
    I: IntoIterator<Item = Participant>,
    O: Into<TournamentOptionValues>,
{
    Tournament::new(tournament_id, format, participants, options).map(Tournament::into_graph)
}

/// Like [`generate`], but returns [`Error::Cancelled`] without doing any work if `cancelled` is
/// already set. The flag is not checked again once generation has started.
pub fn generate_cancellable<I, O>(
    tournament_id: TournamentId,
    format: Format,
    participants: I,
    options: O,
    cancelled: &AtomicBool,
) -> Result<MatchGraph>
where
    I: IntoIterator<Item = Participant>,
    O: Into<TournamentOptionValues>,
{
    if cancelled.load(Ordering::Acquire) {
        log::debug!("Generation of tournament {} cancelled", tournament_id);
        return Err(Error::Cancelled);
    }

    generate(tournament_id, format, participants, options)
}

/// Checks the participant list shared by all formats. Every id must be unique. Seeds are only
/// checked if `seeded` is `true`.
pub(crate) fn validate_participants(participants: &[Participant], seeded: bool) -> Result<()> {
    if participants.len() < 2 {
        return Err(Error::InsufficientParticipants {
            found: participants.len(),
        });
    }

    let mut ids = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !ids.insert(participant.id) {
            return Err(Error::DuplicateParticipant { id: participant.id });
        }
    }

    if seeded {
        SeedAssigner::validate(participants)?;
    }

    Ok(())
}

/// A tournament of any supported [`Format`].
#[derive(Clone, Debug)]
pub struct Tournament {
    inner: InnerTournament,
}

impl Tournament {
    pub fn new<I, O>(
        tournament_id: TournamentId,
        format: Format,
        participants: I,
        options: O,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Participant>,
        O: Into<TournamentOptionValues>,
    {
        log::debug!("Generating {} tournament {}", format, tournament_id);

        let inner = match format {
            Format::SingleElimination => InnerTournament::SingleElimination(
                SingleElimination::new_with_options(tournament_id, participants, options)?,
            ),
            Format::DoubleElimination => InnerTournament::DoubleElimination(
                DoubleElimination::new_with_options(tournament_id, participants, options)?,
            ),
            Format::RoundRobin => InnerTournament::RoundRobin(RoundRobin::new_with_options(
                tournament_id,
                participants,
                options,
            )?),
        };

        Ok(Self { inner })
    }

    #[inline]
    pub fn format(&self) -> Format {
        match self.inner {
            InnerTournament::SingleElimination(_) => Format::SingleElimination,
            InnerTournament::DoubleElimination(_) => Format::DoubleElimination,
            InnerTournament::RoundRobin(_) => Format::RoundRobin,
        }
    }

    /// Returns the standings before the first match, if the format has any.
    pub fn initial_standings(&self) -> Option<Standings> {
        match &self.inner {
            InnerTournament::RoundRobin(t) => Some(t.initial_standings()),
            _ => None,
        }
    }
}

impl System for Tournament {
    fn participants(&self) -> &[Participant] {
        match &self.inner {
            InnerTournament::SingleElimination(t) => t.participants(),
            InnerTournament::DoubleElimination(t) => t.participants(),
            InnerTournament::RoundRobin(t) => t.participants(),
        }
    }

    fn graph(&self) -> &MatchGraph {
        match &self.inner {
            InnerTournament::SingleElimination(t) => t.graph(),
            InnerTournament::DoubleElimination(t) => t.graph(),
            InnerTournament::RoundRobin(t) => t.graph(),
        }
    }

    fn into_graph(self) -> MatchGraph {
        match self.inner {
            InnerTournament::SingleElimination(t) => t.into_graph(),
            InnerTournament::DoubleElimination(t) => t.into_graph(),
            InnerTournament::RoundRobin(t) => t.into_graph(),
        }
    }
}

#[derive(Clone, Debug)]
enum InnerTournament {
    SingleElimination(SingleElimination),
    DoubleElimination(DoubleElimination),
    RoundRobin(RoundRobin),
}

/// The supported tournament formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Format {
    SingleElimination,
    DoubleElimination,
    RoundRobin,
}

impl Format {
    /// Returns the options accepted by the format.
    pub fn options(self) -> TournamentOptions {
        match self {
            Self::SingleElimination => SingleElimination::options(),
            Self::DoubleElimination => DoubleElimination::options(),
            Self::RoundRobin => RoundRobin::options(),
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleElimination => "single_elimination",
            Self::DoubleElimination => "double_elimination",
            Self::RoundRobin => "round_robin",
        }
    }
}

impl Display for Format {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "single_elimination" => Ok(Self::SingleElimination),
            "double_elimination" => Ok(Self::DoubleElimination),
            "round_robin" => Ok(Self::RoundRobin),
            _ => Err(Error::UnsupportedFormat(s.to_owned())),
        }
    }
}

impl TryFrom<u8> for Format {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::SingleElimination),
            1 => Ok(Self::DoubleElimination),
            2 => Ok(Self::RoundRobin),
            _ => Err(Error::UnsupportedFormat(value.to_string())),
        }
    }
}

impl From<Format> for u8 {
    #[inline]
    fn from(format: Format) -> Self {
        match format {
            Format::SingleElimination => 0,
            Format::DoubleElimination => 1,
            Format::RoundRobin => 2,
        }
    }
}
