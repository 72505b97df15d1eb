use crate::graph::GraphBuilder;
use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::standings::Standings;
use crate::tournament::validate_participants;
use crate::{
    BracketSection, EntrantSpot, MatchGraph, Participant, Result, Slot, System, TournamentId,
};

/// A round robin tournament where every participant meets every other participant once.
///
/// Fixtures are scheduled with the circle method. With an odd number of participants a virtual
/// bye joins the circle; whoever is paired with it has no fixture in that round. Seeds play no
/// part in the pairing.
#[derive(Clone, Debug)]
pub struct RoundRobin {
    participants: Vec<Participant>,
    graph: MatchGraph,
}

impl RoundRobin {
    /// Creates a new `RoundRobin` tournament with the given `participants`.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if fewer than two participants are given or a participant id is
    /// used twice.
    ///
    /// [`enum@Error`]: crate::Error
    pub fn new<I>(tournament_id: TournamentId, participants: I) -> Result<Self>
    where
        I: IntoIterator<Item = Participant>,
    {
        Self::new_with_options(tournament_id, participants, TournamentOptionValues::new())
    }

    pub fn new_with_options<I, O>(
        tournament_id: TournamentId,
        participants: I,
        options: O,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Participant>,
        O: Into<TournamentOptionValues>,
    {
        let options = options.into().merge(Self::options())?;
        log::debug!("Using options: {:?}", options);

        let participants: Vec<Participant> = participants.into_iter().collect();
        validate_participants(&participants, false)?;

        log::debug!(
            "Creating new RoundRobin bracket with {} participants",
            participants.len()
        );

        // The circle always has an even size, padded with a virtual bye.
        let mut circle: Vec<Slot> = participants
            .iter()
            .map(|participant| Slot::Participant(participant.id))
            .collect();
        if circle.len() % 2 != 0 {
            circle.push(Slot::Bye);
        }

        let size = circle.len();
        let num_rounds = size - 1;

        let mut builder = GraphBuilder::new(
            tournament_id,
            Self::calculate_matches(participants.len()),
        );

        for round in 0..num_rounds {
            for index in 0..size / 2 {
                let first = circle[Self::circle_entrant(size, round, index)];
                let second = circle[Self::circle_entrant(size, round, size - index - 1)];

                match (first, second) {
                    (Slot::Participant(first), Slot::Participant(second)) => {
                        builder.push(
                            BracketSection::None,
                            round + 1,
                            [EntrantSpot::Entrant(first), EntrantSpot::Entrant(second)],
                        );
                    }
                    (Slot::Participant(entrant), Slot::Bye)
                    | (Slot::Bye, Slot::Participant(entrant)) => {
                        log::trace!("{} has no fixture in round {}", entrant, round + 1);
                    }
                    (Slot::Bye, Slot::Bye) => unreachable!("the circle holds a single bye"),
                }
            }
        }

        let graph = builder.build()?;

        log::debug!(
            "Created new RoundRobin bracket with {} matches",
            graph.len()
        );

        Ok(Self {
            participants,
            graph,
        })
    }

    /// Returns the [`TournamentOptions`] accepted by this system.
    pub fn options() -> TournamentOptions {
        TournamentOptions::base().build()
    }

    /// Returns the number of rounds.
    #[inline]
    pub fn rounds(&self) -> usize {
        Self::calculate_rounds(self.participants.len())
    }

    /// Calculates the number of rounds for `participants` entrants.
    #[inline]
    pub fn calculate_rounds(participants: usize) -> usize {
        match participants {
            0 | 1 => 0,
            n if n % 2 == 0 => n - 1,
            n => n,
        }
    }

    /// Calculates the number of matches for `participants` entrants.
    #[inline]
    pub fn calculate_matches(participants: usize) -> usize {
        participants * participants.saturating_sub(1) / 2
    }

    /// Builds the standings before any match is played: all participants ordered by seed, with
    /// the number of scheduled matches and the number of rounds without a fixture.
    pub fn initial_standings(&self) -> Standings {
        let mut seeded: Vec<&Participant> = self.participants.iter().collect();
        seeded.sort_by_key(|participant| participant.seed);

        let rounds = self.rounds() as u64;

        let mut builder = Standings::builder();
        builder.key("seed").key("name").key("matches").key("byes");

        for participant in seeded {
            let matches = self
                .graph
                .iter()
                .filter(|m| m.entrants.iter().any(|e| e.entrant() == Some(participant.id)))
                .count() as u64;

            builder.entry(participant.id, |entry| {
                entry
                    .value(u64::from(participant.seed))
                    .value(participant.display_name.clone())
                    .value(matches)
                    .value(rounds.saturating_sub(matches));
            });
        }

        builder.build()
    }

    /// Returns the position in the circle that is at `index` in `round`, for a circle of `n`
    /// positions. Position 0 is pinned, all others move one place per round.
    #[inline]
    fn circle_entrant(n: usize, round: usize, index: usize) -> usize {
        debug_assert!(n % 2 == 0);

        if index == 0 {
            return 0;
        }

        match index as isize - round as isize {
            res if res <= 0 => n - res.unsigned_abs() - 1,
            res => res as usize,
        }
    }
}

impl System for RoundRobin {
    #[inline]
    fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[inline]
    fn graph(&self) -> &MatchGraph {
        &self.graph
    }

    #[inline]
    fn into_graph(self) -> MatchGraph {
        self.graph
    }
}
