use crate::graph::GraphBuilder;
use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::tournament::validate_participants;
use crate::utils::NumExt;
use crate::{
    BracketSection, MatchGraph, MatchId, Participant, Result, SeedAssigner, Slot, System,
    TournamentId,
};

/// A single elimination tournament.
#[derive(Clone, Debug)]
pub struct SingleElimination {
    participants: Vec<Participant>,
    graph: MatchGraph,
    bracket_size: usize,
}

impl SingleElimination {
    /// Creates a new `SingleElimination` tournament with the given `participants`.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if fewer than two participants are given or the seeds are
    /// invalid.
    ///
    /// [`enum@Error`]: crate::Error
    pub fn new<I>(tournament_id: TournamentId, participants: I) -> Result<Self>
    where
        I: IntoIterator<Item = Participant>,
    {
        Self::new_with_options(tournament_id, participants, TournamentOptionValues::new())
    }

    /// Creates a new `SingleElimination` tournament with the given `participants` and using the
    /// given `options`.
    ///
    /// If you don't need to specify the options consider using [`new`].
    ///
    /// [`new`]: Self::new
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
        validate_participants(&participants, true)?;

        log::debug!(
            "Creating new SingleElimination bracket with {} participants",
            participants.len()
        );

        let slots = SeedAssigner::assign(&participants);
        let bracket_size = slots.len();

        let mut builder = GraphBuilder::new(tournament_id, Self::calculate_matches(bracket_size));
        Self::build(&mut builder, &slots, BracketSection::Winners);
        let graph = builder.build()?;

        log::debug!(
            "Created new SingleElimination bracket with {} matches",
            graph.len()
        );

        Ok(Self {
            participants,
            graph,
            bracket_size,
        })
    }

    /// Returns the [`TournamentOptions`] accepted by this system.
    pub fn options() -> TournamentOptions {
        TournamentOptions::base().build()
    }

    /// Returns the number of slots in the first round, including byes.
    #[inline]
    pub fn bracket_size(&self) -> usize {
        self.bracket_size
    }

    /// Returns the number of rounds.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.bracket_size.ilog2_ceil()
    }

    /// Calculates the number of matches of a bracket with `bracket_size` slots.
    #[inline]
    pub fn calculate_matches(bracket_size: usize) -> usize {
        bracket_size.saturating_sub(1)
    }

    /// Pushes the matches for `slots` into `builder` and links every match to the following
    /// round. The first round pairs the slots `2i` and `2i + 1`; match `i` of a round advances
    /// to match `i / 2` of the next round, taking spot `i % 2`.
    ///
    /// Returns the ids of the pushed matches, grouped by round.
    pub(crate) fn build(
        builder: &mut GraphBuilder,
        slots: &[Slot],
        section: BracketSection,
    ) -> Vec<Vec<MatchId>> {
        debug_assert!(slots.len() >= 2 && slots.len().is_power_of_two());

        let bracket_size = slots.len();
        let num_rounds = bracket_size.ilog2_ceil();

        let mut rounds: Vec<Vec<MatchId>> = Vec::with_capacity(num_rounds);

        let first: Vec<MatchId> = slots
            .chunks_exact(2)
            .map(|pair| builder.push(section, 1, [pair[0].into(), pair[1].into()]))
            .collect();
        rounds.push(first);

        for round in 2..=num_rounds {
            let ids: Vec<MatchId> = (0..bracket_size >> round)
                .map(|_| builder.push_tbd(section, round))
                .collect();

            for (index, id) in rounds[round - 2].iter().enumerate() {
                builder.link(*id, ids[index / 2], index % 2);
            }

            log::trace!("Built round {} with {} matches", round, ids.len());
            rounds.push(ids);
        }

        rounds
    }
}

impl System for SingleElimination {
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
