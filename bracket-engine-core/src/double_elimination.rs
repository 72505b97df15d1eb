use std::ops::Range;

use crate::graph::GraphBuilder;
use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::tournament::validate_participants;
use crate::utils::NumExt;
use crate::{
    BracketSection, Match, MatchGraph, MatchId, Participant, Result, SeedAssigner,
    SingleElimination, System, TournamentId,
};

/// A double elimination tournament.
///
/// The matches are stored in three consecutive sections: the winners bracket, the losers
/// bracket and the two grand finals.
///
/// The losers bracket has `2 * (winner_rounds - 1)` rounds. Odd rounds pair the entrants that
/// are already in the losers bracket, even rounds let those survivors meet the entrants
/// dropping in from the winners bracket. Round 1 is the exception: it only takes the losers of
/// the first winners round, two per match.
///
/// The first grand final pairs the winners bracket champion (spot 0) with the losers bracket
/// champion (spot 1). The second grand final is a reset that is only played if the losers
/// bracket champion wins the first. It is always part of the graph, but filling it is left to
/// the result workflow.
#[derive(Clone, Debug)]
pub struct DoubleElimination {
    participants: Vec<Participant>,
    graph: MatchGraph,
    bracket_size: usize,
    winners: Range<usize>,
    losers: Range<usize>,
    grand_finals: Range<usize>,
}

impl DoubleElimination {
    /// Creates a new `DoubleElimination` tournament with the given `participants`.
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

    /// Creates a new `DoubleElimination` tournament with the given `participants` and using the
    /// given `options`.
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
            "Creating a new DoubleElimination bracket with {} participants",
            participants.len()
        );

        let slots = SeedAssigner::assign(&participants);
        let bracket_size = slots.len();

        let mut builder = GraphBuilder::new(tournament_id, Self::calculate_matches(bracket_size));

        // With only two slots there is nothing to drop into a losers bracket. The grand final
        // is the only match that is played, the reset stays to keep the shape uniform.
        if bracket_size <= 2 {
            let first = builder.push(
                BracketSection::GrandFinal,
                1,
                [slots[0].into(), slots[1].into()],
            );
            let reset = builder.push_tbd(BracketSection::GrandFinal, 2);
            builder.link(first, reset, 0);

            return Ok(Self {
                participants,
                graph: builder.build()?,
                bracket_size,
                winners: 0..0,
                losers: 0..0,
                grand_finals: 0..2,
            });
        }

        let winners = SingleElimination::build(&mut builder, &slots, BracketSection::Winners);
        let winners_end = builder.len();

        let losers = Self::build_losers(&mut builder, bracket_size);
        let losers_end = builder.len();

        // Drop the losers of every winners round into the losers bracket.
        for (index, round) in winners.iter().enumerate() {
            let target_round = Self::drop_in_round(index + 1);
            let targets = &losers[target_round - 1];

            for (position, id) in round.iter().enumerate() {
                // The first round fills both spots of a losers match, later rounds only meet
                // a survivor waiting in spot 0.
                let spot = match index {
                    0 => position / targets.len(),
                    _ => 1,
                };

                builder.link_loser(*id, targets[position % targets.len()], spot);
            }
        }

        let (winners_final, losers_final) = match (winners.last(), losers.last()) {
            (Some(w), Some(l)) => (w[0], l[0]),
            _ => unreachable!("brackets of 4 or more slots have both sections"),
        };

        let round = winners.len().max(losers.len()) + 1;
        let first = builder.push_tbd(BracketSection::GrandFinal, round);
        let reset = builder.push_tbd(BracketSection::GrandFinal, round + 1);

        builder.link(winners_final, first, 0);
        builder.link(losers_final, first, 1);
        builder.link(first, reset, 0);

        let graph = builder.build()?;

        log::debug!(
            "Created a new DoubleElimination bracket with {} matches",
            graph.len()
        );

        Ok(Self {
            participants,
            graph,
            bracket_size,
            winners: 0..winners_end,
            losers: winners_end..losers_end,
            grand_finals: losers_end..losers_end + 2,
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

    /// Returns the matches of the winners bracket.
    #[inline]
    pub fn winners(&self) -> &[Match] {
        &self.graph.as_slice()[self.winners.clone()]
    }

    /// Returns the matches of the losers bracket.
    #[inline]
    pub fn losers(&self) -> &[Match] {
        &self.graph.as_slice()[self.losers.clone()]
    }

    /// Returns the grand final followed by the reset match.
    #[inline]
    pub fn grand_finals(&self) -> &[Match] {
        &self.graph.as_slice()[self.grand_finals.clone()]
    }

    /// Calculates the number of matches of a bracket with `bracket_size` slots.
    pub fn calculate_matches(bracket_size: usize) -> usize {
        match bracket_size {
            0..=2 => 2,
            // (n - 1) winners, (n - 2) losers and 2 grand finals.
            n => n * 2 - 1,
        }
    }

    /// Returns the number of rounds in the losers bracket.
    #[inline]
    pub fn losers_rounds(bracket_size: usize) -> usize {
        bracket_size.ilog2_ceil().saturating_sub(1) * 2
    }

    /// Returns the number of matches in `round` of the losers bracket.
    pub fn losers_round_size(bracket_size: usize, round: usize) -> usize {
        match round {
            0 => 0,
            r if r % 2 == 1 => bracket_size >> (r.half_round_up() + 1),
            r => Self::losers_round_size(bracket_size, r - 1),
        }
    }

    /// Returns the losers round the losers of winners round `round` drop into.
    #[inline]
    fn drop_in_round(round: usize) -> usize {
        match round {
            1 => 1,
            r => 2 * r - 2,
        }
    }

    fn build_losers(builder: &mut GraphBuilder, bracket_size: usize) -> Vec<Vec<MatchId>> {
        let num_rounds = Self::losers_rounds(bracket_size);
        let mut rounds: Vec<Vec<MatchId>> = Vec::with_capacity(num_rounds);

        for round in 1..=num_rounds {
            let ids: Vec<MatchId> = (0..Self::losers_round_size(bracket_size, round))
                .map(|_| builder.push_tbd(BracketSection::Losers, round))
                .collect();

            if let Some(previous) = rounds.last() {
                for (index, id) in previous.iter().enumerate() {
                    if (round - 1) % 2 == 1 {
                        // The next round is the same size: survivors wait in spot 0 for the
                        // entrants dropping in.
                        builder.link(*id, ids[index], 0);
                    } else {
                        builder.link(*id, ids[index / 2], index % 2);
                    }
                }
            }

            log::trace!("Built losers round {} with {} matches", round, ids.len());
            rounds.push(ids);
        }

        rounds
    }
}

impl System for DoubleElimination {
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

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::DoubleElimination;
    use crate::tests::assert_linked;
    use crate::{
        participants, BracketSection, EntrantSpot, Link, MatchGraph, MatchId, MatchStatus,
        Participant, ParticipantId, System, TournamentId,
    };

    const TID: TournamentId = TournamentId(7);

    fn seeded(n: u32) -> Vec<Participant> {
        (1..=n)
            .map(|seed| Participant::new(u64::from(seed) * 100, format!("P{}", seed), seed))
            .collect()
    }

    fn entrant(id: u64) -> EntrantSpot<ParticipantId> {
        EntrantSpot::Entrant(ParticipantId(id))
    }

    /// Every spot outside the first winners round is fed by exactly one link. The second spot
    /// of the reset is filled by the result workflow.
    fn assert_fed(graph: &MatchGraph) {
        let fed: HashSet<Link> = graph
            .iter()
            .flat_map(|m| m.next.into_iter().chain(m.loser_next))
            .collect();

        let reset = graph.len() - 1;

        for r#match in graph.iter() {
            // The first round is seeded. Without a winners bracket this is the grand final.
            if r#match.round == 1 && r#match.section != BracketSection::Losers {
                continue;
            }

            for spot in 0..2 {
                if r#match.id.index() == reset && spot == 1 {
                    continue;
                }

                assert!(
                    fed.contains(&Link::new(r#match.id, spot)),
                    "spot {} of {:?} is never filled",
                    spot,
                    r#match.id
                );
            }
        }
    }

    #[test]
    fn test_losers_round_size() {
        let sizes: Vec<usize> = (1..=DoubleElimination::losers_rounds(16))
            .map(|round| DoubleElimination::losers_round_size(16, round))
            .collect();

        assert_eq!(sizes, vec![4, 4, 2, 2, 1, 1]);
        assert_eq!(DoubleElimination::losers_rounds(4), 2);
        assert_eq!(DoubleElimination::losers_rounds(2), 0);
    }

    #[test]
    fn test_double_elimination_two() {
        let tournament = DoubleElimination::new(TID, participants![1, 2]).unwrap();

        assert!(tournament.winners().is_empty());
        assert!(tournament.losers().is_empty());

        let finals = tournament.grand_finals();
        assert_eq!(finals.len(), 2);
        assert_eq!(finals[0].entrants, [entrant(100), entrant(200)]);
        assert_eq!(finals[0].next_match_id(), Some(finals[1].id));
        assert_eq!(finals[1].entrants, [EntrantSpot::TBD, EntrantSpot::TBD]);
        assert_eq!(finals[1].next, None);
        assert!(finals.iter().all(|m| m.section == BracketSection::GrandFinal));

        assert_linked(tournament.graph());
    }

    #[test]
    fn test_double_elimination_four() {
        let tournament = DoubleElimination::new(TID, participants![1, 2, 3, 4]).unwrap();
        let graph = tournament.graph();

        assert_eq!(tournament.winners().len(), 3);
        assert_eq!(graph.rounds(BracketSection::Winners), 2);
        assert_eq!(tournament.losers().len(), 2);
        assert_eq!(graph.rounds(BracketSection::Losers), 2);
        assert_eq!(tournament.grand_finals().len(), 2);

        assert_eq!(graph[MatchId(0)].entrants, [entrant(100), entrant(400)]);
        assert_eq!(graph[MatchId(1)].entrants, [entrant(200), entrant(300)]);

        // Winners round 1 fills the first losers match.
        assert_eq!(graph[MatchId(0)].loser_next, Some(Link::new(MatchId(3), 0)));
        assert_eq!(graph[MatchId(1)].loser_next, Some(Link::new(MatchId(3), 1)));
        // The winners final loser meets the losers round 1 survivor.
        assert_eq!(graph[MatchId(2)].loser_next, Some(Link::new(MatchId(4), 1)));
        assert_eq!(graph[MatchId(3)].next, Some(Link::new(MatchId(4), 0)));

        assert_eq!(graph[MatchId(2)].next, Some(Link::new(MatchId(5), 0)));
        assert_eq!(graph[MatchId(4)].next, Some(Link::new(MatchId(5), 1)));
        assert_eq!(graph[MatchId(5)].next, Some(Link::new(MatchId(6), 0)));
        assert_eq!(graph[MatchId(5)].round, 3);
        assert_eq!(graph[MatchId(6)].round, 4);

        for r#match in tournament.winners() {
            assert!(r#match.loser_next.is_some());
        }

        assert_linked(graph);
        assert_fed(graph);
    }

    #[test]
    fn test_double_elimination_sequence() {
        let tournament = DoubleElimination::new(TID, seeded(8)).unwrap();
        let graph = tournament.graph();

        let sections: Vec<BracketSection> = graph.iter().map(|m| m.section).collect();
        let mut expected = vec![BracketSection::Winners; 7];
        expected.extend([BracketSection::Losers; 6]);
        expected.extend([BracketSection::GrandFinal; 2]);
        assert_eq!(sections, expected);

        let losers_rounds: Vec<usize> = tournament.losers().iter().map(|m| m.round).collect();
        assert_eq!(losers_rounds, vec![1, 1, 2, 2, 3, 4]);

        for (index, r#match) in graph.iter().enumerate() {
            assert_eq!(r#match.sequence_number, index + 1);
        }
    }

    #[test]
    fn test_double_elimination_cross_links() {
        for n in [8, 16] {
            let tournament = DoubleElimination::new(TID, seeded(n)).unwrap();
            let graph = tournament.graph();
            let losers = tournament.losers();
            let bracket_size = n as usize;

            // Round and index within that round of a losers match.
            let position = |id: MatchId| -> (usize, usize) {
                let round = graph[id].round;
                let index = losers
                    .iter()
                    .filter(|m| m.round == round)
                    .position(|m| m.id == id)
                    .unwrap();
                (round, index)
            };

            for winners_round in 1..=graph.rounds(BracketSection::Winners) {
                let target_round = match winners_round {
                    1 => 1,
                    w => 2 * w - 2,
                };
                let count = DoubleElimination::losers_round_size(bracket_size, target_round);

                for (index, r#match) in graph
                    .round(BracketSection::Winners, winners_round)
                    .enumerate()
                {
                    let link = r#match.loser_next.unwrap();
                    let spot = match winners_round {
                        1 => index / count,
                        _ => 1,
                    };

                    assert_eq!(position(link.target), (target_round, index % count));
                    assert_eq!(link.spot, spot);
                }
            }

            let last = DoubleElimination::losers_rounds(bracket_size);
            for r#match in losers {
                let link = r#match.next.unwrap();
                let (round, index) = position(r#match.id);

                if round == last {
                    assert_eq!(link, Link::new(tournament.grand_finals()[0].id, 1));
                } else if round % 2 == 1 {
                    assert_eq!(position(link.target), (round + 1, index));
                    assert_eq!(link.spot, 0);
                } else {
                    assert_eq!(position(link.target), (round + 1, index / 2));
                    assert_eq!(link.spot, index % 2);
                }
            }

            if n == 8 {
                let drops: Vec<Link> = graph
                    .round(BracketSection::Winners, 1)
                    .map(|m| m.loser_next.unwrap())
                    .collect();

                assert_eq!(
                    drops,
                    vec![
                        Link::new(MatchId(7), 0),
                        Link::new(MatchId(8), 0),
                        Link::new(MatchId(7), 1),
                        Link::new(MatchId(8), 1),
                    ]
                );
            }
        }
    }

    #[test]
    fn test_double_elimination_five() {
        let tournament = DoubleElimination::new(TID, participants![1, 2, 3, 4, 5]).unwrap();
        let graph = tournament.graph();

        assert_eq!(graph.len(), 15);
        assert_eq!(graph.byes().count(), 3);

        // Both feeders of the first losers match are byes.
        assert_eq!(graph[MatchId(7)].status, MatchStatus::Cancelled);
        assert_eq!(
            graph[MatchId(7)].entrants,
            [EntrantSpot::Empty, EntrantSpot::Empty]
        );

        assert!(graph[MatchId(8)].is_walkover());
        assert_eq!(
            graph[MatchId(8)].entrants,
            [EntrantSpot::Empty, EntrantSpot::TBD]
        );
        assert!(graph[MatchId(9)].is_walkover());
        assert_eq!(
            graph[MatchId(9)].entrants,
            [EntrantSpot::Empty, EntrantSpot::TBD]
        );
        assert_eq!(graph[MatchId(10)].entrants, [EntrantSpot::TBD; 2]);

        assert_linked(graph);
        assert_fed(graph);
    }

    #[test]
    fn test_double_elimination_sizes() {
        for n in 2..=40 {
            let tournament = DoubleElimination::new(TID, seeded(n)).unwrap();
            let graph = tournament.graph();
            let bracket_size = (n as usize).next_power_of_two();

            assert_eq!(
                graph.len(),
                DoubleElimination::calculate_matches(bracket_size)
            );
            assert_eq!(tournament.grand_finals().len(), 2);

            if bracket_size > 2 {
                assert_eq!(tournament.winners().len(), bracket_size - 1);
                assert_eq!(tournament.losers().len(), bracket_size - 2);
                assert_eq!(
                    graph.rounds(BracketSection::Losers),
                    DoubleElimination::losers_rounds(bracket_size)
                );
            }

            for r#match in tournament.winners() {
                assert!(r#match.loser_next.is_some());
                assert_eq!(
                    graph[r#match.loser_next_match_id().unwrap()].section,
                    BracketSection::Losers
                );
            }

            for r#match in tournament.losers() {
                assert_eq!(r#match.loser_next, None);
            }

            assert_linked(graph);
            assert_fed(graph);
        }
    }

    #[test]
    fn test_double_elimination_deterministic() {
        let a = DoubleElimination::new(TID, seeded(11)).unwrap();
        let b = DoubleElimination::new(TID, seeded(11)).unwrap();

        assert_eq!(a.graph(), b.graph());
    }
}
