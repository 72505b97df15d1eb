use std::ops::Index;
use std::slice::Iter;

use crate::{
    BracketSection, EntrantSpot, Error, Link, Match, MatchId, MatchStatus, ParticipantId, Result,
    TournamentId,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The matches of a tournament in generation order.
///
/// A [`MatchId`] is the index of its match in the graph, so every [`Link`] refers into the same
/// `MatchGraph`. Links always point to a match with a greater id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchGraph {
    tournament_id: TournamentId,
    matches: Vec<Match>,
}

impl MatchGraph {
    #[inline]
    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    #[inline]
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(id.index())
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, Match> {
        self.matches.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    /// Returns an iterator over all matches in `section`.
    pub fn section(&self, section: BracketSection) -> impl Iterator<Item = &Match> + '_ {
        self.matches.iter().filter(move |m| m.section == section)
    }

    /// Returns an iterator over all matches of `round` in `section`.
    pub fn round(
        &self,
        section: BracketSection,
        round: usize,
    ) -> impl Iterator<Item = &Match> + '_ {
        self.section(section).filter(move |m| m.round == round)
    }

    /// Returns the number of rounds in `section`.
    pub fn rounds(&self, section: BracketSection) -> usize {
        self.section(section).map(|m| m.round).max().unwrap_or(0)
    }

    /// Returns an iterator over all matches completed at generation time.
    pub fn byes(&self) -> impl Iterator<Item = &Match> + '_ {
        self.matches.iter().filter(|m| m.is_bye())
    }

    /// Returns the spots the winner and the loser of the match `id` are written to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMatch`] if `id` is not part of the graph and [`Error::ByeMatch`]
    /// if the match is a bye. A bye has already advanced its entrant and must not be filled
    /// again.
    pub fn next_matches(&self, id: MatchId) -> Result<NextMatches> {
        let r#match = self.get(id).ok_or(Error::UnknownMatch(id))?;

        if r#match.is_bye() {
            return Err(Error::ByeMatch(id));
        }

        Ok(NextMatches {
            winner: r#match.next,
            loser: r#match.loser_next,
        })
    }

    #[inline]
    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}

impl Index<MatchId> for MatchGraph {
    type Output = Match;

    #[inline]
    fn index(&self, index: MatchId) -> &Self::Output {
        &self.matches[index.index()]
    }
}

impl AsRef<[Match]> for MatchGraph {
    #[inline]
    fn as_ref(&self) -> &[Match] {
        &self.matches
    }
}

impl<'a> IntoIterator for &'a MatchGraph {
    type Item = &'a Match;
    type IntoIter = Iter<'a, Match>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Information about the matches following a match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NextMatches {
    winner: Option<Link>,
    loser: Option<Link>,
}

impl NextMatches {
    #[inline]
    pub fn winner(&self) -> Option<Link> {
        self.winner
    }

    #[inline]
    pub fn loser(&self) -> Option<Link> {
        self.loser
    }

    /// Returns the spot the winner is written to in `matches`, which must come from the same
    /// [`MatchGraph`].
    pub fn winner_mut<'a>(
        &self,
        matches: &'a mut [Match],
    ) -> Option<&'a mut EntrantSpot<ParticipantId>> {
        Self::spot_mut(self.winner, matches)
    }

    /// Returns the spot the loser is written to in `matches`, which must come from the same
    /// [`MatchGraph`].
    pub fn loser_mut<'a>(
        &self,
        matches: &'a mut [Match],
    ) -> Option<&'a mut EntrantSpot<ParticipantId>> {
        Self::spot_mut(self.loser, matches)
    }

    fn spot_mut(
        link: Option<Link>,
        matches: &mut [Match],
    ) -> Option<&mut EntrantSpot<ParticipantId>> {
        let link = link?;

        matches
            .get_mut(link.target.index())?
            .entrants
            .get_mut(link.spot)
    }
}

/// Collects matches during a single generation call.
///
/// Ids and sequence numbers are handed out in push order. Links are added after the target has
/// been pushed; byes are only resolved in [`build`], once all links exist.
///
/// [`build`]: Self::build
#[derive(Debug)]
pub(crate) struct GraphBuilder {
    tournament_id: TournamentId,
    matches: Vec<Match>,
}

impl GraphBuilder {
    pub fn new(tournament_id: TournamentId, capacity: usize) -> Self {
        Self {
            tournament_id,
            matches: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn push(
        &mut self,
        section: BracketSection,
        round: usize,
        entrants: [EntrantSpot<ParticipantId>; 2],
    ) -> MatchId {
        let id = MatchId(self.matches.len());

        self.matches.push(Match {
            id,
            tournament_id: self.tournament_id,
            round,
            sequence_number: id.index() + 1,
            entrants,
            winner: None,
            loser: None,
            status: MatchStatus::Pending,
            next: None,
            loser_next: None,
            section,
        });

        id
    }

    /// Pushes a match of two spots that are filled later.
    #[inline]
    pub fn push_tbd(&mut self, section: BracketSection, round: usize) -> MatchId {
        self.push(section, round, [EntrantSpot::TBD, EntrantSpot::TBD])
    }

    #[inline]
    pub fn link(&mut self, from: MatchId, target: MatchId, spot: usize) {
        debug_assert!(target > from);
        self.matches[from.index()].next = Some(Link::new(target, spot));
    }

    #[inline]
    pub fn link_loser(&mut self, from: MatchId, target: MatchId, spot: usize) {
        debug_assert!(target > from);
        self.matches[from.index()].loser_next = Some(Link::new(target, spot));
    }

    /// Resolves all byes and returns the finished [`MatchGraph`].
    ///
    /// A match with one entrant and one [`Empty`] spot is completed and its entrant is written
    /// into the next match. A match with two [`Empty`] spots is cancelled and makes its next
    /// spot [`Empty`] in turn. A bye or cancelled match also empties the spot its loser would
    /// have dropped to.
    ///
    /// [`Empty`]: EntrantSpot::Empty
    pub fn build(mut self) -> Result<MatchGraph> {
        // Links only point forward, so a single pass in id order sees every match after all of
        // its feeders.
        for index in 0..self.matches.len() {
            let r#match = &mut self.matches[index];

            let advancing = match r#match.entrants {
                [EntrantSpot::Entrant(entrant), EntrantSpot::Empty]
                | [EntrantSpot::Empty, EntrantSpot::Entrant(entrant)] => {
                    r#match.status = MatchStatus::Completed;
                    r#match.winner = Some(entrant);
                    EntrantSpot::Entrant(entrant)
                }
                [EntrantSpot::Empty, EntrantSpot::Empty] => {
                    r#match.status = MatchStatus::Cancelled;
                    EntrantSpot::Empty
                }
                _ => continue,
            };

            let next = r#match.next;
            let loser_next = r#match.loser_next;

            log::trace!(
                "Resolving match {} without play, advancing {:?}",
                index,
                advancing
            );

            if let Some(link) = next {
                self.write(link, advancing)?;
            }

            if let Some(link) = loser_next {
                self.write(link, EntrantSpot::Empty)?;
            }
        }

        Ok(MatchGraph {
            tournament_id: self.tournament_id,
            matches: self.matches,
        })
    }

    fn write(&mut self, link: Link, value: EntrantSpot<ParticipantId>) -> Result<()> {
        let conflict = Error::SlotConflict {
            target: link.target,
            spot: link.spot,
        };

        let spot = self
            .matches
            .get_mut(link.target.index())
            .and_then(|m| m.entrants.get_mut(link.spot))
            .ok_or_else(|| conflict.clone())?;

        if !spot.is_tbd() {
            return Err(conflict);
        }

        *spot = value;
        Ok(())
    }
}
