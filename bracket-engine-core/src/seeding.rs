use std::collections::HashSet;

use crate::{EntrantSpot, Error, Participant, ParticipantId, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in a seeded bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    Participant(ParticipantId),
    Bye,
}

impl Slot {
    #[inline]
    pub fn participant(&self) -> Option<ParticipantId> {
        match self {
            Self::Participant(id) => Some(*id),
            Self::Bye => None,
        }
    }

    #[inline]
    pub fn is_bye(&self) -> bool {
        matches!(self, Self::Bye)
    }
}

impl From<Slot> for EntrantSpot<ParticipantId> {
    #[inline]
    fn from(slot: Slot) -> Self {
        EntrantSpot::new(slot.participant())
    }
}

/// Arranges participants into the slots of an elimination bracket.
///
/// The bracket has `n.next_power_of_two()` slots. The slots left over are byes, which go to the
/// strongest seeds: seed `k` (counting from 0) takes slot `2k` and faces the bye in slot `2k + 1`.
/// The remaining participants fill the remaining slot pairs in seed order, the strongest
/// remaining against the weakest remaining.
#[derive(Copy, Clone, Debug, Default)]
pub struct SeedAssigner;

impl SeedAssigner {
    /// Checks that every seed is positive and used only once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeed`] for a seed of `0` and [`Error::DuplicateSeed`] for a seed
    /// that appears more than once.
    pub fn validate(participants: &[Participant]) -> Result<()> {
        let mut seen = HashSet::with_capacity(participants.len());

        for participant in participants {
            if participant.seed == 0 {
                return Err(Error::InvalidSeed { seed: 0 });
            }

            if !seen.insert(participant.seed) {
                return Err(Error::DuplicateSeed {
                    seed: participant.seed,
                });
            }
        }

        Ok(())
    }

    /// Returns the number of slots of a bracket holding `participants` entrants.
    #[inline]
    pub fn bracket_size(participants: usize) -> usize {
        participants.next_power_of_two()
    }

    /// Returns the number of byes handed out in a bracket holding `participants` entrants.
    #[inline]
    pub fn bye_count(participants: usize) -> usize {
        match participants {
            0..=2 => 0,
            n => Self::bracket_size(n) - n,
        }
    }

    /// Assigns `participants` to slots. The returned `Vec` has exactly
    /// [`bracket_size`] elements.
    ///
    /// Participants are always placed in seed order, so two participants are placed with the
    /// stronger seed in slot 0 regardless of the input order.
    ///
    /// [`bracket_size`]: Self::bracket_size
    pub fn assign(participants: &[Participant]) -> Vec<Slot> {
        let bracket_size = Self::bracket_size(participants.len());

        let mut seeded: Vec<&Participant> = participants.iter().collect();
        seeded.sort_by_key(|p| p.seed);

        let mut slots = vec![Slot::Bye; bracket_size];

        if seeded.len() <= 2 {
            for (slot, participant) in slots.iter_mut().zip(seeded) {
                *slot = Slot::Participant(participant.id);
            }

            return slots;
        }

        let byes = Self::bye_count(seeded.len());
        log::trace!("Assigning {} byes in a bracket of {}", byes, bracket_size);

        for (pair, participant) in seeded[..byes].iter().enumerate() {
            slots[pair * 2] = Slot::Participant(participant.id);
        }

        let remaining = &seeded[byes..];
        let half = remaining.len() / 2;
        for index in 0..half {
            let pair = byes + index;

            slots[pair * 2] = Slot::Participant(remaining[index].id);
            slots[pair * 2 + 1] = Slot::Participant(remaining[remaining.len() - 1 - index].id);
        }

        slots
    }
}

#[cfg(test)]
mod tests {
    use super::{SeedAssigner, Slot};
    use crate::{participants, Error, Participant, ParticipantId};

    fn ids(slots: &[Slot]) -> Vec<Option<u64>> {
        slots.iter().map(|s| s.participant().map(|id| id.0)).collect()
    }

    #[test]
    fn test_validate() {
        assert_eq!(SeedAssigner::validate(&participants![1, 2, 5]), Ok(()));

        let mut list = participants![1, 2];
        list.push(Participant::new(7u64, "Zero", 0));
        assert_eq!(
            SeedAssigner::validate(&list),
            Err(Error::InvalidSeed { seed: 0 })
        );

        let mut list = participants![1, 2];
        list.push(Participant::new(7u64, "Again", 2));
        assert_eq!(
            SeedAssigner::validate(&list),
            Err(Error::DuplicateSeed { seed: 2 })
        );
    }

    #[test]
    fn test_bye_count() {
        assert_eq!(SeedAssigner::bye_count(2), 0);
        assert_eq!(SeedAssigner::bye_count(3), 1);
        assert_eq!(SeedAssigner::bye_count(4), 0);
        assert_eq!(SeedAssigner::bye_count(5), 3);
        assert_eq!(SeedAssigner::bye_count(9), 7);
    }

    #[test]
    fn test_assign_two() {
        let slots = SeedAssigner::assign(&participants![2, 1]);

        assert_eq!(ids(&slots), vec![Some(100), Some(200)]);
    }

    #[test]
    fn test_assign_four() {
        let slots = SeedAssigner::assign(&participants![1, 2, 3, 4]);

        assert_eq!(ids(&slots), vec![Some(100), Some(400), Some(200), Some(300)]);
    }

    #[test]
    fn test_assign_five() {
        let slots = SeedAssigner::assign(&participants![1, 2, 3, 4, 5]);

        assert_eq!(
            ids(&slots),
            vec![
                Some(100),
                None,
                Some(200),
                None,
                Some(300),
                None,
                Some(400),
                Some(500),
            ]
        );
    }

    #[test]
    fn test_assign_orders_by_seed() {
        let slots = SeedAssigner::assign(&participants![6, 3, 1, 5, 2, 4]);

        assert_eq!(
            ids(&slots),
            vec![
                Some(100),
                None,
                Some(200),
                None,
                Some(300),
                Some(600),
                Some(400),
                Some(500),
            ]
        );
    }

    #[test]
    fn test_assign_sparse_seeds() {
        let list = vec![
            Participant::new(1u64, "A", 10),
            Participant::new(2u64, "B", 30),
            Participant::new(3u64, "C", 20),
        ];

        let slots = SeedAssigner::assign(&list);

        assert_eq!(
            slots,
            vec![
                Slot::Participant(ParticipantId(1)),
                Slot::Bye,
                Slot::Participant(ParticipantId(3)),
                Slot::Participant(ParticipantId(2)),
            ]
        );
    }

    #[test]
    fn test_assign_every_participant_once() {
        for n in 2usize..=33 {
            let list: Vec<Participant> = (1..=n as u32)
                .map(|seed| Participant::new(u64::from(seed), "", seed))
                .collect();

            let slots = SeedAssigner::assign(&list);
            let byes = slots.iter().filter(|s| s.is_bye()).count();

            assert_eq!(slots.len(), n.next_power_of_two());
            assert_eq!(byes, SeedAssigner::bye_count(n));

            let mut seen: Vec<u64> = slots
                .iter()
                .filter_map(|s| s.participant())
                .map(|id| id.0)
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, (1..=n as u64).collect::<Vec<_>>());

            // Byes never face each other.
            for pair in slots.chunks(2) {
                assert!(!(pair[0].is_bye() && pair[1].is_bye()));
            }
        }
    }
}
