// Contention resolver for simultaneous round-1 claims.
//
// Given every unconfirmed team's candidate selection grouped by player,
// players claimed once confirm immediately; players claimed by two or more
// teams go to a uniform-random draw. The resolver is a pure function of the
// claims and the RNG -- applying the outcome to the ledger is the state
// machine's job.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::draft::player::PlayerId;
use crate::teams::TeamId;

/// The result of one resolution pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryOutcome {
    /// Winning team per claimed player.
    pub winners: BTreeMap<PlayerId, TeamId>,
    /// Teams whose claim lost a draw, with the player they missed.
    pub losses: Vec<(TeamId, PlayerId)>,
    /// Whether any player actually went to a draw (2+ claimants).
    pub contested: bool,
}

/// Resolve one pass of simultaneous claims.
///
/// Claim iteration order is deterministic (BTreeMap keyed by player id, and
/// claimant lists in submission order), so a fixed RNG seed replays the same
/// winners.
pub fn resolve<R: Rng>(
    claims: &BTreeMap<PlayerId, Vec<TeamId>>,
    rng: &mut R,
) -> LotteryOutcome {
    let mut outcome = LotteryOutcome {
        winners: BTreeMap::new(),
        losses: Vec::new(),
        contested: false,
    };

    for (&player, claimants) in claims {
        match claimants.as_slice() {
            [] => {}
            [only] => {
                outcome.winners.insert(player, *only);
            }
            many => {
                outcome.contested = true;
                let winner = many[rng.gen_range(0..many.len())];
                info!(
                    "lottery for {}: {} claimants, won by {}",
                    player,
                    many.len(),
                    winner
                );
                outcome.winners.insert(player, winner);
                for &team in many {
                    if team != winner {
                        outcome.losses.push((team, player));
                    }
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn claims(entries: &[(u32, &[u8])]) -> BTreeMap<PlayerId, Vec<TeamId>> {
        entries
            .iter()
            .map(|&(player, teams)| {
                (
                    PlayerId(player),
                    teams.iter().map(|&t| TeamId(t)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn sole_claimant_wins_without_a_draw() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = resolve(&claims(&[(10, &[1]), (11, &[2])]), &mut rng);
        assert!(!outcome.contested);
        assert!(outcome.losses.is_empty());
        assert_eq!(outcome.winners[&PlayerId(10)], TeamId(1));
        assert_eq!(outcome.winners[&PlayerId(11)], TeamId(2));
    }

    #[test]
    fn contested_claim_produces_one_winner_and_the_rest_lose() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let outcome = resolve(&claims(&[(10, &[1, 2, 3])]), &mut rng);
        assert!(outcome.contested);
        let winner = outcome.winners[&PlayerId(10)];
        assert!([TeamId(1), TeamId(2), TeamId(3)].contains(&winner));
        assert_eq!(outcome.losses.len(), 2);
        assert!(outcome.losses.iter().all(|&(t, p)| {
            p == PlayerId(10) && t != winner
        }));
    }

    #[test]
    fn same_seed_replays_same_winner() {
        let input = claims(&[(10, &[1, 2, 3]), (11, &[4, 5])]);
        let a = resolve(&input, &mut ChaCha8Rng::seed_from_u64(42));
        let b = resolve(&input, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a.winners, b.winners);
        assert_eq!(a.losses, b.losses);
    }

    #[test]
    fn draw_is_roughly_uniform() {
        // 3 claimants, 3000 trials: each should win about a third of the
        // time. A wide tolerance keeps the test deterministic-by-seed and
        // far from flaky.
        let input = claims(&[(10, &[1, 2, 3])]);
        let mut counts = [0usize; 3];
        for seed in 0..3000u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = resolve(&input, &mut rng);
            counts[(outcome.winners[&PlayerId(10)].0 - 1) as usize] += 1;
        }
        for &count in &counts {
            assert!(count > 700, "winner distribution skewed: {counts:?}");
        }
    }

    #[test]
    fn mixed_pass_resolves_both_kinds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = resolve(&claims(&[(10, &[1, 2]), (11, &[3])]), &mut rng);
        assert!(outcome.contested);
        assert_eq!(outcome.winners.len(), 2);
        assert_eq!(outcome.winners[&PlayerId(11)], TeamId(3));
        assert_eq!(outcome.losses.len(), 1);
    }
}
