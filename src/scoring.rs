// Autopick scorer: weighted composite of four caller-supplied sub-scores.
//
// The engine's contract is the weighting and aggregation only. Vote
// tallies, team-needs heuristics, player ratings, and realism adjustments
// come from a `ScoreProvider` the embedding application implements.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::player::{Player, PlayerId};
use crate::draft::state::DraftState;
use crate::teams::TeamId;

/// Component weights, expressed as percentages.
///
/// Callers guarantee the four weights sum to 100. The scorer does not
/// self-normalize: a violating set still produces an orderable total
/// (degraded mode), so validate up front where rejection is wanted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub vote: u32,
    pub team_needs: u32,
    pub player_rating: u32,
    pub realism: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            vote: 35,
            team_needs: 30,
            player_rating: 20,
            realism: 15,
        }
    }
}

/// Scoring weights do not sum to 100 percent.
#[derive(Debug, Error)]
#[error("scoring weights sum to {sum}, expected 100")]
pub struct InvalidWeights {
    pub sum: u32,
}

impl ScoringWeights {
    pub fn sum(&self) -> u32 {
        self.vote + self.team_needs + self.player_rating + self.realism
    }

    pub fn validate(&self) -> Result<(), InvalidWeights> {
        let sum = self.sum();
        if sum == 100 {
            Ok(())
        } else {
            Err(InvalidWeights { sum })
        }
    }
}

/// The four raw sub-scores for one player/team pair, supplied per call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub vote_score: f64,
    pub team_needs_score: f64,
    pub player_rating: f64,
    pub realism_score: f64,
}

/// A scored candidate with its component breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub vote_score: f64,
    pub team_needs_score: f64,
    pub player_rating: f64,
    pub realism_score: f64,
    /// Human-readable note naming the dominant weighted component.
    pub reason: String,
}

/// Source of the four sub-scores. Implemented by the embedding application;
/// the engine never derives these itself.
pub trait ScoreProvider: Send {
    fn inputs(&self, team: TeamId, player: &Player, state: &DraftState) -> ScoreInputs;
}

/// Weight and aggregate one candidate's sub-scores.
///
/// `total = (vote_w * vote + needs_w * needs + rating_w * rating +
/// realism_w * realism) / 100`. With weights summing to 100 this is a
/// convex combination; otherwise it is merely scaled, which preserves
/// ordering across candidates scored with the same weights.
pub fn score(weights: &ScoringWeights, inputs: &ScoreInputs) -> ScoreBreakdown {
    let contributions = [
        ("fan votes", weights.vote as f64 * inputs.vote_score),
        ("team needs", weights.team_needs as f64 * inputs.team_needs_score),
        ("player rating", weights.player_rating as f64 * inputs.player_rating),
        ("realism", weights.realism as f64 * inputs.realism_score),
    ];
    let total: f64 = contributions.iter().map(|(_, c)| c).sum::<f64>() / 100.0;

    let (dominant, amount) = contributions
        .iter()
        .fold(("none", f64::MIN), |acc, &(label, c)| {
            if c > acc.1 {
                (label, c)
            } else {
                acc
            }
        });
    let reason = format!("{} led the evaluation ({:.1})", dominant, amount / 100.0);

    ScoreBreakdown {
        total,
        vote_score: inputs.vote_score,
        team_needs_score: inputs.team_needs_score,
        player_rating: inputs.player_rating,
        realism_score: inputs.realism_score,
        reason,
    }
}

/// A candidate paired with its breakdown, in a caller-stable order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub player_id: PlayerId,
    pub breakdown: ScoreBreakdown,
}

/// Pick the maximizing candidate. Ties go to the earliest-indexed entry,
/// so for a fixed candidate order (and fixed upstream lottery seed) the
/// choice is fully deterministic.
pub fn select_best(candidates: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    let mut best: Option<&ScoredCandidate> = None;
    for candidate in candidates {
        match best {
            None => best = Some(candidate),
            Some(current) if candidate.breakdown.total > current.breakdown.total => {
                best = Some(candidate)
            }
            Some(_) => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(vote: f64, needs: f64, rating: f64, realism: f64) -> ScoreInputs {
        ScoreInputs {
            vote_score: vote,
            team_needs_score: needs,
            player_rating: rating,
            realism_score: realism,
        }
    }

    fn candidate(id: u32, weights: &ScoringWeights, i: ScoreInputs) -> ScoredCandidate {
        ScoredCandidate {
            player_id: PlayerId(id),
            breakdown: score(weights, &i),
        }
    }

    #[test]
    fn default_weights_sum_to_100() {
        assert!(ScoringWeights::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_sum() {
        let weights = ScoringWeights {
            vote: 50,
            team_needs: 50,
            player_rating: 50,
            realism: 0,
        };
        let err = weights.validate().unwrap_err();
        assert_eq!(err.sum, 150);
    }

    #[test]
    fn total_is_the_weighted_average() {
        let weights = ScoringWeights {
            vote: 40,
            team_needs: 30,
            player_rating: 20,
            realism: 10,
        };
        let breakdown = score(&weights, &inputs(100.0, 50.0, 80.0, 60.0));
        // 0.4*100 + 0.3*50 + 0.2*80 + 0.1*60 = 77
        assert!((breakdown.total - 77.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_keeps_raw_components() {
        let breakdown = score(&ScoringWeights::default(), &inputs(1.0, 2.0, 3.0, 4.0));
        assert_eq!(breakdown.vote_score, 1.0);
        assert_eq!(breakdown.team_needs_score, 2.0);
        assert_eq!(breakdown.player_rating, 3.0);
        assert_eq!(breakdown.realism_score, 4.0);
    }

    #[test]
    fn reason_names_the_dominant_component() {
        let weights = ScoringWeights::default();
        let breakdown = score(&weights, &inputs(10.0, 90.0, 10.0, 10.0));
        assert!(breakdown.reason.starts_with("team needs"));
    }

    #[test]
    fn off_contract_weights_still_order_candidates() {
        // Degraded mode: sum of 200 scales totals but preserves ordering.
        let weights = ScoringWeights {
            vote: 80,
            team_needs: 60,
            player_rating: 40,
            realism: 20,
        };
        let weaker = score(&weights, &inputs(10.0, 10.0, 10.0, 10.0));
        let stronger = score(&weights, &inputs(20.0, 20.0, 20.0, 20.0));
        assert!(stronger.total > weaker.total);
    }

    #[test]
    fn select_best_maximizes_total() {
        let weights = ScoringWeights::default();
        let candidates = vec![
            candidate(1, &weights, inputs(10.0, 10.0, 10.0, 10.0)),
            candidate(2, &weights, inputs(90.0, 90.0, 90.0, 90.0)),
            candidate(3, &weights, inputs(50.0, 50.0, 50.0, 50.0)),
        ];
        assert_eq!(select_best(&candidates).unwrap().player_id, PlayerId(2));
    }

    #[test]
    fn ties_break_to_the_earliest_candidate() {
        let weights = ScoringWeights::default();
        let same = inputs(40.0, 40.0, 40.0, 40.0);
        let candidates = vec![
            candidate(7, &weights, same),
            candidate(3, &weights, same),
            candidate(9, &weights, same),
        ];
        assert_eq!(select_best(&candidates).unwrap().player_id, PlayerId(7));
    }

    #[test]
    fn empty_candidate_list_selects_nothing() {
        assert!(select_best(&[]).is_none());
    }
}
