// The pick ledger: confirmed picks and lottery losses.
//
// Both records are append-only for the lifetime of a simulation. Everything
// else about a team ("finished" status aside) is derived from these vectors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::player::{PlayerCategory, PlayerId};
use crate::teams::{TeamId, TEAM_COUNT};

/// Global cap on confirmed picks of cap-counting players. Reaching it ends
/// the simulation immediately, even mid-round.
pub const MAX_TOTAL_PICKS: usize = 120;

/// A confirmed draft pick. Never mutated or removed once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedPick {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    /// Denormalized for display and audit output.
    pub player_name: String,
    /// Denormalized so cap counting never needs the pool.
    pub category: PlayerCategory,
    pub round: u32,
    pub is_development: bool,
}

/// A lost lottery claim. Permanent audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryLoss {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub round: u32,
    /// Per-round monotonic sequence over loss appends. Any one team's
    /// subsequence is strictly increasing, which is what reconstructing
    /// "this team's Nth rejected claim in round R" needs.
    pub attempt_order: u32,
}

/// The actual round number implied by a count of prior confirmed picks.
///
/// During round-1 contention the local re-selection attempt counter says
/// nothing about the round; the round is always derived from ledger size.
pub fn round_for_pick_count(prior_confirmed: usize) -> u32 {
    (prior_confirmed / TEAM_COUNT) as u32 + 1
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Append-only record of confirmed picks and lottery losses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickLedger {
    picks: Vec<ConfirmedPick>,
    losses: Vec<LotteryLoss>,
}

impl PickLedger {
    pub fn new() -> Self {
        PickLedger::default()
    }

    /// Rebuild a ledger from previously recorded picks and losses.
    pub fn from_records(picks: Vec<ConfirmedPick>, losses: Vec<LotteryLoss>) -> Self {
        PickLedger { picks, losses }
    }

    pub fn picks(&self) -> &[ConfirmedPick] {
        &self.picks
    }

    pub fn losses(&self) -> &[LotteryLoss] {
        &self.losses
    }

    /// Append a confirmed pick.
    pub fn record_pick(&mut self, pick: ConfirmedPick) {
        debug!(
            "confirmed: {} -> {} (round {}{})",
            pick.player_name,
            pick.team_id,
            pick.round,
            if pick.is_development { ", development" } else { "" }
        );
        self.picks.push(pick);
    }

    /// Append a lottery loss, assigning the next attempt_order for the round.
    pub fn record_loss(&mut self, team_id: TeamId, player_id: PlayerId, round: u32) {
        let attempt_order = self
            .losses
            .iter()
            .filter(|l| l.round == round)
            .count() as u32;
        debug!(
            "lottery loss: {} missed {} (round {}, attempt_order {})",
            team_id, player_id, round, attempt_order
        );
        self.losses.push(LotteryLoss {
            team_id,
            player_id,
            round,
            attempt_order,
        });
    }

    /// Number of confirmed picks counting toward the global cap.
    pub fn non_exempt_count(&self) -> usize {
        self.picks
            .iter()
            .filter(|p| p.category.counts_toward_cap())
            .count()
    }

    pub fn cap_reached(&self) -> bool {
        self.non_exempt_count() >= MAX_TOTAL_PICKS
    }

    /// Total confirmed picks for one team, both phases.
    pub fn team_pick_count(&self, team: TeamId) -> usize {
        self.picks.iter().filter(|p| p.team_id == team).count()
    }

    /// Confirmed picks for one team within one phase.
    pub fn team_phase_pick_count(&self, team: TeamId, development: bool) -> usize {
        self.picks
            .iter()
            .filter(|p| p.team_id == team && p.is_development == development)
            .count()
    }

    /// Whether the team holds its confirmed round-1 regular pick.
    pub fn team_has_round_one_pick(&self, team: TeamId) -> bool {
        self.picks
            .iter()
            .any(|p| p.team_id == team && p.round == 1 && !p.is_development)
    }

    /// Number of confirmed round-1 regular picks.
    pub fn round_one_count(&self) -> usize {
        self.picks
            .iter()
            .filter(|p| p.round == 1 && !p.is_development)
            .count()
    }

    /// Whether the player already appears in the confirmed picks.
    pub fn is_player_confirmed(&self, player: PlayerId) -> bool {
        self.picks.iter().any(|p| p.player_id == player)
    }
}
