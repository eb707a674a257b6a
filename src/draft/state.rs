// Draft state: phase machine, round-1 contention bookkeeping, and the
// waiver sequencer.
//
// `DraftState` is the single owned value holding everything the protocol
// mutates: the append-only ledger, the finished set, the current round and
// waiver pointer, and the in-flight round-1 candidate selections. Order
// tables are immutable configuration injected at construction. Callers
// drive it through discrete operations; there are no captured callbacks and
// no module-level state.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::draft::lottery::{self, LotteryOutcome};
use crate::draft::pick::{round_for_pick_count, ConfirmedPick, LotteryLoss, PickLedger};
use crate::draft::player::{Player, PlayerCategory, PlayerId};
use crate::error::DraftError;
use crate::teams::{OrderTables, Team, TeamId, TEAM_COUNT};

/// Where the simulation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Round 1: simultaneous selection and lottery resolution.
    FirstRoundLottery,
    /// Rounds >= 2 of the regular draft, strict turn order.
    RegularWaiver,
    /// The development draft, strict turn order, same global cap.
    DevelopmentWaiver,
    /// Terminal.
    Complete,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::FirstRoundLottery => "first-round lottery",
            Phase::RegularWaiver => "regular waiver",
            Phase::DevelopmentWaiver => "development waiver",
            Phase::Complete => "complete",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Phase::DevelopmentWaiver)
    }

    pub fn is_waiver(&self) -> bool {
        matches!(self, Phase::RegularWaiver | Phase::DevelopmentWaiver)
    }
}

/// A team's in-flight candidate selection. Transient: cleared by every
/// resolution pass (winners confirm, losers re-select).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub player_id: PlayerId,
    pub player_name: String,
    pub category: PlayerCategory,
}

impl From<&Player> for Selection {
    fn from(player: &Player) -> Self {
        Selection {
            player_id: player.id,
            player_name: player.name.clone(),
            category: player.category,
        }
    }
}

/// Serializable point-in-time capture of the draft, sufficient to resume
/// a waiver phase from exactly where a run was abandoned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub waiver_index: usize,
    pub picks: Vec<ConfirmedPick>,
    pub losses: Vec<LotteryLoss>,
    pub finished: BTreeSet<TeamId>,
}

// ---------------------------------------------------------------------------
// DraftState
// ---------------------------------------------------------------------------

/// The complete mutable state of one draft run.
#[derive(Debug, Clone)]
pub struct DraftState {
    teams: Vec<Team>,
    orders: OrderTables,
    ledger: PickLedger,
    phase: Phase,
    round: u32,
    waiver_index: usize,
    finished: BTreeSet<TeamId>,
    pending: BTreeMap<TeamId, Selection>,
}

impl DraftState {
    pub fn new(teams: Vec<Team>, orders: OrderTables) -> Self {
        DraftState {
            teams,
            orders,
            ledger: PickLedger::new(),
            phase: Phase::FirstRoundLottery,
            round: 1,
            waiver_index: 0,
            finished: BTreeSet::new(),
            pending: BTreeMap::new(),
        }
    }

    // -- read access ------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn waiver_index(&self) -> usize {
        self.waiver_index
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn ledger(&self) -> &PickLedger {
        &self.ledger
    }

    pub fn finished(&self) -> &BTreeSet<TeamId> {
        &self.finished
    }

    /// The team's in-flight round-1 selection, if any.
    pub fn pending_selection(&self, team: TeamId) -> Option<&Selection> {
        self.pending.get(&team)
    }

    /// Teams still lacking a confirmed round-1 pick, in table order.
    pub fn unconfirmed_round_one_teams(&self) -> Vec<TeamId> {
        self.orders
            .order_for(false, 1)
            .iter()
            .copied()
            .filter(|&t| !self.ledger.team_has_round_one_pick(t))
            .collect()
    }

    /// The team currently on the clock, if a waiver phase is active.
    pub fn on_clock(&self) -> Option<TeamId> {
        if !self.phase.is_waiver() {
            return None;
        }
        let order = self
            .orders
            .order_for(self.phase.is_development(), self.round);
        Some(order[self.waiver_index])
    }

    fn known_team(&self, team: TeamId) -> Result<(), DraftError> {
        if self.teams.iter().any(|t| t.id == team) {
            Ok(())
        } else {
            Err(DraftError::UnknownTeam { team })
        }
    }

    // -- round-1 contention -----------------------------------------------

    /// Record a team's candidate selection for the current attempt.
    ///
    /// Resubmitting before resolution overwrites the earlier candidate.
    /// Re-claiming a player the team lost in an earlier attempt is legal as
    /// long as the player has not been confirmed.
    pub fn submit_selection(
        &mut self,
        team: TeamId,
        player: &Player,
    ) -> Result<(), DraftError> {
        self.known_team(team)?;
        if self.phase != Phase::FirstRoundLottery {
            return Err(DraftError::WrongPhase {
                phase: self.phase.name(),
            });
        }
        if self.ledger.team_has_round_one_pick(team) {
            return Err(DraftError::AlreadyConfirmed { team });
        }
        if self.ledger.is_player_confirmed(player.id) {
            return Err(DraftError::PlayerUnavailable { player: player.id });
        }
        self.pending.insert(team, Selection::from(player));
        Ok(())
    }

    /// Resolve one pass of simultaneous claims.
    ///
    /// Requires a selection from every unconfirmed team. Winners become
    /// confirmed picks at the round implied by the ledger size (not the
    /// local attempt counter); losers are recorded and must re-select.
    /// Transitions to the regular waiver phase once all twelve round-1
    /// picks exist.
    pub fn resolve_lottery<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Result<LotteryOutcome, DraftError> {
        if self.phase != Phase::FirstRoundLottery {
            return Err(DraftError::WrongPhase {
                phase: self.phase.name(),
            });
        }
        for team in self.unconfirmed_round_one_teams() {
            if !self.pending.contains_key(&team) {
                return Err(DraftError::SelectionMissing { team });
            }
        }

        // Group claims per player; claimant lists keep team-id order from
        // the pending map so resolution is deterministic for a fixed seed.
        let mut claims: BTreeMap<PlayerId, Vec<TeamId>> = BTreeMap::new();
        for (&team, selection) in &self.pending {
            claims.entry(selection.player_id).or_default().push(team);
        }

        let outcome = lottery::resolve(&claims, rng);

        for (&player_id, &winner) in &outcome.winners {
            let selection = &self.pending[&winner];
            let round = round_for_pick_count(self.ledger.picks().len());
            self.ledger.record_pick(ConfirmedPick {
                team_id: winner,
                player_id,
                player_name: selection.player_name.clone(),
                category: selection.category,
                round,
                is_development: false,
            });
        }
        for &(team, player) in &outcome.losses {
            self.ledger.record_loss(team, player, self.round);
        }

        // Every pending team either won or lost this pass.
        self.pending.clear();

        if self.ledger.round_one_count() == TEAM_COUNT {
            info!("round 1 complete, entering regular waiver at round 2");
            self.phase = Phase::RegularWaiver;
            self.round = 2;
            self.waiver_index = 0;
        }

        Ok(outcome)
    }

    // -- waiver sequencer -------------------------------------------------

    /// Confirm a waiver pick for the team on the clock.
    ///
    /// Returns the appended pick. Reaching the global cap transitions to
    /// `Complete` immediately, even mid-round; otherwise the pointer
    /// advances past any finished teams, rolling the round or phase over
    /// when the order is exhausted.
    pub fn submit_pick(
        &mut self,
        team: TeamId,
        player: &Player,
    ) -> Result<ConfirmedPick, DraftError> {
        self.known_team(team)?;
        let expected = self.on_clock().ok_or(DraftError::WrongPhase {
            phase: self.phase.name(),
        })?;
        if team != expected {
            return Err(DraftError::NotOnClock {
                expected,
                got: team,
            });
        }
        if self.ledger.is_player_confirmed(player.id) {
            return Err(DraftError::PlayerUnavailable { player: player.id });
        }

        let pick = ConfirmedPick {
            team_id: team,
            player_id: player.id,
            player_name: player.name.clone(),
            category: player.category,
            round: self.round,
            is_development: self.phase.is_development(),
        };
        self.ledger.record_pick(pick.clone());

        if self.ledger.cap_reached() {
            info!("global pick cap reached, draft complete");
            self.phase = Phase::Complete;
        } else {
            self.advance_pointer();
        }
        Ok(pick)
    }

    /// Voluntarily end a team's participation in the current phase.
    ///
    /// Legal for any team holding at least one confirmed pick, outside
    /// round-1 contention. Idempotent. If the team is on the clock the
    /// pointer advances immediately.
    pub fn mark_finished(&mut self, team: TeamId) -> Result<(), DraftError> {
        self.known_team(team)?;
        match self.phase {
            Phase::FirstRoundLottery => {
                return Err(DraftError::FinishNotAllowed { team });
            }
            Phase::Complete => {
                return Err(DraftError::WrongPhase {
                    phase: self.phase.name(),
                });
            }
            Phase::RegularWaiver | Phase::DevelopmentWaiver => {}
        }
        if self.ledger.team_pick_count(team) == 0 {
            return Err(DraftError::FinishNotAllowed { team });
        }
        if !self.finished.insert(team) {
            return Ok(());
        }
        info!("{} finished for the {} phase", team, self.phase.name());
        if self.on_clock() == Some(team) {
            self.advance_pointer();
        }
        Ok(())
    }

    /// End the current phase because no draftable player remains.
    ///
    /// Equivalent to every remaining team finishing at once. During round-1
    /// contention an exhausted pool leaves nothing for any later phase
    /// either, so the draft completes outright.
    pub fn end_phase_pool_exhausted(&mut self) {
        warn!(
            "player pool exhausted during {} phase, forcing completion",
            self.phase.name()
        );
        match self.phase {
            Phase::FirstRoundLottery => {
                self.pending.clear();
                self.phase = Phase::Complete;
            }
            Phase::RegularWaiver | Phase::DevelopmentWaiver => self.end_phase(),
            Phase::Complete => {}
        }
    }

    /// Move the pointer to the next non-finished team, rolling into the
    /// next round or phase when this round's order is exhausted.
    fn advance_pointer(&mut self) {
        let development = self.phase.is_development();
        let order = self.orders.order_for(development, self.round);
        if let Some(next) = (self.waiver_index + 1..TEAM_COUNT)
            .find(|&i| !self.finished.contains(&order[i]))
        {
            self.waiver_index = next;
            return;
        }
        self.start_next_round();
    }

    fn start_next_round(&mut self) {
        let next_round = self.round + 1;
        let order = self
            .orders
            .order_for(self.phase.is_development(), next_round);
        match (0..TEAM_COUNT).find(|&i| !self.finished.contains(&order[i])) {
            Some(first) => {
                self.round = next_round;
                self.waiver_index = first;
            }
            None => self.end_phase(),
        }
    }

    /// Phase handoff: regular -> development (finished set cleared, round
    /// reset), development -> complete.
    fn end_phase(&mut self) {
        match self.phase {
            Phase::RegularWaiver => {
                info!(
                    "regular phase over ({} picks), entering development draft",
                    self.ledger.picks().len()
                );
                self.phase = Phase::DevelopmentWaiver;
                self.finished.clear();
                self.round = 1;
                self.waiver_index = 0;
            }
            Phase::DevelopmentWaiver => {
                info!("development phase over, draft complete");
                self.phase = Phase::Complete;
            }
            Phase::FirstRoundLottery | Phase::Complete => {}
        }
    }

    // -- snapshots --------------------------------------------------------

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            phase: self.phase,
            round: self.round,
            waiver_index: self.waiver_index,
            picks: self.ledger.picks().to_vec(),
            losses: self.ledger.losses().to_vec(),
            finished: self.finished.clone(),
        }
    }

    /// Rebuild a state from a snapshot taken at a waiver-phase suspension
    /// point. Round-1 contention is never resumed; the snapshot must carry
    /// a complete round 1.
    pub fn from_snapshot(
        teams: Vec<Team>,
        orders: OrderTables,
        snapshot: DraftSnapshot,
    ) -> Result<Self, DraftError> {
        let inconsistent = |reason: &str| DraftError::InconsistentSnapshot {
            reason: reason.to_string(),
        };

        if !snapshot.phase.is_waiver() {
            return Err(inconsistent("phase is not resumable"));
        }
        if snapshot.waiver_index >= TEAM_COUNT {
            return Err(inconsistent("waiver index out of range"));
        }
        let min_round = if snapshot.phase.is_development() { 1 } else { 2 };
        if snapshot.round < min_round {
            return Err(inconsistent("round below the phase's first round"));
        }

        let ledger = PickLedger::from_records(snapshot.picks, snapshot.losses);
        if ledger.round_one_count() != TEAM_COUNT {
            return Err(inconsistent("round 1 is not complete"));
        }
        if ledger.cap_reached() {
            return Err(inconsistent("pick cap already reached"));
        }
        let mut seen = BTreeSet::new();
        for pick in ledger.picks() {
            if !teams.iter().any(|t| t.id == pick.team_id) {
                return Err(inconsistent("pick references an unknown team"));
            }
            if !seen.insert(pick.player_id) {
                return Err(inconsistent("player confirmed more than once"));
            }
        }
        for &team in &snapshot.finished {
            if !teams.iter().any(|t| t.id == team) {
                return Err(inconsistent("finished set references an unknown team"));
            }
        }

        let order = orders.order_for(snapshot.phase.is_development(), snapshot.round);
        if snapshot.finished.contains(&order[snapshot.waiver_index]) {
            return Err(inconsistent("pointer rests on a finished team"));
        }

        Ok(DraftState {
            teams,
            orders,
            ledger,
            phase: snapshot.phase,
            round: snapshot.round,
            waiver_index: snapshot.waiver_index,
            finished: snapshot.finished,
            pending: BTreeMap::new(),
        })
    }
}
