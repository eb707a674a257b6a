// Simulation driver: sequences round-1 contention and the waiver phases
// end to end, suspending at caller-supplied hook points.
//
// Sequential, cooperative model: the driver is a single logical actor that
// owns all mutable state; "suspension" is an await on a hook future, never
// a second thread. Callers read state between suspension points and may
// abandon the run at any of them -- appends are individually atomic, so
// partial state is always valid and resumable.

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::draft::lottery::LotteryOutcome;
use crate::draft::pick::{ConfirmedPick, LotteryLoss};
use crate::draft::player::{Player, PlayerId, PlayerPool};
use crate::draft::state::{DraftSnapshot, DraftState, Phase};
use crate::error::DraftError;
use crate::scoring::{self, ScoreProvider, ScoredCandidate};
use crate::teams::{OrderTables, Team, TeamId};

/// What a hook wants done with the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickDecision {
    /// Pick this player.
    Select(PlayerId),
    /// Voluntarily end the team's participation in the current phase.
    Finish,
    /// Defer to the autopick scorer.
    Auto,
}

/// Snapshot of a completed round, handed to the round-complete hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    pub phase: Phase,
    pub round: u32,
    /// All confirmed picks so far, not just this round's.
    pub picks: Vec<ConfirmedPick>,
    pub losses: Vec<LotteryLoss>,
    /// Whether any lottery draw occurred in this round.
    pub had_lottery: bool,
}

/// Final (or suspended) output of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResult {
    pub picks: Vec<ConfirmedPick>,
    pub losses: Vec<LotteryLoss>,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Complete(DraftResult),
    /// The caller halted mid-waiver via the pick-confirmation hook. The
    /// snapshot resumes a later run from exactly this point.
    Suspended {
        snapshot: DraftSnapshot,
        result: DraftResult,
    },
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// The driver's four suspension points. Every method has a default, so an
/// autonomous run needs no hook implementation at all.
#[async_trait]
pub trait DraftHooks: Send {
    /// Choose a pick for the team on the clock (human mode). The default
    /// defers to the autopick scorer.
    async fn pick_for(
        &mut self,
        _team: TeamId,
        _state: &DraftState,
        _available: &[&Player],
    ) -> PickDecision {
        PickDecision::Auto
    }

    /// Called after each round-1 resolution pass, before the next attempt.
    /// A caller playing a reveal animation awaits its end here.
    async fn lottery_revealed(&mut self, _outcome: &LotteryOutcome) {}

    /// Called after every full round.
    async fn round_complete(&mut self, _report: &RoundReport) {}

    /// Called after each confirmed waiver pick. Return false to suspend
    /// the run; the outcome then carries a resumable snapshot.
    async fn pick_confirmed(&mut self, _pick: &ConfirmedPick) -> bool {
        true
    }
}

/// Hook implementation that never intervenes: fully autonomous run.
pub struct NoHooks;

#[async_trait]
impl DraftHooks for NoHooks {}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Drives one draft run across all phases.
pub struct SimulationDriver<H: DraftHooks> {
    state: DraftState,
    pool: PlayerPool,
    config: SimConfig,
    provider: Box<dyn ScoreProvider>,
    hooks: H,
    rng: ChaCha8Rng,
}

impl<H: DraftHooks> SimulationDriver<H> {
    pub fn new(
        teams: Vec<Team>,
        orders: OrderTables,
        pool: PlayerPool,
        config: SimConfig,
        provider: Box<dyn ScoreProvider>,
        hooks: H,
    ) -> Self {
        if let Err(e) = config.weights.validate() {
            // Degraded mode, not an error: totals stay orderable.
            warn!("proceeding with off-contract scoring weights: {e}");
        }
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        SimulationDriver {
            state: DraftState::new(teams, orders),
            pool,
            config,
            provider,
            hooks,
            rng,
        }
    }

    /// Build a driver resuming from a waiver-phase snapshot. Round-1
    /// contention is skipped entirely; history is only appended forward.
    pub fn resume(
        teams: Vec<Team>,
        orders: OrderTables,
        mut pool: PlayerPool,
        config: SimConfig,
        provider: Box<dyn ScoreProvider>,
        hooks: H,
        snapshot: DraftSnapshot,
    ) -> Result<Self, DraftError> {
        if let Err(e) = config.weights.validate() {
            warn!("proceeding with off-contract scoring weights: {e}");
        }
        let state = DraftState::from_snapshot(teams, orders, snapshot)?;
        for pick in state.ledger().picks() {
            if !pool.mark_taken(pick.player_id) {
                return Err(DraftError::InconsistentSnapshot {
                    reason: format!("{} is missing from the pool", pick.player_id),
                });
            }
        }
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(SimulationDriver {
            state,
            pool,
            config,
            provider,
            hooks,
            rng,
        })
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    /// Run to completion or to a caller-requested suspension.
    pub async fn run(mut self) -> Result<RunOutcome, DraftError> {
        info!(
            "draft run starting: phase {}, {} players in pool",
            self.state.phase().name(),
            self.pool.remaining()
        );

        if self.state.phase() == Phase::FirstRoundLottery {
            let had_lottery = self.run_first_round().await?;
            if self.state.phase() != Phase::Complete {
                let report = self.round_report(Phase::FirstRoundLottery, 1, had_lottery);
                self.hooks.round_complete(&report).await;
            }
        }

        self.run_waiver_phases().await
    }

    // -- round 1 ----------------------------------------------------------

    /// Selection -> resolve -> re-select losers, until every team holds its
    /// round-1 pick. Returns whether any lottery draw occurred.
    async fn run_first_round(&mut self) -> Result<bool, DraftError> {
        let mut had_lottery = false;

        while self.state.phase() == Phase::FirstRoundLottery {
            for team in self.state.unconfirmed_round_one_teams() {
                let available = self.pool.available();
                if available.is_empty() {
                    self.state.end_phase_pool_exhausted();
                    return Ok(had_lottery);
                }
                let decision = self.hooks.pick_for(team, &self.state, &available).await;
                let player_id = match decision {
                    PickDecision::Select(id) => id,
                    PickDecision::Finish => {
                        return Err(DraftError::FinishNotAllowed { team })
                    }
                    PickDecision::Auto => match self.autopick(team, &available) {
                        Some(id) => id,
                        None => {
                            self.state.end_phase_pool_exhausted();
                            return Ok(had_lottery);
                        }
                    },
                };
                let player = self
                    .pool
                    .get(player_id)
                    .ok_or(DraftError::UnknownPlayer { player: player_id })?;
                self.state.submit_selection(team, player)?;
            }

            let outcome = self.state.resolve_lottery(&mut self.rng)?;
            for &player in outcome.winners.keys() {
                self.pool.mark_taken(player);
            }
            if outcome.contested {
                had_lottery = true;
            }
            if self.config.reveal_lottery {
                self.hooks.lottery_revealed(&outcome).await;
            }
        }

        Ok(had_lottery)
    }

    // -- waiver phases ----------------------------------------------------

    async fn run_waiver_phases(&mut self) -> Result<RunOutcome, DraftError> {
        while self.state.phase().is_waiver() {
            let phase_before = self.state.phase();
            let round_before = self.state.round();
            let team = match self.state.on_clock() {
                Some(team) => team,
                None => break,
            };

            // Autonomous finish policy: a team at its conventional target
            // for this phase bows out when it next comes on the clock.
            let development = phase_before.is_development();
            let target = if development {
                self.config.development_target_picks
            } else {
                self.config.regular_target_picks
            };
            if self.state.ledger().team_phase_pick_count(team, development)
                >= target as usize
            {
                self.state.mark_finished(team)?;
                self.emit_round_transitions(phase_before, round_before).await;
                continue;
            }

            let available = self.pool.available();
            if available.is_empty() {
                self.state.end_phase_pool_exhausted();
                self.emit_round_transitions(phase_before, round_before).await;
                continue;
            }

            let decision = self.hooks.pick_for(team, &self.state, &available).await;
            let player_id = match decision {
                PickDecision::Select(id) => id,
                PickDecision::Finish => {
                    self.state.mark_finished(team)?;
                    self.emit_round_transitions(phase_before, round_before).await;
                    continue;
                }
                PickDecision::Auto => match self.autopick(team, &available) {
                    Some(id) => id,
                    None => {
                        self.state.end_phase_pool_exhausted();
                        self.emit_round_transitions(phase_before, round_before).await;
                        continue;
                    }
                },
            };

            let player = self
                .pool
                .get(player_id)
                .ok_or(DraftError::UnknownPlayer { player: player_id })?;
            let pick = self.state.submit_pick(team, player)?;
            self.pool.mark_taken(player_id);

            let proceed = self.hooks.pick_confirmed(&pick).await;
            self.emit_round_transitions(phase_before, round_before).await;

            if !proceed && self.state.phase().is_waiver() {
                info!("run suspended by caller after {}'s pick", team);
                return Ok(RunOutcome::Suspended {
                    snapshot: self.state.snapshot(),
                    result: self.result(),
                });
            }
        }

        info!(
            "draft run complete: {} picks ({} non-exempt), {} lottery losses",
            self.state.ledger().picks().len(),
            self.state.ledger().non_exempt_count(),
            self.state.ledger().losses().len()
        );
        Ok(RunOutcome::Complete(self.result()))
    }

    /// Emit the round-complete hook when the pointer rolled into a new
    /// round or phase.
    async fn emit_round_transitions(&mut self, phase_before: Phase, round_before: u32) {
        if self.state.phase() != phase_before || self.state.round() != round_before {
            let report = self.round_report(phase_before, round_before, false);
            self.hooks.round_complete(&report).await;
        }
    }

    fn round_report(&self, phase: Phase, round: u32, had_lottery: bool) -> RoundReport {
        RoundReport {
            phase,
            round,
            picks: self.state.ledger().picks().to_vec(),
            losses: self.state.ledger().losses().to_vec(),
            had_lottery,
        }
    }

    fn result(&self) -> DraftResult {
        DraftResult {
            picks: self.state.ledger().picks().to_vec(),
            losses: self.state.ledger().losses().to_vec(),
        }
    }

    /// Score every available player for the team and take the maximum.
    fn autopick(&self, team: TeamId, available: &[&Player]) -> Option<PlayerId> {
        let candidates: Vec<ScoredCandidate> = available
            .iter()
            .map(|player| ScoredCandidate {
                player_id: player.id,
                breakdown: scoring::score(
                    &self.config.weights,
                    &self.provider.inputs(team, player, &self.state),
                ),
            })
            .collect();
        let best = scoring::select_best(&candidates)?;
        debug!(
            "autopick for {}: {} (total {:.1}, {})",
            team, best.player_id, best.breakdown.total, best.breakdown.reason
        );
        Some(best.player_id)
    }
}
