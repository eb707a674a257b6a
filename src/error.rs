// Engine error taxonomy.
//
// Every variant is a precondition violation: the operation is rejected and
// no state is mutated. Configuration problems (weights not summing to 100)
// are deliberately NOT errors -- the scorer proceeds in degraded mode and
// callers validate up front via `ScoringWeights::validate`.

use thiserror::Error;

use crate::draft::player::PlayerId;
use crate::teams::TeamId;

#[derive(Debug, Error)]
pub enum DraftError {
    /// A waiver pick was submitted by a team that is not on the clock.
    #[error("team {got} is not on the clock (expected {expected})")]
    NotOnClock { expected: TeamId, got: TeamId },

    /// The operation is not legal in the current phase.
    #[error("operation not valid in phase {phase}")]
    WrongPhase { phase: &'static str },

    /// The player has already been confirmed to another team.
    #[error("player {player} is no longer available")]
    PlayerUnavailable { player: PlayerId },

    /// The team already holds a confirmed round-1 pick and cannot re-enter
    /// the contention loop.
    #[error("team {team} already has a confirmed round-1 pick")]
    AlreadyConfirmed { team: TeamId },

    /// A lottery resolution was requested before every unconfirmed team
    /// submitted a candidate selection.
    #[error("team {team} has not submitted a selection for this attempt")]
    SelectionMissing { team: TeamId },

    /// A team tried to end its participation at a point where it is still
    /// required to pick (round-1 contention, or no confirmed pick yet).
    #[error("team {team} may not finish at this point")]
    FinishNotAllowed { team: TeamId },

    /// The team id does not appear in the team table.
    #[error("unknown team {team}")]
    UnknownTeam { team: TeamId },

    /// The player id does not appear in the player pool.
    #[error("unknown player {player}")]
    UnknownPlayer { player: PlayerId },

    /// A resume snapshot contradicts itself (pointer at a finished team,
    /// duplicate players, out-of-range index, ...).
    #[error("inconsistent resume snapshot: {reason}")]
    InconsistentSnapshot { reason: String },
}
