// Draft simulation entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, env-filtered)
// 2. Load config (config/draft.toml, defaults when absent)
// 3. Build the team table, order tables, and a demonstration player pool
// 4. Run one autonomous draft with logging hooks
// 5. Log the final summary

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};

use draft_engine::config::{self, ConfigError, SimConfig};
use draft_engine::draft::lottery::LotteryOutcome;
use draft_engine::draft::player::{Player, PlayerCategory, PlayerId, PlayerPool, Position};
use draft_engine::draft::state::DraftState;
use draft_engine::scoring::{ScoreInputs, ScoreProvider};
use draft_engine::sim::{DraftHooks, RoundReport, RunOutcome, SimulationDriver};
use draft_engine::teams::{league_teams, OrderTables, TeamId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("draft simulation starting up");

    // 2. Load config, falling back to defaults when the file is absent
    let config_path = Path::new("config/draft.toml");
    let config = match config::load_config(config_path) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound { path }) => {
            info!("no config at {}, using defaults", path.display());
            SimConfig::default()
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };
    info!(
        "config: seed={}, regular target {}, development target {}",
        config.seed, config.regular_target_picks, config.development_target_picks
    );

    // 3. Teams, orders, and a synthetic scouting pool
    let teams = league_teams();
    let orders = OrderTables::standard();
    let pool = PlayerPool::new(demo_pool(180));
    info!("pool loaded: {} draftable players", pool.remaining());

    // 4. Run one autonomous draft
    let driver = SimulationDriver::new(
        teams.clone(),
        orders,
        pool,
        config,
        Box::new(DemoRatings),
        ConsoleHooks,
    );
    let outcome = driver.run().await.context("draft run failed")?;

    // 5. Final summary
    let result = match outcome {
        RunOutcome::Complete(result) => result,
        RunOutcome::Suspended { result, .. } => {
            warn!("run suspended before completion");
            result
        }
    };
    for team in &teams {
        let count = result
            .picks
            .iter()
            .filter(|p| p.team_id == team.id)
            .count();
        info!("{}: {} picks", team.short_name, count);
    }
    info!(
        "draft finished: {} picks, {} lottery losses",
        result.picks.len(),
        result.losses.len()
    );
    Ok(())
}

/// Initialize tracing to stderr with an env-filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_engine=info,draft_sim=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Demonstration collaborators
// ---------------------------------------------------------------------------

/// Deterministic synthetic player pool. Category and position cycle with
/// the index; every ninth player comes from the independent league.
fn demo_pool(count: u32) -> Vec<Player> {
    (1..=count)
        .map(|i| {
            let category = match i % 9 {
                0 => PlayerCategory::IndependentLeague,
                1..=3 => PlayerCategory::HighSchool,
                4..=6 => PlayerCategory::College,
                _ => PlayerCategory::Corporate,
            };
            let position = match i % 4 {
                0 => Position::Pitcher,
                1 => Position::Infielder,
                2 => Position::Outfielder,
                _ => Position::Catcher,
            };
            Player {
                id: PlayerId(i),
                name: format!("Prospect {i:03}"),
                category,
                positions: vec![position],
                tags: vec![],
            }
        })
        .collect()
}

/// Stand-in score source: rating decays with pool index (scouts ranked the
/// list), needs favor positions the team has drafted least.
struct DemoRatings;

impl ScoreProvider for DemoRatings {
    fn inputs(&self, team: TeamId, player: &Player, state: &DraftState) -> ScoreInputs {
        let rating = 100.0 - (player.id.0 as f64 * 0.5).min(95.0);
        let same_position = state
            .ledger()
            .picks()
            .iter()
            .filter(|p| p.team_id == team)
            .filter(|p| {
                // Position is not stored on the pick; approximate repetition
                // pressure with the player-id cycle used by demo_pool.
                p.player_id.0 % 4 == player.id.0 % 4
            })
            .count() as f64;
        ScoreInputs {
            vote_score: rating,
            team_needs_score: (100.0 - same_position * 20.0).max(0.0),
            player_rating: rating,
            realism_score: 50.0,
        }
    }
}

/// Hooks that narrate the run through tracing.
struct ConsoleHooks;

#[async_trait]
impl DraftHooks for ConsoleHooks {
    async fn lottery_revealed(&mut self, outcome: &LotteryOutcome) {
        if outcome.contested {
            for (player, team) in &outcome.winners {
                info!("lottery: {} goes to {}", player, team);
            }
        }
    }

    async fn round_complete(&mut self, report: &RoundReport) {
        info!(
            "{} round {} complete: {} picks so far{}",
            report.phase.name(),
            report.round,
            report.picks.len(),
            if report.had_lottery { " (lottery drawn)" } else { "" }
        );
    }
}
