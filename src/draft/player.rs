// Players, categories, and the available-player pool.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Player identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Where a draftable player comes from.
///
/// Independent-league players are exempt from the global 120-pick cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerCategory {
    HighSchool,
    College,
    Corporate,
    IndependentLeague,
}

impl PlayerCategory {
    /// Whether a pick of this player counts toward the global pick cap.
    pub fn counts_toward_cap(&self) -> bool {
        !matches!(self, PlayerCategory::IndependentLeague)
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            PlayerCategory::HighSchool => "high school",
            PlayerCategory::College => "college",
            PlayerCategory::Corporate => "corporate",
            PlayerCategory::IndependentLeague => "independent league",
        }
    }
}

impl fmt::Display for PlayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Playing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Pitcher,
    Catcher,
    Infielder,
    Outfielder,
}

impl Position {
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::Infielder => "IF",
            Position::Outfielder => "OF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A draftable player. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub category: PlayerCategory,
    /// Positions the player can fill; primary position first.
    pub positions: Vec<Position>,
    /// Free-form evaluation tags from scouting reports.
    #[serde(default)]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Player pool
// ---------------------------------------------------------------------------

/// The ordered pool of draftable players.
///
/// Players leave the available view when confirmed to a team; the underlying
/// list keeps its load order so autopick tie-breaking is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPool {
    players: Vec<Player>,
    taken: BTreeSet<PlayerId>,
}

impl PlayerPool {
    pub fn new(players: Vec<Player>) -> Self {
        PlayerPool {
            players,
            taken: BTreeSet::new(),
        }
    }

    /// Look up a player by id, whether or not it has been taken.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Whether the player exists and has not been confirmed to a team.
    pub fn is_available(&self, id: PlayerId) -> bool {
        !self.taken.contains(&id) && self.get(id).is_some()
    }

    /// All not-yet-confirmed players, in load order.
    pub fn available(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| !self.taken.contains(&p.id))
            .collect()
    }

    /// Remove a player from the available view. Returns false if the player
    /// was unknown or already taken.
    pub fn mark_taken(&mut self, id: PlayerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.taken.insert(id)
    }

    /// Number of players still available.
    pub fn remaining(&self) -> usize {
        self.players.len() - self.taken.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(n: u32) -> PlayerPool {
        let players = (1..=n)
            .map(|i| Player {
                id: PlayerId(i),
                name: format!("Player {i}"),
                category: PlayerCategory::College,
                positions: vec![Position::Pitcher],
                tags: vec![],
            })
            .collect();
        PlayerPool::new(players)
    }

    #[test]
    fn independent_league_is_cap_exempt() {
        assert!(PlayerCategory::HighSchool.counts_toward_cap());
        assert!(PlayerCategory::College.counts_toward_cap());
        assert!(PlayerCategory::Corporate.counts_toward_cap());
        assert!(!PlayerCategory::IndependentLeague.counts_toward_cap());
    }

    #[test]
    fn available_preserves_load_order() {
        let mut pool = pool_of(5);
        pool.mark_taken(PlayerId(2));
        pool.mark_taken(PlayerId(4));
        let ids: Vec<u32> = pool.available().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn mark_taken_rejects_unknown_and_double_takes() {
        let mut pool = pool_of(3);
        assert!(pool.mark_taken(PlayerId(1)));
        assert!(!pool.mark_taken(PlayerId(1)));
        assert!(!pool.mark_taken(PlayerId(99)));
        assert_eq!(pool.remaining(), 2);
    }

    #[test]
    fn is_available_tracks_taken_set() {
        let mut pool = pool_of(2);
        assert!(pool.is_available(PlayerId(1)));
        pool.mark_taken(PlayerId(1));
        assert!(!pool.is_available(PlayerId(1)));
        assert!(!pool.is_available(PlayerId(99)));
    }

    #[test]
    fn exhaustion() {
        let mut pool = pool_of(1);
        assert!(!pool.is_exhausted());
        pool.mark_taken(PlayerId(1));
        assert!(pool.is_exhausted());
    }
}
