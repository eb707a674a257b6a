// Team table and waiver-order tables.
//
// The twelve clubs and the four fixed turn-order permutations (regular and
// development phase, odd and even rounds) are immutable configuration,
// injected into the draft state at construction. `order_for` is the single
// place round parity is consulted.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of participating teams. The draft protocol is defined for exactly
/// twelve clubs; the order tables are 12-element permutations.
pub const TEAM_COUNT: usize = 12;

/// Team identifier, valid range 1..=12.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TeamId(pub u8);

impl TeamId {
    /// Construct a TeamId, rejecting ids outside 1..=12.
    pub fn new(raw: u8) -> Option<Self> {
        (1..=TEAM_COUNT as u8).contains(&raw).then_some(TeamId(raw))
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// A participating club.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Full club name (e.g. "Chunichi Dragons").
    pub name: String,
    /// Short display name (e.g. "Dragons").
    pub short_name: String,
}

/// The default twelve-club table.
pub fn league_teams() -> Vec<Team> {
    const CLUBS: [(u8, &str, &str); TEAM_COUNT] = [
        (1, "Yomiuri Giants", "Giants"),
        (2, "Hanshin Tigers", "Tigers"),
        (3, "Chunichi Dragons", "Dragons"),
        (4, "Hiroshima Toyo Carp", "Carp"),
        (5, "Tokyo Yakult Swallows", "Swallows"),
        (6, "Yokohama DeNA BayStars", "BayStars"),
        (7, "Fukuoka SoftBank Hawks", "Hawks"),
        (8, "Chiba Lotte Marines", "Marines"),
        (9, "Hokkaido Nippon-Ham Fighters", "Fighters"),
        (10, "Orix Buffaloes", "Buffaloes"),
        (11, "Saitama Seibu Lions", "Lions"),
        (12, "Tohoku Rakuten Golden Eagles", "Eagles"),
    ];
    CLUBS
        .iter()
        .map(|&(id, name, short)| Team {
            id: TeamId(id),
            name: name.to_string(),
            short_name: short.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Order tables
// ---------------------------------------------------------------------------

/// A turn-order table failed permutation validation.
#[derive(Debug, Error)]
#[error("order table `{table}` is not a permutation of the twelve team ids")]
pub struct InvalidOrderTable {
    pub table: &'static str,
}

/// The four fixed turn-order permutations.
///
/// Rounds >= 2 of the regular phase and every round of the development
/// phase walk one of these tables: odd rounds use the odd table, even
/// rounds the even table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTables {
    pub regular_odd: [TeamId; TEAM_COUNT],
    pub regular_even: [TeamId; TEAM_COUNT],
    pub development_odd: [TeamId; TEAM_COUNT],
    pub development_even: [TeamId; TEAM_COUNT],
}

impl OrderTables {
    /// Build order tables from four permutations, validating each.
    pub fn new(
        regular_odd: [TeamId; TEAM_COUNT],
        regular_even: [TeamId; TEAM_COUNT],
        development_odd: [TeamId; TEAM_COUNT],
        development_even: [TeamId; TEAM_COUNT],
    ) -> Result<Self, InvalidOrderTable> {
        for (name, table) in [
            ("regular_odd", &regular_odd),
            ("regular_even", &regular_even),
            ("development_odd", &development_odd),
            ("development_even", &development_even),
        ] {
            if !is_permutation(table) {
                return Err(InvalidOrderTable { table: name });
            }
        }
        Ok(OrderTables {
            regular_odd,
            regular_even,
            development_odd,
            development_even,
        })
    }

    /// The default tables: worst-to-first waiver order for odd rounds, with
    /// even rounds folding back in reverse. The development phase reuses the
    /// regular order.
    pub fn standard() -> Self {
        const ODD: [u8; TEAM_COUNT] = [3, 9, 5, 11, 6, 12, 4, 8, 1, 10, 2, 7];
        let odd = ODD.map(TeamId);
        let mut even = odd;
        even.reverse();
        OrderTables {
            regular_odd: odd,
            regular_even: even,
            development_odd: odd,
            development_even: even,
        }
    }

    /// Select the order table for a given phase and round.
    pub fn order_for(&self, development: bool, round: u32) -> &[TeamId; TEAM_COUNT] {
        let odd = round % 2 == 1;
        match (development, odd) {
            (false, true) => &self.regular_odd,
            (false, false) => &self.regular_even,
            (true, true) => &self.development_odd,
            (true, false) => &self.development_even,
        }
    }
}

/// Whether a table contains each of the twelve team ids exactly once.
fn is_permutation(table: &[TeamId; TEAM_COUNT]) -> bool {
    let mut seen = [false; TEAM_COUNT];
    for id in table {
        match id.0 {
            1..=12 => {
                let idx = (id.0 - 1) as usize;
                if seen[idx] {
                    return false;
                }
                seen[idx] = true;
            }
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_range() {
        assert!(TeamId::new(0).is_none());
        assert!(TeamId::new(1).is_some());
        assert!(TeamId::new(12).is_some());
        assert!(TeamId::new(13).is_none());
    }

    #[test]
    fn league_has_twelve_distinct_teams() {
        let teams = league_teams();
        assert_eq!(teams.len(), TEAM_COUNT);
        for (i, team) in teams.iter().enumerate() {
            assert_eq!(team.id.0 as usize, i + 1);
        }
    }

    #[test]
    fn standard_tables_are_permutations() {
        let tables = OrderTables::standard();
        assert!(is_permutation(&tables.regular_odd));
        assert!(is_permutation(&tables.regular_even));
        assert!(is_permutation(&tables.development_odd));
        assert!(is_permutation(&tables.development_even));
    }

    #[test]
    fn even_order_is_fold_of_odd() {
        let tables = OrderTables::standard();
        let mut reversed = tables.regular_odd;
        reversed.reverse();
        assert_eq!(tables.regular_even, reversed);
    }

    #[test]
    fn order_for_selects_by_parity_and_phase() {
        let tables = OrderTables::standard();
        assert_eq!(tables.order_for(false, 3), &tables.regular_odd);
        assert_eq!(tables.order_for(false, 2), &tables.regular_even);
        assert_eq!(tables.order_for(true, 1), &tables.development_odd);
        assert_eq!(tables.order_for(true, 4), &tables.development_even);
    }

    #[test]
    fn new_rejects_duplicate_entries() {
        let mut bad = OrderTables::standard().regular_odd;
        bad[0] = bad[1];
        let good = OrderTables::standard();
        let result = OrderTables::new(
            bad,
            good.regular_even,
            good.development_odd,
            good.development_even,
        );
        assert!(result.is_err());
    }
}
