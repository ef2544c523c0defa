use crate::battle::conditions::StatusKind;
use crate::errors::{DataError, DataResult};
use schema::{ElementType, MoveCategory, StatType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// The full move list, embedded at compile time. Moves are immutable
/// reference data; only a combatant's per-slot PP is battle state.
const MOVE_DATABASE_RON: &str = include_str!("../data/moves.ron");

static MOVE_DATA: LazyLock<HashMap<String, MoveData>> = LazyLock::new(|| {
    load_move_database(MOVE_DATABASE_RON).expect("embedded move database must parse")
});

fn load_move_database(source: &str) -> DataResult<HashMap<String, MoveData>> {
    let moves: Vec<MoveData> =
        ron::from_str(source).map_err(|e| DataError::MalformedDatabase(e.to_string()))?;
    let mut map = HashMap::with_capacity(moves.len());
    for move_data in moves {
        if map.insert(move_data.id.clone(), move_data).is_some() {
            return Err(DataError::MalformedDatabase(
                "duplicate move id in database".to_string(),
            ));
        }
    }
    Ok(map)
}

/// Get move data for a specific move id from the global store.
pub fn get_move_data(move_id: &str) -> Option<&'static MoveData> {
    MOVE_DATA.get(move_id)
}

/// Get max PP for a specific move. Unknown ids fall back to a stock PP
/// count so a stale profile still produces a playable slot.
pub fn get_move_max_pp(move_id: &str) -> u8 {
    get_move_data(move_id).map(|data| data.max_pp).unwrap_or(20)
}

/// Iterate every move in the database (test and tooling support).
pub fn all_moves() -> impl Iterator<Item = &'static MoveData> {
    MOVE_DATA.values()
}

/// Structured move effect. One tagged variant per effect kind, each
/// carrying only its own parameters, so new effects are additive instead
/// of growing an if/else chain in the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Resolve before priority-0 moves regardless of speed.
    Priority(i8),
    /// Chance-gated status infliction on the opponent. Fails silently if
    /// the target already carries a primary status.
    InflictStatus { status: StatusKind, chance: u8 },
    /// Guaranteed self stat boost.
    StatBoost { stat: StatType, stages: i8 },
    /// Chance-gated opponent stat drop.
    StatDrop { stat: StatType, stages: i8, chance: u8 },
    /// Immediate heal, percent of max HP.
    Heal { percent: u8 },
    /// Heal that lands in the end-of-turn phase instead of immediately.
    DelayedHeal { percent: u8 },
    /// Attacker heals a percentage of damage dealt.
    Drain { percent: u8 },
    /// Attacker takes a percentage of damage dealt.
    Recoil { percent: u8 },
    /// Chance the defender flinches and loses its action this turn.
    Flinch { chance: u8 },
    /// Elevated critical hit chance.
    HighCrit,
    /// One-hit knockout, gated only by accuracy.
    Ohko,
    /// Seeds the opponent; drains a fraction of their HP to the user each
    /// turn end.
    LeechSeed,
    /// Curses the opponent; they lose a fraction of max HP each turn end.
    Curse,
    /// Clears all stat stages on both sides (haze).
    ResetStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    pub name: String,
    pub element: ElementType,
    pub category: MoveCategory,
    /// 0 for status/utility moves.
    pub power: u16,
    /// 0–100. 0 means the move never misses.
    pub accuracy: u8,
    pub max_pp: u8,
    pub effect: Option<MoveEffect>,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.power > 0
    }

    /// Priority bracket for turn ordering. Plain moves are 0.
    pub fn priority(&self) -> i8 {
        match self.effect {
            Some(MoveEffect::Priority(p)) => p,
            _ => 0,
        }
    }

    pub fn is_high_crit(&self) -> bool {
        matches!(self.effect, Some(MoveEffect::HighCrit))
    }
}
