use crate::ElementType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// The five stats that carry battle stages. HP is deliberately absent:
/// it has no stage and is only ever modified through damage and healing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum StatType {
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpAtk => "Sp. Atk",
            StatType::SpDef => "Sp. Def",
            StatType::Speed => "Speed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

/// A nature is a boost/reduce stat pair. Both sides optional so a neutral
/// nature is representable without a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Nature {
    pub boost: Option<StatType>,
    pub reduce: Option<StatType>,
}

impl Nature {
    pub fn new(boost: StatType, reduce: StatType) -> Self {
        Self {
            boost: Some(boost),
            reduce: Some(reduce),
        }
    }

    pub fn neutral() -> Self {
        Self::default()
    }

    /// Multiplier this nature applies to the given stat. HP never has a
    /// nature modifier, which the caller enforces by not asking.
    pub fn modifier(&self, stat: StatType) -> f64 {
        if self.boost == Some(stat) {
            1.1
        } else if self.reduce == Some(stat) {
            0.9
        } else {
            1.0
        }
    }
}

/// Per-stat effort value investment, in slot order
/// HP, Attack, Defense, Sp. Atk, Sp. Def, Speed.
pub type EvSpread = [u16; 6];

/// The raw agent record handed in by the persistence layer. Everything the
/// battle core needs to snapshot a combatant, nothing it doesn't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub element: ElementType,
    pub level: u8,
    pub base_stats: BaseStats,
    pub evs: EvSpread,
    pub nature: Nature,
    pub ability: String,
    /// Up to 4 move ids. An empty list means the builder assigns the
    /// deterministic default loadout for the agent's element type.
    pub moves: Vec<String>,
}
