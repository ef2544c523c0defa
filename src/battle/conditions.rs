use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Status conditions a move can inflict. Burn, paralysis, poison, freeze
/// and sleep are primary and mutually exclusive; confusion is volatile and
/// may coexist with a primary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum StatusKind {
    Burn,
    Paralysis,
    Poison,
    Freeze,
    Sleep,
    Confusion,
}

impl StatusKind {
    pub fn is_primary(&self) -> bool {
        !matches!(self, StatusKind::Confusion)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusKind::Burn => "burn",
            StatusKind::Paralysis => "paralysis",
            StatusKind::Poison => "poison",
            StatusKind::Freeze => "freeze",
            StatusKind::Sleep => "sleep",
            StatusKind::Confusion => "confusion",
        };
        write!(f, "{}", name)
    }
}

/// What a status does before its carrier's move. The resolver interprets
/// these records; the table itself holds no logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeforeMoveGate {
    /// Freeze: the carrier loses its action, then thaws unconditionally
    /// once the counter reaches `forced_thaw_after` turns.
    Thaw { forced_thaw_after: u8 },
    /// Sleep: the carrier loses its action for up to `base_turns` turns,
    /// waking early only if it took damage since it dozed off.
    Wake { base_turns: u8 },
    /// Paralysis: flat chance to lose the action, no counter.
    SkipChance { percent: u8 },
    /// Confusion: chance of a self-inflicted hit capped at a fraction of
    /// max HP; the condition clears itself after `max_turns` turns.
    SelfHit {
        percent: u8,
        cap_fraction: f64,
        max_turns: u8,
    },
}

/// Per-status hook record. Entirely data: adding a status means adding a
/// table row, not a resolver branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusHooks {
    pub gate: Option<BeforeMoveGate>,
    /// Fraction of max HP lost at end of turn.
    pub end_turn_damage: Option<f64>,
    /// Multiplier on physical damage *dealt* by the carrier (burn).
    pub physical_damage_mod: Option<f64>,
    /// Multiplier on the carrier's effective speed (paralysis).
    pub speed_mod: f64,
}

const DEFAULT_HOOKS: StatusHooks = StatusHooks {
    gate: None,
    end_turn_damage: None,
    physical_damage_mod: None,
    speed_mod: 1.0,
};

static STATUS_TABLE: LazyLock<HashMap<StatusKind, StatusHooks>> = LazyLock::new(|| {
    HashMap::from([
        (
            StatusKind::Burn,
            StatusHooks {
                end_turn_damage: Some(1.0 / 16.0),
                physical_damage_mod: Some(0.5),
                ..DEFAULT_HOOKS
            },
        ),
        (
            StatusKind::Poison,
            StatusHooks {
                end_turn_damage: Some(1.0 / 12.0),
                ..DEFAULT_HOOKS
            },
        ),
        (
            StatusKind::Paralysis,
            StatusHooks {
                gate: Some(BeforeMoveGate::SkipChance { percent: 15 }),
                speed_mod: 0.75,
                ..DEFAULT_HOOKS
            },
        ),
        (
            StatusKind::Freeze,
            StatusHooks {
                gate: Some(BeforeMoveGate::Thaw {
                    forced_thaw_after: 1,
                }),
                ..DEFAULT_HOOKS
            },
        ),
        (
            StatusKind::Sleep,
            StatusHooks {
                gate: Some(BeforeMoveGate::Wake { base_turns: 2 }),
                ..DEFAULT_HOOKS
            },
        ),
        (
            StatusKind::Confusion,
            StatusHooks {
                gate: Some(BeforeMoveGate::SelfHit {
                    percent: 25,
                    cap_fraction: 0.10,
                    max_turns: 3,
                }),
                ..DEFAULT_HOOKS
            },
        ),
    ])
});

/// Look up the hook record for a status. Every `StatusKind` has a row.
pub fn status_hooks(kind: StatusKind) -> &'static StatusHooks {
    STATUS_TABLE.get(&kind).unwrap_or(&DEFAULT_HOOKS)
}
