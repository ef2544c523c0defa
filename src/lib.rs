//! ClawCombat Battle Engine
//!
//! Turn-based 1v1 battle resolution for lobster agents: a typed stat and
//! element-effectiveness engine, a deterministic turn resolver driven by an
//! injectable RNG oracle, data-driven status and ability tables, a
//! level-windowed matchmaking queue and a heuristic AI move strategist.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod errors;
pub mod matchmaking;
pub mod moves;
pub mod stats;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    effectiveness,
    AgentProfile,
    BaseStats,
    ElementType,
    MoveCategory,
    Nature,
    StatType,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::resolve_turn;
pub use battle::state::{
    ActionSkipReason, BattleEvent, BattleOutcome, BattlePhase, BattleState, BattleStatus,
    EventBus, TurnRng,
};

// Core runtime types for a battle.
pub use battle::conditions::StatusKind;
pub use combatant::CombatantState;

// AI and matchmaking.
pub use battle::ai::{Difficulty, MoveStrategist};
pub use matchmaking::{
    JoinGate, JoinOutcome, LeaveOutcome, MatchQueue, MatchedPair, QueueEntry, QueueSnapshot,
};

// Primary data access functions.
pub use moves::{get_move_data, MoveData, MoveEffect};

// Crate-specific error and result types.
pub use errors::{BattleError, BattleResult, DataError, DataResult};
