use crate::battle::conditions::StatusKind;
use crate::combatant::CombatantState;
use crate::errors::BattleResult;
use chrono::{DateTime, Utc};
use schema::{AgentProfile, StatType};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    Active,
    Finished,
}

/// Coarse lifecycle marker kept alongside `BattleStatus` for storage
/// consumers that only care whether the record is still live.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Waiting,
    Finished,
}

/// Why a combatant's chosen action did not execute this turn. These are
/// normal turn outcomes, not errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ActionSkipReason {
    Asleep,
    Frozen,
    FullyParalyzed,
    Flinched,
    HurtItselfInConfusion,
    NoPpRemaining,
    UnknownMove,
    MoveNotLearned,
    AlreadyFainted,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,

    // Actions
    MoveUsed {
        agent: String,
        move_id: String,
    },
    MoveMissed {
        attacker: String,
        defender: String,
        move_id: String,
    },
    /// A miss attributable to the defender's ability rather than the
    /// move's own accuracy.
    Dodged {
        defender: String,
    },
    ActionSkipped {
        agent: String,
        reason: ActionSkipReason,
    },

    // Damage and healing
    AttackEffectiveness {
        multiplier: f64,
    },
    Immune {
        defender: String,
        move_id: String,
    },
    CriticalHit {
        attacker: String,
    },
    DamageDealt {
        target: String,
        amount: u16,
        remaining_hp: u16,
    },
    OneHitKnockout {
        target: String,
    },
    Healed {
        target: String,
        amount: u16,
        new_hp: u16,
    },
    Drained {
        attacker: String,
        amount: u16,
    },
    RecoilTaken {
        attacker: String,
        amount: u16,
    },
    ConfusionSelfHit {
        target: String,
        amount: u16,
    },

    // Statuses and volatile conditions
    StatusInflicted {
        target: String,
        status: StatusKind,
    },
    StatusCleared {
        target: String,
        status: StatusKind,
    },
    StatusDamage {
        target: String,
        status: StatusKind,
        amount: u16,
        remaining_hp: u16,
    },
    Flinched {
        target: String,
    },
    SeedPlanted {
        target: String,
    },
    CursePlaced {
        target: String,
    },
    /// End-of-turn chip damage from leech seeding or a curse.
    VolatileDamage {
        target: String,
        source: String,
        amount: u16,
        remaining_hp: u16,
    },

    // Stat stages
    StatStageChanged {
        target: String,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatStagesCleared,

    // Abilities
    AbilityTriggered {
        owner: String,
        ability: String,
    },

    // Battle end
    Fainted {
        agent: String,
    },
    BattleEnded {
        winner: Option<String>,
    },
}

/// Ordered log of everything that happened while resolving one turn.
/// The resolver appends; callers read it back for replay or display.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if any event in the bus matches the predicate.
    pub fn contains(&self, predicate: impl Fn(&BattleEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Oracle of pre-drawn percentile rolls for one turn. The resolver never
/// touches a live RNG directly, which makes every turn replayable: feed
/// the same outcomes, get the same events.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn new_random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let outcomes: Vec<u8> = (0..100).map(|_| rng.random_range(1..=100)).collect();
        Self { outcomes, index: 0 }
    }

    /// Deterministic oracle from a seed. Two oracles built from the same
    /// seed produce identical rolls.
    pub fn new_seeded(seed: u64) -> Self {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let outcomes: Vec<u8> = (0..100).map(|_| rng.random_range(1..=100)).collect();
        Self { outcomes, index: 0 }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }
}

/// Full serializable battle record: two combatant snapshots plus turn
/// bookkeeping. Everything the resolver mutates lives here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub battle_id: String,
    pub agent_a: CombatantState,
    pub agent_b: CombatantState,
    /// Completed turns. A fresh battle has resolved zero.
    pub turn_number: u32,
    pub status: BattleStatus,
    pub phase: BattlePhase,
    pub winner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BattleState {
    pub fn new(
        battle_id: String,
        agent_a: CombatantState,
        agent_b: CombatantState,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            battle_id,
            agent_a,
            agent_b,
            turn_number: 0,
            status: BattleStatus::Active,
            phase: BattlePhase::Waiting,
            winner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot two agent profiles into a fresh battle. Both sides start
    /// at full HP with no status, no stages and untouched flags.
    pub fn start(
        battle_id: String,
        profile_a: &AgentProfile,
        profile_b: &AgentProfile,
        now: DateTime<Utc>,
    ) -> BattleResult<Self> {
        let agent_a = CombatantState::from_profile(profile_a)?;
        let agent_b = CombatantState::from_profile(profile_b)?;
        Ok(Self::new(battle_id, agent_a, agent_b, now))
    }

    pub fn is_finished(&self) -> bool {
        self.status == BattleStatus::Finished
    }

    /// Side index (0 or 1) for an agent id, if it is in this battle.
    pub fn side_of(&self, agent_id: &str) -> Option<usize> {
        if self.agent_a.agent_id == agent_id {
            Some(0)
        } else if self.agent_b.agent_id == agent_id {
            Some(1)
        } else {
            None
        }
    }

    pub fn combatant(&self, side: usize) -> &CombatantState {
        if side == 0 {
            &self.agent_a
        } else {
            &self.agent_b
        }
    }

    pub fn combatant_mut(&mut self, side: usize) -> &mut CombatantState {
        if side == 0 {
            &mut self.agent_a
        } else {
            &mut self.agent_b
        }
    }

    /// Mark the battle finished. `winner_id` of None records a draw.
    pub fn finish(&mut self, winner_id: Option<String>, now: DateTime<Utc>) {
        self.status = BattleStatus::Finished;
        self.phase = BattlePhase::Finished;
        self.winner_id = winner_id;
        self.updated_at = now;
    }

    /// Result record for the outer progression layer (XP, ratings). Only
    /// available once the battle has finished with a winner.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        if !self.is_finished() {
            return None;
        }
        let winner_id = self.winner_id.clone()?;
        let loser_id = if winner_id == self.agent_a.agent_id {
            self.agent_b.agent_id.clone()
        } else {
            self.agent_a.agent_id.clone()
        };
        Some(BattleOutcome {
            battle_id: self.battle_id.clone(),
            winner_id,
            loser_id,
            turns: self.turn_number,
        })
    }
}

/// What a finished battle reports outward.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub battle_id: String,
    pub winner_id: String,
    pub loser_id: String,
    pub turns: u32,
}
