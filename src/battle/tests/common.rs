use crate::battle::conditions::StatusKind;
use crate::battle::state::{BattleState, TurnRng};
use crate::combatant::CombatantState;
use chrono::{DateTime, Utc};
use schema::{AgentProfile, BaseStats, ElementType, Nature};

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let combatant = TestAgentBuilder::new("pinchy", ElementType::Tide, 25)
///     .with_moves(vec!["pinch"])
///     .with_status(StatusKind::Paralysis)
///     .build();
/// ```
pub struct TestAgentBuilder {
    id: String,
    element: ElementType,
    level: u8,
    moves: Vec<String>,
    ability: String,
    status: Option<StatusKind>,
    current_hp: Option<u16>,
    speed: Option<u16>,
}

impl TestAgentBuilder {
    pub fn new(id: &str, element: ElementType, level: u8) -> Self {
        Self {
            id: id.to_string(),
            element,
            level,
            moves: vec!["pinch".to_string()],
            ability: String::new(),
            status: None,
            current_hp: None,
            speed: None,
        }
    }

    pub fn with_moves(mut self, moves: Vec<&str>) -> Self {
        self.moves = moves.into_iter().map(str::to_string).collect();
        self
    }

    pub fn with_ability(mut self, ability: &str) -> Self {
        self.ability = ability.to_string();
        self
    }

    pub fn with_status(mut self, status: StatusKind) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Overrides the snapshot's speed stat directly so ordering tests do
    /// not have to reverse-engineer base stat inputs.
    pub fn with_speed(mut self, speed: u16) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn build(self) -> CombatantState {
        let profile = AgentProfile {
            id: self.id.clone(),
            name: self.id,
            element: self.element,
            level: self.level,
            base_stats: BaseStats {
                hp: 80,
                attack: 80,
                defense: 75,
                sp_atk: 70,
                sp_def: 70,
                speed: 75,
            },
            evs: [0; 6],
            nature: Nature::neutral(),
            ability: self.ability,
            moves: self.moves,
        };

        let mut combatant =
            CombatantState::from_profile(&profile).expect("test profile must be valid");
        if let Some(status) = self.status {
            assert!(combatant.apply_status(status), "status application failed");
        }
        if let Some(hp) = self.current_hp {
            combatant.current_hp = hp.min(combatant.max_hp);
        }
        if let Some(speed) = self.speed {
            combatant.stats.speed = speed;
        }
        combatant
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(agent_a: CombatantState, agent_b: CombatantState) -> BattleState {
    BattleState::new("test_battle".to_string(), agent_a, agent_b, fixed_now())
}

/// Creates a `TurnRng` with a long list of midpoint values (50), for tests
/// where the specific outcome does not matter: hits land, nothing crits,
/// no secondary effect fires below a 50% chance.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Front-loads specific rolls, then pads with midpoint values so the
/// oracle never runs dry.
pub fn rng_with(prefix: Vec<u8>) -> TurnRng {
    let mut outcomes = prefix;
    outcomes.extend(std::iter::repeat(50).take(100));
    TurnRng::new_for_test(outcomes)
}
