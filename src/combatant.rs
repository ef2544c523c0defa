use crate::battle::conditions::StatusKind;
use crate::errors::{BattleError, BattleResult};
use crate::moves::get_move_max_pp;
use crate::stats::{effective_hp, effective_stat, evolution_bonus};
use schema::{AgentProfile, ElementType, StatType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The six stats as computed once at battle start. Stages and status
/// modifiers apply on top of these; the snapshot itself never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: String,
    pub pp: u8,
}

impl MoveSlot {
    pub fn new(move_id: &str) -> Self {
        Self {
            move_id: move_id.to_string(),
            pp: get_move_max_pp(move_id),
        }
    }
}

/// A combatant snapshot derived from an agent profile at battle start.
/// Everything here round-trips through serde, including the per-status
/// counters, so a battle can be stored mid-turn and resumed byte-exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    pub agent_id: String,
    pub name: String,
    pub element: ElementType,
    pub level: u8,
    pub ability: String,
    pub stats: EffectiveStats,
    pub max_hp: u16,
    pub current_hp: u16,

    /// Primary status only; confusion lives in the volatile flags below.
    pub status: Option<StatusKind>,
    pub freeze_turns: u8,
    pub sleep_turns: u8,
    pub woke_from_damage: bool,

    pub confused: bool,
    pub confusion_turns: u8,
    pub flinched: bool,

    pub stat_stages: HashMap<StatType, i8>,

    pub sturdy_used: bool,
    /// HP amount that lands at the end of the current turn (wishing tide).
    pub wish_pending: Option<u16>,
    pub leech_seeded: bool,
    pub cursed: bool,

    pub moves: Vec<MoveSlot>,
}

impl CombatantState {
    /// Snapshot an agent profile into an in-battle combatant. Pure aside
    /// from defaulting an empty move list, which is deterministic per
    /// element type.
    pub fn from_profile(profile: &AgentProfile) -> BattleResult<Self> {
        if profile.level == 0 || profile.level > 100 {
            return Err(BattleError::InvalidLevel(profile.level));
        }

        let level = profile.level;
        let evo = evolution_bonus(level);
        let base = &profile.base_stats;
        let nature = &profile.nature;

        let stats = EffectiveStats {
            hp: effective_hp(base.hp, level, profile.evs[0], evo),
            attack: effective_stat(
                base.attack,
                level,
                profile.evs[1],
                nature.modifier(StatType::Attack),
                evo,
            ),
            defense: effective_stat(
                base.defense,
                level,
                profile.evs[2],
                nature.modifier(StatType::Defense),
                evo,
            ),
            sp_atk: effective_stat(
                base.sp_atk,
                level,
                profile.evs[3],
                nature.modifier(StatType::SpAtk),
                evo,
            ),
            sp_def: effective_stat(
                base.sp_def,
                level,
                profile.evs[4],
                nature.modifier(StatType::SpDef),
                evo,
            ),
            speed: effective_stat(
                base.speed,
                level,
                profile.evs[5],
                nature.modifier(StatType::Speed),
                evo,
            ),
        };

        let move_ids: Vec<String> = if profile.moves.is_empty() {
            default_loadout(profile.element)
                .iter()
                .map(|id| id.to_string())
                .collect()
        } else {
            profile.moves.iter().take(4).cloned().collect()
        };

        Ok(CombatantState {
            agent_id: profile.id.clone(),
            name: profile.name.clone(),
            element: profile.element,
            level,
            ability: profile.ability.clone(),
            max_hp: stats.hp,
            current_hp: stats.hp,
            stats,
            status: None,
            freeze_turns: 0,
            sleep_turns: 0,
            woke_from_damage: false,
            confused: false,
            confusion_turns: 0,
            flinched: false,
            stat_stages: HashMap::new(),
            sturdy_used: false,
            wish_pending: None,
            leech_seeded: false,
            cursed: false,
            moves: move_ids.iter().map(|id| MoveSlot::new(id)).collect(),
        })
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, saturating at zero. Sleeping combatants remember they
    /// were hit so the wake gate can release them early.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.status == Some(StatusKind::Sleep) && amount > 0 {
            self.woke_from_damage = true;
        }
        self.is_fainted()
    }

    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp - self.current_hp);
        self.current_hp += healed;
        healed
    }

    pub fn stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Shift a stat stage, clamped to [-6, 6]. Returns (old, new).
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> (i8, i8) {
        let old = self.stat_stage(stat);
        let new = (old + delta).clamp(-6, 6);
        if new == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, new);
        }
        (old, new)
    }

    pub fn clear_stat_stages(&mut self) {
        self.stat_stages.clear();
    }

    /// Inflict a status. Primary statuses fail silently when one is
    /// already present; confusion stacks alongside a primary.
    pub fn apply_status(&mut self, kind: StatusKind) -> bool {
        if kind == StatusKind::Confusion {
            if self.confused {
                return false;
            }
            self.confused = true;
            self.confusion_turns = 0;
            return true;
        }
        if self.status.is_some() {
            return false;
        }
        self.status = Some(kind);
        match kind {
            StatusKind::Freeze => self.freeze_turns = 0,
            StatusKind::Sleep => {
                self.sleep_turns = 0;
                self.woke_from_damage = false;
            }
            _ => {}
        }
        true
    }

    pub fn cure_status(&mut self) {
        self.status = None;
        self.freeze_turns = 0;
        self.sleep_turns = 0;
        self.woke_from_damage = false;
    }

    pub fn move_slot(&self, move_id: &str) -> Option<&MoveSlot> {
        self.moves.iter().find(|slot| slot.move_id == move_id)
    }

    /// Spend one PP. False if the slot is unknown or already empty, in
    /// which case nothing is mutated.
    pub fn spend_pp(&mut self, move_id: &str) -> bool {
        match self.moves.iter_mut().find(|slot| slot.move_id == move_id) {
            Some(slot) if slot.pp > 0 => {
                slot.pp -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn usable_moves(&self) -> impl Iterator<Item = &MoveSlot> {
        self.moves.iter().filter(|slot| slot.pp > 0)
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.current_hp as f64 / self.max_hp as f64
        }
    }
}

/// Deterministic default loadout per element type, used when a profile
/// arrives with no assigned moves.
pub fn default_loadout(element: ElementType) -> [&'static str; 4] {
    use ElementType::*;
    match element {
        Neutral => ["crusher_claw", "razor_pincer", "sharpen_claws", "quick_snap"],
        Brawler => ["mantis_strike", "pinch", "sharpen_claws", "quick_snap"],
        Sky => ["gale_fin", "pinch", "harden_shell", "quick_snap"],
        Toxin => ["venom_lash", "venom_cloud", "pinch", "quick_snap"],
        Terra => ["seabed_quake", "pinch", "harden_shell", "quick_snap"],
        Stone => ["reef_smash", "skull_bash", "harden_shell", "pinch"],
        Swarm => ["barnacle_swarm", "leech_barnacles", "pinch", "quick_snap"],
        Phantom => ["ghost_current", "abyssal_curse", "pinch", "quick_snap"],
        Alloy => ["iron_pincer", "harden_shell", "pinch", "quick_snap"],
        Flame => ["boiling_jet", "pinch", "sharpen_claws", "quick_snap"],
        Tide => ["riptide_blast", "wishing_tide", "tidal_rush", "pinch"],
        Flora => ["kelp_whip", "draining_grip", "regrow", "pinch"],
        Volt => ["thunder_prong", "paralyzing_brine", "pinch", "quick_snap"],
        Mind => ["psi_pulse", "lullaby_current", "mind_focus", "pinch"],
        Frost => ["glacial_spike", "deep_freeze_ray", "pinch", "quick_snap"],
        Wyrm => ["abyss_breath", "pinch", "harden_shell", "quick_snap"],
        Shade => ["night_snap", "intimidating_click", "ink_haze", "pinch"],
        Charm => ["dazzle_beam", "dazzling_spray", "pinch", "quick_snap"],
    }
}
