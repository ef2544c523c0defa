use crate::battle::conditions::StatusKind;
use schema::{MoveCategory, StatType};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Hook point at which an ability fires. The resolver consults the table
/// at each of these points; everything else ignores abilities entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityTrigger {
    BattleStart,
    Accuracy,
    DamageCalc,
    OnHit,
    BeforeFaint,
    TurnEnd,
}

/// What an ability does. Like the status table, abilities are rows the
/// resolver interprets at fixed hook points; an agent whose ability id is
/// unknown simply has no row and fights without one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    /// Survives the first otherwise-lethal hit of the battle at 1 HP.
    SurviveLethal,
    /// Flat percentage-point shift on the owner's own move accuracy.
    OwnAccuracyBonus(i16),
    /// Flat percentage-point shift on the accuracy of moves aimed at the
    /// owner. Negative values make the owner harder to hit.
    IncomingAccuracyMod(i16),
    /// Replaces the standard same-element bonus for the owner's moves.
    StabOverride(f64),
    /// Multiplier on damage the owner deals with one move category.
    CategoryDamageBoost {
        category: MoveCategory,
        multiplier: f64,
    },
    /// Chance to inflict a status on an opponent the owner damages.
    OnHitInflict { status: StatusKind, chance: u8 },
    /// At battle start, shifts an opponent stat stage.
    LowerOpponentStat { stat: StatType, stages: i8 },
    /// Heals this fraction of max HP at the end of every turn.
    EndTurnHealFraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityData {
    pub trigger: AbilityTrigger,
    pub effect: AbilityEffect,
}

static ABILITY_TABLE: LazyLock<HashMap<&'static str, AbilityData>> = LazyLock::new(|| {
    HashMap::from([
        (
            "sturdy_shell",
            AbilityData {
                trigger: AbilityTrigger::BeforeFaint,
                effect: AbilityEffect::SurviveLethal,
            },
        ),
        (
            "predator_gaze",
            AbilityData {
                trigger: AbilityTrigger::Accuracy,
                effect: AbilityEffect::OwnAccuracyBonus(10),
            },
        ),
        (
            "slick_carapace",
            AbilityData {
                trigger: AbilityTrigger::Accuracy,
                effect: AbilityEffect::IncomingAccuracyMod(-10),
            },
        ),
        (
            "tide_blessed",
            AbilityData {
                trigger: AbilityTrigger::DamageCalc,
                effect: AbilityEffect::StabOverride(2.0),
            },
        ),
        (
            "thick_claws",
            AbilityData {
                trigger: AbilityTrigger::DamageCalc,
                effect: AbilityEffect::CategoryDamageBoost {
                    category: MoveCategory::Physical,
                    multiplier: 1.1,
                },
            },
        ),
        (
            "venom_gland",
            AbilityData {
                trigger: AbilityTrigger::OnHit,
                effect: AbilityEffect::OnHitInflict {
                    status: StatusKind::Poison,
                    chance: 10,
                },
            },
        ),
        (
            "intimidating_display",
            AbilityData {
                trigger: AbilityTrigger::BattleStart,
                effect: AbilityEffect::LowerOpponentStat {
                    stat: StatType::Attack,
                    stages: -1,
                },
            },
        ),
        (
            "regenerator",
            AbilityData {
                trigger: AbilityTrigger::TurnEnd,
                effect: AbilityEffect::EndTurnHealFraction(1.0 / 16.0),
            },
        ),
    ])
});

/// Look up an ability by id. Unknown or empty ids are inert.
pub fn ability_data(ability_id: &str) -> Option<&'static AbilityData> {
    ABILITY_TABLE.get(ability_id)
}

/// The effect of an ability if it fires at the given trigger point.
pub fn ability_effect_at(ability_id: &str, trigger: AbilityTrigger) -> Option<&'static AbilityEffect> {
    ability_data(ability_id)
        .filter(|data| data.trigger == trigger)
        .map(|data| &data.effect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_abilities_resolve() {
        assert_eq!(
            ability_effect_at("sturdy_shell", AbilityTrigger::BeforeFaint),
            Some(&AbilityEffect::SurviveLethal)
        );
        assert_eq!(
            ability_effect_at("tide_blessed", AbilityTrigger::DamageCalc),
            Some(&AbilityEffect::StabOverride(2.0))
        );
    }

    #[test]
    fn trigger_mismatch_yields_nothing() {
        assert!(ability_effect_at("sturdy_shell", AbilityTrigger::TurnEnd).is_none());
    }

    #[test]
    fn unknown_ability_is_inert() {
        assert!(ability_data("").is_none());
        assert!(ability_data("laser_eyes").is_none());
    }

    #[test]
    fn intimidating_display_lowers_attack_at_battle_start() {
        match ability_effect_at("intimidating_display", AbilityTrigger::BattleStart) {
            Some(AbilityEffect::LowerOpponentStat { stat, stages }) => {
                assert_eq!(*stat, StatType::Attack);
                assert_eq!(*stages, -1);
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }
}
