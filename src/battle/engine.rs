use crate::battle::abilities::{ability_effect_at, AbilityEffect, AbilityTrigger};
use crate::battle::conditions::{status_hooks, BeforeMoveGate, StatusKind};
use crate::battle::state::{
    ActionSkipReason, BattleEvent, BattleState, EventBus, TurnRng,
};
use crate::combatant::CombatantState;
use crate::errors::{BattleError, BattleResult};
use crate::moves::{get_move_data, MoveData, MoveEffect};
use crate::stats::{crit_attack, crit_defense, effective_attack, effective_defense, effective_speed};
use chrono::{DateTime, Utc};
use schema::effectiveness;

/// Percentile roll at or below which a hit is critical. The 6.25% base
/// rate rounds down to a whole point on the 1..=100 oracle.
const BASE_CRIT_THRESHOLD: u8 = 6;
const HIGH_CRIT_THRESHOLD: u8 = 12;

/// Fraction of max HP drained per turn by leech barnacles.
const LEECH_FRACTION: f64 = 1.0 / 8.0;
/// Fraction of max HP lost per turn under a curse.
const CURSE_FRACTION: f64 = 1.0 / 4.0;

/// Resolve one full turn: both chosen moves, pre-move gates, damage,
/// secondary effects and the end-of-turn phase. Returns the ordered event
/// log. The only error cases are calling into a finished battle; every
/// per-action failure (unknown move, empty PP, status prevention) is a
/// logged no-op for that side.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    chosen_a: &str,
    chosen_b: &str,
    rng: &mut TurnRng,
    now: DateTime<Utc>,
) -> BattleResult<EventBus> {
    if battle_state.is_finished() {
        return Err(BattleError::BattleFinished {
            battle_id: battle_state.battle_id.clone(),
        });
    }

    let mut bus = EventBus::new();
    battle_state.turn_number += 1;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });

    if battle_state.turn_number == 1 {
        apply_battle_start_abilities(battle_state, &mut bus);
    }

    let chosen = [chosen_a, chosen_b];
    let order = determine_action_order(battle_state, chosen_a, chosen_b, rng);
    let first_actor = order[0];

    for &side in &order {
        // A combatant knocked out earlier in the turn loses its action.
        if battle_state.combatant(side).is_fainted() {
            continue;
        }
        if battle_state.combatant(1 - side).is_fainted() {
            continue;
        }
        execute_action(battle_state, side, chosen[side], rng, &mut bus);
    }

    if !battle_state.agent_a.is_fainted() && !battle_state.agent_b.is_fainted() {
        execute_end_turn_phase(battle_state, &order, &mut bus);
    }

    finalize_turn(battle_state, first_actor, &mut bus, now);
    Ok(bus)
}

fn apply_battle_start_abilities(battle_state: &mut BattleState, bus: &mut EventBus) {
    for side in 0..2 {
        let owner_ability = battle_state.combatant(side).ability.clone();
        let owner_id = battle_state.combatant(side).agent_id.clone();
        if let Some(AbilityEffect::LowerOpponentStat { stat, stages }) =
            ability_effect_at(&owner_ability, AbilityTrigger::BattleStart)
        {
            let opponent = battle_state.combatant_mut(1 - side);
            let target_id = opponent.agent_id.clone();
            let (old_stage, new_stage) = opponent.modify_stat_stage(*stat, *stages);
            bus.push(BattleEvent::AbilityTriggered {
                owner: owner_id,
                ability: owner_ability,
            });
            bus.push(BattleEvent::StatStageChanged {
                target: target_id,
                stat: *stat,
                old_stage,
                new_stage,
            });
        }
    }
}

/// Who acts first: move priority, then effective speed (stages and status
/// included), then level, then a coin flip.
fn determine_action_order(
    battle_state: &BattleState,
    chosen_a: &str,
    chosen_b: &str,
    rng: &mut TurnRng,
) -> [usize; 2] {
    let priority_a = get_move_data(chosen_a).map(|m| m.priority()).unwrap_or(0);
    let priority_b = get_move_data(chosen_b).map(|m| m.priority()).unwrap_or(0);
    if priority_a != priority_b {
        return if priority_a > priority_b { [0, 1] } else { [1, 0] };
    }

    let speed_a = effective_speed(&battle_state.agent_a);
    let speed_b = effective_speed(&battle_state.agent_b);
    if speed_a != speed_b {
        return if speed_a > speed_b { [0, 1] } else { [1, 0] };
    }

    let level_a = battle_state.agent_a.level;
    let level_b = battle_state.agent_b.level;
    if level_a != level_b {
        return if level_a > level_b { [0, 1] } else { [1, 0] };
    }

    if rng.next_outcome("speed tie coin flip") <= 50 {
        [0, 1]
    } else {
        [1, 0]
    }
}

fn sides_mut(
    battle_state: &mut BattleState,
    attacker_side: usize,
) -> (&mut CombatantState, &mut CombatantState) {
    if attacker_side == 0 {
        (&mut battle_state.agent_a, &mut battle_state.agent_b)
    } else {
        (&mut battle_state.agent_b, &mut battle_state.agent_a)
    }
}

fn execute_action(
    battle_state: &mut BattleState,
    side: usize,
    move_id: &str,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    if let Some(reason) = check_action_preventing_conditions(battle_state, side, rng, bus) {
        bus.push(BattleEvent::ActionSkipped {
            agent: battle_state.combatant(side).agent_id.clone(),
            reason,
        });
        return;
    }

    let Some(move_data) = get_move_data(move_id) else {
        bus.push(BattleEvent::ActionSkipped {
            agent: battle_state.combatant(side).agent_id.clone(),
            reason: ActionSkipReason::UnknownMove,
        });
        return;
    };

    if battle_state.combatant(side).move_slot(move_id).is_none() {
        bus.push(BattleEvent::ActionSkipped {
            agent: battle_state.combatant(side).agent_id.clone(),
            reason: ActionSkipReason::MoveNotLearned,
        });
        return;
    }

    if !battle_state.combatant_mut(side).spend_pp(move_id) {
        bus.push(BattleEvent::ActionSkipped {
            agent: battle_state.combatant(side).agent_id.clone(),
            reason: ActionSkipReason::NoPpRemaining,
        });
        return;
    }

    bus.push(BattleEvent::MoveUsed {
        agent: battle_state.combatant(side).agent_id.clone(),
        move_id: move_id.to_string(),
    });

    if !accuracy_check(battle_state, side, move_data, rng, bus) {
        return;
    }

    if move_data.is_damaging() || matches!(move_data.effect, Some(MoveEffect::Ohko)) {
        execute_attack_hit(battle_state, side, move_data, rng, bus);
    } else {
        execute_status_move(battle_state, side, move_data, rng, bus);
    }
}

/// Pre-move gates in fixed order: leftover flinch, primary status,
/// confusion. The first gate that fires consumes the action. Counters are
/// the only state touched here.
fn check_action_preventing_conditions(
    battle_state: &mut BattleState,
    side: usize,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> Option<ActionSkipReason> {
    let agent_id = battle_state.combatant(side).agent_id.clone();
    let combatant = battle_state.combatant_mut(side);

    if combatant.flinched {
        combatant.flinched = false;
        return Some(ActionSkipReason::Flinched);
    }

    if let Some(status) = combatant.status {
        match status_hooks(status).gate {
            Some(BeforeMoveGate::Thaw { forced_thaw_after }) => {
                if combatant.freeze_turns >= forced_thaw_after {
                    combatant.cure_status();
                    bus.push(BattleEvent::StatusCleared {
                        target: agent_id.clone(),
                        status,
                    });
                } else {
                    combatant.freeze_turns += 1;
                    return Some(ActionSkipReason::Frozen);
                }
            }
            Some(BeforeMoveGate::Wake { base_turns }) => {
                if combatant.woke_from_damage || combatant.sleep_turns >= base_turns {
                    combatant.cure_status();
                    bus.push(BattleEvent::StatusCleared {
                        target: agent_id.clone(),
                        status,
                    });
                } else {
                    combatant.sleep_turns += 1;
                    return Some(ActionSkipReason::Asleep);
                }
            }
            Some(BeforeMoveGate::SkipChance { percent }) => {
                if rng.next_outcome("paralysis check") <= percent {
                    return Some(ActionSkipReason::FullyParalyzed);
                }
            }
            _ => {}
        }
    }

    if battle_state.combatant(side).confused {
        let combatant = battle_state.combatant_mut(side);
        if let Some(BeforeMoveGate::SelfHit {
            percent,
            cap_fraction,
            max_turns,
        }) = status_hooks(StatusKind::Confusion).gate
        {
            combatant.confusion_turns += 1;
            if combatant.confusion_turns > max_turns {
                combatant.confused = false;
                combatant.confusion_turns = 0;
                bus.push(BattleEvent::StatusCleared {
                    target: agent_id,
                    status: StatusKind::Confusion,
                });
            } else if rng.next_outcome("confusion check") <= percent {
                let amount = fraction_of_max_hp(combatant, cap_fraction);
                combatant.take_damage(amount);
                bus.push(BattleEvent::ConfusionSelfHit {
                    target: agent_id,
                    amount,
                });
                return Some(ActionSkipReason::HurtItselfInConfusion);
            }
        }
    }

    None
}

/// Accuracy gate. A declared accuracy of 0 marks a sure hit; otherwise
/// both sides' accuracy abilities shift the chance in percentage points.
fn accuracy_check(
    battle_state: &BattleState,
    side: usize,
    move_data: &MoveData,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> bool {
    if move_data.accuracy == 0 {
        return true;
    }

    let attacker = battle_state.combatant(side);
    let defender = battle_state.combatant(1 - side);

    let mut chance = move_data.accuracy as i16;
    if let Some(AbilityEffect::OwnAccuracyBonus(bonus)) =
        ability_effect_at(&attacker.ability, AbilityTrigger::Accuracy)
    {
        chance += bonus;
    }
    let mut defender_shift = 0;
    if let Some(AbilityEffect::IncomingAccuracyMod(shift)) =
        ability_effect_at(&defender.ability, AbilityTrigger::Accuracy)
    {
        defender_shift = *shift;
        chance += shift;
    }
    let chance = chance.clamp(1, 100) as u8;

    let roll = rng.next_outcome("accuracy check");
    if roll <= chance {
        return true;
    }

    // Attribute the miss to the defender when only its ability made the
    // difference.
    if defender_shift < 0 && roll as i16 <= move_data.accuracy as i16 {
        bus.push(BattleEvent::Dodged {
            defender: defender.agent_id.clone(),
        });
    } else {
        bus.push(BattleEvent::MoveMissed {
            attacker: attacker.agent_id.clone(),
            defender: defender.agent_id.clone(),
            move_id: move_data.id.clone(),
        });
    }
    false
}

fn execute_attack_hit(
    battle_state: &mut BattleState,
    side: usize,
    move_data: &MoveData,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    let type_multiplier = effectiveness(move_data.element, battle_state.combatant(1 - side).element);
    if type_multiplier == 0.0 {
        bus.push(BattleEvent::Immune {
            defender: battle_state.combatant(1 - side).agent_id.clone(),
            move_id: move_data.id.clone(),
        });
        return;
    }

    if matches!(move_data.effect, Some(MoveEffect::Ohko)) {
        let defender_hp = battle_state.combatant(1 - side).current_hp;
        bus.push(BattleEvent::OneHitKnockout {
            target: battle_state.combatant(1 - side).agent_id.clone(),
        });
        apply_hit_damage(battle_state, 1 - side, defender_hp, bus);
        return;
    }

    let crit_threshold = if move_data.is_high_crit() {
        HIGH_CRIT_THRESHOLD
    } else {
        BASE_CRIT_THRESHOLD
    };
    let is_crit = rng.next_outcome("critical hit check") <= crit_threshold;

    let damage = calculate_damage(battle_state, side, move_data, type_multiplier, is_crit, rng);

    if is_crit {
        bus.push(BattleEvent::CriticalHit {
            attacker: battle_state.combatant(side).agent_id.clone(),
        });
    }
    if type_multiplier != 1.0 {
        bus.push(BattleEvent::AttackEffectiveness {
            multiplier: type_multiplier,
        });
    }

    let dealt = apply_hit_damage(battle_state, 1 - side, damage, bus);
    apply_secondary_effects(battle_state, side, move_data, dealt, rng, bus);
}

/// Core damage formula:
/// power × (attack / defense) × STAB × type × crit × burn × ability
/// × rand[0.85, 1.0], floored, never below 1.
fn calculate_damage(
    battle_state: &BattleState,
    side: usize,
    move_data: &MoveData,
    type_multiplier: f64,
    is_crit: bool,
    rng: &mut TurnRng,
) -> u16 {
    let attacker = battle_state.combatant(side);
    let defender = battle_state.combatant(1 - side);

    let (attack, defense) = if is_crit {
        (
            crit_attack(attacker, move_data),
            crit_defense(defender, move_data).max(1),
        )
    } else {
        (
            effective_attack(attacker, move_data),
            effective_defense(defender, move_data).max(1),
        )
    };

    let mut damage = move_data.power as f64 * attack as f64 / defense as f64;

    if attacker.element == move_data.element {
        let stab = match ability_effect_at(&attacker.ability, AbilityTrigger::DamageCalc) {
            Some(AbilityEffect::StabOverride(bonus)) => *bonus,
            _ => 1.5,
        };
        damage *= stab;
    }

    damage *= type_multiplier;

    if is_crit {
        let roll = rng.next_outcome("critical hit multiplier");
        damage *= 1.25 + 0.25 * (roll - 1) as f64 / 99.0;
    }

    // Burn halves physical output.
    if let Some(status) = attacker.status {
        if move_data.category == schema::MoveCategory::Physical {
            if let Some(modifier) = status_hooks(status).physical_damage_mod {
                damage *= modifier;
            }
        }
    }

    if let Some(AbilityEffect::CategoryDamageBoost {
        category,
        multiplier,
    }) = ability_effect_at(&attacker.ability, AbilityTrigger::DamageCalc)
    {
        if *category == move_data.category {
            damage *= multiplier;
        }
    }

    let roll = rng.next_outcome("damage spread");
    damage *= 0.85 + 0.15 * (roll - 1) as f64 / 99.0;

    (damage.floor() as u16).max(1)
}

/// Apply hit damage to a side, honoring the survive-lethal ability once
/// per battle. Returns the damage actually dealt.
fn apply_hit_damage(
    battle_state: &mut BattleState,
    defender_side: usize,
    mut amount: u16,
    bus: &mut EventBus,
) -> u16 {
    let defender = battle_state.combatant_mut(defender_side);

    if amount >= defender.current_hp
        && !defender.sturdy_used
        && matches!(
            ability_effect_at(&defender.ability, AbilityTrigger::BeforeFaint),
            Some(AbilityEffect::SurviveLethal)
        )
        && defender.current_hp > 1
    {
        amount = defender.current_hp - 1;
        defender.sturdy_used = true;
        bus.push(BattleEvent::AbilityTriggered {
            owner: defender.agent_id.clone(),
            ability: defender.ability.clone(),
        });
    }

    defender.take_damage(amount);
    bus.push(BattleEvent::DamageDealt {
        target: defender.agent_id.clone(),
        amount,
        remaining_hp: defender.current_hp,
    });
    amount
}

fn apply_secondary_effects(
    battle_state: &mut BattleState,
    side: usize,
    move_data: &MoveData,
    dealt: u16,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    match &move_data.effect {
        Some(MoveEffect::InflictStatus { status, chance }) => {
            if roll_chance(*chance, "secondary status chance", rng) {
                try_inflict_status(battle_state, 1 - side, *status, bus);
            }
        }
        Some(MoveEffect::StatDrop {
            stat,
            stages,
            chance,
        }) => {
            if roll_chance(*chance, "secondary stat drop chance", rng) {
                let defender = battle_state.combatant_mut(1 - side);
                let target = defender.agent_id.clone();
                let (old_stage, new_stage) = defender.modify_stat_stage(*stat, -stages);
                bus.push(BattleEvent::StatStageChanged {
                    target,
                    stat: *stat,
                    old_stage,
                    new_stage,
                });
            }
        }
        Some(MoveEffect::Flinch { chance }) => {
            if roll_chance(*chance, "flinch chance", rng) {
                let defender = battle_state.combatant_mut(1 - side);
                if !defender.is_fainted() {
                    defender.flinched = true;
                    bus.push(BattleEvent::Flinched {
                        target: defender.agent_id.clone(),
                    });
                }
            }
        }
        Some(MoveEffect::Drain { percent }) => {
            let amount = ((dealt as f64 * *percent as f64 / 100.0).floor() as u16).max(1);
            let attacker = battle_state.combatant_mut(side);
            let healed = attacker.heal(amount);
            bus.push(BattleEvent::Drained {
                attacker: attacker.agent_id.clone(),
                amount: healed,
            });
        }
        Some(MoveEffect::Recoil { percent }) => {
            let amount = ((dealt as f64 * *percent as f64 / 100.0).floor() as u16).max(1);
            let attacker = battle_state.combatant_mut(side);
            attacker.take_damage(amount);
            bus.push(BattleEvent::RecoilTaken {
                attacker: attacker.agent_id.clone(),
                amount,
            });
        }
        _ => {}
    }

    // Contact abilities fire after the move's own effects.
    let attacker_ability = battle_state.combatant(side).ability.clone();
    if let Some(AbilityEffect::OnHitInflict { status, chance }) =
        ability_effect_at(&attacker_ability, AbilityTrigger::OnHit)
    {
        if dealt > 0 && roll_chance(*chance, "on-hit ability chance", rng) {
            let owner = battle_state.combatant(side).agent_id.clone();
            if try_inflict_status(battle_state, 1 - side, *status, bus) {
                bus.push(BattleEvent::AbilityTriggered {
                    owner,
                    ability: attacker_ability,
                });
            }
        }
    }
}

fn execute_status_move(
    battle_state: &mut BattleState,
    side: usize,
    move_data: &MoveData,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    match &move_data.effect {
        Some(MoveEffect::InflictStatus { status, chance }) => {
            if roll_chance(*chance, "status move chance", rng) {
                try_inflict_status(battle_state, 1 - side, *status, bus);
            }
        }
        Some(MoveEffect::StatBoost { stat, stages }) => {
            let combatant = battle_state.combatant_mut(side);
            let target = combatant.agent_id.clone();
            let (old_stage, new_stage) = combatant.modify_stat_stage(*stat, *stages);
            bus.push(BattleEvent::StatStageChanged {
                target,
                stat: *stat,
                old_stage,
                new_stage,
            });
        }
        Some(MoveEffect::StatDrop {
            stat,
            stages,
            chance,
        }) => {
            if roll_chance(*chance, "stat drop chance", rng) {
                let defender = battle_state.combatant_mut(1 - side);
                let target = defender.agent_id.clone();
                let (old_stage, new_stage) = defender.modify_stat_stage(*stat, -stages);
                bus.push(BattleEvent::StatStageChanged {
                    target,
                    stat: *stat,
                    old_stage,
                    new_stage,
                });
            }
        }
        Some(MoveEffect::Heal { percent }) => {
            let combatant = battle_state.combatant_mut(side);
            let amount = fraction_of_max_hp(combatant, *percent as f64 / 100.0);
            let healed = combatant.heal(amount);
            bus.push(BattleEvent::Healed {
                target: combatant.agent_id.clone(),
                amount: healed,
                new_hp: combatant.current_hp,
            });
        }
        Some(MoveEffect::DelayedHeal { percent }) => {
            let combatant = battle_state.combatant_mut(side);
            if combatant.wish_pending.is_none() {
                let amount = fraction_of_max_hp(combatant, *percent as f64 / 100.0);
                combatant.wish_pending = Some(amount);
            }
        }
        Some(MoveEffect::LeechSeed) => {
            let defender = battle_state.combatant_mut(1 - side);
            if !defender.leech_seeded {
                defender.leech_seeded = true;
                bus.push(BattleEvent::SeedPlanted {
                    target: defender.agent_id.clone(),
                });
            }
        }
        Some(MoveEffect::Curse) => {
            let defender = battle_state.combatant_mut(1 - side);
            if !defender.cursed {
                defender.cursed = true;
                bus.push(BattleEvent::CursePlaced {
                    target: defender.agent_id.clone(),
                });
            }
        }
        Some(MoveEffect::ResetStats) => {
            battle_state.agent_a.clear_stat_stages();
            battle_state.agent_b.clear_stat_stages();
            bus.push(BattleEvent::StatStagesCleared);
        }
        _ => {}
    }
}

/// Status infliction fails silently when the slot is taken (primary on
/// primary, or a second confusion).
fn try_inflict_status(
    battle_state: &mut BattleState,
    target_side: usize,
    status: StatusKind,
    bus: &mut EventBus,
) -> bool {
    let target = battle_state.combatant_mut(target_side);
    if target.is_fainted() {
        return false;
    }
    if target.apply_status(status) {
        bus.push(BattleEvent::StatusInflicted {
            target: target.agent_id.clone(),
            status,
        });
        true
    } else {
        false
    }
}

fn roll_chance(chance: u8, reason: &str, rng: &mut TurnRng) -> bool {
    if chance >= 100 {
        return true;
    }
    rng.next_outcome(reason) <= chance
}

fn fraction_of_max_hp(combatant: &CombatantState, fraction: f64) -> u16 {
    ((combatant.max_hp as f64 * fraction).floor() as u16).max(1)
}

/// End-of-turn ticks in acting order: status damage, leech drain, curse,
/// wish resolution, regeneration. A side that faints mid-phase takes no
/// further ticks.
fn execute_end_turn_phase(battle_state: &mut BattleState, order: &[usize; 2], bus: &mut EventBus) {
    for &side in order {
        if battle_state.combatant(side).is_fainted() {
            continue;
        }

        if let Some(status) = battle_state.combatant(side).status {
            if let Some(fraction) = status_hooks(status).end_turn_damage {
                let combatant = battle_state.combatant_mut(side);
                let amount = fraction_of_max_hp(combatant, fraction);
                combatant.take_damage(amount);
                bus.push(BattleEvent::StatusDamage {
                    target: combatant.agent_id.clone(),
                    status,
                    amount,
                    remaining_hp: combatant.current_hp,
                });
            }
        }

        if battle_state.combatant(side).is_fainted() {
            continue;
        }

        if battle_state.combatant(side).leech_seeded {
            let (victim, feeder) = sides_mut(battle_state, side);
            let amount = fraction_of_max_hp(victim, LEECH_FRACTION);
            victim.take_damage(amount);
            bus.push(BattleEvent::VolatileDamage {
                target: victim.agent_id.clone(),
                source: "leech_seed".to_string(),
                amount,
                remaining_hp: victim.current_hp,
            });
            if !feeder.is_fainted() {
                let healed = feeder.heal(amount);
                if healed > 0 {
                    bus.push(BattleEvent::Healed {
                        target: feeder.agent_id.clone(),
                        amount: healed,
                        new_hp: feeder.current_hp,
                    });
                }
            }
        }

        if battle_state.combatant(side).is_fainted() {
            continue;
        }

        if battle_state.combatant(side).cursed {
            let combatant = battle_state.combatant_mut(side);
            let amount = fraction_of_max_hp(combatant, CURSE_FRACTION);
            combatant.take_damage(amount);
            bus.push(BattleEvent::VolatileDamage {
                target: combatant.agent_id.clone(),
                source: "curse".to_string(),
                amount,
                remaining_hp: combatant.current_hp,
            });
        }

        if battle_state.combatant(side).is_fainted() {
            continue;
        }

        if let Some(amount) = battle_state.combatant_mut(side).wish_pending.take() {
            let combatant = battle_state.combatant_mut(side);
            let healed = combatant.heal(amount);
            bus.push(BattleEvent::Healed {
                target: combatant.agent_id.clone(),
                amount: healed,
                new_hp: combatant.current_hp,
            });
        }

        let ability = battle_state.combatant(side).ability.clone();
        if let Some(AbilityEffect::EndTurnHealFraction(fraction)) =
            ability_effect_at(&ability, AbilityTrigger::TurnEnd)
        {
            let combatant = battle_state.combatant_mut(side);
            if combatant.current_hp < combatant.max_hp {
                let amount = fraction_of_max_hp(combatant, *fraction);
                let healed = combatant.heal(amount);
                bus.push(BattleEvent::AbilityTriggered {
                    owner: combatant.agent_id.clone(),
                    ability: ability.clone(),
                });
                bus.push(BattleEvent::Healed {
                    target: combatant.agent_id.clone(),
                    amount: healed,
                    new_hp: combatant.current_hp,
                });
            }
        }

        // Leftover flinch never carries across turns.
        battle_state.combatant_mut(side).flinched = false;
    }
}

/// Close out the turn: faint events, win condition, timestamps. On a
/// double faint the side that acted first this turn is ruled the winner;
/// the slower combatant is deemed to have collapsed first.
fn finalize_turn(
    battle_state: &mut BattleState,
    first_actor: usize,
    bus: &mut EventBus,
    now: DateTime<Utc>,
) {
    let fainted_a = battle_state.agent_a.is_fainted();
    let fainted_b = battle_state.agent_b.is_fainted();

    if fainted_a {
        bus.push(BattleEvent::Fainted {
            agent: battle_state.agent_a.agent_id.clone(),
        });
    }
    if fainted_b {
        bus.push(BattleEvent::Fainted {
            agent: battle_state.agent_b.agent_id.clone(),
        });
    }

    bus.push(BattleEvent::TurnEnded);
    battle_state.updated_at = now;

    let winner_side = match (fainted_a, fainted_b) {
        (false, false) => None,
        (true, false) => Some(1),
        (false, true) => Some(0),
        (true, true) => Some(first_actor),
    };

    if let Some(side) = winner_side {
        let winner_id = battle_state.combatant(side).agent_id.clone();
        battle_state.finish(Some(winner_id.clone()), now);
        bus.push(BattleEvent::BattleEnded {
            winner: Some(winner_id.clone()),
        });
        tracing::info!(
            battle_id = %battle_state.battle_id,
            winner = %winner_id,
            turns = battle_state.turn_number,
            "battle finished"
        );
    }
}
