use crate::battle::conditions::status_hooks;
use crate::combatant::CombatantState;
use crate::moves::MoveData;
use schema::{MoveCategory, StatType};

/// Multiplier band granted by evolution tier. Level-gated, recomputed at
/// snapshot time whenever a combatant is built; never cached past a battle.
pub fn evolution_bonus(level: u8) -> f64 {
    match level {
        0..=19 => 0.0,
        20..=59 => 0.10,
        _ => 0.25,
    }
}

/// Apply stat stage multipliers. Stages range from -6 to +6.
/// Negative stages: (2 / (2 + |stage|)); positive stages: ((2 + stage) / 2).
/// This yields exactly 0.25 at -6, 1.0 at 0 and 4.0 at +6, and is
/// monotonically increasing across the band.
pub fn stat_stage_multiplier(stage: i8) -> f64 {
    let clamped = stage.clamp(-6, 6);
    if clamped < 0 {
        2.0 / (2.0 + (-clamped) as f64)
    } else {
        (2.0 + clamped as f64) / 2.0
    }
}

fn level_scale(level: u8) -> f64 {
    1.0 + (level.saturating_sub(1)) as f64 * 0.02
}

fn ev_contribution(ev: u16, level: u8) -> f64 {
    (ev as f64 / 4.0) * (level as f64 / 100.0)
}

/// Effective non-HP stat at battle start:
/// base scaled by level, evolution tier and nature, plus the EV
/// contribution and a small additive floor.
pub fn effective_stat(base: u16, level: u8, ev: u16, nature_mod: f64, evo_bonus: f64) -> u16 {
    let scaled = base as f64 * level_scale(level) * (1.0 + evo_bonus) * nature_mod;
    (scaled + ev_contribution(ev, level)).floor() as u16 + 5
}

/// Effective max HP. Uses a 3x base multiplier and a larger, level-linked
/// floor than the other stats, which keeps typical battles in the
/// six-to-eight turn band. Natures never touch HP.
pub fn effective_hp(base: u16, level: u8, ev: u16, evo_bonus: f64) -> u16 {
    let scaled = base as f64 * 3.0 * level_scale(level) * (1.0 + evo_bonus);
    (scaled + ev_contribution(ev, level)).floor() as u16 + 10 + (level as u16 / 2)
}

fn staged(base: u16, stage: i8) -> u16 {
    ((base as f64) * stat_stage_multiplier(stage)).round() as u16
}

/// Effective speed including stat stages and the status speed modifier
/// (paralysis runs at 75%).
pub fn effective_speed(combatant: &CombatantState) -> u16 {
    let base = staged(combatant.stats.speed, combatant.stat_stage(StatType::Speed));
    let status_mod = combatant
        .status
        .map(|s| status_hooks(s).speed_mod)
        .unwrap_or(1.0);
    ((base as f64) * status_mod).floor() as u16
}

/// Attack stat the given move keys off, with stages applied. Status moves
/// have no attacking stat.
pub fn effective_attack(combatant: &CombatantState, move_data: &MoveData) -> u16 {
    match move_data.category {
        MoveCategory::Physical => staged(
            combatant.stats.attack,
            combatant.stat_stage(StatType::Attack),
        ),
        MoveCategory::Special => staged(
            combatant.stats.sp_atk,
            combatant.stat_stage(StatType::SpAtk),
        ),
        MoveCategory::Status => 0,
    }
}

/// Defense stat the given move is resisted by, with stages applied.
pub fn effective_defense(combatant: &CombatantState, move_data: &MoveData) -> u16 {
    match move_data.category {
        MoveCategory::Physical => staged(
            combatant.stats.defense,
            combatant.stat_stage(StatType::Defense),
        ),
        MoveCategory::Special => staged(
            combatant.stats.sp_def,
            combatant.stat_stage(StatType::SpDef),
        ),
        MoveCategory::Status => 0,
    }
}

/// Attack stat ignoring the attacker's own unfavorable (negative) stages.
/// Critical hits read this instead of `effective_attack`.
pub fn crit_attack(combatant: &CombatantState, move_data: &MoveData) -> u16 {
    match move_data.category {
        MoveCategory::Physical => staged(
            combatant.stats.attack,
            combatant.stat_stage(StatType::Attack).max(0),
        ),
        MoveCategory::Special => staged(
            combatant.stats.sp_atk,
            combatant.stat_stage(StatType::SpAtk).max(0),
        ),
        MoveCategory::Status => 0,
    }
}

/// Defense stat ignoring the defender's favorable (positive) stages.
/// Critical hits read this instead of `effective_defense`.
pub fn crit_defense(combatant: &CombatantState, move_data: &MoveData) -> u16 {
    match move_data.category {
        MoveCategory::Physical => staged(
            combatant.stats.defense,
            combatant.stat_stage(StatType::Defense).min(0),
        ),
        MoveCategory::Special => staged(
            combatant.stats.sp_def,
            combatant.stat_stage(StatType::SpDef).min(0),
        ),
        MoveCategory::Status => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn stage_multiplier_identity_and_extremes() {
        assert_eq!(stat_stage_multiplier(0), 1.0);
        assert_eq!(stat_stage_multiplier(-6), 0.25);
        assert_eq!(stat_stage_multiplier(6), 4.0);
        // Out-of-band input clamps rather than extrapolating.
        assert_eq!(stat_stage_multiplier(9), 4.0);
        assert_eq!(stat_stage_multiplier(-9), 0.25);
    }

    #[test]
    fn stage_multiplier_is_monotone() {
        let mut previous = 0.0;
        for stage in -6..=6 {
            let multiplier = stat_stage_multiplier(stage);
            assert!(
                multiplier > previous,
                "stage {} not increasing: {} <= {}",
                stage,
                multiplier,
                previous
            );
            previous = multiplier;
        }
    }

    #[rstest]
    #[case(1, 0.0)]
    #[case(19, 0.0)]
    #[case(20, 0.10)]
    #[case(59, 0.10)]
    #[case(60, 0.25)]
    #[case(100, 0.25)]
    fn evolution_tiers_are_level_gated(#[case] level: u8, #[case] expected: f64) {
        assert_eq!(evolution_bonus(level), expected);
    }

    #[test]
    fn effective_stat_grows_with_level_and_investment() {
        let at_5 = effective_stat(80, 5, 0, 1.0, evolution_bonus(5));
        let at_50 = effective_stat(80, 50, 0, 1.0, evolution_bonus(50));
        let at_50_ev = effective_stat(80, 50, 252, 1.0, evolution_bonus(50));
        assert!(at_50 > at_5);
        assert!(at_50_ev > at_50);
    }

    #[test]
    fn hp_outscales_other_stats() {
        let hp = effective_hp(80, 50, 0, evolution_bonus(50));
        let attack = effective_stat(80, 50, 0, 1.0, evolution_bonus(50));
        assert!(hp > attack * 2, "hp {} vs attack {}", hp, attack);
    }

    #[test]
    fn nature_shifts_stat_by_ten_percent() {
        let neutral = effective_stat(100, 50, 0, 1.0, 0.0);
        let boosted = effective_stat(100, 50, 0, 1.1, 0.0);
        let reduced = effective_stat(100, 50, 0, 0.9, 0.0);
        assert!(boosted > neutral);
        assert!(reduced < neutral);
    }
}
