//! Heuristic move selection for AI-controlled combatants.

use crate::battle::state::TurnRng;
use crate::combatant::CombatantState;
use crate::moves::{get_move_data, MoveData, MoveEffect};
use crate::stats::{effective_attack, effective_defense};
use ordered_float::OrderedFloat;
use schema::ElementType;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

/// Scores each usable move 0-100 and picks per difficulty tier. This is a
/// heuristic, not a search: one state inspection per move, no lookahead.
pub struct MoveStrategist {
    difficulty: Difficulty,
    effectiveness_cache: HashMap<(ElementType, ElementType), f64>,
}

impl MoveStrategist {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            effectiveness_cache: HashMap::new(),
        }
    }

    /// Pick a move id for this turn. Moves with no PP are excluded before
    /// scoring; if nothing is usable the first slot is returned as-is and
    /// the resolver logs the no-op.
    pub fn choose_move(
        &mut self,
        attacker: &CombatantState,
        defender: &CombatantState,
        rng: &mut TurnRng,
    ) -> String {
        let usable: Vec<&str> = attacker
            .usable_moves()
            .map(|slot| slot.move_id.as_str())
            .collect();

        if usable.is_empty() {
            return attacker
                .moves
                .first()
                .map(|slot| slot.move_id.clone())
                .unwrap_or_default();
        }

        if self.difficulty == Difficulty::Easy {
            let roll = rng.next_outcome("easy tier move pick") as usize;
            return usable[(roll - 1) % usable.len()].to_string();
        }

        let mut scored: Vec<(&str, f64)> = usable
            .iter()
            .map(|&move_id| (move_id, self.score_move(move_id, attacker, defender)))
            .collect();
        scored.sort_by_key(|(_, score)| std::cmp::Reverse(OrderedFloat(*score)));

        match self.difficulty {
            Difficulty::Hard => scored[0].0.to_string(),
            _ => {
                // Normal: top pick 80% of the time, second best otherwise.
                if scored.len() >= 2 && rng.next_outcome("normal tier move pick") > 80 {
                    scored[1].0.to_string()
                } else {
                    scored[0].0.to_string()
                }
            }
        }
    }

    /// Score one move against the current matchup. Base 50, shifted by
    /// matchup, knockout potential, status utility and accuracy.
    fn score_move(&mut self, move_id: &str, attacker: &CombatantState, defender: &CombatantState) -> f64 {
        let Some(move_data) = get_move_data(move_id) else {
            return 0.0;
        };

        let mut score = 50.0;

        if move_data.is_damaging() {
            let multiplier = self.cached_effectiveness(move_data.element, defender.element);
            if multiplier < 0.1 {
                return 0.0;
            }
            if multiplier > 1.0 {
                score += 20.0;
            } else if multiplier < 1.0 {
                score -= 10.0;
            }

            let estimate = self.estimate_damage(move_data, multiplier, attacker, defender);
            if estimate >= defender.current_hp as f64 {
                score += 25.0;
            }
            if estimate >= defender.max_hp as f64 * 0.5 {
                score += 15.0;
            }
            // Cornered attackers stop playing for position.
            if attacker.hp_fraction() < 0.25 {
                score += 10.0;
            }
        }

        match &move_data.effect {
            Some(MoveEffect::InflictStatus { chance, .. }) => {
                if defender.status.is_none() && !defender.confused {
                    score += 20.0 * *chance as f64 / 100.0;
                }
            }
            Some(MoveEffect::Heal { .. }) | Some(MoveEffect::DelayedHeal { .. }) => {
                if attacker.hp_fraction() < 0.40 {
                    score += 25.0;
                } else {
                    score -= 15.0;
                }
            }
            _ => {}
        }

        if move_data.accuracy > 0 {
            score -= (100 - move_data.accuracy) as f64 / 5.0;
        }

        score.clamp(0.0, 100.0)
    }

    /// Rough expected damage, ignoring crits and the random spread. Only
    /// used for ranking; never fed back into the resolver.
    fn estimate_damage(
        &self,
        move_data: &MoveData,
        multiplier: f64,
        attacker: &CombatantState,
        defender: &CombatantState,
    ) -> f64 {
        let attack = effective_attack(attacker, move_data) as f64;
        let defense = effective_defense(defender, move_data).max(1) as f64;
        let stab = if attacker.element == move_data.element {
            1.5
        } else {
            1.0
        };
        move_data.power as f64 * attack / defense * stab * multiplier
    }

    fn cached_effectiveness(&mut self, attacking: ElementType, defending: ElementType) -> f64 {
        *self
            .effectiveness_cache
            .entry((attacking, defending))
            .or_insert_with(|| schema::effectiveness(attacking, defending))
    }
}
