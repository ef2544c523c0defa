use crate::battle::conditions::StatusKind;
use crate::battle::engine::resolve_turn;
use crate::battle::state::{ActionSkipReason, BattleEvent};
use crate::battle::tests::common::*;
use schema::ElementType;

fn agent_moved(bus_events: &[BattleEvent], agent: &str) -> bool {
    bus_events
        .iter()
        .any(|e| matches!(e, BattleEvent::MoveUsed { agent: a, .. } if a == agent))
}

fn skipped_with(bus_events: &[BattleEvent], agent: &str, reason: &ActionSkipReason) -> bool {
    bus_events.iter().any(|e| {
        matches!(e, BattleEvent::ActionSkipped { agent: a, reason: r } if a == agent && r == reason)
    })
}

#[test]
fn paralysis_skips_at_threshold() {
    let a = TestAgentBuilder::new("a", ElementType::Volt, 25)
        .with_status(StatusKind::Paralysis)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    // First roll feeds the paralysis check: 15 is inside the 15% band.
    let mut rng = rng_with(vec![15]);
    let bus = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();

    assert!(skipped_with(bus.events(), "a", &ActionSkipReason::FullyParalyzed));
    assert!(!agent_moved(bus.events(), "a"));
    assert!(agent_moved(bus.events(), "b"));
}

#[test]
fn paralysis_passes_above_threshold() {
    let a = TestAgentBuilder::new("a", ElementType::Volt, 25)
        .with_status(StatusKind::Paralysis)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    let mut rng = rng_with(vec![16]);
    let bus = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();

    assert!(agent_moved(bus.events(), "a"));
}

#[test]
fn paralysis_skip_rate_is_exactly_fifteen_percent() {
    let mut skips = 0;
    for roll in 1..=100u8 {
        let a = TestAgentBuilder::new("a", ElementType::Volt, 25)
            .with_status(StatusKind::Paralysis)
            .with_speed(200)
            .build();
        let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
            .with_speed(100)
            .build();
        let mut battle = create_test_battle(a, b);
        let mut rng = rng_with(vec![roll]);
        let bus = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();
        if skipped_with(bus.events(), "a", &ActionSkipReason::FullyParalyzed) {
            skips += 1;
        }
    }
    assert_eq!(skips, 15);
}

#[test]
fn freeze_thaws_after_losing_one_action() {
    let a = TestAgentBuilder::new("a", ElementType::Frost, 25)
        .with_status(StatusKind::Freeze)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_moves(vec!["harden_shell"])
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    let mut rng = predictable_rng();
    let first = resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();
    assert!(skipped_with(first.events(), "a", &ActionSkipReason::Frozen));

    let mut rng = predictable_rng();
    let second = resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();
    assert!(second.events().iter().any(|e| matches!(
        e,
        BattleEvent::StatusCleared { target, status: StatusKind::Freeze } if target == "a"
    )));
    assert!(agent_moved(second.events(), "a"));
    assert!(battle.agent_a.status.is_none());
}

#[test]
fn sleep_wakes_by_third_turn() {
    let a = TestAgentBuilder::new("a", ElementType::Mind, 25)
        .with_status(StatusKind::Sleep)
        .with_speed(200)
        .build();
    // The opponent only sets up, so nothing wakes the sleeper early.
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_moves(vec!["harden_shell"])
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    for _ in 0..2 {
        let mut rng = predictable_rng();
        let bus =
            resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();
        assert!(skipped_with(bus.events(), "a", &ActionSkipReason::Asleep));
    }

    let mut rng = predictable_rng();
    let third = resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();
    assert!(agent_moved(third.events(), "a"));
    assert!(battle.agent_a.status.is_none());
}

#[test]
fn sleep_wakes_early_after_taking_damage() {
    let a = TestAgentBuilder::new("a", ElementType::Mind, 25)
        .with_status(StatusKind::Sleep)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    let mut rng = predictable_rng();
    let first = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();
    assert!(skipped_with(first.events(), "a", &ActionSkipReason::Asleep));
    assert!(battle.agent_a.woke_from_damage);

    let mut rng = predictable_rng();
    let second = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();
    assert!(agent_moved(second.events(), "a"));
}

#[test]
fn flinch_consumes_one_action() {
    let a = TestAgentBuilder::new("a", ElementType::Stone, 25)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);
    battle.agent_a.flinched = true;

    let mut rng = predictable_rng();
    let bus = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();

    assert!(skipped_with(bus.events(), "a", &ActionSkipReason::Flinched));
    assert!(!battle.agent_a.flinched);
}

#[test]
fn confusion_self_hit_is_capped_at_tenth_of_max_hp() {
    let a = TestAgentBuilder::new("a", ElementType::Charm, 25)
        .with_status(StatusKind::Confusion)
        .with_speed(200)
        .build();
    let max_hp = a.max_hp;
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_moves(vec!["harden_shell"])
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    // 25 is inside the 25% self-hit band.
    let mut rng = rng_with(vec![25]);
    let bus = resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();

    let expected = ((max_hp as f64 * 0.10).floor() as u16).max(1);
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::ConfusionSelfHit { target, amount } if target == "a" && *amount == expected
    )));
    assert!(skipped_with(
        bus.events(),
        "a",
        &ActionSkipReason::HurtItselfInConfusion
    ));
    assert_eq!(battle.agent_a.current_hp, max_hp - expected);
}

#[test]
fn confusion_cures_itself_after_three_turns() {
    let a = TestAgentBuilder::new("a", ElementType::Charm, 25)
        .with_status(StatusKind::Confusion)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Tide, 25)
        .with_moves(vec!["harden_shell"])
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);

    // Rolls of 90 dodge the self-hit every turn, so only the counter moves.
    for _ in 0..3 {
        let mut rng = rng_with(vec![90]);
        resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();
        assert!(battle.agent_a.confused);
    }

    let mut rng = predictable_rng();
    let fourth = resolve_turn(&mut battle, "pinch", "harden_shell", &mut rng, fixed_now()).unwrap();
    assert!(fourth.events().iter().any(|e| matches!(
        e,
        BattleEvent::StatusCleared { target, status: StatusKind::Confusion } if target == "a"
    )));
    assert!(!battle.agent_a.confused);
}

#[test]
fn unknown_move_is_a_logged_no_op() {
    let a = TestAgentBuilder::new("a", ElementType::Tide, 25)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Flame, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);
    let hp_before = battle.agent_b.current_hp;

    let mut rng = predictable_rng();
    let bus = resolve_turn(&mut battle, "tsunami_cannon", "pinch", &mut rng, fixed_now()).unwrap();

    assert!(skipped_with(bus.events(), "a", &ActionSkipReason::UnknownMove));
    assert_eq!(battle.agent_b.current_hp, hp_before);
    // The other side's turn still resolves normally.
    assert!(agent_moved(bus.events(), "b"));
}

#[test]
fn move_outside_the_loadout_is_a_logged_no_op() {
    // crusher_claw exists in the database, but this agent never learned it.
    let a = TestAgentBuilder::new("a", ElementType::Tide, 25)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Flame, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);
    let hp_before = battle.agent_b.current_hp;

    let mut rng = predictable_rng();
    let bus = resolve_turn(&mut battle, "crusher_claw", "pinch", &mut rng, fixed_now()).unwrap();

    assert!(skipped_with(bus.events(), "a", &ActionSkipReason::MoveNotLearned));
    assert_eq!(battle.agent_b.current_hp, hp_before);
    assert!(agent_moved(bus.events(), "b"));
}

#[test]
fn exhausted_pp_is_a_logged_no_op() {
    let a = TestAgentBuilder::new("a", ElementType::Tide, 25)
        .with_speed(200)
        .build();
    let b = TestAgentBuilder::new("b", ElementType::Flame, 25)
        .with_speed(100)
        .build();
    let mut battle = create_test_battle(a, b);
    for slot in &mut battle.agent_a.moves {
        slot.pp = 0;
    }

    let mut rng = predictable_rng();
    let bus = resolve_turn(&mut battle, "pinch", "pinch", &mut rng, fixed_now()).unwrap();

    assert!(skipped_with(bus.events(), "a", &ActionSkipReason::NoPpRemaining));
    assert!(agent_moved(bus.events(), "b"));
}
