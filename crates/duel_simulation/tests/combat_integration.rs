//! Combat integration test
//!
//! Полный headless App через `DuelSimulation`:
//! - Hit / whiff / block / combo knockback / KO сценарии
//! - Health/arena инварианты на длинных случайных боях
//! - Terminal state после KO

use bevy::prelude::*;
use duel_simulation::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DT: f32 = 0.05;

/// Противник стоит на месте и ничего не делает (все gate'ы закрыты)
fn passive_config() -> CombatConfig {
    CombatConfig {
        opponent_speed: 0.0,
        policy: PolicyConfig {
            start_block_chance: 0.0,
            stop_block_chance: 0.0,
            punish_chance: 0.0,
            attack_chance: 0.0,
            ..PolicyConfig::default()
        },
        ..CombatConfig::default()
    }
}

/// Helper: бойцы на дистанции `distance` по X, отсчёт уже закончился
fn live_duel(config: CombatConfig, distance: f32) -> DuelSimulation {
    let countdown = config.countdown_duration;
    let mut sim = DuelSimulation::new(config, 42).expect("valid config");
    sim.start_match();
    sim.place_fighter(Corner::Challenger, -distance / 2.0, 0.0);
    sim.place_fighter(Corner::Defender, distance / 2.0, 0.0);

    // Весь отсчёт одним тиком
    let frame = sim.advance_tick(countdown, HumanInput::idle());
    assert!(frame.match_state.is_active);
    sim
}

fn challenger(frame: &FrameSnapshot) -> &FighterSnapshot {
    frame.challenger.as_ref().expect("challenger spawned")
}

fn defender(frame: &FrameSnapshot) -> &FighterSnapshot {
    frame.defender.as_ref().expect("defender spawned")
}

fn resolved_outcome(frame: &FrameSnapshot) -> Option<AttackOutcome> {
    frame.events.iter().find_map(|entry| match entry {
        CombatLogEntry::AttackResolved { outcome, .. } => Some(*outcome),
        _ => None,
    })
}

/// Helper: тикаем с `input` пока не придёт AttackResolved
///
/// Возвращает кадр resolution и сколько тиков прошло.
fn run_until_resolved(sim: &mut DuelSimulation, input: HumanInput, max_ticks: usize) -> (FrameSnapshot, AttackOutcome, usize) {
    for tick in 1..=max_ticks {
        let frame = sim.advance_tick(DT, input);
        if let Some(outcome) = resolved_outcome(&frame) {
            return (frame, outcome, tick);
        }
    }
    panic!("no attack resolved within {} ticks", max_ticks);
}

/// Helper: нажимаем attack как только кулдаун и lock позволяют
fn swing_when_ready(frame: &FrameSnapshot, previous: HumanInput) -> HumanInput {
    let me = challenger(frame);
    if me.attack_cooldown <= 0.0 && me.lock <= 0.0 && !previous.attack_pressed {
        HumanInput::attack()
    } else {
        HumanInput::idle()
    }
}

#[test]
fn test_clean_hit_after_resolution_delay() {
    let mut sim = live_duel(passive_config(), 1.0);

    let frame = sim.advance_tick(DT, HumanInput::attack());
    assert!(frame.events.contains(&CombatLogEntry::AttackStarted {
        attacker: Corner::Challenger
    }));
    assert_eq!(challenger(&frame).animation, AnimationState::Attack);
    // Cooldown стартует с 0.8 и в этом же тике уже тикает
    assert!((challenger(&frame).attack_cooldown + DT - 0.8).abs() < 1e-5);

    let (frame, outcome, ticks) = run_until_resolved(&mut sim, HumanInput::idle(), 40);

    assert_eq!(
        outcome,
        AttackOutcome::Hit {
            damage: 15.0,
            knockback: false
        }
    );
    // Hit check через 0.4s после начала атаки
    assert_eq!(ticks, (0.4 / DT).round() as usize);

    let target = defender(&frame);
    assert_eq!(target.health, 85.0);
    assert!((target.invincibility - 0.3).abs() < 1e-6);
    assert_eq!(target.animation, AnimationState::Impact);
    assert_eq!(frame.match_state.combo_count, 1);
}

#[test]
fn test_whiff_out_of_range() {
    let mut sim = live_duel(passive_config(), 3.0);

    sim.advance_tick(DT, HumanInput::attack());
    let (frame, outcome, ticks) = run_until_resolved(&mut sim, HumanInput::idle(), 40);

    assert_eq!(outcome, AttackOutcome::Whiff { penalty: 0.3 });
    assert_eq!(defender(&frame).health, 100.0);
    assert_eq!(defender(&frame).position, Vec3::new(1.5, 0.0, 0.0));

    // 0.8 + 0.3, минус время с момента атаки
    let since_attack = (ticks + 1) as f32 * DT;
    assert!(
        (challenger(&frame).attack_cooldown - (1.1 - since_attack)).abs() < 1e-4,
        "cooldown {}",
        challenger(&frame).attack_cooldown
    );
}

#[test]
fn test_whiff_costs_exactly_the_penalty() {
    let mut hit = live_duel(passive_config(), 1.0);
    let mut miss = live_duel(passive_config(), 3.0);

    hit.advance_tick(DT, HumanInput::attack());
    miss.advance_tick(DT, HumanInput::attack());

    let (hit_frame, _, hit_ticks) = run_until_resolved(&mut hit, HumanInput::idle(), 40);
    let (miss_frame, _, miss_ticks) = run_until_resolved(&mut miss, HumanInput::idle(), 40);
    assert_eq!(hit_ticks, miss_ticks);

    let difference = challenger(&miss_frame).attack_cooldown - challenger(&hit_frame).attack_cooldown;
    assert!((difference - 0.3).abs() < 1e-5, "difference {}", difference);
}

#[test]
fn test_blocked_hit() {
    let config = CombatConfig {
        policy: PolicyConfig {
            start_block_chance: 1.0,
            ..passive_config().policy
        },
        ..passive_config()
    };
    let mut sim = live_duel(config, 1.0);

    // Тик на реакцию: противник видит угрозу и поднимает блок
    let frame = sim.advance_tick(DT, HumanInput::idle());
    assert!(defender(&frame).blocking);
    assert_eq!(defender(&frame).animation, AnimationState::Block);

    sim.advance_tick(DT, HumanInput::attack());
    let (frame, outcome, _) = run_until_resolved(&mut sim, HumanInput::idle(), 40);

    assert_eq!(outcome, AttackOutcome::Blocked { damage: 7.5 });
    let target = defender(&frame);
    assert_eq!(target.health, 92.5);
    assert_eq!(target.stun, 0.0);
    assert!(!target.knockback_active);
}

#[test]
fn test_fourth_hit_in_combo_knocks_back() {
    let mut sim = live_duel(passive_config(), 1.0);
    let mut frame = sim.snapshot();
    let mut input = HumanInput::idle();
    let mut outcomes = Vec::new();

    for _ in 0..200 {
        input = swing_when_ready(&frame, input);
        frame = sim.advance_tick(DT, input);
        if let Some(outcome) = resolved_outcome(&frame) {
            outcomes.push(outcome);
            if outcomes.len() == 4 {
                break;
            }
        }
    }

    assert_eq!(
        outcomes,
        vec![
            AttackOutcome::Hit { damage: 15.0, knockback: false },
            AttackOutcome::Hit { damage: 15.0, knockback: false },
            AttackOutcome::Hit { damage: 15.0, knockback: false },
            AttackOutcome::Hit { damage: 15.0, knockback: true },
        ]
    );
    assert_eq!(frame.match_state.combo_count, 4);
    assert_eq!(defender(&frame).health, 40.0);
    assert!(defender(&frame).knockback_active);

    let before = defender(&frame).position;
    for _ in 0..10 {
        frame = sim.advance_tick(DT, HumanInput::idle());
    }
    let after = defender(&frame).position;

    // Отлетел от атакующего (вдоль +X) на полную силу knockback
    assert!((after.x - before.x - 1.5).abs() < 1e-3, "{:?} -> {:?}", before, after);
    assert!(!defender(&frame).knockback_active);
}

#[test]
fn test_combo_expires_without_knockback() {
    let mut sim = live_duel(passive_config(), 1.0);
    let mut frame = sim.snapshot();
    let mut input = HumanInput::idle();
    let mut hits = 0;

    // Три удара подряд
    while hits < 3 {
        input = swing_when_ready(&frame, input);
        frame = sim.advance_tick(DT, input);
        if resolved_outcome(&frame).is_some() {
            hits += 1;
        }
    }
    assert_eq!(frame.match_state.combo_count, 3);

    // Пауза дольше combo window
    for _ in 0..40 {
        frame = sim.advance_tick(DT, HumanInput::idle());
    }
    assert_eq!(frame.match_state.combo_count, 0);

    sim.advance_tick(DT, HumanInput::attack());
    let (frame, outcome, _) = run_until_resolved(&mut sim, HumanInput::idle(), 40);
    assert_eq!(
        outcome,
        AttackOutcome::Hit {
            damage: 15.0,
            knockback: false
        }
    );
    assert_eq!(frame.match_state.combo_count, 1);
}

/// Крупный dt: окно истекает между тиками, и удар резолвится в том же
/// тике, где expire ещё не успел сбросить streak.
#[test]
fn test_stale_combo_between_coarse_ticks() {
    const COARSE_DT: f32 = 0.2;
    let mut sim = live_duel(passive_config(), 1.0);

    // Streak из трёх ударов, последний за 1.2s до замаха
    let swing_at = sim.snapshot().elapsed + COARSE_DT as f64;
    {
        let mut match_state = sim.world_mut().resource_mut::<MatchState>();
        match_state.combo_count = 3;
        match_state.last_hit_at = Some(swing_at - 1.2);
    }

    let frame = sim.advance_tick(COARSE_DT, HumanInput::attack());
    assert!(frame.events.contains(&CombatLogEntry::AttackStarted {
        attacker: Corner::Challenger
    }));

    // 1.4s после удара: окно ещё открыто
    let frame = sim.advance_tick(COARSE_DT, HumanInput::idle());
    assert_eq!(resolved_outcome(&frame), None);
    assert_eq!(frame.match_state.combo_count, 3);

    // 1.6s: hit check раньше expire в этом тике
    let frame = sim.advance_tick(COARSE_DT, HumanInput::idle());
    assert_eq!(
        resolved_outcome(&frame),
        Some(AttackOutcome::Hit {
            damage: 15.0,
            knockback: false
        })
    );
    assert!(!defender(&frame).knockback_active);
    assert_eq!(defender(&frame).health, 85.0);
    assert_eq!(frame.match_state.combo_count, 1);
}

#[test]
fn test_knockout_and_terminal_state() {
    let mut sim = live_duel(passive_config(), 1.0);
    let target = sim.entity(Corner::Defender).expect("defender spawned");
    if let Some(mut health) = sim.world_mut().get_mut::<Health>(target) {
        health.current = 15.0;
    }

    sim.advance_tick(DT, HumanInput::attack());
    let (frame, outcome, _) = run_until_resolved(&mut sim, HumanInput::idle(), 40);

    assert_eq!(
        outcome,
        AttackOutcome::Hit {
            damage: 15.0,
            knockback: false
        }
    );
    assert!(frame.events.contains(&CombatLogEntry::KnockedOut {
        loser: Corner::Defender,
        winner: Corner::Challenger
    }));
    assert_eq!(defender(&frame).health, 0.0);
    assert_eq!(defender(&frame).animation, AnimationState::Die);
    assert!(!frame.match_state.is_active);
    assert_eq!(frame.match_state.phase, MatchPhase::Ended);
    assert_eq!(frame.match_state.winner, Some(Corner::Challenger));

    // После KO ничего не двигается и не бьёт
    let frozen_at = challenger(&frame).position;
    let mut frame = frame;
    for tick in 0..60 {
        let input = if tick % 2 == 0 {
            HumanInput::attack()
        } else {
            HumanInput::moving(1.0, 1.0)
        };
        frame = sim.advance_tick(DT, input);
        assert!(frame.events.is_empty(), "events after KO: {:?}", frame.events);
    }
    assert_eq!(challenger(&frame).position, frozen_at);
    assert_eq!(defender(&frame).animation, AnimationState::Die);
    assert_eq!(defender(&frame).health, 0.0);
    assert_eq!(challenger(&frame).health, 100.0);
}

#[test]
fn test_human_walk_is_normalized_and_clamped() {
    let mut sim = live_duel(passive_config(), 4.0);

    let frame = sim.advance_tick(0.1, HumanInput::moving(-1.0, 1.0));
    let moved = challenger(&frame).position - Vec3::new(-2.0, 0.0, 0.0);
    // Диагональ не быстрее прямой: 5.0 * 0.1
    assert!((moved.length() - 0.5).abs() < 1e-4, "moved {:?}", moved);
    assert_eq!(challenger(&frame).animation, AnimationState::Walk);

    let mut frame = frame;
    for _ in 0..100 {
        frame = sim.advance_tick(0.1, HumanInput::moving(-1.0, 1.0));
    }
    let position = challenger(&frame).position;
    assert_eq!(position, Vec3::new(-6.0, 0.0, 3.0));
}

#[test]
fn test_policy_chases_then_holds() {
    let config = CombatConfig {
        policy: passive_config().policy,
        ..CombatConfig::default()
    };
    let mut sim = live_duel(config, 6.0);

    let mut frame = sim.snapshot();
    for _ in 0..100 {
        frame = sim.advance_tick(DT, HumanInput::idle());
    }

    // Подошёл на chase distance и остановился
    let distance = challenger(&frame).position.distance(defender(&frame).position);
    assert!(distance <= 2.0 + 3.0 * DT, "distance {}", distance);
    assert!(distance > 1.5, "distance {}", distance);
    assert_eq!(defender(&frame).animation, AnimationState::Idle);

    // Всегда смотрят друг на друга
    let forward = defender(&frame).facing * Vec3::NEG_Z;
    let to_challenger = (challenger(&frame).position - defender(&frame).position).normalize();
    assert!(forward.dot(to_challenger) > 0.99);
}

/// Test: длинные случайные бои - инварианты держатся на каждом кадре
#[test]
fn test_invariants_over_random_bouts() {
    for seed in [1_u64, 7, 42, 1337] {
        let mut sim = DuelSimulation::with_default_config(seed).expect("default config is valid");
        let arena = sim.config().arena;
        let mut input_rng = ChaCha8Rng::seed_from_u64(seed ^ 0xD0E1);
        let mut frame = sim.start_match();
        let mut died: Option<Corner> = None;
        let mut final_health: Option<(f32, f32)> = None;

        for _ in 0..6000 {
            let input = HumanInput {
                move_x: input_rng.gen_range(-1.0..=1.0),
                move_z: input_rng.gen_range(-1.0..=1.0),
                attack_pressed: input_rng.gen_bool(0.3),
                block_held: input_rng.gen_bool(0.2),
            };
            frame = sim.advance_tick(1.0 / 60.0, input);

            for fighter in [challenger(&frame), defender(&frame)] {
                assert!(fighter.health >= 0.0 && fighter.health <= fighter.max_health);
                assert!(arena.contains(fighter.position.x, fighter.position.z));
                assert_eq!(fighter.position.y, arena.ground_y);
                assert!(fighter.invincibility >= 0.0);
                assert!(fighter.attack_cooldown >= 0.0);
                assert_eq!(fighter.blocking, fighter.animation == AnimationState::Block);

                if died == Some(fighter.corner) {
                    assert_eq!(fighter.animation, AnimationState::Die, "Die is sticky");
                }
                if fighter.animation == AnimationState::Die {
                    died = Some(fighter.corner);
                    assert_eq!(fighter.health, 0.0);
                }
            }

            if frame.match_state.winner.is_some() {
                assert!(!frame.match_state.is_active);
                let health = (challenger(&frame).health, defender(&frame).health);
                match final_health {
                    Some(frozen) => assert_eq!(frozen, health, "health changed after KO"),
                    None => final_health = Some(health),
                }
            }
        }
    }
}
