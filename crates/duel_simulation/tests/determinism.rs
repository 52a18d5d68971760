//! Тесты детерминизма
//!
//! Проверяем что бой с одинаковым seed и одинаковым input даёт
//! идентичные результаты (policy AI катает кубики из DeterministicRng)

use bevy::prelude::*;
use duel_simulation::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TICK_COUNT: usize = 3000;

/// Скриптованный input: случайный, но от собственного seed
fn input_script(seed: u64, ticks: usize) -> Vec<HumanInput> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..ticks)
        .map(|_| HumanInput {
            move_x: rng.gen_range(-1.0..=1.0),
            move_z: rng.gen_range(-1.0..=1.0),
            attack_pressed: rng.gen_bool(0.25),
            block_held: rng.gen_bool(0.1),
        })
        .collect()
}

/// Запускает бой и возвращает все кадры
fn run_bout(seed: u64, inputs: &[HumanInput]) -> (Vec<FrameSnapshot>, DuelSimulation) {
    let mut sim = DuelSimulation::with_default_config(seed).expect("default config is valid");
    sim.start_match();

    let frames: Vec<_> = inputs
        .iter()
        .enumerate()
        .map(|(tick, input)| {
            // Неровный dt как у реального хоста
            let dt = if tick % 7 == 0 { 1.0 / 30.0 } else { 1.0 / 60.0 };
            sim.advance_tick(dt, *input)
        })
        .collect();

    (frames, sim)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    let inputs = input_script(7, TICK_COUNT);

    let (frames1, mut sim1) = run_bout(SEED, &inputs);
    let (frames2, mut sim2) = run_bout(SEED, &inputs);

    // Кадр за кадром
    for (tick, (a, b)) in frames1.iter().zip(&frames2).enumerate() {
        assert_eq!(a, b, "Кадр {} разошёлся при seed {}", tick, SEED);
    }

    // И итоговый мир
    assert_eq!(
        world_snapshot::<Health>(sim1.world_mut()),
        world_snapshot::<Health>(sim2.world_mut())
    );
    assert_eq!(
        world_snapshot::<Transform>(sim1.world_mut()),
        world_snapshot::<Transform>(sim2.world_mut())
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    let inputs = input_script(42, TICK_COUNT);

    // Запускаем 3 раза - все должны быть идентичны
    let finals: Vec<_> = (0..3)
        .map(|_| {
            let (frames, _) = run_bout(SEED, &inputs);
            frames.last().cloned().expect("at least one frame")
        })
        .collect();

    for (i, frame) in finals.iter().enumerate().skip(1) {
        assert_eq!(finals[0], *frame, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_determinism_across_reset() {
    const SEED: u64 = 99;
    let inputs = input_script(3, 600);

    let run = || {
        let (_, mut sim) = run_bout(SEED, &inputs);
        sim.reset_match();
        inputs
            .iter()
            .map(|input| sim.advance_tick(1.0 / 60.0, *input))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

/// Policy: одинаковый seed → одинаковая последовательность решений
#[test]
fn test_policy_decisions_are_seeded() {
    let policy = PolicyConfig::default();
    let context = PolicyContext {
        distance: 1.5,
        is_blocking: false,
        ready_to_attack: true,
        opponent_cooldown: 0.5,
    };

    let decide_all = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..500)
            .map(|_| decide_policy_action(&context, &policy, &mut rng))
            .collect::<Vec<_>>()
    };

    assert_eq!(decide_all(1), decide_all(1));
    assert!(decide_all(1).contains(&PolicyAction::Attack));
}
