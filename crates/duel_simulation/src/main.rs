//! Headless дуэль
//!
//! Скриптованный human боец идёт к противнику и атакует, пока кто-то
//! не упадёт. Потом reset и ещё пара секунд второго раунда.

use duel_simulation::{ConfigError, Corner, DuelSimulation, FrameSnapshot, HumanInput};

const DT: f32 = 1.0 / 60.0;
const MAX_TICKS: u32 = 60 * 120;

/// Простейший "игрок": сближаемся, бьём по готовности
fn scripted_input(frame: &FrameSnapshot, previous: HumanInput) -> HumanInput {
    let (Some(me), Some(enemy)) = (frame.fighter(Corner::Challenger), frame.fighter(Corner::Defender))
    else {
        return HumanInput::idle();
    };

    let offset = enemy.position - me.position;
    if offset.length() > 1.5 {
        return HumanInput::moving(offset.x, offset.z);
    }

    // Отпускаем кнопку через кадр, чтобы следующее нажатие было новым
    if me.attack_cooldown <= 0.0 && me.lock <= 0.0 && !previous.attack_pressed {
        HumanInput::attack()
    } else {
        HumanInput::idle()
    }
}

fn main() -> Result<(), ConfigError> {
    let seed = 42;
    println!("Starting headless duel (seed: {})", seed);

    let mut sim = DuelSimulation::with_default_config(seed)?;
    let mut frame = sim.start_match();
    let mut input = HumanInput::idle();

    for tick in 0..MAX_TICKS {
        input = scripted_input(&frame, input);
        frame = sim.advance_tick(DT, input);

        if tick % 60 == 0 {
            if let (Some(challenger), Some(defender)) = (&frame.challenger, &frame.defender) {
                println!(
                    "t={:>5.2}s  challenger {:>5.1} hp {:?}  |  defender {:>5.1} hp {:?}  combo {}",
                    frame.elapsed,
                    challenger.health,
                    challenger.animation,
                    defender.health,
                    defender.animation,
                    frame.match_state.combo_count,
                );
            }
        }

        if let Some(winner) = frame.match_state.winner {
            println!("Winner: {} after {:.2}s", winner.as_str(), frame.elapsed);
            break;
        }
    }

    let mut frame = sim.reset_match();
    println!(
        "Round {} ready, countdown {:.1}s",
        frame.match_state.round_number, frame.match_state.countdown_remaining
    );

    for _ in 0..120 {
        frame = sim.advance_tick(DT, HumanInput::idle());
    }
    println!("Round {} active: {}", frame.match_state.round_number, frame.match_state.is_active);

    println!("Simulation complete!");
    Ok(())
}
