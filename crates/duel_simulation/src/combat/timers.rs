//! Timer engine: i-frames, animation locks, hitstun, knockback slide.

use bevy::prelude::*;

use crate::components::{CombatantState, Fighter, Invincibility};
use crate::config::CombatConfig;

/// System: decay per-fighter timers и knockback
///
/// Lock expiry возвращает бойца в Idle (кроме Dead). Knockback двигает
/// Transform по ease-out кривой и клампит в границы арены.
pub fn tick_combatant_timers(
    mut fighters: Query<(&mut Transform, &mut Invincibility, &mut CombatantState), With<Fighter>>,
    config: Res<CombatConfig>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (mut transform, mut invincibility, mut state) in fighters.iter_mut() {
        if invincibility.is_active() {
            invincibility.tick(delta);
        }

        if !state.is_locked() {
            continue;
        }

        let displacement = state.advance(delta, config.knockback_duration, config.knockback_force);
        if displacement != Vec3::ZERO {
            transform.translation = config.arena.clamp(transform.translation + displacement);
        }
    }
}
