//! Planar movement helpers и always-on facing.
//!
//! Бойцы двигаются только по плоскости XZ, Y прибит к полу арены.

use bevy::prelude::*;

use crate::components::Fighter;
use crate::config::{ArenaBounds, CombatConfig};
use crate::match_state::MatchState;

/// Offset from `from` to `to` on the ground plane (y = 0).
pub fn planar_offset(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
}

pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar_offset(a, b).length()
}

/// Yaw rotation that points a fighter at `from` towards `to`.
///
/// Forward = -Z (Bevy convention). `None` when the points coincide.
pub fn facing_rotation(from: Vec3, to: Vec3) -> Option<Quat> {
    let offset = planar_offset(from, to);
    if offset.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-offset.x, -offset.z)))
}

/// One walk step: `direction` (unit or zero) × speed × dt, clamped to the arena.
pub fn walk_step(position: Vec3, direction: Vec3, speed: f32, delta: f32, arena: &ArenaBounds) -> Vec3 {
    arena.clamp(position + direction * speed * delta)
}

/// System: бойцы всегда смотрят друг на друга
///
/// Не зависит от lockout'ов. Slerp к азимуту противника для сглаживания.
pub fn face_opponents(
    match_state: Res<MatchState>,
    config: Res<CombatConfig>,
    time: Res<Time>,
    mut fighters: Query<&mut Transform, With<Fighter>>,
) {
    let Some(roster) = match_state.roster else {
        return;
    };
    let Ok([mut challenger, mut defender]) =
        fighters.get_many_mut([roster.challenger, roster.defender])
    else {
        return;
    };

    let blend = (config.turn_speed * time.delta_secs()).clamp(0.0, 1.0);
    let challenger_at = challenger.translation;
    let defender_at = defender.translation;

    if let Some(target) = facing_rotation(challenger_at, defender_at) {
        challenger.rotation = challenger.rotation.slerp(target, blend);
    }
    if let Some(target) = facing_rotation(defender_at, challenger_at) {
        defender.rotation = defender.rotation.slerp(target, blend);
    }
}
