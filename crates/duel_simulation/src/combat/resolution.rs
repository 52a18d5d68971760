//! Attack lifecycle: Initiated → Scheduled(hit_check_delay) → Resolved.
//!
//! Hit check идёт посреди замаха, по позициям на момент resolution,
//! а не на момент нажатия.

use bevy::prelude::*;

use crate::combat::{
    apply_damage, AttackOutcome, AttackResolved, Attacker, CombatSchedule, DamageReport,
    FighterDied, FighterMut, FighterQuery, TimedEffect,
};
use crate::components::{CombatantState, Health, Knockback};
use crate::config::CombatConfig;
use crate::match_state::MatchState;
use crate::movement::planar_offset;

/// Result of a resolved attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub outcome: AttackOutcome,
    pub target_died: bool,
}

/// Start a swing and schedule its hit check.
///
/// Returns false (and changes nothing) when a precondition fails:
/// cooldown running, attacker dead, match not active.
#[allow(clippy::too_many_arguments)]
pub fn initiate_attack(
    entity: Entity,
    attacker: &mut Attacker,
    state: &mut CombatantState,
    health: &Health,
    match_state: &MatchState,
    schedule: &mut CombatSchedule,
    config: &CombatConfig,
    now: f64,
) -> bool {
    if !attacker.can_attack() || !health.is_alive() || state.is_dead() || !match_state.is_active() {
        return false;
    }

    *state = CombatantState::attacking(config.attack_animation_duration);
    attacker.start_attack(config.attack_cooldown);
    schedule.schedule(
        now + config.hit_check_delay as f64,
        TimedEffect::ResolveAttack { attacker: entity },
    );
    true
}

/// Resolve a pending attack against the opponent.
///
/// `None` - атака отброшена: атакующий мёртв или матч уже не активен.
pub fn resolve_attack(
    attacker: &mut FighterMut,
    target: &mut FighterMut,
    match_state: &mut MatchState,
    config: &CombatConfig,
    now: f64,
) -> Option<Resolution> {
    if !attacker.is_alive() || !match_state.is_active() {
        return None;
    }

    // I-frames у цели: не вина атакующего, штрафа нет
    if target.invincibility.is_active() {
        return Some(Resolution {
            outcome: AttackOutcome::Deflected,
            target_died: false,
        });
    }

    let offset = planar_offset(attacker.position(), target.position());
    if offset.length() >= config.attack_range {
        attacker.attacker.apply_whiff_penalty(config.whiff_penalty);
        return Some(Resolution {
            outcome: AttackOutcome::Whiff {
                penalty: config.whiff_penalty,
            },
            target_died: false,
        });
    }

    let blocked = target.state.is_blocking();
    // Streak до этого удара решает knockback (протухший не считается)
    let prior_combo = match_state.live_combo(now, config.combo_window);
    let damage = config.damage_for(blocked);

    let report = apply_damage(target, damage, match_state, config, now);
    let target_died = report == DamageReport::KnockedOut;

    if blocked {
        return Some(Resolution {
            outcome: AttackOutcome::Blocked { damage },
            target_died,
        });
    }

    let knockback = prior_combo >= config.knockback_combo_threshold;
    if let CombatantState::Reeling {
        stun_remaining,
        knockback: slide,
        ..
    } = &mut *target.state
    {
        *stun_remaining = config.stun_duration;
        if knockback {
            let direction = offset
                .try_normalize()
                .unwrap_or_else(|| attacker.transform.forward().as_vec3());
            *slide = Some(Knockback::new(direction));
        }
    }

    Some(Resolution {
        outcome: AttackOutcome::Hit {
            damage,
            knockback: knockback && !target_died,
        },
        target_died,
    })
}

/// System: обработка отложенных эффектов, срок которых наступил
///
/// Запускается после timer decay, чтобы истёкший cooldown был виден
/// input'у следующего тика.
pub fn process_scheduled_effects(
    mut schedule: ResMut<CombatSchedule>,
    mut match_state: ResMut<MatchState>,
    config: Res<CombatConfig>,
    time: Res<Time>,
    mut fighters: Query<FighterQuery>,
    mut resolved_events: EventWriter<AttackResolved>,
    mut died_events: EventWriter<FighterDied>,
) {
    let now = time.elapsed_secs_f64();

    for scheduled in schedule.pop_due(now) {
        let TimedEffect::ResolveAttack { attacker } = scheduled.effect;

        let Some(target) = match_state.opponent_of(attacker) else {
            continue;
        };
        let Ok([mut attacker_item, mut target_item]) = fighters.get_many_mut([attacker, target])
        else {
            continue;
        };

        let mut attacker_view = attacker_item.as_fighter_mut();
        let mut target_view = target_item.as_fighter_mut();

        let Some(resolution) =
            resolve_attack(&mut attacker_view, &mut target_view, &mut match_state, &config, now)
        else {
            crate::logger::log(&format!(
                "Pending attack from {:?} dropped (attacker down or match over)",
                attacker
            ));
            continue;
        };

        resolved_events.write(AttackResolved {
            attacker,
            target,
            outcome: resolution.outcome,
        });

        if resolution.target_died {
            died_events.write(FighterDied {
                entity: target,
                killer: attacker,
            });
        }
    }
}
