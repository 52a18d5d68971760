//! Reactive opponent policy
//!
//! Без памяти: каждый тик заново решаем по дистанции и cooldown'ам.
//! Вероятностные gate'ы дают неповторяющийся тайминг без отдельной
//! модели рандомизации.
//!
//! Решение изолировано в `decide_policy_action` (чистая функция),
//! система только применяет результат.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{initiate_attack, AttackStarted, Attacker, CombatSchedule};
use crate::components::{CombatantState, Fighter, Health, Player};
use crate::config::{CombatConfig, PolicyConfig};
use crate::match_state::MatchState;
use crate::movement::{planar_distance, planar_offset, walk_step};
use crate::DeterministicRng;

/// AI действие на этот тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Идём к противнику
    Chase,
    /// Замах (если cooldown готов)
    Attack,
    /// Держим блок
    Block,
    /// Стоим
    Idle,
}

/// Inputs for one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyContext {
    pub distance: f32,
    pub is_blocking: bool,
    pub ready_to_attack: bool,
    pub opponent_cooldown: f32,
}

pub fn decide_policy_action(
    context: &PolicyContext,
    policy: &PolicyConfig,
    rng: &mut impl Rng,
) -> PolicyAction {
    if context.is_blocking {
        // Отдельный (чуть более вероятный) gate на выход из блока
        if rng.gen::<f32>() >= policy.stop_block_chance {
            return PolicyAction::Block;
        }
    } else if context.distance < policy.block_range
        && context.opponent_cooldown <= policy.threat_window
        && rng.gen::<f32>() < policy.start_block_chance
    {
        return PolicyAction::Block;
    }

    if context.distance <= policy.engage_range && context.ready_to_attack {
        // Противник только что замахнулся и восстанавливается - наказываем
        let vulnerable = context.opponent_cooldown > policy.vulnerable_threshold;
        if vulnerable && rng.gen::<f32>() < policy.punish_chance {
            return PolicyAction::Attack;
        }
        if rng.gen::<f32>() < policy.attack_chance {
            return PolicyAction::Attack;
        }
    }

    if context.distance > policy.chase_distance {
        PolicyAction::Chase
    } else {
        PolicyAction::Idle
    }
}

/// System: AI intent → state/position/attack
#[allow(clippy::too_many_arguments)]
pub fn resolve_policy_intent(
    match_state: Res<MatchState>,
    config: Res<CombatConfig>,
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut schedule: ResMut<CombatSchedule>,
    mut policies: Query<
        (Entity, &mut Transform, &Health, &mut Attacker, &mut CombatantState),
        (With<Fighter>, Without<Player>),
    >,
    opponents: Query<(&Transform, &Attacker), With<Player>>,
    mut attack_events: EventWriter<AttackStarted>,
) {
    if !match_state.is_active() {
        return;
    }

    let delta = time.delta_secs();
    let now = time.elapsed_secs_f64();

    for (entity, mut transform, health, mut attacker, mut state) in policies.iter_mut() {
        if !health.is_alive() || state.is_dead() || state.is_locked() {
            continue;
        }

        let Some(opponent) = match_state.opponent_of(entity) else {
            continue;
        };
        let Ok((opponent_transform, opponent_attacker)) = opponents.get(opponent) else {
            continue;
        };
        let opponent_at = opponent_transform.translation;

        let context = PolicyContext {
            distance: planar_distance(transform.translation, opponent_at),
            is_blocking: state.is_blocking(),
            ready_to_attack: attacker.can_attack(),
            opponent_cooldown: opponent_attacker.cooldown_timer,
        };

        match decide_policy_action(&context, &config.policy, &mut rng.rng) {
            PolicyAction::Attack => {
                if initiate_attack(
                    entity,
                    &mut attacker,
                    &mut state,
                    health,
                    &match_state,
                    &mut schedule,
                    &config,
                    now,
                ) {
                    attack_events.write(AttackStarted { attacker: entity });
                }
            }
            PolicyAction::Block => *state = CombatantState::Blocking,
            PolicyAction::Chase => {
                let direction = planar_offset(transform.translation, opponent_at).normalize_or_zero();
                transform.translation = walk_step(
                    transform.translation,
                    direction,
                    config.opponent_speed,
                    delta,
                    &config.arena,
                );
                *state = CombatantState::Walking;
            }
            PolicyAction::Idle => *state = CombatantState::Idle,
        }
    }
}
