//! Human input resolution
//!
//! Хост каждый тик кладёт snapshot контролов в `HumanControl`;
//! система превращает его в действие бойца с учётом lockout'ов.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{initiate_attack, AttackStarted, Attacker, CombatSchedule};
use crate::components::{CombatantState, Health, Player};
use crate::config::CombatConfig;
use crate::match_state::MatchState;
use crate::movement::walk_step;
use crate::DuelSet;

/// Control snapshot for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanInput {
    /// -1.0..1.0
    pub move_x: f32,
    /// -1.0..1.0
    pub move_z: f32,
    pub attack_pressed: bool,
    pub block_held: bool,
}

impl HumanInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(move_x: f32, move_z: f32) -> Self {
        Self {
            move_x,
            move_z,
            ..Self::default()
        }
    }

    pub fn attack() -> Self {
        Self {
            attack_pressed: true,
            ..Self::default()
        }
    }

    pub fn block() -> Self {
        Self {
            block_held: true,
            ..Self::default()
        }
    }

    /// Combined move axes as a unit vector on the ground plane (or ZERO).
    ///
    /// Нормализация убирает диагональное ускорение.
    pub fn move_direction(&self) -> Vec3 {
        let axis = |value: f32| if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
        Vec3::new(axis(self.move_x), 0.0, axis(self.move_z)).normalize_or_zero()
    }
}

/// Current and previous control snapshots (for attack edge detection).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct HumanControl {
    pub current: HumanInput,
    pub previous: HumanInput,
}

impl HumanControl {
    pub fn push(&mut self, input: HumanInput) {
        self.previous = self.current;
        self.current = input;
    }

    /// Attack control became active this frame
    pub fn attack_just_pressed(&self) -> bool {
        self.current.attack_pressed && !self.previous.attack_pressed
    }
}

/// What the human fighter does this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HumanAction {
    Attack,
    Block,
    Walk { direction: Vec3 },
    Idle,
    /// Attack swing / hit reaction in progress; state stays as is
    Locked,
}

pub fn decide_human_action(
    control: &HumanControl,
    state: &CombatantState,
    attacker: &Attacker,
    config: &CombatConfig,
) -> HumanAction {
    let locked = state.is_locked();

    // Атака отменяет блок (block-cancel)
    if control.attack_just_pressed() && attacker.can_attack() && !locked {
        return HumanAction::Attack;
    }
    if locked {
        return HumanAction::Locked;
    }

    // Первые доли секунды после замаха: ни ходьбы, ни блока
    if attacker.in_early_recovery(config.attack_cooldown, config.early_recovery_window) {
        return HumanAction::Idle;
    }

    if control.current.block_held {
        return HumanAction::Block;
    }

    let direction = control.current.move_direction();
    if direction == Vec3::ZERO {
        HumanAction::Idle
    } else {
        HumanAction::Walk { direction }
    }
}

/// System: human intent → state/position/attack
pub fn resolve_human_intent(
    control: Res<HumanControl>,
    match_state: Res<MatchState>,
    config: Res<CombatConfig>,
    time: Res<Time>,
    mut schedule: ResMut<CombatSchedule>,
    mut players: Query<
        (Entity, &mut Transform, &Health, &mut Attacker, &mut CombatantState),
        With<Player>,
    >,
    mut attack_events: EventWriter<AttackStarted>,
) {
    if !match_state.is_active() {
        return;
    }

    let delta = time.delta_secs();
    let now = time.elapsed_secs_f64();

    for (entity, mut transform, health, mut attacker, mut state) in players.iter_mut() {
        if !health.is_alive() || state.is_dead() {
            continue;
        }

        match decide_human_action(&control, &state, &attacker, &config) {
            HumanAction::Attack => {
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
            HumanAction::Block => *state = CombatantState::Blocking,
            HumanAction::Walk { direction } => {
                transform.translation = walk_step(
                    transform.translation,
                    direction,
                    config.movement_speed,
                    delta,
                    &config.arena,
                );
                *state = CombatantState::Walking;
            }
            HumanAction::Idle => *state = CombatantState::Idle,
            HumanAction::Locked => {}
        }
    }
}

/// Human Input Plugin
///
/// Регистрирует `HumanControl` и resolve_human_intent (первым в тике).
pub struct HumanInputPlugin;

impl Plugin for HumanInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HumanControl>().add_systems(
            Update,
            resolve_human_intent.in_set(DuelSet::HumanIntent),
        );
    }
}
