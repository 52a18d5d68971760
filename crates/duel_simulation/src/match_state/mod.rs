//! Match lifecycle: Countdown → Active → Ended.
//!
//! `MatchState` держит оба entity бойцов напрямую (Roster), поэтому
//! ни одна система не ищет "игрока" или "врага" перебором.

use bevy::prelude::*;

use crate::combat::{Attacker, CombatSchedule};
use crate::components::{CombatantState, Controller, Corner, Fighter, Health, Invincibility, Player};
use crate::config::CombatConfig;
use crate::input::HumanControl;
use crate::movement::facing_rotation;
use crate::DuelSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPhase {
    /// Ждём окончания отсчёта, input не обрабатывается
    #[default]
    Countdown,
    Active,
    /// KO: winner назначен, состояние read-only до reset
    Ended,
}

/// Оба бойца дуэли
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roster {
    pub challenger: Entity,
    pub defender: Entity,
}

impl Roster {
    pub fn entity(&self, corner: Corner) -> Entity {
        match corner {
            Corner::Challenger => self.challenger,
            Corner::Defender => self.defender,
        }
    }

    pub fn opponent_of(&self, entity: Entity) -> Option<Entity> {
        if entity == self.challenger {
            Some(self.defender)
        } else if entity == self.defender {
            Some(self.challenger)
        } else {
            None
        }
    }
}

/// Match singleton
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub winner: Option<Corner>,
    /// Shared hit streak (both fighters feed the same counter)
    pub combo_count: u32,
    /// Simulation time of the last landed hit
    pub last_hit_at: Option<f64>,
    pub countdown_remaining: f32,
    /// 0 until the first match starts
    pub round_number: u32,
    pub roster: Option<Roster>,
}

impl MatchState {
    pub fn new_round(roster: Roster, countdown: f32, round_number: u32) -> Self {
        Self {
            phase: MatchPhase::Countdown,
            winner: None,
            combo_count: 0,
            last_hit_at: None,
            countdown_remaining: countdown,
            round_number,
            roster: Some(roster),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == MatchPhase::Active
    }

    pub fn opponent_of(&self, entity: Entity) -> Option<Entity> {
        self.roster.and_then(|roster| roster.opponent_of(entity))
    }

    fn within_window(&self, now: f64, combo_window: f32) -> bool {
        self.last_hit_at
            .is_some_and(|last| now - last < combo_window as f64)
    }

    /// Streak, который ещё жив в момент `now`
    ///
    /// `combo_count` чистит `expire_combo_window` уже после resolution,
    /// поэтому при крупном dt счётчик может быть протухшим.
    pub fn live_combo(&self, now: f64, combo_window: f32) -> u32 {
        if self.within_window(now, combo_window) {
            self.combo_count
        } else {
            0
        }
    }

    /// Combo bookkeeping for a landed hit.
    pub fn register_hit(&mut self, now: f64, combo_window: f32) {
        self.combo_count = if self.within_window(now, combo_window) {
            self.combo_count + 1
        } else {
            1
        };
        self.last_hit_at = Some(now);
    }

    /// Reset the streak once the window since the last hit has passed.
    pub fn expire_combo(&mut self, now: f64, combo_window: f32) -> bool {
        let expired = self.combo_count > 0
            && self
                .last_hit_at
                .is_some_and(|last| now - last > combo_window as f64);

        if expired {
            self.combo_count = 0;
        }
        expired
    }

    pub fn finish(&mut self, winner: Corner) {
        self.phase = MatchPhase::Ended;
        self.winner = Some(winner);
    }

    /// Advance the countdown; returns true on the tick the match goes live.
    pub fn tick_countdown(&mut self, delta: f32) -> bool {
        if self.phase != MatchPhase::Countdown || self.roster.is_none() {
            return false;
        }

        self.countdown_remaining -= delta;
        if self.countdown_remaining <= 0.0 {
            self.countdown_remaining = 0.0;
            self.phase = MatchPhase::Active;
            return true;
        }
        false
    }
}

/// System: отсчёт перед боем
///
/// Стоит последним в тике: матч становится активным со следующего тика.
pub fn tick_countdown(mut match_state: ResMut<MatchState>, time: Res<Time>) {
    if match_state.tick_countdown(time.delta_secs()) {
        crate::logger::log_info(&format!(
            "🔔 Round {}: FIGHT!",
            match_state.round_number
        ));
    }
}

/// System: сброс combo streak после окна
pub fn expire_combo_window(
    mut match_state: ResMut<MatchState>,
    config: Res<CombatConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();
    let streak = match_state.combo_count;

    if match_state.expire_combo(now, config.combo_window) {
        crate::logger::log(&format!("Combo of {} expired", streak));
    }
}

/// Respawn both fighters and open a fresh countdown.
///
/// Старые entity бойцов удаляются целиком, pending атаки сбрасываются.
pub fn start_round(world: &mut World, round_number: u32) -> Roster {
    let config = world.resource::<CombatConfig>().clone();

    let previous = world.resource::<MatchState>().roster;
    if let Some(previous) = previous {
        world.despawn(previous.challenger);
        world.despawn(previous.defender);
    }
    world.resource_mut::<CombatSchedule>().clear();
    *world.resource_mut::<HumanControl>() = HumanControl::default();

    let challenger_at = config.challenger_spawn_position();
    let defender_at = config.defender_spawn_position();

    let challenger = world
        .spawn((
            Fighter {
                corner: Corner::Challenger,
                controller: Controller::Human,
            },
            Player,
            spawn_transform(challenger_at, defender_at),
            Health::new(config.max_health),
            Invincibility::default(),
            Attacker::default(),
            CombatantState::Idle,
        ))
        .id();

    let defender = world
        .spawn((
            Fighter {
                corner: Corner::Defender,
                controller: Controller::Policy,
            },
            spawn_transform(defender_at, challenger_at),
            Health::new(config.max_health),
            Invincibility::default(),
            Attacker::default(),
            CombatantState::Idle,
        ))
        .id();

    let roster = Roster {
        challenger,
        defender,
    };
    *world.resource_mut::<MatchState>() =
        MatchState::new_round(roster, config.countdown_duration, round_number);

    crate::logger::log_info(&format!(
        "🥊 Round {} countdown started ({:.1}s)",
        round_number, config.countdown_duration
    ));

    roster
}

fn spawn_transform(at: Vec3, facing: Vec3) -> Transform {
    let rotation = facing_rotation(at, facing).unwrap_or(Quat::IDENTITY);
    Transform::from_translation(at).with_rotation(rotation)
}

/// Match Plugin
///
/// - expire_combo_window - после resolution (hit этого тика уже учтён)
/// - tick_countdown - последним, активация вступает в силу со следующего тика
pub struct MatchPlugin;

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchState>().add_systems(
            Update,
            (
                expire_combo_window.in_set(DuelSet::ComboWindow),
                tick_countdown.in_set(DuelSet::Countdown),
            ),
        );
    }
}
