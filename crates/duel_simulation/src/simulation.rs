//! Host facade: lifecycle calls + per-frame snapshot.
//!
//! Хост владеет `DuelSimulation`, раз в кадр вызывает `advance_tick`
//! и рисует то, что вернулось в `FrameSnapshot`. Snapshot - owned копия,
//! рендер никогда не видит живой ECS world.

use std::time::Duration;

use bevy::prelude::*;

use crate::combat::{Attacker, CombatLog, CombatLogEntry};
use crate::components::{AnimationState, CombatantState, Controller, Corner, Fighter, Health, Invincibility};
use crate::config::{CombatConfig, ConfigError};
use crate::input::{HumanControl, HumanInput};
use crate::match_state::{start_round, MatchPhase, MatchState};

/// Outbound state of one fighter.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterSnapshot {
    pub entity: Entity,
    pub corner: Corner,
    pub controller: Controller,
    pub position: Vec3,
    pub facing: Quat,
    pub animation: AnimationState,
    pub health: f32,
    pub max_health: f32,
    pub blocking: bool,
    pub attack_cooldown: f32,
    pub invincibility: f32,
    pub stun: f32,
    pub lock: f32,
    pub knockback_active: bool,
}

impl FighterSnapshot {
    /// Yaw in radians (0 = facing -Z).
    pub fn facing_yaw(&self) -> f32 {
        self.facing.to_euler(EulerRot::YXZ).0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub is_active: bool,
    pub winner: Option<Corner>,
    pub combo_count: u32,
    pub countdown_remaining: f32,
    pub round_number: u32,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Simulation time, seconds
    pub elapsed: f64,
    /// `None` until the first match starts
    pub challenger: Option<FighterSnapshot>,
    pub defender: Option<FighterSnapshot>,
    pub match_state: MatchSnapshot,
    /// Combat events raised during the last tick
    pub events: Vec<CombatLogEntry>,
}

impl FrameSnapshot {
    pub fn fighter(&self, corner: Corner) -> Option<&FighterSnapshot> {
        match corner {
            Corner::Challenger => self.challenger.as_ref(),
            Corner::Defender => self.defender.as_ref(),
        }
    }
}

/// Headless duel: Bevy App + lifecycle API.
pub struct DuelSimulation {
    app: App,
}

impl DuelSimulation {
    /// Build a simulation; no fighters exist until `start_match`.
    pub fn new(config: CombatConfig, seed: u64) -> Result<Self, ConfigError> {
        crate::logger::init_logger();
        if let Err(err) = config.validate() {
            crate::logger::log_error(&format!("❌ Invalid combat config: {}", err));
            return Err(err);
        }
        let app = crate::create_headless_app(config, seed);
        Ok(Self { app })
    }

    /// `new` с дефолтным балансом
    pub fn with_default_config(seed: u64) -> Result<Self, ConfigError> {
        Self::new(CombatConfig::default(), seed)
    }

    /// Spawn both fighters and open round 1.
    pub fn start_match(&mut self) -> FrameSnapshot {
        start_round(self.app.world_mut(), 1);
        self.snapshot()
    }

    /// Respawn both fighters, fresh countdown, next round number.
    ///
    /// До первого `start_match` работает как start.
    pub fn reset_match(&mut self) -> FrameSnapshot {
        let round = self.app.world().resource::<MatchState>().round_number + 1;
        crate::logger::log_info(&format!("🔄 Match reset → round {}", round));
        start_round(self.app.world_mut(), round);
        self.snapshot()
    }

    /// Run one frame.
    pub fn advance_tick(&mut self, dt: f32, input: HumanInput) -> FrameSnapshot {
        let delta = if dt.is_finite() && dt > 0.0 {
            Duration::try_from_secs_f32(dt).unwrap_or_default()
        } else {
            if dt != 0.0 {
                crate::logger::log_warning(&format!("⚠️ Ignoring invalid dt {}", dt));
            }
            Duration::ZERO
        };

        let world = self.app.world_mut();
        world.resource_mut::<HumanControl>().push(input);
        world.resource_mut::<Time>().advance_by(delta);

        self.app.update();
        self.snapshot()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let world = self.app.world();
        let match_state = world.resource::<MatchState>();
        let roster = match_state.roster;

        FrameSnapshot {
            elapsed: world.resource::<Time>().elapsed_secs_f64(),
            challenger: roster.and_then(|roster| fighter_snapshot(world, roster.challenger)),
            defender: roster.and_then(|roster| fighter_snapshot(world, roster.defender)),
            match_state: MatchSnapshot {
                phase: match_state.phase,
                is_active: match_state.is_active(),
                winner: match_state.winner,
                combo_count: match_state.combo_count,
                countdown_remaining: match_state.countdown_remaining,
                round_number: match_state.round_number,
            },
            events: world.resource::<CombatLog>().entries.clone(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        self.app.world().resource::<CombatConfig>()
    }

    pub fn entity(&self, corner: Corner) -> Option<Entity> {
        self.app
            .world()
            .resource::<MatchState>()
            .roster
            .map(|roster| roster.entity(corner))
    }

    /// Teleport a fighter (clamped to the arena). Для сценариев и отладки.
    pub fn place_fighter(&mut self, corner: Corner, x: f32, z: f32) -> bool {
        let Some(entity) = self.entity(corner) else {
            crate::logger::log_warning(&format!(
                "⚠️ place_fighter({}) before start_match",
                corner.as_str()
            ));
            return false;
        };
        let arena = self.config().arena;
        let world = self.app.world_mut();
        let Some(mut transform) = world.get_mut::<Transform>(entity) else {
            return false;
        };
        transform.translation = arena.clamp(Vec3::new(x, arena.ground_y, z));
        true
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

fn fighter_snapshot(world: &World, entity: Entity) -> Option<FighterSnapshot> {
    let fighter = world.get::<Fighter>(entity)?;
    let transform = world.get::<Transform>(entity)?;
    let health = world.get::<Health>(entity)?;
    let state = world.get::<CombatantState>(entity)?;
    let attacker = world.get::<Attacker>(entity)?;
    let invincibility = world.get::<Invincibility>(entity)?;

    Some(FighterSnapshot {
        entity,
        corner: fighter.corner,
        controller: fighter.controller,
        position: transform.translation,
        facing: transform.rotation,
        animation: state.animation_state(),
        health: health.current,
        max_health: health.max,
        blocking: state.is_blocking(),
        attack_cooldown: attacker.cooldown_timer.max(0.0),
        invincibility: invincibility.remaining,
        stun: state.stun_remaining(),
        lock: state.lock_remaining(),
        knockback_active: state.knockback().is_some(),
    })
}
