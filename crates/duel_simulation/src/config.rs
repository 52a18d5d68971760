//! Balance constants и arena geometry.
//!
//! Все значения по умолчанию - из дизайн-документа боёвки.
//! Хост может переопределить любое поле при создании симуляции
//! (в коде или через RON).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки конфигурации (единственная fallible поверхность симуляции)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`{field}` must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be within [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("arena bounds are empty: x [{min_x}, {max_x}], z [{min_z}, {max_z}]")]
    EmptyArena {
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    },

    #[error("{corner} spawn point ({x}, {z}) lies outside the arena")]
    SpawnOutsideArena { corner: &'static str, x: f32, z: f32 },

    #[error("knockback combo threshold must be at least 1")]
    ZeroComboThreshold,

    #[error("failed to parse combat config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Rectangular movement bounds on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct ArenaBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Высота пола; Y всех бойцов прибит к ней
    pub ground_y: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min_x: -6.0,
            max_x: 6.0,
            min_z: -3.0,
            max_z: 3.0,
            ground_y: 0.0,
        }
    }
}

impl ArenaBounds {
    /// Clamp a world position into the arena and pin it to the ground.
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min_x, self.max_x),
            self.ground_y,
            position.z.clamp(self.min_z, self.max_z),
        )
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }
}

/// Параметры реактивного AI противника
///
/// Дистанции в метрах, вероятности - шанс за один тик.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct PolicyConfig {
    /// Дальше этой дистанции - сближаемся
    pub chase_distance: f32,
    /// Ближе этой дистанции - пробуем атаковать
    pub engage_range: f32,
    /// Ближе этой дистанции - можем начать блок
    pub block_range: f32,
    /// Cooldown противника ≤ этого значения - он скоро ударит
    pub threat_window: f32,
    /// Cooldown противника > этого значения - он открыт для наказания
    pub vulnerable_threshold: f32,
    pub start_block_chance: f32,
    pub stop_block_chance: f32,
    pub punish_chance: f32,
    pub attack_chance: f32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            chase_distance: 2.0,
            engage_range: 2.3,
            block_range: 2.5,
            threat_window: 0.3,
            vulnerable_threshold: 0.4,
            start_block_chance: 0.005,
            stop_block_chance: 0.01,
            punish_chance: 0.2,
            attack_chance: 0.03,
        }
    }
}

/// Combat tuning resource.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CombatConfig {
    pub max_health: f32,
    /// Human walk speed (m/s)
    pub movement_speed: f32,
    /// Policy walk speed (m/s)
    pub opponent_speed: f32,
    /// Facing slerp rate (1/s)
    pub turn_speed: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub block_damage_multiplier: f32,
    pub attack_animation_duration: f32,
    pub hit_check_delay: f32,
    pub attack_cooldown: f32,
    pub early_recovery_window: f32,
    pub invincibility_duration: f32,
    pub stun_duration: f32,
    pub impact_duration: f32,
    pub knockback_force: f32,
    pub knockback_duration: f32,
    pub knockback_combo_threshold: u32,
    pub combo_window: f32,
    pub whiff_penalty: f32,
    pub countdown_duration: f32,
    pub arena: ArenaBounds,
    /// Spawn (x, z) for the challenger corner
    pub challenger_spawn: [f32; 2],
    /// Spawn (x, z) for the defender corner
    pub defender_spawn: [f32; 2],
    pub policy: PolicyConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            movement_speed: 5.0,
            opponent_speed: 3.0,
            turn_speed: 10.0,
            attack_range: 2.0,
            attack_damage: 15.0,
            block_damage_multiplier: 0.5,
            attack_animation_duration: 0.8,
            hit_check_delay: 0.4,
            attack_cooldown: 0.8,
            early_recovery_window: 0.2,
            invincibility_duration: 0.3,
            stun_duration: 0.2,
            impact_duration: 0.5,
            knockback_force: 1.5,
            knockback_duration: 0.25,
            knockback_combo_threshold: 3,
            combo_window: 1.5,
            whiff_penalty: 0.3,
            countdown_duration: 3.0,
            arena: ArenaBounds::default(),
            challenger_spawn: [-3.0, 0.0],
            defender_spawn: [3.0, 0.0],
            policy: PolicyConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Parse a RON document; missing fields fall back to defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_health", self.max_health),
            ("movement_speed", self.movement_speed),
            ("turn_speed", self.turn_speed),
            ("attack_range", self.attack_range),
            ("attack_damage", self.attack_damage),
            ("attack_animation_duration", self.attack_animation_duration),
            ("hit_check_delay", self.hit_check_delay),
            ("attack_cooldown", self.attack_cooldown),
            ("invincibility_duration", self.invincibility_duration),
            ("impact_duration", self.impact_duration),
            ("knockback_duration", self.knockback_duration),
            ("combo_window", self.combo_window),
            ("countdown_duration", self.countdown_duration),
        ];
        for (field, value) in positive {
            // !(v > 0) ловит и NaN
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        // Эти могут быть нулём (AI-болванчик в тестах, без stun/knockback/penalty)
        let non_negative = [
            ("opponent_speed", self.opponent_speed),
            ("stun_duration", self.stun_duration),
            ("knockback_force", self.knockback_force),
            ("whiff_penalty", self.whiff_penalty),
            ("early_recovery_window", self.early_recovery_window),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let policy = &self.policy;
        let unit = [
            ("block_damage_multiplier", self.block_damage_multiplier),
            ("policy.start_block_chance", policy.start_block_chance),
            ("policy.stop_block_chance", policy.stop_block_chance),
            ("policy.punish_chance", policy.punish_chance),
            ("policy.attack_chance", policy.attack_chance),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }

        if self.knockback_combo_threshold == 0 {
            return Err(ConfigError::ZeroComboThreshold);
        }

        let arena = &self.arena;
        if !(arena.min_x < arena.max_x && arena.min_z < arena.max_z) {
            return Err(ConfigError::EmptyArena {
                min_x: arena.min_x,
                max_x: arena.max_x,
                min_z: arena.min_z,
                max_z: arena.max_z,
            });
        }

        for (corner, [x, z]) in [
            ("challenger", self.challenger_spawn),
            ("defender", self.defender_spawn),
        ] {
            if !arena.contains(x, z) {
                return Err(ConfigError::SpawnOutsideArena { corner, x, z });
            }
        }

        Ok(())
    }

    pub fn challenger_spawn_position(&self) -> Vec3 {
        let [x, z] = self.challenger_spawn;
        Vec3::new(x, self.arena.ground_y, z)
    }

    pub fn defender_spawn_position(&self) -> Vec3 {
        let [x, z] = self.defender_spawn;
        Vec3::new(x, self.arena.ground_y, z)
    }

    /// Damage a hit deals after block mitigation.
    pub fn damage_for(&self, blocked: bool) -> f32 {
        if blocked {
            self.attack_damage * self.block_damage_multiplier
        } else {
            self.attack_damage
        }
    }
}
