//! Базовые компоненты бойца: Fighter, Health, Invincibility

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::Attacker;
use crate::components::CombatantState;

/// Угол ринга. Фиксирован на всю дуэль, по нему определяется победитель.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Corner {
    Challenger,
    Defender,
}

impl Corner {
    pub fn opponent(self) -> Self {
        match self {
            Corner::Challenger => Corner::Defender,
            Corner::Defender => Corner::Challenger,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::Challenger => "challenger",
            Corner::Defender => "defender",
        }
    }
}

/// Кто принимает решения за бойца
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum Controller {
    Human,
    Policy,
}

/// Боец дуэли
///
/// Автоматически добавляет Health, Invincibility, Attacker, CombatantState,
/// Transform через Required Components.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Health, Invincibility, Attacker, CombatantState, Transform)]
pub struct Fighter {
    pub corner: Corner,
    pub controller: Controller,
}

/// Здоровье бойца
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Вычитает урон с полом в 0. Возвращает true если боец умер этим ударом.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        was_alive && !self.is_alive()
    }
}

/// I-frames: пока remaining > 0, входящий урон игнорируется целиком
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Invincibility {
    pub remaining: f32,
}

impl Invincibility {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn grant(&mut self, duration: f32) {
        self.remaining = duration;
    }

    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }
}
