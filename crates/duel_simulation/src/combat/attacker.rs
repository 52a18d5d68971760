//! Attacker component - attack cooldown бойца
//!
//! Cooldown ставится в момент начала атаки, а промах (whiff) добавляет
//! штраф поверх того, что осталось.

use bevy::prelude::*;

/// Attacker - компонент для бойцов которые могут атаковать
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,
}

impl Attacker {
    /// Может ли атаковать (cooldown == 0)
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Начать атаку (сбросить cooldown)
    pub fn start_attack(&mut self, cooldown: f32) {
        self.cooldown_timer = cooldown;
    }

    /// Штраф за промах: аддитивно к оставшемуся cooldown
    pub fn apply_whiff_penalty(&mut self, penalty: f32) {
        self.cooldown_timer += penalty;
    }

    /// Первые `window` секунд после начала атаки (нельзя ходить и блокировать)
    pub fn in_early_recovery(&self, cooldown: f32, window: f32) -> bool {
        self.cooldown_timer > cooldown - window
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// System: обновление attack cooldown таймеров
pub fn tick_attack_cooldowns(mut query: Query<&mut Attacker>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut attacker in query.iter_mut() {
        attacker.tick(delta);
    }
}
