//! Timed effects queue.
//!
//! Единый упорядоченный список отложенных эффектов, ключ - абсолютное
//! время симуляции. Обрабатывается один раз за тик.

use bevy::prelude::*;

/// Допуск для f32→f64 накопления времени (0.1 × 4 ≠ 0.4 в float)
pub const SCHEDULE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimedEffect {
    /// Mid-swing hit check for a pending attack
    ResolveAttack { attacker: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEffect {
    /// Seconds of simulation time
    pub due_at: f64,
    pub effect: TimedEffect,
}

/// Ordered by `due_at`; ties keep insertion order.
#[derive(Resource, Debug, Default)]
pub struct CombatSchedule {
    effects: Vec<ScheduledEffect>,
}

impl CombatSchedule {
    pub fn schedule(&mut self, due_at: f64, effect: TimedEffect) {
        // Не больше одной pending атаки на бойца
        let TimedEffect::ResolveAttack { attacker } = effect;
        self.cancel_attack(attacker);

        let index = self.effects.partition_point(|scheduled| scheduled.due_at <= due_at);
        self.effects.insert(index, ScheduledEffect { due_at, effect });
    }

    /// Remove and return every effect due at `now`, in due order.
    pub fn pop_due(&mut self, now: f64) -> Vec<ScheduledEffect> {
        let split = self
            .effects
            .partition_point(|scheduled| scheduled.due_at <= now + SCHEDULE_EPSILON);
        self.effects.drain(..split).collect()
    }

    pub fn cancel_attack(&mut self, attacker: Entity) {
        self.effects.retain(|scheduled| {
            scheduled.effect != TimedEffect::ResolveAttack { attacker }
        });
    }

    /// Due time of the attacker's pending attack, if any.
    pub fn pending_attack(&self, attacker: Entity) -> Option<f64> {
        self.effects
            .iter()
            .find(|scheduled| scheduled.effect == TimedEffect::ResolveAttack { attacker })
            .map(|scheduled| scheduled.due_at)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
