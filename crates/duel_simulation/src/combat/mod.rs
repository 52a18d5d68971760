//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Attacker cooldown, i-frames, hit reactions
//! - Combat rules: range check, block mitigation, whiff penalty, combo knockback
//! - Events: AttackStarted, AttackResolved, FighterDied
//!
//! Хост (renderer/UI) только читает результат через snapshot.

use bevy::prelude::*;

use crate::DuelSet;

pub mod attacker;
pub mod damage;
pub mod events;
pub mod fighter;
pub mod log;
pub mod resolution;
pub mod schedule;
pub mod timers;


// Re-export основных типов
pub use attacker::{tick_attack_cooldowns, Attacker};
pub use damage::{apply_damage, DamageReport};
pub use events::{AttackOutcome, AttackResolved, AttackStarted, FighterDied};
pub use fighter::{FighterMut, FighterQuery, FighterQueryItem};
pub use log::{CombatLog, CombatLogEntry};
pub use resolution::{initiate_attack, resolve_attack, Resolution};
pub use schedule::{CombatSchedule, ScheduledEffect, TimedEffect};
pub use timers::tick_combatant_timers;

/// Combat Plugin
///
/// Порядок выполнения (внутри тика, см. `DuelSet`):
/// 1. clear_combat_log - лог прошлого кадра больше не нужен
/// 2. tick_attack_cooldowns → tick_combatant_timers - timer decay
/// 3. process_scheduled_effects - pending атаки, чей hit check наступил
/// 4. record_combat_log - события тика в CombatLog
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackStarted>()
            .add_event::<AttackResolved>()
            .add_event::<FighterDied>();

        app.init_resource::<CombatSchedule>()
            .init_resource::<CombatLog>();

        app.add_systems(
            Update,
            (
                log::clear_combat_log.in_set(DuelSet::Prepare),
                (tick_attack_cooldowns, tick_combatant_timers)
                    .chain()
                    .in_set(DuelSet::Timers),
                resolution::process_scheduled_effects.in_set(DuelSet::Resolution),
                log::record_combat_log.in_set(DuelSet::Record),
            ),
        );
    }
}
