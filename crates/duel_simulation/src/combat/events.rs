//! Combat events (для UI, звуков, combat log)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Событие: боец начал замах (hit check будет через hit_check_delay)
#[derive(Event, Debug, Clone)]
pub struct AttackStarted {
    pub attacker: Entity,
}

/// Чем закончилась атака на момент hit check'а
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Clean hit; `knockback` - сработал ли combo knockback
    Hit { damage: f32, knockback: bool },
    /// Hit into a held block (reduced damage, no stun/knockback)
    Blocked { damage: f32 },
    /// Out of range; attacker's cooldown grew by `penalty`
    Whiff { penalty: f32 },
    /// Target had i-frames; nothing happened
    Deflected,
}

/// Событие: pending атака разрешилась
#[derive(Event, Debug, Clone)]
pub struct AttackResolved {
    pub attacker: Entity,
    pub target: Entity,
    pub outcome: AttackOutcome,
}

/// Событие: боец умер (health == 0), матч закончен
#[derive(Event, Debug, Clone)]
pub struct FighterDied {
    pub entity: Entity,
    pub killer: Entity,
}
