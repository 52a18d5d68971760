//! Combatant action state.
//!
//! Одно активное действие на бойца, выраженное tagged union'ом:
//! нельзя одновременно атаковать и лететь от knockback'а.
//! Ортогональные таймеры (attack cooldown, i-frames) живут отдельно
//! в `Attacker` и `Invincibility`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Knockback slide in progress.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Knockback {
    /// Unit vector on the ground plane, away from the attacker
    pub direction: Vec3,
    /// 0.0..1.0
    pub progress: f32,
}

impl Knockback {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction,
            progress: 0.0,
        }
    }
}

/// What the fighter is doing right now.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum CombatantState {
    #[default]
    Idle,
    Walking,
    Blocking,
    /// Swing animation; no voluntary action until the lock runs out
    Attacking { lock_remaining: f32 },
    /// Hit reaction (impact lock, hitstun, optional knockback slide)
    Reeling {
        lock_remaining: f32,
        stun_remaining: f32,
        knockback: Option<Knockback>,
    },
    /// Terminal until the match is reset
    Dead,
}

/// Animation clip the presentation layer should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum AnimationState {
    Idle,
    Walk,
    Attack,
    Impact,
    Stun,
    Block,
    Die,
}

impl CombatantState {
    pub fn attacking(lock: f32) -> Self {
        Self::Attacking {
            lock_remaining: lock,
        }
    }

    pub fn reeling(lock: f32, stun: f32, knockback: Option<Knockback>) -> Self {
        Self::Reeling {
            lock_remaining: lock,
            stun_remaining: stun,
            knockback,
        }
    }

    pub fn animation_state(&self) -> AnimationState {
        match self {
            Self::Idle => AnimationState::Idle,
            Self::Walking => AnimationState::Walk,
            Self::Blocking => AnimationState::Block,
            Self::Attacking { .. } => AnimationState::Attack,
            Self::Reeling { lock_remaining, .. } if *lock_remaining > 0.0 => AnimationState::Impact,
            Self::Reeling { .. } => AnimationState::Stun,
            Self::Dead => AnimationState::Die,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocking)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Attack swing или hit reaction - новые действия запрещены
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Attacking { .. } | Self::Reeling { .. })
    }

    pub fn lock_remaining(&self) -> f32 {
        match self {
            Self::Attacking { lock_remaining } | Self::Reeling { lock_remaining, .. } => {
                *lock_remaining
            }
            _ => 0.0,
        }
    }

    pub fn stun_remaining(&self) -> f32 {
        match self {
            Self::Reeling { stun_remaining, .. } => *stun_remaining,
            _ => 0.0,
        }
    }

    pub fn knockback(&self) -> Option<&Knockback> {
        match self {
            Self::Reeling { knockback, .. } => knockback.as_ref(),
            _ => None,
        }
    }

    /// Advance lock/stun/knockback timers by `delta`.
    ///
    /// Returns the knockback displacement for this step (ZERO when not sliding).
    /// Falls back to `Idle` once every lock has run out; `Dead` never changes.
    pub fn advance(&mut self, delta: f32, knockback_duration: f32, knockback_force: f32) -> Vec3 {
        match self {
            Self::Attacking { lock_remaining } => {
                *lock_remaining -= delta;
                if *lock_remaining <= 0.0 {
                    *self = Self::Idle;
                }
                Vec3::ZERO
            }
            Self::Reeling {
                lock_remaining,
                stun_remaining,
                knockback,
            } => {
                *lock_remaining = (*lock_remaining - delta).max(0.0);
                *stun_remaining = (*stun_remaining - delta).max(0.0);

                let mut displacement = Vec3::ZERO;
                if let Some(slide) = knockback.as_mut() {
                    let from = slide.progress;
                    let to = (from + delta / knockback_duration).min(1.0);
                    displacement =
                        slide.direction * knockback_force * (ease_out_cubic(to) - ease_out_cubic(from));

                    if to >= 1.0 {
                        *knockback = None;
                    } else {
                        slide.progress = to;
                    }
                }

                if *lock_remaining <= 0.0 && *stun_remaining <= 0.0 && knockback.is_none() {
                    *self = Self::Idle;
                }
                displacement
            }
            Self::Idle | Self::Walking | Self::Blocking | Self::Dead => Vec3::ZERO,
        }
    }
}

/// Cubic ease-out: быстрый старт, мягкая остановка
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
