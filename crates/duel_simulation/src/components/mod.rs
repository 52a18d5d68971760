//! ECS Components для бойцов
//!
//! Организация по доменам:
//! - actor: кто это (Fighter, Corner, Controller) и здоровье (Health, Invincibility)
//! - state: текущее действие бойца (CombatantState tagged union, Knockback)
//! - player: маркер human-controlled бойца (Player)

pub mod actor;
pub mod player;
pub mod state;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
pub use state::*;
