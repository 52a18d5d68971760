//! AI decision-making module
//!
//! Реактивная policy для бойца без `Player` маркера.

use bevy::prelude::*;

use crate::DuelSet;

pub mod policy;

// Re-export основных типов
pub use policy::{decide_policy_action, PolicyAction, PolicyContext};

/// AI Plugin
///
/// resolve_policy_intent идёт сразу после human input
/// (каждая сторона меняет только своего бойца).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            policy::resolve_policy_intent.in_set(DuelSet::PolicyIntent),
        );
    }
}
