//! Mutable view over one fighter's combat components.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;

use crate::combat::Attacker;
use crate::components::{CombatantState, Corner, Fighter, Health, Invincibility};

/// Все боевые компоненты бойца одним query
#[derive(QueryData)]
#[query_data(mutable)]
pub struct FighterQuery {
    pub entity: Entity,
    pub fighter: &'static Fighter,
    pub transform: &'static mut Transform,
    pub health: &'static mut Health,
    pub invincibility: &'static mut Invincibility,
    pub attacker: &'static mut Attacker,
    pub state: &'static mut CombatantState,
}

/// Plain borrows of a fighter's combat components.
///
/// Resolution logic works on this view so it can run on query items
/// and on stack values in tests alike.
pub struct FighterMut<'a> {
    pub entity: Entity,
    pub corner: Corner,
    pub transform: &'a mut Transform,
    pub health: &'a mut Health,
    pub invincibility: &'a mut Invincibility,
    pub attacker: &'a mut Attacker,
    pub state: &'a mut CombatantState,
}

impl FighterQueryItem<'_> {
    pub fn as_fighter_mut(&mut self) -> FighterMut<'_> {
        FighterMut {
            entity: self.entity,
            corner: self.fighter.corner,
            transform: &mut self.transform,
            health: &mut self.health,
            invincibility: &mut self.invincibility,
            attacker: &mut self.attacker,
            state: &mut self.state,
        }
    }
}

impl FighterMut<'_> {
    pub fn is_alive(&self) -> bool {
        self.health.is_alive() && !self.state.is_dead()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }
}
