//! Per-frame combat log: события тика в виде, удобном для UI хоста.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{AttackOutcome, AttackResolved, AttackStarted, FighterDied};
use crate::components::{Corner, Fighter};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CombatLogEntry {
    AttackStarted {
        attacker: Corner,
    },
    AttackResolved {
        attacker: Corner,
        outcome: AttackOutcome,
    },
    KnockedOut {
        loser: Corner,
        winner: Corner,
    },
}

/// Entries raised during the last tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct CombatLog {
    pub entries: Vec<CombatLogEntry>,
}

/// System: начало тика - чистим лог прошлого кадра
pub fn clear_combat_log(mut log: ResMut<CombatLog>) {
    log.entries.clear();
}

/// System: события тика → CombatLog + строки в logger
pub fn record_combat_log(
    mut started_events: EventReader<AttackStarted>,
    mut resolved_events: EventReader<AttackResolved>,
    mut died_events: EventReader<FighterDied>,
    fighters: Query<&Fighter>,
    mut log: ResMut<CombatLog>,
) {
    let corner_of = |entity: Entity| fighters.get(entity).ok().map(|fighter| fighter.corner);

    for event in started_events.read() {
        let Some(attacker) = corner_of(event.attacker) else {
            continue;
        };
        crate::logger::log(&format!("⚔️ {} swings", attacker.as_str()));
        log.entries.push(CombatLogEntry::AttackStarted { attacker });
    }

    for event in resolved_events.read() {
        let Some(attacker) = corner_of(event.attacker) else {
            continue;
        };
        match event.outcome {
            AttackOutcome::Hit { damage, knockback } => crate::logger::log(&format!(
                "💥 {} hits for {:.1}{}",
                attacker.as_str(),
                damage,
                if knockback { " (knockback)" } else { "" }
            )),
            AttackOutcome::Blocked { damage } => crate::logger::log(&format!(
                "🛡️ {} hit BLOCKED ({:.1} chip damage)",
                attacker.as_str(),
                damage
            )),
            AttackOutcome::Whiff { penalty } => crate::logger::log(&format!(
                "💨 {} whiffs (+{:.2}s cooldown)",
                attacker.as_str(),
                penalty
            )),
            AttackOutcome::Deflected => crate::logger::log(&format!(
                "{} attack hit i-frames",
                attacker.as_str()
            )),
        }
        log.entries.push(CombatLogEntry::AttackResolved {
            attacker,
            outcome: event.outcome,
        });
    }

    for event in died_events.read() {
        let (Some(loser), Some(winner)) = (corner_of(event.entity), corner_of(event.killer)) else {
            continue;
        };
        crate::logger::log_info(&format!(
            "🏆 K.O.! {} defeats {}",
            winner.as_str(),
            loser.as_str()
        ));
        log.entries.push(CombatLogEntry::KnockedOut { loser, winner });
    }
}
