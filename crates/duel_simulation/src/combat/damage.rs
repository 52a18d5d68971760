//! Damage application.
//!
//! I-frames → combo bookkeeping → health → i-frames grant → reaction/KO.

use crate::combat::FighterMut;
use crate::components::CombatantState;
use crate::config::CombatConfig;
use crate::match_state::MatchState;

/// Что произошло с целью
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageReport {
    /// Target had i-frames (or was already dead); nothing changed
    Ignored,
    /// Target survived; now in Impact
    Wounded { remaining: f32 },
    /// Target hit zero health; match ended
    KnockedOut,
}

/// Apply `amount` to the target.
///
/// On a KO the target freezes in `Dead` and the match ends with the
/// other corner as winner. The caller upgrades the Impact reaction with
/// stun/knockback afterwards.
pub fn apply_damage(
    target: &mut FighterMut,
    amount: f32,
    match_state: &mut MatchState,
    config: &CombatConfig,
    now: f64,
) -> DamageReport {
    if target.invincibility.is_active() || !target.is_alive() || !match_state.is_active() {
        return DamageReport::Ignored;
    }

    match_state.register_hit(now, config.combo_window);

    let died = target.health.take_damage(amount);
    target.invincibility.grant(config.invincibility_duration);

    if died {
        *target.state = CombatantState::Dead;
        match_state.finish(target.corner.opponent());
        DamageReport::KnockedOut
    } else {
        *target.state = CombatantState::reeling(config.impact_duration, 0.0, None);
        DamageReport::Wounded {
            remaining: target.health.current,
        }
    }
}
