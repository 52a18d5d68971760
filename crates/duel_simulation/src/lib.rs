//! Duel Simulation Core
//!
//! Host-agnostic боевое ядро 1v1 файтинга на Bevy ECS (headless).
//! Хост (renderer/UI) вызывает `DuelSimulation::advance_tick` раз в кадр
//! и читает `FrameSnapshot`; ничего из рендера сюда не попадает.
//!
//! Порядок внутри тика задаётся `DuelSet` (см. `SimulationPlugin`).

use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod input;
pub mod logger;
pub mod match_state;
pub mod movement;
pub mod simulation;

// Re-export базовых типов для удобства
pub use ai::{decide_policy_action, AIPlugin, PolicyAction, PolicyContext};
pub use combat::{
    AttackOutcome, AttackResolved, AttackStarted, Attacker, CombatLog, CombatLogEntry,
    CombatPlugin, CombatSchedule, FighterDied,
};
pub use components::*;
pub use config::{ArenaBounds, CombatConfig, ConfigError, PolicyConfig};
pub use input::{HumanControl, HumanInput, HumanInputPlugin};
pub use match_state::{MatchPhase, MatchPlugin, MatchState, Roster};
pub use simulation::{DuelSimulation, FighterSnapshot, FrameSnapshot, MatchSnapshot};

/// Фазы одного тика, строго последовательно
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuelSet {
    /// Сброс per-frame буферов
    Prepare,
    HumanIntent,
    PolicyIntent,
    /// Always-on разворот к противнику
    Facing,
    /// Cooldown/i-frames/lock/stun/knockback decay
    Timers,
    /// Pending атаки, чей hit check наступил
    Resolution,
    ComboWindow,
    Countdown,
    /// События тика → CombatLog
    Record,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Весь тик - одна критическая секция: single-threaded executor,
/// никаких параллельных мутаций combat state.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.edit_schedule(Update, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });

        app.configure_sets(
            Update,
            (
                DuelSet::Prepare,
                DuelSet::HumanIntent,
                DuelSet::PolicyIntent,
                DuelSet::Facing,
                DuelSet::Timers,
                DuelSet::Resolution,
                DuelSet::ComboWindow,
                DuelSet::Countdown,
                DuelSet::Record,
            )
                .chain(),
        );

        app.add_systems(Update, movement::face_opponents.in_set(DuelSet::Facing))
            .add_plugins((HumanInputPlugin, AIPlugin, CombatPlugin, MatchPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигает только хост (`Time::advance_by`), реальные часы не участвуют.
pub fn create_headless_app(config: CombatConfig, seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.insert_resource(Time::<()>::default())
        .insert_resource(config)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
