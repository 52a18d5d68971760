//! Player control marker component
//!
//! Отмечает бойца, которым управляет человек через input (в отличие от AI).

use bevy::prelude::Component;

/// Marker component для human-controlled бойца
///
/// - AI systems используют `Without<Player>` filter
/// - Input systems используют `With<Player>` filter
///
/// В дуэли ровно один боец несёт этот маркер.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
