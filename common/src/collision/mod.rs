pub mod bullets;
pub mod combatants;
pub mod helpers;

pub use bullets::{segment_hits_combatant, segment_hits_wall};
pub use combatants::{resolve_combatant_walls, unstuck_from_walls};
pub use helpers::{circle_overlaps_circle, circle_overlaps_wall, wall_penetration};
