use bevy_math::Vec2;

use common::sim::Intent;

// ============================================================================
// Demo Pilot
// ============================================================================

// Stand-in for the platform input layer, mirroring the host binary's demo
// driver but wandering in the opposite rotational direction so the two
// combatants actually cross paths.
#[derive(Debug, Default)]
pub struct DemoPilot {
    elapsed: f32,
}

impl DemoPilot {
    pub fn intent(&mut self, dt: f32) -> Intent {
        self.elapsed += dt;
        let heading = -self.elapsed * 0.3;
        Intent {
            movement: Vec2::from_angle(heading),
            aim: Vec2::from_angle(heading) * 0.97,
            sprint: (self.elapsed % 7.0) < 0.3,
            fire: false,
        }
    }
}
