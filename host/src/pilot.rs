use bevy_math::Vec2;

use common::sim::Intent;

// ============================================================================
// Demo Pilot
// ============================================================================

// Stand-in for the platform input layer (keyboard/touch/pointer handlers are
// outside this repository). Wanders the arena in a slow loop, aiming ahead,
// so a headless match actually plays out.
#[derive(Debug, Default)]
pub struct DemoPilot {
    elapsed: f32,
}

impl DemoPilot {
    pub fn intent(&mut self, dt: f32) -> Intent {
        self.elapsed += dt;
        let heading = self.elapsed * 0.35;
        Intent {
            movement: Vec2::from_angle(heading),
            aim: Vec2::from_angle(heading) * 0.97, // above the auto-fire threshold
            sprint: (self.elapsed % 8.0) < 0.3,
            fire: false,
        }
    }
}
