//! Two-slot point lighting state read by the lit shaders every frame.

use cgmath::{Vector3, Zero};

/// Which of the two light slots to address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightSlot {
    Primary,
    Secondary,
}

impl LightSlot {
    pub fn index(self) -> usize {
        match self {
            LightSlot::Primary => 0,
            LightSlot::Secondary => 1,
        }
    }
}

/// A point light. A radius of zero means it contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub radius: f32,
    pub colour: Vector3<f32>,
}

impl Light {
    pub fn new(position: Vector3<f32>, radius: f32, colour: Vector3<f32>) -> Self {
        Self {
            position,
            radius,
            colour,
        }
    }

    /// A light parked out of view with no effect
    pub fn off() -> Self {
        Self {
            position: Vector3::new(0.0, 1000.0, 0.0),
            radius: 0.0,
            colour: Vector3::zero(),
        }
    }

    pub fn is_off(&self) -> bool {
        self.radius == 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightingState {
    lights: [Light; 2],
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            lights: [Light::off(), Light::off()],
        }
    }
}

impl LightingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `slot` unconditionally
    pub fn set_light(
        &mut self,
        slot: LightSlot,
        position: Vector3<f32>,
        radius: f32,
        colour: Vector3<f32>,
    ) {
        self.lights[slot.index()] = Light::new(position, radius, colour);
    }

    pub fn disable(&mut self, slot: LightSlot) {
        self.lights[slot.index()] = Light::off();
    }

    pub fn light(&self, slot: LightSlot) -> &Light {
        &self.lights[slot.index()]
    }

    pub fn lights(&self) -> &[Light; 2] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_disable_slots_independently() {
        let mut lighting = LightingState::new();
        assert!(lighting.lights().iter().all(Light::is_off));

        lighting.set_light(
            LightSlot::Primary,
            Vector3::new(5.0, 10.0, 10.0),
            1000.0,
            Vector3::new(1.0, 1.0, 1.0),
        );
        lighting.set_light(
            LightSlot::Secondary,
            Vector3::new(-2.0, 0.0, 10.0),
            50.0,
            Vector3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(lighting.light(LightSlot::Secondary).radius, 50.0);

        lighting.disable(LightSlot::Secondary);
        assert!(lighting.light(LightSlot::Secondary).is_off());
        assert_eq!(lighting.light(LightSlot::Primary).radius, 1000.0);
        assert_eq!(lighting.lights()[0].position, Vector3::new(5.0, 10.0, 10.0));
    }
}
