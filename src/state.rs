/// Box visual state, mutated in place every frame
#[derive(Clone, Debug, PartialEq)]
pub struct BoxState {
    /// Edge length along local X
    pub width: f64,
    /// Edge length along local Y
    pub height: f64,
    /// Edge length along local Z
    pub depth: f64,
    /// Uniform multiplier applied to all dimensions
    pub scale: f64,
    /// Translation of the box origin
    pub center_position: [f64; 3],
    /// Orientation in degrees: pitch, yaw, roll
    pub rotation_euler: [f64; 3],
    /// Pointer position sampled on the previous drag frame
    pub previous_mouse_position: [f64; 2],
}

impl BoxState {
    /// State with the given dimensions, at the origin and unrotated
    pub fn with_dimensions(width: f64, height: f64, depth: f64, scale: f64) -> Self {
        BoxState {
            width,
            height,
            depth,
            scale,
            center_position: [0.0; 3],
            rotation_euler: [0.0; 3],
            previous_mouse_position: [0.0; 2],
        }
    }

    /// Edge lengths after applying `scale`
    pub fn scaled_size(&self) -> [f64; 3] {
        [
            self.width * self.scale,
            self.height * self.scale,
            self.depth * self.scale,
        ]
    }
}

impl Default for BoxState {
    fn default() -> Self {
        BoxState::with_dimensions(2.0, 1.0, 2.0, 1.0)
    }
}

/// Tuning constants that stay fixed for the session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Distance from the eye to the projection plane
    pub focal_length: f64,
    /// Translation speed in units per second
    pub move_speed: f64,
    /// Degrees of rotation per unit of pointer movement
    pub mouse_sensitivity: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            focal_length: 10.0,
            move_speed: 2.0,
            mouse_sensitivity: 0.2,
        }
    }
}
