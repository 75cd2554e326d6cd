/// Box corner with its transformed and projected positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position after rotation and translation
    pub world_position: [f64; 3],
    /// Position after the perspective divide, z is always 0
    pub projected_position: [f64; 3],
}
