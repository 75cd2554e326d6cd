use crossterm::style::Color;

/// Planar movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit contribution of this direction in the local X/Y plane
    pub fn axis(self) -> [f64; 2] {
        match self {
            Direction::Up => [0.0, 1.0],
            Direction::Down => [0.0, -1.0],
            Direction::Left => [-1.0, 0.0],
            Direction::Right => [1.0, 0.0],
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Pointer and keyboard state, polled once per frame
pub trait Input {
    /// Current pointer position, y pointing up
    fn mouse_position(&self) -> [f64; 2];
    /// Primary button went down during this frame
    fn mouse_button_down(&self) -> bool;
    /// Primary button is held
    fn mouse_button(&self) -> bool;
    /// Movement key is held
    fn key(&self, direction: Direction) -> bool;
}

/// Current text of the dimension fields; `None` means the field is not bound
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextFields<'a> {
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub depth: Option<&'a str>,
    pub scale: Option<&'a str>,
}

/// Shading resource lines are drawn with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub glyph: char,
    pub color: Color,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            glyph: '#',
            color: Color::White,
        }
    }
}

/// Immediate-mode line drawing API
pub trait LineRenderer {
    /// Binds the material for the following primitives
    fn set_pass(&mut self, material: &Material);
    /// Saves the current transform
    fn push_matrix(&mut self);
    /// Restores the last saved transform
    fn pop_matrix(&mut self);
    /// Starts emitting line primitives, two vertices per segment
    fn begin_lines(&mut self);
    fn vertex(&mut self, x: f64, y: f64, z: f64);
    /// Finishes the current primitive batch
    fn end(&mut self);
}
