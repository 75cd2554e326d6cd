use crate::host::{Direction, Input, LineRenderer, Material, TextFields};
use crate::math::{add, apply_perspective, euler_rotation, multiply_matrix_vector, scale};
use crate::state::{BoxState, Settings};
use crate::vertex::Vertex;

/// Interactive wireframe box
pub struct BoxWidget {
    pub state: BoxState,
    pub settings: Settings,
    /// Nothing is drawn while this is unset
    pub material: Option<Material>,
}

impl BoxWidget {
    pub fn new(state: BoxState, settings: Settings, material: Option<Material>) -> Self {
        BoxWidget {
            state,
            settings,
            material,
        }
    }

    /// Per-frame update: fields first, then rotation, then movement
    pub fn update(&mut self, fields: &TextFields<'_>, input: &dyn Input, delta_time: f64) {
        self.update_from_fields(fields);
        self.handle_mouse_rotation(input);
        self.handle_movement(input, delta_time);
    }

    /// Overwrites each bound dimension whose text parses as a number
    pub fn update_from_fields(&mut self, fields: &TextFields<'_>) {
        let state = &mut self.state;
        for (source, target) in [
            (fields.width, &mut state.width),
            (fields.height, &mut state.height),
            (fields.depth, &mut state.depth),
            (fields.scale, &mut state.scale),
        ] {
            if let Some(Ok(value)) = source.map(|text| text.trim().parse::<f64>()) {
                *target = value;
            }
        }
    }

    /// Accumulates yaw and pitch from the frame-to-frame drag delta
    pub fn handle_mouse_rotation(&mut self, input: &dyn Input) {
        let pointer = input.mouse_position();
        if input.mouse_button_down() {
            self.state.previous_mouse_position = pointer;
        }

        if input.mouse_button() {
            let previous = self.state.previous_mouse_position;
            let delta = [pointer[0] - previous[0], pointer[1] - previous[1]];
            let sensitivity = self.settings.mouse_sensitivity;
            self.state.rotation_euler[1] += delta[0] * sensitivity;
            self.state.rotation_euler[0] -= delta[1] * sensitivity;
            self.state.previous_mouse_position = pointer;
        }
    }

    /// Moves the box along its X/Y plane while direction keys are held
    pub fn handle_movement(&mut self, input: &dyn Input, delta_time: f64) {
        let mut direction = [0.0; 3];
        for key in Direction::ALL {
            if input.key(key) {
                let [x, y] = key.axis();
                direction[0] += x;
                direction[1] += y;
            }
        }

        let step = scale(&direction, self.settings.move_speed * delta_time);
        self.state.center_position = add(&self.state.center_position, &step);
    }

    /// Corners of the face at local depth `z_offset`, transformed and projected
    pub fn face(&self, z_offset: f64) -> [Vertex; 4] {
        let rotation = euler_rotation(&self.state.rotation_euler);
        let [size_x, size_y, _] = self.state.scaled_size();
        let local = [
            [0.0, 0.0, z_offset],
            [size_x, 0.0, z_offset],
            [size_x, size_y, z_offset],
            [0.0, size_y, z_offset],
        ];

        local.map(|corner| {
            let rotated = multiply_matrix_vector(&rotation, &corner);
            let world_position = add(&rotated, &self.state.center_position);
            Vertex {
                world_position,
                projected_position: apply_perspective(
                    &world_position,
                    self.settings.focal_length,
                ),
            }
        })
    }

    /// The 12 projected edges: front loop, back loop, then connecting edges
    pub fn segments(&self) -> Vec<([f64; 3], [f64; 3])> {
        let front = self.face(0.0);
        let back = self.face(self.state.scaled_size()[2]);

        let mut segments = Vec::with_capacity(12);
        for face in [&front, &back] {
            for i in 0..4 {
                segments.push((
                    face[i].projected_position,
                    face[(i + 1) % 4].projected_position,
                ));
            }
        }
        for i in 0..4 {
            segments.push((front[i].projected_position, back[i].projected_position));
        }
        segments
    }

    /// Post-render callback: emits the wireframe as line primitives
    pub fn post_render(&self, renderer: &mut dyn LineRenderer) {
        let Some(material) = &self.material else {
            return;
        };

        renderer.set_pass(material);
        renderer.push_matrix();
        renderer.begin_lines();

        for (a, b) in self.segments() {
            renderer.vertex(a[0], a[1], a[2]);
            renderer.vertex(b[0], b[1], b[2]);
        }

        renderer.end();
        renderer.pop_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedInput {
        pointer: [f64; 2],
        pressed: bool,
        held: bool,
        keys: [bool; 4],
    }

    impl Input for ScriptedInput {
        fn mouse_position(&self) -> [f64; 2] {
            self.pointer
        }
        fn mouse_button_down(&self) -> bool {
            self.pressed
        }
        fn mouse_button(&self) -> bool {
            self.held
        }
        fn key(&self, direction: Direction) -> bool {
            self.keys[direction.index()]
        }
    }

    #[derive(Debug, PartialEq)]
    enum Call {
        SetPass(char),
        Push,
        Pop,
        Begin,
        Vertex([f64; 3]),
        End,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn vertices(&self) -> Vec<[f64; 3]> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Vertex(v) => Some(*v),
                    _ => None,
                })
                .collect()
        }
    }

    impl LineRenderer for Recorder {
        fn set_pass(&mut self, material: &Material) {
            self.calls.push(Call::SetPass(material.glyph));
        }
        fn push_matrix(&mut self) {
            self.calls.push(Call::Push);
        }
        fn pop_matrix(&mut self) {
            self.calls.push(Call::Pop);
        }
        fn begin_lines(&mut self) {
            self.calls.push(Call::Begin);
        }
        fn vertex(&mut self, x: f64, y: f64, z: f64) {
            self.calls.push(Call::Vertex([x, y, z]));
        }
        fn end(&mut self) {
            self.calls.push(Call::End);
        }
    }

    fn widget() -> BoxWidget {
        BoxWidget::new(
            BoxState::default(),
            Settings::default(),
            Some(Material::default()),
        )
    }

    fn fields_with_width(text: &str) -> TextFields<'_> {
        TextFields {
            width: Some(text),
            ..TextFields::default()
        }
    }

    #[test]
    fn numeric_field_text_overwrites_dimension() {
        let mut widget = widget();
        widget.update(&fields_with_width("3.5"), &ScriptedInput::default(), 0.0);
        assert_eq!(widget.state.width, 3.5);
    }

    #[test]
    fn malformed_field_text_keeps_previous_value() {
        let mut widget = widget();
        widget.update(&fields_with_width("3.5"), &ScriptedInput::default(), 0.0);
        widget.update(&fields_with_width("abc"), &ScriptedInput::default(), 0.0);
        assert_eq!(widget.state.width, 3.5);

        widget.update(&fields_with_width(""), &ScriptedInput::default(), 0.0);
        assert_eq!(widget.state.width, 3.5);
    }

    #[test]
    fn unbound_fields_are_left_alone() {
        let mut widget = widget();
        widget.state.height = 7.0;
        let fields = TextFields {
            depth: Some(" -4 "),
            scale: Some("0"),
            ..TextFields::default()
        };
        widget.update(&fields, &ScriptedInput::default(), 0.0);

        assert_eq!(widget.state.width, 2.0);
        assert_eq!(widget.state.height, 7.0);
        assert_eq!(widget.state.depth, -4.0);
        assert_eq!(widget.state.scale, 0.0);
    }

    #[test]
    fn drag_accumulates_frame_to_frame_deltas() {
        let mut widget = widget();
        widget.settings.mouse_sensitivity = 0.2;
        let fields = TextFields::default();

        let mut input = ScriptedInput {
            pointer: [100.0, 50.0],
            pressed: true,
            held: true,
            ..ScriptedInput::default()
        };
        widget.update(&fields, &input, 0.016);
        assert_eq!(widget.state.rotation_euler, [0.0, 0.0, 0.0]);

        input.pressed = false;
        for pointer in [[110.0, 50.0], [115.0, 50.0], [115.0, 50.0]] {
            input.pointer = pointer;
            widget.update(&fields, &input, 0.016);
        }

        assert!((widget.state.rotation_euler[1] - 3.0).abs() < 1e-9);
        assert_eq!(widget.state.rotation_euler[0], 0.0);
        assert_eq!(widget.state.previous_mouse_position, [115.0, 50.0]);
    }

    #[test]
    fn upward_drag_lowers_pitch() {
        let mut widget = widget();
        widget.settings.mouse_sensitivity = 1.0;
        let fields = TextFields::default();
        let mut input = ScriptedInput {
            pointer: [0.0, 0.0],
            pressed: true,
            held: true,
            ..ScriptedInput::default()
        };
        widget.update(&fields, &input, 0.0);

        input.pressed = false;
        input.pointer = [0.0, 4.0];
        widget.update(&fields, &input, 0.0);

        assert_eq!(widget.state.rotation_euler[0], -4.0);
    }

    #[test]
    fn pointer_motion_without_button_does_not_rotate() {
        let mut widget = widget();
        let fields = TextFields::default();
        let mut input = ScriptedInput::default();
        for x in [0.0, 30.0, 60.0] {
            input.pointer = [x, x];
            widget.update(&fields, &input, 0.016);
        }
        assert_eq!(widget.state.rotation_euler, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn held_right_key_moves_by_speed_times_elapsed() {
        let mut widget = widget();
        widget.settings.move_speed = 2.0;
        let mut input = ScriptedInput::default();
        input.keys[Direction::Right.index()] = true;

        widget.update(&TextFields::default(), &input, 0.5);

        assert_eq!(widget.state.center_position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut widget = widget();
        let mut input = ScriptedInput::default();
        input.keys[Direction::Left.index()] = true;
        input.keys[Direction::Right.index()] = true;

        widget.update(&TextFields::default(), &input, 0.5);

        assert_eq!(widget.state.center_position[0], 0.0);
    }

    #[test]
    fn diagonal_input_is_not_normalized() {
        let mut widget = widget();
        widget.settings.move_speed = 1.0;
        let mut input = ScriptedInput::default();
        input.keys[Direction::Up.index()] = true;
        input.keys[Direction::Left.index()] = true;

        widget.update(&TextFields::default(), &input, 1.0);

        assert_eq!(widget.state.center_position, [-1.0, 1.0, 0.0]);
    }

    #[test]
    fn unrotated_front_face_matches_scaled_size() {
        let widget = widget();
        let corners: Vec<[f64; 3]> = widget
            .face(0.0)
            .iter()
            .map(|v| v.projected_position)
            .collect();
        assert_eq!(
            corners,
            vec![
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 1.0, 0.0],
                [0.0, 1.0, 0.0]
            ]
        );
    }

    #[test]
    fn back_face_shrinks_with_depth() {
        let mut widget = widget();
        widget.state.depth = 10.0;
        let back = widget.face(widget.state.scaled_size()[2]);
        assert_eq!(back[2].world_position, [2.0, 1.0, 10.0]);
        assert_eq!(back[2].projected_position, [1.0, 0.5, 0.0]);
    }

    #[test]
    fn yaw_rotates_the_projected_corners() {
        let mut widget = widget();
        widget.state.rotation_euler = [0.0, 90.0, 0.0];

        // Corner (2, 0, 0) turns onto the -Z axis and lands at depth -2.
        let front = widget.face(0.0);
        let corner = front[1].world_position;
        assert!(corner[0].abs() < 1e-9);
        assert!((corner[2] + 2.0).abs() < 1e-9);
        assert!(front[1].projected_position[0].abs() < 1e-9);
        assert_eq!(front[1].projected_position[1], 0.0);

        let segments = widget.segments();
        assert_eq!(segments[0].1, front[1].projected_position);
        assert_eq!(segments[8].0, front[0].projected_position);
    }

    #[test]
    fn zero_scale_collapses_every_edge() {
        let mut widget = widget();
        widget.state.scale = 0.0;
        widget.state.center_position = [1.0, 1.0, 0.0];

        let segments = widget.segments();
        assert_eq!(segments.len(), 12);
        for (a, b) in segments {
            assert_eq!(a, b);
            assert_eq!(a, [1.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn negative_dimensions_are_accepted() {
        let mut widget = widget();
        widget.state.width = -2.0;
        let front = widget.face(0.0);
        assert_eq!(front[1].projected_position, [-2.0, 0.0, 0.0]);
    }

    #[test]
    fn post_render_brackets_twelve_segments() {
        let widget = widget();
        let mut recorder = Recorder::default();
        widget.post_render(&mut recorder);

        assert_eq!(recorder.calls[0], Call::SetPass('#'));
        assert_eq!(recorder.calls[1], Call::Push);
        assert_eq!(recorder.calls[2], Call::Begin);
        let n = recorder.calls.len();
        assert_eq!(recorder.calls[n - 2], Call::End);
        assert_eq!(recorder.calls[n - 1], Call::Pop);

        let vertices = recorder.vertices();
        assert_eq!(vertices.len(), 24);
        assert!(vertices.iter().all(|v| v[2] == 0.0));
    }

    #[test]
    fn post_render_orders_loops_before_connecting_edges() {
        let widget = widget();
        let mut recorder = Recorder::default();
        widget.post_render(&mut recorder);
        let vertices = recorder.vertices();

        let front = widget.face(0.0).map(|v| v.projected_position);
        let back = widget.face(2.0).map(|v| v.projected_position);
        // Front loop wraps from the last corner to the first.
        assert_eq!(vertices[6], front[3]);
        assert_eq!(vertices[7], front[0]);
        assert_eq!(vertices[8], back[0]);
        for i in 0..4 {
            assert_eq!(vertices[16 + 2 * i], front[i]);
            assert_eq!(vertices[17 + 2 * i], back[i]);
        }
    }

    #[test]
    fn post_render_without_material_draws_nothing() {
        let mut widget = widget();
        widget.material = None;
        let mut recorder = Recorder::default();
        widget.post_render(&mut recorder);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn depth_at_negative_focal_length_passes_infinity_through() {
        let mut widget = widget();
        widget.state.center_position = [1.0, 1.0, -10.0];
        let mut recorder = Recorder::default();
        widget.post_render(&mut recorder);

        let vertices = recorder.vertices();
        assert_eq!(vertices.len(), 24);
        assert!(vertices.iter().any(|v| !v[0].is_finite()));
    }
}
