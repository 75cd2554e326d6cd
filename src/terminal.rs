use crate::config::Args;
use crate::error::AppError;
use crate::graphics::Canvas;
use crate::host::{Direction, Input};
use crate::panel::FieldPanel;
use crate::widget::BoxWidget;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// Rows reserved below the canvas for the field panel and help line
const FOOTER_ROWS: u16 = 2;

/// Pointer and key state assembled from terminal events
#[derive(Debug)]
pub struct InputState {
    pointer: [f64; 2],
    pressed: bool,
    held: bool,
    keys: [Option<Instant>; 4],
    reports_release: bool,
    key_hold: Duration,
    now: Instant,
    rows: u16,
}

impl InputState {
    pub fn new(rows: u16, reports_release: bool, key_hold: Duration) -> Self {
        InputState {
            pointer: [0.0; 2],
            pressed: false,
            held: false,
            keys: [None; 4],
            reports_release,
            key_hold,
            now: Instant::now(),
            rows,
        }
    }

    pub fn set_rows(&mut self, rows: u16) {
        self.rows = rows;
    }

    /// Records a mouse event; cell rows are flipped so y points up
    pub fn mouse(&mut self, event: &MouseEvent) {
        self.pointer = [
            f64::from(event.column),
            f64::from(self.rows) - f64::from(event.row),
        ];
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = true;
                self.held = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.held = false,
            _ => {}
        }
    }

    /// Records a movement key event at `at`
    pub fn key_event(&mut self, direction: Direction, kind: KeyEventKind, at: Instant) {
        let slot = &mut self.keys[direction.index()];
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => *slot = Some(at),
            KeyEventKind::Release => *slot = None,
        }
    }

    /// Samples time for this frame's key queries
    pub fn begin_frame(&mut self, now: Instant) {
        self.now = now;
    }

    /// Clears edge-triggered state once the frame has been consumed
    pub fn end_frame(&mut self) {
        self.pressed = false;
    }

    pub fn release_all(&mut self) {
        self.keys = [None; 4];
        self.held = false;
        self.pressed = false;
    }
}

impl Input for InputState {
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
        match self.keys[direction.index()] {
            None => false,
            Some(_) if self.reports_release => true,
            Some(at) => self.now.saturating_duration_since(at) < self.key_hold,
        }
    }
}

/// Restores the terminal when dropped
struct Session {
    stdout: Stdout,
    enhanced_keyboard: bool,
}

impl Session {
    fn start() -> Result<Self, AppError> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let enhanced_keyboard = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keyboard {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::debug!("keyboard release events supported: {enhanced_keyboard}");

        Ok(Session {
            stdout,
            enhanced_keyboard,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.enhanced_keyboard {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.stdout,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// What a key press asks the frame loop to do
#[derive(Debug, PartialEq)]
enum Action {
    None,
    Quit,
    ToggleDebug,
    Reset,
}

/// Console frontend driving a `BoxWidget`
pub struct App {
    widget: BoxWidget,
    panel: FieldPanel,
    canvas: Canvas,
    input: InputState,
    args: Args,
    debug: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    frame_count: u64,
}

impl App {
    pub fn new(args: Args, cols: u16, rows: u16) -> Self {
        let canvas_rows = rows.saturating_sub(FOOTER_ROWS);
        App {
            widget: BoxWidget::new(args.initial_state(), args.settings(), args.material()),
            panel: args.field_panel(),
            canvas: Canvas::new(usize::from(cols), usize::from(canvas_rows)),
            input: InputState::new(canvas_rows, false, args.key_hold()),
            debug: false,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            frame_count: 0,
            args,
        }
    }

    /// Runs the frame loop until the user quits
    pub fn run(mut self) -> Result<(), AppError> {
        let mut session = Session::start()?;
        self.input.reports_release = session.enhanced_keyboard;
        log::info!(
            "starting with {}x{} canvas at {} fps",
            self.canvas.width(),
            self.canvas.height(),
            self.args.fps
        );

        let frame_duration = self.args.frame_duration();
        let mut last_frame = Instant::now();
        loop {
            let deadline = last_frame + frame_duration;
            if self.drain_events(deadline)? == Action::Quit {
                break;
            }

            let now = Instant::now();
            let delta_time = now.duration_since(last_frame).as_secs_f64();
            last_frame = now;

            self.input.begin_frame(now);
            self.widget.update(&self.panel.text_fields(), &self.input, delta_time);
            self.input.end_frame();

            self.canvas.clear();
            self.widget.post_render(&mut self.canvas);
            self.present(&mut session.stdout)?;
            self.frame_count += 1;
        }

        log::info!("quitting after {} frames", self.frame_count);
        Ok(())
    }

    /// Handles terminal events until `deadline`
    fn drain_events(&mut self, deadline: Instant) -> Result<Action, AppError> {
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(Action::None);
            }

            match event::read()? {
                Event::Key(key) => match self.handle_key(&key) {
                    Action::Quit => return Ok(Action::Quit),
                    Action::ToggleDebug => self.debug = !self.debug,
                    Action::Reset => self.reset(),
                    Action::None => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => self.canvas.zoom_by(1.1),
                    MouseEventKind::ScrollDown => self.canvas.zoom_by(1.0 / 1.1),
                    _ => self.input.mouse(&mouse),
                },
                Event::Resize(cols, rows) => self.resize(cols, rows),
                Event::FocusLost => self.input.release_all(),
                _ => {}
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        let direction = match key.code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = direction {
            self.input.key_event(direction, key.kind, Instant::now());
            return Action::None;
        }

        if key.kind == KeyEventKind::Release {
            return Action::None;
        }

        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::F(1) => Action::ToggleDebug,
            KeyCode::F(5) => Action::Reset,
            KeyCode::Tab => {
                self.panel.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.panel.focus_previous();
                Action::None
            }
            KeyCode::Backspace => {
                self.panel.backspace();
                Action::None
            }
            KeyCode::Delete => {
                self.panel.clear_focused();
                Action::None
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.panel.insert(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Puts the box and field texts back to their configured values
    fn reset(&mut self) {
        self.widget.state = self.args.initial_state();
        for input in self.panel.inputs().to_vec() {
            self.panel.set_text(input.kind, self.args.initial_text(input.kind));
        }
        self.canvas.reset_zoom();
        log::info!("box reset");
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let canvas_rows = rows.saturating_sub(FOOTER_ROWS);
        self.canvas.resize(usize::from(cols), usize::from(canvas_rows));
        self.input.set_rows(canvas_rows);
        log::debug!("resized to {cols}x{rows}");
    }

    /// Writes the canvas, HUD and footer to the terminal
    fn present(&mut self, stdout: &mut Stdout) -> Result<(), AppError> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        for row in 0..self.canvas.height() {
            queue!(stdout, cursor::MoveTo(0, row as u16))?;
            let mut color = None;
            for cell in self.canvas.row(row) {
                if color != Some(cell.color) {
                    queue!(stdout, SetForegroundColor(cell.color))?;
                    color = Some(cell.color);
                }
                queue!(stdout, Print(cell.glyph))?;
            }
        }
        queue!(stdout, ResetColor)?;

        if self.debug {
            for (row, line) in self.debug_lines().iter().enumerate() {
                queue!(stdout, cursor::MoveTo(1, row as u16), Print(line))?;
            }
        }

        let footer = self.canvas.height() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, footer),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;
        let focused = self.panel.focused();
        for input in self.panel.inputs() {
            queue!(stdout, Print(format!(" {}: ", input.kind.label())))?;
            if Some(input.kind) == focused {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                stdout,
                Print(format!("{:<8}", input.text)),
                SetAttribute(Attribute::Reset)
            )?;
        }
        queue!(
            stdout,
            cursor::MoveTo(0, footer + 1),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print(" drag: rotate  arrows: move  tab: next field  wheel: zoom  F1: debug  F5: reset  esc: quit"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn debug_lines(&self) -> Vec<String> {
        let state = &self.widget.state;
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!(
                "Pitch: {:.2}, Yaw: {:.2}",
                state.rotation_euler[0], state.rotation_euler[1]
            ),
            format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                state.center_position[0], state.center_position[1], state.center_position[2]
            ),
            format!(
                "Size: {:.2} x {:.2} x {:.2}, Scale: {:.2}",
                state.width, state.height, state.depth, state.scale
            ),
            format!("FPS: {:.2}", self.fps),
            format!("Zoom: {:.2}", self.canvas.zoom()),
            format!("Skipped segments: {}", self.canvas.skipped_segments),
        ]
    }
}
