use crate::error::AppError;
use crate::host::Material;
use crate::panel::{FieldKind, FieldPanel};
use crate::state::{BoxState, Settings};
use clap::Parser;
use crossterm::style::Color;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

/// Interactive wireframe box viewer for the terminal
///
/// Drag with the left mouse button to rotate, hold the arrow keys to move,
/// and edit the fields at the bottom (Tab to switch) to resize the box.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Initial box width
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub width: f64,

    /// Initial box height
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub height: f64,

    /// Initial box depth
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub depth: f64,

    /// Initial uniform scale
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub scale: f64,

    /// Distance from the eye to the projection plane
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub focal_length: f64,

    /// Movement speed in units per second
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub move_speed: f64,

    /// Rotation in degrees per cell of mouse drag
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub mouse_sensitivity: f64,

    /// Text fields to show
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_value = "width,height,depth,scale"
    )]
    pub fields: Vec<FieldKind>,

    /// Character the wireframe is drawn with
    #[arg(long, default_value_t = '#')]
    pub glyph: char,

    /// Wireframe color (e.g. white, red, dark_cyan)
    #[arg(long, default_value = "white", value_parser = parse_color)]
    pub color: Color,

    /// Do not bind a material; the box is not drawn
    #[arg(long)]
    pub no_material: bool,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// How long a key press counts as held when the terminal does not report releases
    #[arg(long, default_value_t = 150)]
    pub key_hold_ms: u64,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_color(name: &str) -> Result<Color, String> {
    Color::try_from(name).map_err(|()| format!("unknown color '{name}'"))
}

impl Args {
    pub fn initial_state(&self) -> BoxState {
        BoxState::with_dimensions(self.width, self.height, self.depth, self.scale)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            focal_length: self.focal_length,
            move_speed: self.move_speed,
            mouse_sensitivity: self.mouse_sensitivity,
        }
    }

    pub fn material(&self) -> Option<Material> {
        if self.no_material {
            None
        } else {
            Some(Material {
                glyph: self.glyph,
                color: self.color,
            })
        }
    }

    /// Initial text of a field, matching the initial state
    pub fn initial_text(&self, kind: FieldKind) -> String {
        let value = match kind {
            FieldKind::Width => self.width,
            FieldKind::Height => self.height,
            FieldKind::Depth => self.depth,
            FieldKind::Scale => self.scale,
        };
        value.to_string()
    }

    pub fn field_panel(&self) -> FieldPanel {
        FieldPanel::new(
            self.fields
                .iter()
                .map(|&kind| (kind, self.initial_text(kind))),
        )
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}

/// Installs `env_logger`, filtered by `RUST_LOG` (default `warn`)
pub fn init_logging(log_file: Option<&PathBuf>) -> Result<(), AppError> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}
