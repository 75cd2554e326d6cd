mod config;
mod error;
mod graphics;
mod host;
mod math;
mod panel;
mod state;
mod terminal;
mod vertex;
mod widget;

use clap::Parser;
use config::{init_logging, Args};
use error::AppError;
use terminal::App;

/// Main function
fn main() -> Result<(), AppError> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    log::info!("configuration: {args:?}");

    let (cols, rows) = match termsize::get() {
        Some(size) => (size.cols, size.rows),
        None => crossterm::terminal::size()?,
    };

    App::new(args, cols, rows).run()
}
