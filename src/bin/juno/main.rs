//! juno - play the synthesizer from the terminal
//!
//! Run with: cargo run --bin juno
//! Logs go to stderr; redirect it (`2>juno.log`) and set `RUST_LOG` to see them.

mod app;
mod keymap;
mod player;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    app::run()
}
