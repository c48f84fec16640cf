mod chase;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use engine::{EnvFlags, GameLoop, WindowBackend, WindowConfig};
use log::info;

use chase::Chase;

/// Steer the square into the target
#[derive(Parser, Debug)]
#[command(name = "game", version)]
struct Args {
    /// TOML file with window settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Loop iterations per second, 0 for unlimited
    #[arg(long)]
    tick_rate: Option<u32>,
}

impl Args {
    /// Config file (or defaults) with command-line overrides on top
    fn window_config(&self) -> Result<WindowConfig> {
        let mut config = match &self.config {
            Some(path) => WindowConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => WindowConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }
        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "Window size must be positive, got {}x{}",
            config.width,
            config.height
        );
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ---- Logging first so config errors are reported ----
    engine::logging::init(&EnvFlags::from_env()).context("Failed to set up logging")?;

    let config = args.window_config()?;
    info!("Window {}x{} at {} ticks/s", config.width, config.height, config.tick_rate);

    // ---- Engine loop (game owns it) ----
    let mut game_loop = GameLoop::new(WindowBackend::new(), config);
    let stop = game_loop.stop_handle();
    ctrlc::set_handler(move || stop.raise()).context("Failed to install Ctrl-C handler")?;

    info!("Starting game");
    game_loop
        .run_continually(&mut Chase::new())
        .context("Game loop failed")?;
    info!("Game stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_flags() {
        let args = Args::parse_from(["game"]);
        let config = args.window_config().unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.tick_rate, 30);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 320\nheight = 240\ntitle = \"Chase\"").unwrap();
        let path = file.path().to_str().unwrap();

        let args = Args::parse_from(["game", "--config", path, "--height", "100", "--tick-rate", "0"]);
        let config = args.window_config().unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 100);
        assert_eq!(config.tick_rate, 0);
        assert_eq!(config.title, "Chase");
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let args = Args::parse_from(["game", "--width", "0"]);
        assert!(args.window_config().is_err());

        let args = Args::parse_from(["game", "--height", "0"]);
        assert!(args.window_config().is_err());
    }

    #[test]
    fn missing_config_file_fails() {
        let args = Args::parse_from(["game", "--config", "/nonexistent/game.toml"]);
        assert!(args.window_config().is_err());
    }
}
