use std::{future::Future, io::IsTerminal, process::ExitCode, time::Duration};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_lookup_core::{Config, WeatherLookup, WeatherProvider, provider_from_config};

use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Current weather for a city")]
pub struct Cli {
    /// Log requests and responses (same as RUST_LOG=debug).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the weather for one city and exit.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Prompt for cities until Esc or Ctrl-C.
    Interactive {
        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DisplayArgs {
    /// Don't draw the condition icon.
    #[arg(long)]
    pub no_icon: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive { display: DisplayArgs::default() }) {
            Command::Configure { api_key } => {
                configure(api_key)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, display } => {
                let lookup = build_lookup()?;
                let mut view = TerminalView::new(!display.no_icon);

                let result = with_progress(lookup.fetch_and_display(&city, &mut view)).await;
                redraw(&mut view)?;

                Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Command::Interactive { display } => {
                interactive(build_lookup()?, TerminalView::new(!display.no_icon)).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty.");
    }

    config.set_api_key(api_key);
    let path = config.save()?;
    println!("Saved API key to {}", path.display());

    Ok(())
}

fn build_lookup() -> anyhow::Result<WeatherLookup<Box<dyn WeatherProvider>>> {
    let mut config = Config::load()?;
    config.apply_env_overrides();

    let provider = provider_from_config(&config)?;
    tracing::debug!(base_url = config.base_url(), timeout = ?config.timeout(), "provider ready");

    Ok(WeatherLookup::new(provider))
}

/// One lookup at a time: the next prompt only appears after the previous
/// lookup has finished. The prompt itself blocks, so it runs off the runtime.
async fn interactive(
    lookup: WeatherLookup<Box<dyn WeatherProvider>>,
    mut view: TerminalView,
) -> anyhow::Result<()> {
    view.print()?;

    loop {
        let input = tokio::task::spawn_blocking(|| Text::new("Enter City:").prompt())
            .await
            .context("City prompt task failed")?;

        let city = match input {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        // Failures are already held by the view.
        let _ = with_progress(lookup.fetch_and_display(&city, &mut view)).await;
        redraw(&mut view)?;
    }

    Ok(())
}

/// After a lookup: redraw the panel if anything on it moved (a failed
/// lookup may still have set the background), then the error block.
fn redraw(view: &mut TerminalView) -> std::io::Result<()> {
    if view.take_changed() {
        view.print()?;
    }
    view.write_error(&mut std::io::stderr().lock())?;
    Ok(())
}

/// Await `fut`, drawing a spinner on stderr while it runs.
async fn with_progress<F: Future>(fut: F) -> F::Output {
    const FRAMES: [char; 4] = ['|', '/', '-', '\\'];

    if !std::io::stderr().is_terminal() {
        return fut.await;
    }

    tokio::pin!(fut);
    let mut ticker = tokio::time::interval(Duration::from_millis(120));
    let mut frame = 0;

    loop {
        tokio::select! {
            out = &mut fut => {
                eprint!("\r\x1b[2K");
                return out;
            }
            _ = ticker.tick() => {
                eprint!("\r{} Fetching weather...", FRAMES[frame % FRAMES.len()]);
                frame += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive() {
        let cli = Cli::try_parse_from(["weather-lookup"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_takes_city_and_flags() {
        let cli = Cli::try_parse_from(["weather-lookup", "-v", "show", "New York", "--no-icon"])
            .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Command::Show { city, display }) => {
                assert_eq!(city, "New York");
                assert!(display.no_icon);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_accepts_key_flag() {
        let cli = Cli::try_parse_from(["weather-lookup", "configure", "--api-key", "K"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure { api_key: Some(ref k) }) if k == "K"));
    }

    #[test]
    fn show_requires_city() {
        assert!(Cli::try_parse_from(["weather-lookup", "show"]).is_err());
    }

    #[tokio::test]
    async fn with_progress_returns_output() {
        assert_eq!(with_progress(async { 7 }).await, 7);
    }
}
