//! Event loop that owns the controller and redraws the card.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_widget_core::{
    Config, WeatherController, clock::SystemClock, provider_from_config, render,
};

pub const DEFAULT_WIDTH: usize = 56;

const KEY_HINTS: &str = "[l] language  [r] refresh  [t] retry  [q] quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    ToggleLanguage,
    Refresh,
    Retry,
    Quit,
}

impl HostCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "l" | "lang" | "language" => Some(HostCommand::ToggleLanguage),
            "r" | "refresh" => Some(HostCommand::Refresh),
            "t" | "retry" => Some(HostCommand::Retry),
            "q" | "quit" | "exit" => Some(HostCommand::Quit),
            _ => None,
        }
    }
}

fn controller_from_config(config: &Config) -> anyhow::Result<WeatherController> {
    let provider = provider_from_config(config)?;
    Ok(WeatherController::new(config, provider, Arc::new(SystemClock)))
}

fn draw(controller: &WeatherController, width: usize) {
    // Clear screen, cursor home.
    print!("\x1b[2J\x1b[H");
    println!("{}", render(&controller.view(), width));
    println!();
    println!("{KEY_HINTS}");
}

pub async fn run_interactive(config: &Config, width: usize) -> anyhow::Result<()> {
    let mut controller = controller_from_config(config)?;
    controller.initialize();
    draw(&controller, width);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = controller.next_settled() => {
                if changed {
                    draw(&controller, width);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match HostCommand::parse(&line) {
                    Some(HostCommand::ToggleLanguage) => controller.toggle_language(),
                    Some(HostCommand::Refresh) => controller.refresh(),
                    Some(HostCommand::Retry) => controller.retry(),
                    Some(HostCommand::Quit) => break,
                    None => {}
                }
                draw(&controller, width);
            }
        }
    }

    controller.shutdown();
    Ok(())
}

pub async fn show_once(config: &Config, width: usize) -> anyhow::Result<()> {
    let mut controller = controller_from_config(config)?;
    controller.initialize();

    while controller.state().loading {
        controller.next_settled().await;
    }

    println!("{}", render(&controller.view(), width));

    match &controller.state().error {
        Some(err) => Err(anyhow!("Failed to fetch weather: {err}")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_key_commands() {
        assert_eq!(HostCommand::parse("l"), Some(HostCommand::ToggleLanguage));
        assert_eq!(HostCommand::parse("r\n"), Some(HostCommand::Refresh));
        assert_eq!(HostCommand::parse(" T "), Some(HostCommand::Retry));
        assert_eq!(HostCommand::parse("q"), Some(HostCommand::Quit));
    }

    #[test]
    fn parses_long_commands() {
        assert_eq!(HostCommand::parse("language"), Some(HostCommand::ToggleLanguage));
        assert_eq!(HostCommand::parse("exit"), Some(HostCommand::Quit));
    }

    #[test]
    fn unknown_input_is_ignored() {
        assert_eq!(HostCommand::parse(""), None);
        assert_eq!(HostCommand::parse("forecast"), None);
    }
}
