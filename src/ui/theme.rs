//! cliclack theme in the same green as the `[OK]` status tag

use cliclack::ThemeState;
use console::{Color, Style};

/// Prompt theme built around one accent colour
#[derive(Debug, Clone)]
pub struct SyncacheTheme {
    accent: Color,
}

impl Default for SyncacheTheme {
    fn default() -> Self {
        Self {
            accent: Color::Green,
        }
    }
}

impl SyncacheTheme {
    fn styled(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active | ThemeState::Submit => Style::new().fg(self.accent),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().yellow(),
        }
    }
}

impl cliclack::Theme for SyncacheTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Submit | ThemeState::Cancel => self.styled(state).dim(),
            _ => self.styled(state),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Submit => self.styled(state).bold(),
            _ => self.styled(state),
        }
    }
}

pub fn init_theme() {
    cliclack::set_theme(SyncacheTheme::default());
}
