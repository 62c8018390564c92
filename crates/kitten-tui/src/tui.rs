//! Terminal session for the console.

use color_eyre::eyre::Result;
use ratatui::{DefaultTerminal, Frame};

/// Holds the terminal in raw mode on the alternate screen. Dropping it
/// hands the terminal back to the shell, also when the event loop
/// returns an error.
pub struct Tui {
    terminal: DefaultTerminal,
}

impl Tui {
    /// ratatui's panic hook restores the terminal before the report set
    /// up by [`install_hooks`] is printed.
    pub fn enter() -> Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
        })
    }

    pub fn draw<F: FnOnce(&mut Frame)>(&mut self, render: F) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// color-eyre reports. Call before [`Tui::enter`].
pub fn install_hooks() -> Result<()> {
    color_eyre::install()
}
