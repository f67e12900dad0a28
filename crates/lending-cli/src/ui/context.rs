//! UI context for environment detection and configuration.

use std::io::IsTerminal;

use chrono_tz::Tz;

use super::mode::{OutputMode, TextFormat};

/// Everything a renderer needs to know about where its output lands.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    /// Styles are applied only when this is set.
    pub color: bool,
    /// `false` under `--ascii`; symbols fall back to plain characters.
    pub unicode: bool,
    /// Columns available to tables.
    pub width: usize,
    pub mode: OutputMode,
    /// Due dates and checkout times are shown in this zone.
    pub timezone: Tz,
}

impl UiContext {
    /// Build a context from the global flags plus `NO_COLOR`, `TERM` and the tty.
    pub fn from_env(
        json_flag: bool,
        format: Option<TextFormat>,
        no_color_flag: bool,
        ascii_flag: bool,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();

        Self {
            is_tty,
            color: is_tty && !no_color_flag && !no_color_env && !term_is_dumb,
            unicode: !ascii_flag,
            width: terminal_width().unwrap_or(80),
            mode: OutputMode::resolve(json_flag, format, is_tty, term_is_dumb),
            timezone: Tz::UTC,
        }
    }

    /// Display timestamps in `timezone` instead of UTC.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Prompts need both ends of the terminal.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }
}

/// Terminal width from `COLUMNS`, then the tty itself.
fn terminal_width() -> Option<usize> {
    if let Some(width) = std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.parse::<usize>().ok())
        .filter(|width| *width > 0)
    {
        return Some(width);
    }

    #[cfg(unix)]
    {
        use std::mem::MaybeUninit;

        let mut winsize = MaybeUninit::<libc::winsize>::uninit();
        // SAFETY: TIOCGWINSZ only writes a winsize into the pointer we own.
        let result =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
        if result == 0 {
            let ws = unsafe { winsize.assume_init() };
            if ws.ws_col > 0 {
                return Some(ws.ws_col as usize);
            }
        }
    }

    None
}
