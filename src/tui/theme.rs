//! Picker colors
//!
//! One palette per terminal color depth.

use ratatui::style::{Color, Modifier, Style};

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Basic 16 ANSI colors
    Basic,
    /// 256 color palette
    #[default]
    Indexed,
    /// True color (24-bit RGB)
    TrueColor,
}

impl ColorMode {
    /// Detect the color mode of the current terminal
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    fn from_env(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }
        match term {
            Some(t) if t.contains("kitty") || t.contains("alacritty") => Self::TrueColor,
            Some(t) if t.contains("256color") => Self::Indexed,
            _ => Self::Basic,
        }
    }
}

/// Colors used by the picker
#[derive(Debug, Clone)]
pub struct Theme {
    pub prompt: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub selection_fg: Option<Color>,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_color_mode(ColorMode::detect())
    }
}

impl Theme {
    pub fn for_color_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Basic => Self {
                prompt: Color::Cyan,
                border: Color::DarkGray,
                selection_bg: Color::Blue,
                selection_fg: Some(Color::White),
                text_secondary: Color::DarkGray,
            },
            ColorMode::Indexed => Self {
                prompt: Color::Indexed(108), // sage green
                border: Color::Indexed(243),
                selection_bg: Color::Indexed(60),
                selection_fg: Some(Color::Indexed(255)),
                text_secondary: Color::Indexed(250),
            },
            ColorMode::TrueColor => Self {
                prompt: Color::Rgb(129, 178, 134),
                border: Color::Rgb(88, 91, 112),
                selection_bg: Color::Rgb(69, 71, 90),
                selection_fg: Some(Color::Rgb(245, 245, 250)),
                text_secondary: Color::Rgb(166, 173, 200),
            },
        }
    }

    pub fn prompt(&self) -> Style {
        Style::default().fg(self.prompt).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for the highlighted row
    pub fn selection(&self) -> Style {
        let style = Style::default().bg(self.selection_bg);
        match self.selection_fg {
            Some(fg) => style.fg(fg),
            None => style,
        }
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_from_env() {
        assert_eq!(ColorMode::from_env(Some("truecolor"), None), ColorMode::TrueColor);
        assert_eq!(
            ColorMode::from_env(None, Some("xterm-kitty")),
            ColorMode::TrueColor
        );
        assert_eq!(
            ColorMode::from_env(None, Some("screen-256color")),
            ColorMode::Indexed
        );
        assert_eq!(ColorMode::from_env(None, Some("vt100")), ColorMode::Basic);
        assert_eq!(ColorMode::from_env(None, None), ColorMode::Basic);
    }

    #[test]
    fn test_selection_style() {
        let style = Theme::for_color_mode(ColorMode::Indexed).selection();
        assert_eq!(style.bg, Some(Color::Indexed(60)));
        assert_eq!(style.fg, Some(Color::Indexed(255)));
    }
}
