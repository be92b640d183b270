use ratatui::style::Color;

use crate::model::{TaskColor, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    /// Column body
    pub surface: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    /// Accent for the cursor, active drags and headers
    pub primary: Color,
    pub red: Color,
    /// Text drawn on light cards
    pub ink: Color,
    /// Text drawn on dark cards
    pub paper: Color,
    pub card_white: Color,
    pub card_mint: Color,
    pub card_surface: Color,
    pub card_soft_teal: Color,
    pub card_deep_teal: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x18, 0x18),
            surface: Color::Rgb(0x1A, 0x24, 0x24),
            text: Color::Rgb(0xC4, 0xD6, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6F, 0x89, 0x88),
            primary: Color::Rgb(0x83, 0xEC, 0xBB),
            red: Color::Rgb(0xFF, 0x5C, 0x5C),
            ink: Color::Rgb(0x19, 0x1C, 0x1B),
            paper: Color::Rgb(0xFF, 0xFF, 0xFF),
            card_white: Color::Rgb(0xFF, 0xFF, 0xFF),
            card_mint: Color::Rgb(0x83, 0xEC, 0xBB),
            card_surface: Color::Rgb(0xF3, 0xF5, 0xF0),
            card_soft_teal: Color::Rgb(0xD0, 0xE0, 0xE0),
            card_deep_teal: Color::Rgb(0x53, 0x91, 0x90),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "surface" => &mut theme.surface,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "dim" => &mut theme.dim,
                "primary" => &mut theme.primary,
                "red" => &mut theme.red,
                "ink" => &mut theme.ink,
                "paper" => &mut theme.paper,
                "card-white" => &mut theme.card_white,
                "card-mint" => &mut theme.card_mint,
                "card-surface" => &mut theme.card_surface,
                "card-soft-teal" => &mut theme.card_soft_teal,
                "card-deep-teal" => &mut theme.card_deep_teal,
                _ => continue,
            };
            *slot = color;
        }

        theme
    }

    /// Card background for a palette entry
    pub fn card_bg(&self, color: TaskColor) -> Color {
        match color {
            TaskColor::White => self.card_white,
            TaskColor::Mint => self.card_mint,
            TaskColor::Surface => self.card_surface,
            TaskColor::SoftTeal => self.card_soft_teal,
            TaskColor::DeepTeal => self.card_deep_teal,
        }
    }

    /// Readable text color on top of a card of this color
    pub fn card_fg(&self, color: TaskColor) -> Color {
        if color.is_dark() { self.paper } else { self.ink }
    }
}
