//! Theme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::ledger::GROUP_COUNT;

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub primary: Color,
    pub accent: Color,

    pub success: Color,
    pub error: Color,

    pub bg_dark: Color,
    pub bg_card: Color,
    pub bg_highlight: Color,

    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    /// One color per competing group.
    pub groups: [Color; GROUP_COUNT],
}

/// Available theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Default,
    KanagawaWave,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::KanagawaWave => "kanagawa-wave",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Default => "Default",
            ThemeName::KanagawaWave => "Kanagawa Wave",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "kanagawa-wave" | "kanagawa_wave" | "kanagawa" => ThemeName::KanagawaWave,
            _ => ThemeName::Default,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Default => ThemeName::KanagawaWave,
            ThemeName::KanagawaWave => ThemeName::Default,
        }
    }
}

/// Theme struct that holds colors and provides style methods.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Default => Self::default_colors(),
            ThemeName::KanagawaWave => Self::kanagawa_wave_colors(),
        };
        Self { name, colors }
    }

    pub fn from_name(name: &str) -> Self {
        Self::new(ThemeName::parse(name))
    }

    fn default_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(220, 38, 38),       // Red 600
            accent: Color::Rgb(250, 204, 21),       // Gold

            success: Color::Rgb(34, 197, 94),
            error: Color::Rgb(239, 68, 68),

            bg_dark: Color::Rgb(15, 23, 42),        // Slate 900
            bg_card: Color::Rgb(30, 41, 59),        // Slate 800
            bg_highlight: Color::Rgb(71, 85, 105),  // Slate 600

            text: Color::Rgb(248, 250, 252),
            text_muted: Color::Rgb(148, 163, 184),
            text_dim: Color::Rgb(100, 116, 139),

            groups: [
                Color::Rgb(239, 68, 68),   // Red
                Color::Rgb(249, 115, 22),  // Orange
                Color::Rgb(234, 179, 8),   // Yellow
                Color::Rgb(34, 197, 94),   // Green
                Color::Rgb(20, 184, 166),  // Teal
                Color::Rgb(59, 130, 246),  // Blue
                Color::Rgb(139, 92, 246),  // Violet
                Color::Rgb(236, 72, 153),  // Pink
            ],
        }
    }

    /// Kanagawa Wave palette.
    fn kanagawa_wave_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(0xC3, 0x40, 0x43),      // autumnRed
            accent: Color::Rgb(0xE6, 0xC3, 0x84),       // carpYellow

            success: Color::Rgb(0x98, 0xBB, 0x6C),      // springGreen
            error: Color::Rgb(0xE8, 0x24, 0x24),        // samuraiRed

            bg_dark: Color::Rgb(0x16, 0x16, 0x1D),      // sumiInk0
            bg_card: Color::Rgb(0x1F, 0x1F, 0x28),      // sumiInk1
            bg_highlight: Color::Rgb(0x36, 0x36, 0x46), // sumiInk3

            text: Color::Rgb(0xDC, 0xD7, 0xBA),         // fujiWhite
            text_muted: Color::Rgb(0xC8, 0xC0, 0x93),   // oldWhite
            text_dim: Color::Rgb(0x54, 0x54, 0x6D),     // sumiInk4

            groups: [
                Color::Rgb(0xE8, 0x24, 0x24), // samuraiRed
                Color::Rgb(0xFF, 0xA0, 0x66), // surimiOrange
                Color::Rgb(0xE6, 0xC3, 0x84), // carpYellow
                Color::Rgb(0x98, 0xBB, 0x6C), // springGreen
                Color::Rgb(0x6A, 0x95, 0x89), // waveAqua1
                Color::Rgb(0x7E, 0x9C, 0xD8), // crystalBlue
                Color::Rgb(0x95, 0x7F, 0xB8), // oniViolet
                Color::Rgb(0xD2, 0x7E, 0x99), // sakuraPink
            ],
        }
    }

    /// Color of group `index`; indices wrap.
    pub fn group(&self, index: usize) -> Color {
        self.colors.groups[index % GROUP_COUNT]
    }

    // ══════════════════════════════════════════════════════════════════════
    // Styles
    // ══════════════════════════════════════════════════════════════════════

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.colors.bg_highlight)
            .fg(self.colors.text)
    }

    /// Face of a card still showing its phonetic prompt.
    pub fn card_prompt(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .bg(self.colors.bg_card)
            .add_modifier(Modifier::BOLD)
    }

    /// Face of a flipped card.
    pub fn card_answer(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .bg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.colors.text_muted)
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.colors.text_dim)
    }

    pub fn key_highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_and_cycle() {
        for name in [ThemeName::Default, ThemeName::KanagawaWave] {
            assert_eq!(ThemeName::parse(name.as_str()), name);
            assert_eq!(name.next().next(), name);
        }
        assert_eq!(ThemeName::parse("unknown"), ThemeName::Default);
    }

    #[test]
    fn every_group_has_a_distinct_color() {
        let theme = Theme::default();
        for a in 0..GROUP_COUNT {
            for b in (a + 1)..GROUP_COUNT {
                assert_ne!(theme.group(a), theme.group(b));
            }
        }
    }
}
