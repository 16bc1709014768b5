//! # Theme System
//!
//! Colors used by the clipdeck TUI, grouped by role. Rendering code reads
//! theme fields instead of hardcoding `ratatui::style::Color` values; the
//! theme is chosen by name in `config.json`.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Macchiato**
//! - **Dracula**
//! - **Nord**

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    /// Panel background.
    pub bg: Color,
    /// Primary text.
    pub fg: Color,
    /// Hints, separators, media URLs, unfocused borders.
    pub fg_dim: Color,
    /// Focused borders, cursor row, header.
    pub accent: Color,
    /// Marked clips and their playback rank.
    pub marked: Color,
    /// Background of a marked clip row.
    pub marked_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    /// All built-in themes, default first.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a configured theme name, falling back to the default.
    pub fn by_name_or_default(name: &str) -> &'static Theme {
        Self::by_name(name).unwrap_or_else(Self::default_theme)
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }
}

static BUILT_IN_THEMES: [Theme; 4] = [
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),           // base
        fg: Color::Rgb(205, 214, 244),        // text
        fg_dim: Color::Rgb(108, 112, 134),    // overlay0
        accent: Color::Rgb(137, 180, 250),    // blue
        marked: Color::Rgb(249, 226, 175),    // yellow
        marked_bg: Color::Rgb(69, 71, 90),    // surface1
        success: Color::Rgb(166, 227, 161),   // green
        warning: Color::Rgb(250, 179, 135),   // peach
        error: Color::Rgb(243, 139, 168),     // red
    },
    Theme {
        name: "Catppuccin Macchiato",
        bg: Color::Rgb(36, 39, 58),           // base
        fg: Color::Rgb(202, 211, 245),        // text
        fg_dim: Color::Rgb(110, 115, 141),    // overlay0
        accent: Color::Rgb(138, 173, 244),    // blue
        marked: Color::Rgb(238, 212, 159),    // yellow
        marked_bg: Color::Rgb(73, 77, 100),   // surface1
        success: Color::Rgb(166, 218, 149),   // green
        warning: Color::Rgb(245, 169, 127),   // peach
        error: Color::Rgb(237, 135, 150),     // red
    },
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(139, 233, 253),
        marked: Color::Rgb(241, 250, 140),
        marked_bg: Color::Rgb(68, 71, 90),
        success: Color::Rgb(80, 250, 123),
        warning: Color::Rgb(255, 184, 108),
        error: Color::Rgb(255, 85, 85),
    },
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208),
        marked: Color::Rgb(235, 203, 139),
        marked_bg: Color::Rgb(67, 76, 94),
        success: Color::Rgb(163, 190, 140),
        warning: Color::Rgb(208, 135, 112),
        error: Color::Rgb(191, 97, 106),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ctp(color: catppuccin::Color) -> Color {
        Color::Rgb(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    #[test]
    fn test_default_is_mocha() {
        assert_eq!(Theme::default_theme().name, "Catppuccin Mocha");
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert!(Theme::by_name("catppuccin mocha").is_some());
        assert!(Theme::by_name("NORD").is_some());
        assert!(Theme::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        assert_eq!(Theme::by_name_or_default("vaporwave").name, "Catppuccin Mocha");
        assert_eq!(Theme::by_name_or_default("dracula").name, "Dracula");
    }

    #[test]
    fn test_catppuccin_mocha_matches_palette() {
        let mocha = catppuccin::PALETTE.mocha.colors;
        let theme = Theme::default_theme();
        assert_eq!(theme.bg, ctp(mocha.base));
        assert_eq!(theme.fg, ctp(mocha.text));
        assert_eq!(theme.accent, ctp(mocha.blue));
        assert_eq!(theme.marked, ctp(mocha.yellow));
        assert_eq!(theme.warning, ctp(mocha.peach));
        assert_eq!(theme.error, ctp(mocha.red));
    }

    #[test]
    fn test_catppuccin_macchiato_matches_palette() {
        let macchiato = catppuccin::PALETTE.macchiato.colors;
        let theme = Theme::by_name("Catppuccin Macchiato").expect("theme exists");
        assert_eq!(theme.bg, ctp(macchiato.base));
        assert_eq!(theme.success, ctp(macchiato.green));
        assert_eq!(theme.warning, ctp(macchiato.peach));
    }

    #[test]
    fn test_all_themes_have_distinct_names() {
        let names: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "duplicate theme names found");
    }
}
