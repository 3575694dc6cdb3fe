//! Console palettes and per-value colors.

use crate::notifications::NotificationLevel;
use ratatui::style::Color;
use roster_core::{FieldType, Role};

/// Names accepted by `theme.name` in the configuration.
pub const THEME_NAMES: &[&str] = &["synthbrute", "mono"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthBruteTheme {
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    /// Look up a palette by its configured name, ignoring case.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "synthbrute" => Some(Self::synthbrute()),
            "mono" => Some(Self::mono()),
            _ => None,
        }
    }

    pub fn synthbrute() -> Self {
        Self {
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }

    /// Named ANSI colors only, for terminals without truecolor.
    pub fn mono() -> Self {
        Self {
            bg_highlight: Color::DarkGray,
            primary: Color::White,
            secondary: Color::Gray,
            tertiary: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::White,
            text: Color::White,
            text_dim: Color::Gray,
            border: Color::DarkGray,
            border_focus: Color::White,
        }
    }
}

pub fn role_color(role: Role, theme: &SynthBruteTheme) -> Color {
    match role {
        Role::Developer => theme.primary,
        Role::Designer => theme.secondary,
        Role::Manager => theme.tertiary,
    }
}

/// Upload-backed types share one color.
pub fn field_type_color(field_type: FieldType, theme: &SynthBruteTheme) -> Color {
    match field_type {
        FieldType::Text | FieldType::Email | FieldType::Phone => theme.text,
        FieldType::Number | FieldType::Date => theme.primary,
        FieldType::Dropdown => theme.secondary,
        FieldType::Image | FieldType::File => theme.tertiary,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
