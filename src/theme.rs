//! Color palette, icons and tmux markup helpers
//!
//! All styling goes through `fg`/`fg_bold`/`bg`, which emit tmux-style
//! `#[fg=…]` / `#[bg=…]` directives followed by a reset back to the main
//! palette. Hex values mirror the 256-color terminal palette the status
//! bar was designed against.

/// Semantic color identifiers for the status bar palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    MainBg,
    MainFg,
    SpecBg,
    SpecFg,
    TempCool,
    TempNormal,
    TempHot,
    BatFull,
    BatCharging,
    BatDischargingHigh,
    BatDischargingMed,
    BatDischargingLow,
    BatEmpty,
    Whoami,
    Hostname,
}

impl Palette {
    /// Hex value understood by tmux
    pub fn hex(self) -> &'static str {
        match self {
            Palette::MainBg => "#626262",             // colour241
            Palette::MainFg => "#121212",             // colour233
            Palette::SpecBg => "#1c1c1c",             // colour234
            Palette::SpecFg => "#af875f",             // colour137
            Palette::TempCool => "#0000ff",           // colour021
            Palette::TempNormal => "#121212",         // colour233
            Palette::TempHot => "#ff0000",            // colour196
            Palette::BatFull => "#005fff",            // colour027
            Palette::BatCharging => "#005fff",        // same as BatFull
            Palette::BatDischargingHigh => "#00af00", // colour034
            Palette::BatDischargingMed => "#d7af00",  // colour178
            Palette::BatDischargingLow => "#ff0000",  // colour196
            Palette::BatEmpty => "#444444",           // colour238
            Palette::Whoami => "#870087",             // colour090
            Palette::Hostname => "#870087",           // same as Whoami
        }
    }
}

/// Reset sequence appended after every colored span
pub const RESET: &str = "#[bg=#626262]#[fg=#121212,none]";

pub const ICON_CPU: &str = "c";
pub const ICON_RAM: &str = "r";
pub const ICON_TEMP: &str = "🌡";
pub const ICON_BAT_FULL: &str = "⚡";
pub const ICON_BAT_EMPTY: &str = "!";

/// Wrap `s` in a foreground color
pub fn fg(color: Palette, s: &str) -> String {
    format!("#[fg={}]{}{}", color.hex(), s, RESET)
}

/// Wrap `s` in a bold foreground color
pub fn fg_bold(color: Palette, s: &str) -> String {
    format!("#[fg={},bold]{}{}", color.hex(), s, RESET)
}

/// Wrap `s` in a background color
pub fn bg(color: Palette, s: &str) -> String {
    format!("#[bg={}]{}{}", color.hex(), s, RESET)
}

/// Column separator between status-line blocks
pub fn column() -> String {
    bg(Palette::SpecBg, " ")
}
