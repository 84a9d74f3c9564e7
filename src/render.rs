//! Fragment rendering
//!
//! Pure mapping from metric values to styled status-line fragments. No I/O,
//! no suspension; the updater calls these once per tick and the results are
//! cached verbatim.

use chrono::{DateTime, Local};

use crate::metrics::{BatteryReading, BatteryStatus};
use crate::theme::{self, Palette, ICON_BAT_EMPTY, ICON_BAT_FULL, ICON_CPU, ICON_RAM, ICON_TEMP};

/// Per-segment charge thresholds for the battery bar. Segment k switches to
/// the empty color once the value drops below its threshold, which drains
/// the bar visually from left to right.
const SEGMENT_THRESHOLDS: [u32; 8] = [95, 80, 70, 60, 50, 40, 20, 10];

pub fn cpu(percent: f64) -> String {
    format!(
        "{}: {}%",
        ICON_CPU,
        theme::fg_bold(Palette::MainFg, &format!("{percent:.0}"))
    )
}

pub fn ram(percent: f64) -> String {
    format!(
        "{}: {}%",
        ICON_RAM,
        theme::fg_bold(Palette::MainFg, &format!("{percent:.0}"))
    )
}

/// Three-tier temperature coloring: cool up to 50°C, hot from 75°C
pub fn temperature(degrees: i64) -> String {
    let color = if degrees <= 50 {
        Palette::TempCool
    } else if degrees >= 75 {
        Palette::TempHot
    } else {
        Palette::TempNormal
    };

    format!(
        "{}: {}°c",
        theme::fg(color, ICON_TEMP),
        theme::fg_bold(color, &degrees.to_string())
    )
}

/// Eight-segment battery bar: `⏹ <icon>NNN% ` with the base color picked by
/// charge status and each segment independently dimmed by the threshold
/// ladder. Segment 0 is foreground-colored over the spec background, the
/// rest are background-colored.
pub fn battery(reading: &BatteryReading) -> String {
    let val = reading.percent.clamp(0.0, 100.0).round() as u32;

    let (base, icon) = match reading.status {
        BatteryStatus::Full | BatteryStatus::Unknown => (Palette::BatFull, ICON_BAT_FULL),
        BatteryStatus::Charging => (Palette::BatCharging, ICON_BAT_FULL),
        BatteryStatus::Discharging if val > 50 => (Palette::BatDischargingHigh, " "),
        BatteryStatus::Discharging if val > 20 => (Palette::BatDischargingMed, " "),
        BatteryStatus::Discharging => (Palette::BatDischargingLow, ICON_BAT_EMPTY),
    };

    let empty = empty_segments(val);
    let value = format!("{val:>3}");
    let mut digits = value.chars();
    let d0 = digits.next().unwrap_or(' ').to_string();
    let d1 = digits.next().unwrap_or(' ').to_string();
    let d2 = digits.next().unwrap_or(' ').to_string();

    let seg0_color = if empty[0] { Palette::BatEmpty } else { base };
    let mut bar = theme::bg(Palette::SpecBg, &theme::fg(seg0_color, "⏹"));

    let cells: [&str; 7] = [" ", icon, &d0, &d1, &d2, "%", " "];
    for (cell, is_empty) in cells.iter().copied().zip(empty[1..].iter().copied()) {
        let color = if is_empty { Palette::BatEmpty } else { base };
        bar.push_str(&theme::bg(color, cell));
    }

    bar
}

/// Which battery segments show the empty color for a given charge value
pub(crate) fn empty_segments(val: u32) -> [bool; 8] {
    let mut empty = [false; 8];
    for (slot, threshold) in empty.iter_mut().zip(SEGMENT_THRESHOLDS.iter()) {
        *slot = val < *threshold;
    }
    empty
}

/// `DD/MM HH:mm:ss`, 24-hour local time
pub fn clock(now: DateTime<Local>) -> String {
    now.format("%d/%m %H:%M:%S").to_string()
}

pub fn hostname(name: &str) -> String {
    theme::fg(Palette::Hostname, name)
}

pub fn identity(whoami: &str) -> String {
    theme::fg(Palette::Whoami, whoami)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(status: BatteryStatus, percent: f64) -> BatteryReading {
        BatteryReading { status, percent }
    }

    #[test]
    fn test_cpu_and_ram_fragments() {
        let cpu = cpu(42.4);
        assert!(cpu.starts_with("c: "));
        assert!(cpu.contains("#[fg=#121212,bold]42"));
        assert!(cpu.ends_with('%'));

        let ram = ram(99.6);
        assert!(ram.starts_with("r: "));
        assert!(ram.contains("100"));
    }

    #[test]
    fn test_temperature_tiers() {
        // boundaries are part of the contract: 50 is still cool, 75 already hot
        assert!(temperature(50).contains(Palette::TempCool.hex()));
        assert!(temperature(51).contains(Palette::TempNormal.hex()));
        assert!(temperature(74).contains(Palette::TempNormal.hex()));
        assert!(temperature(75).contains(Palette::TempHot.hex()));
        assert!(temperature(-3).contains(Palette::TempCool.hex()));
    }

    #[test]
    fn test_temperature_suffix() {
        assert!(temperature(60).ends_with("°c"));
    }

    #[test]
    fn test_empty_segment_ladder() {
        assert_eq!(empty_segments(100), [false; 8]);
        assert_eq!(
            empty_segments(94),
            [true, false, false, false, false, false, false, false]
        );
        assert_eq!(
            empty_segments(55),
            [true, true, true, true, false, false, false, false]
        );
        assert_eq!(
            empty_segments(10),
            [true, true, true, true, true, true, true, false]
        );
        assert_eq!(empty_segments(9), [true; 8]);
    }

    #[test]
    fn test_battery_full_bar_exact() {
        let cells = ["1", "0", "0", "%", " "];
        let mut expected = theme::bg(
            Palette::SpecBg,
            &theme::fg(Palette::BatFull, "⏹"),
        );
        expected.push_str(&theme::bg(Palette::BatFull, " "));
        expected.push_str(&theme::bg(Palette::BatFull, ICON_BAT_FULL));
        for cell in cells {
            expected.push_str(&theme::bg(Palette::BatFull, cell));
        }
        assert_eq!(battery(&reading(BatteryStatus::Full, 100.0)), expected);
    }

    #[test]
    fn test_battery_low_bar_pads_value_to_three_chars() {
        // 5% full-status: value renders as "  5", every segment empty-colored
        let cells = [" ", ICON_BAT_FULL, " ", " ", "5", "%", " "];
        let mut expected = theme::bg(
            Palette::SpecBg,
            &theme::fg(Palette::BatEmpty, "⏹"),
        );
        for cell in cells {
            expected.push_str(&theme::bg(Palette::BatEmpty, cell));
        }
        assert_eq!(battery(&reading(BatteryStatus::Full, 5.0)), expected);
    }

    #[test]
    fn test_battery_clamps_out_of_range() {
        assert_eq!(
            battery(&reading(BatteryStatus::Full, 140.0)),
            battery(&reading(BatteryStatus::Full, 100.0))
        );
        assert_eq!(
            battery(&reading(BatteryStatus::Discharging, -7.0)),
            battery(&reading(BatteryStatus::Discharging, 0.0))
        );
    }

    #[test]
    fn test_battery_discharging_tiers() {
        let high = battery(&reading(BatteryStatus::Discharging, 80.0));
        assert!(high.contains(Palette::BatDischargingHigh.hex()));

        let med = battery(&reading(BatteryStatus::Discharging, 40.0));
        assert!(med.contains(Palette::BatDischargingMed.hex()));

        let low = battery(&reading(BatteryStatus::Discharging, 15.0));
        assert!(low.contains(Palette::BatDischargingLow.hex()));
        assert!(low.contains(ICON_BAT_EMPTY));
    }

    #[test]
    fn test_battery_full_keeps_bolt_icon() {
        let bar = battery(&reading(BatteryStatus::Full, 100.0));
        assert!(bar.contains(ICON_BAT_FULL));
        assert!(bar.contains(Palette::BatFull.hex()));
        // a full bar shows no empty segments at all
        assert!(!bar.contains(Palette::BatEmpty.hex()));
    }

    #[test]
    fn test_battery_unknown_status_renders_as_full() {
        let bar = battery(&reading(BatteryStatus::Unknown, 60.0));
        assert!(bar.contains(ICON_BAT_FULL));
        assert!(bar.contains(Palette::BatFull.hex()));
    }

    #[test]
    fn test_clock_format() {
        let t = Local.with_ymd_and_hms(2026, 3, 5, 9, 8, 7).unwrap();
        assert_eq!(clock(t), "05/03 09:08:07");
    }

    #[test]
    fn test_hostname_and_identity_accent() {
        assert!(hostname("workbench").contains(Palette::Hostname.hex()));
        assert!(identity("alice").contains(Palette::Whoami.hex()));
    }
}
