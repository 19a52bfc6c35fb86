use std::ops::RangeInclusive;

use crate::domain::{format_number, TemperatureRecord};
use crate::scales::Rgb;

/// Temperatures whose ramp color reads well on a see-through panel.
pub const CONTRAST_RANGE: RangeInclusive<f64> = 3.0..=13.0;

/// Panel offset from the pointer, in CSS pixels.
pub const POINTER_OFFSET: (f64, f64) = (10.0, -28.0);

/// Inline styles applied to a cell while the pointer is over it.
pub const HIGHLIGHT_STYLE: [(&str, &str); 2] = [("stroke", "black"), ("opacity", "1")];

/// Inline styles restored when the pointer leaves a cell.
pub const RESTING_STYLE: [(&str, &str); 1] = [("stroke", "none")];

pub const LINE_BREAK: &str = "<br />";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipBackground {
    Opaque,
    Transparent,
}

impl TooltipBackground {
    pub fn for_temperature(temperature: f64) -> Self {
        if CONTRAST_RANGE.contains(&temperature) {
            Self::Transparent
        } else {
            Self::Opaque
        }
    }

    pub const fn css(self) -> &'static str {
        match self {
            Self::Opaque => "white",
            Self::Transparent => "transparent",
        }
    }
}

/// What the floating panel shows for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub lines: [String; 3],
    /// Same as the cell's fill.
    pub color: Rgb,
    pub background: TooltipBackground,
    pub year: i32,
}

impl Tooltip {
    pub fn for_record(record: &TemperatureRecord, color: Rgb) -> Self {
        Self {
            lines: [
                format!("{} {}", record.month_name(), record.year),
                format!("{}\u{2103}", format_number(record.temperature)),
                format!("Variance: {}\u{2103}", format_number(record.variance)),
            ],
            color,
            background: TooltipBackground::for_temperature(record.temperature),
            year: record.year,
        }
    }

    pub fn markup(&self) -> String {
        self.lines.join(LINE_BREAK)
    }

    pub fn plain_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Page position of the panel for a pointer at `(x, y)`.
pub fn panel_position(pointer_x: f64, pointer_y: f64) -> (f64, f64) {
    (pointer_x + POINTER_OFFSET.0, pointer_y + POINTER_OFFSET.1)
}
