//! Shared chart aesthetics: palette, font sizes, figure dimensions.

use plotters::style::RGBColor;

/// Title font size.
pub const LARGE: i32 = 22;
/// Axis label and legend font size.
pub const MED: i32 = 16;
/// Tick label font size.
pub const SMALL: i32 = 12;

/// Raster resolution of every figure.
pub const DPI: u32 = 80;

/// 16x10 inch figure, the default for the scatter/strip charts.
pub const FIG_WIDE: (f64, f64) = (16.0, 10.0);
/// 13x10 inch figure, used by the box/violin/kde charts.
pub const FIG_TALL: (f64, f64) = (13.0, 10.0);
/// 14x14 inch figure, used by the distribution panel chart.
pub const FIG_SQUARE: (f64, f64) = (14.0, 14.0);

/// The matplotlib tab10 categorical palette.
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Grid line color.
pub const GRID: RGBColor = RGBColor(229, 229, 229);
/// Axis line color.
pub const AXIS: RGBColor = RGBColor(120, 120, 120);
/// Tick and axis text color.
pub const TEXT: RGBColor = RGBColor(60, 60, 60);

pub const DODGERBLUE: RGBColor = RGBColor(30, 144, 255);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
pub const GREEN: RGBColor = RGBColor(0, 128, 0);
pub const DEEPPINK: RGBColor = RGBColor(255, 20, 147);
pub const MAGENTA: RGBColor = RGBColor(191, 0, 191);
pub const BLUE: RGBColor = RGBColor(0, 0, 255);
pub const RED: RGBColor = RGBColor(255, 0, 0);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Series color for index `i`, cycling through tab10.
pub fn series_color(i: usize) -> RGBColor {
    TAB10[i % TAB10.len()]
}
