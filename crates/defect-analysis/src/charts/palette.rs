//! Colour ramps for the charts.

use plotters::style::RGBColor;
use plotters::style::colors::colormaps::ViridisRGB;

type Stop = (f64, (u8, u8, u8));

const YELLOW_ORANGE_RED: [Stop; 5] = [
    (0.0, (255, 255, 204)),
    (0.25, (254, 217, 118)),
    (0.5, (253, 141, 60)),
    (0.75, (227, 26, 28)),
    (1.0, (128, 0, 38)),
];

pub const BAR_BLUE: RGBColor = RGBColor(31, 119, 180);

/// Viridis colour at `t` in [0, 1].
pub fn viridis(t: f64) -> RGBColor {
    ViridisRGB::get_color(unit(t))
}

/// Yellow-orange-red colour at `t` in [0, 1].
pub fn yellow_orange_red(t: f64) -> RGBColor {
    sample(&YELLOW_ORANGE_RED, t)
}

/// `i`-th of `n` evenly spaced viridis colours.
pub fn viridis_step(i: usize, n: usize) -> RGBColor {
    if n <= 1 {
        return viridis(0.5);
    }
    viridis(i as f64 / (n - 1) as f64)
}

/// Clamp to [0, 1]; NaN maps to 0.
fn unit(t: f64) -> f64 {
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

fn sample(stops: &[Stop], t: f64) -> RGBColor {
    let t = unit(t);

    for pair in stops.windows(2) {
        let (start, from) = pair[0];
        let (end, to) = pair[1];
        if t <= end {
            let local = if end > start { (t - start) / (end - start) } else { 0.0 };
            return RGBColor(
                lerp(from.0, to.0, local),
                lerp(from.1, to.1, local),
                lerp(from.2, to.2, local),
            );
        }
    }

    let (_, last) = stops[stops.len() - 1];
    RGBColor(last.0, last.1, last.2)
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}
