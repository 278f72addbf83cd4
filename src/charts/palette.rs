//! Colour scales shared by the interactive and the static charts.

/// Sequential magenta scale, light to dark.
pub const MAGENTA: [(u8, u8, u8); 7] = [
    (243, 203, 211),
    (234, 169, 189),
    (221, 136, 172),
    (202, 105, 157),
    (177, 77, 142),
    (145, 53, 125),
    (108, 33, 103),
];

/// Qualitative colour-blind safe palette for categories.
pub const SAFE: [(u8, u8, u8); 11] = [
    (136, 204, 238),
    (204, 102, 119),
    (221, 204, 119),
    (17, 119, 51),
    (51, 34, 136),
    (170, 68, 153),
    (68, 170, 153),
    (153, 153, 51),
    (136, 34, 85),
    (102, 17, 0),
    (136, 136, 136),
];

/// Interpolated magenta colour for `value` within `[min, max]`.
pub fn magenta(value: f64, min: f64, max: f64) -> (u8, u8, u8) {
    let t = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    interpolate(&MAGENTA, t)
}

/// Category colour by position in the category list.
pub fn category(index: usize) -> (u8, u8, u8) {
    SAFE[index % SAFE.len()]
}

fn interpolate(stops: &[(u8, u8, u8)], t: f64) -> (u8, u8, u8) {
    let last = stops.len() - 1;
    let pos = t * last as f64;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[lo], stops[hi]);
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Min and max of finite values, `None` when there are none.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
