/// Axis with fixed limits, tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis on exactly `[min, max]` with "nice number" ticks inside it.
    pub fn linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let mut axis = Self::fixed(min, max);
        if !(min.is_finite() && max.is_finite() && max > min) {
            return axis;
        }
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        for k in index_span(min, max, step) {
            let v = k as f64 * step;
            axis.tick_positions.push(v);
            axis.tick_labels.push(format_tick(v, step));
        }

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        axis.minor_ticks = index_span(min, max, minor_step)
            .filter(|k| k % 5 != 0)
            .map(|k| k as f64 * minor_step)
            .collect();
        axis
    }

    /// Logarithmic axis on exactly `[min, max]`; requires `0 < min < max`.
    ///
    /// Decades are labelled; when fewer than two decades fall inside the
    /// range the 1-2-5 multiples are labelled instead.
    pub fn log(min: f64, max: f64) -> Self {
        let mut axis = Self { log: true, ..Self::fixed(min, max) };
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
            return axis;
        }
        let lo = min.log10().floor() as i32;
        let hi = max.log10().ceil() as i32;
        let inside = |v: f64| v >= min * (1.0 - 1e-9) && v <= max * (1.0 + 1e-9);

        let candidates: Vec<(i32, u32, f64)> = (lo..=hi)
            .flat_map(|exp| (1..=9).map(move |m| (exp, m, m as f64 * 10f64.powi(exp))))
            .filter(|&(_, _, v)| inside(v))
            .collect();
        let decades = candidates.iter().filter(|c| c.1 == 1).count();

        for (exp, m, v) in candidates {
            let major = if decades >= 2 { m == 1 } else { matches!(m, 1 | 2 | 5) };
            if major {
                axis.tick_positions.push(v);
                axis.tick_labels.push(if m == 1 && decades >= 2 {
                    decade_label(exp)
                } else {
                    format_plain(v)
                });
            } else {
                axis.minor_ticks.push(v);
            }
        }
        axis
    }

    /// Fixed axis with explicit limits (no tick auto-generation).
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            log: false,
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        }
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let log_val = value.max(1e-300).ln();
            let log_min = self.min.max(1e-300).ln();
            let log_max = self.max.max(1e-300).ln();
            (log_val - log_min) / (log_max - log_min)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }
}

/// Integer multiples of `step` inside `[min, max]`.
fn index_span(min: f64, max: f64, step: f64) -> std::ops::RangeInclusive<i64> {
    let start = (min / step - 1e-9).ceil() as i64;
    let end = (max / step + 1e-9).floor() as i64;
    start..=end
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 { format!("{}", v.round() as i64) } else { format!("{v:.decimals$}") }
}

fn format_plain(value: f64) -> String {
    let s = format!("{value:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn decade_label(exp: i32) -> String {
    match exp {
        0 => "1".into(),
        1 => "10".into(),
        _ => format!("10{}", superscript(exp)),
    }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}
