use serde::Serialize;

use crate::FloatingValue;

/// How floating point values are rendered, after C's `%f` and `%e`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatStyle {
    #[default]
    Fixed,
    Scientific,
}

impl FloatStyle {
    /// Single precision values are widened first, as C's variadic promotion does.
    pub fn render(self, value: impl Into<FloatingValue>) -> String {
        let d = value.into().widen();
        if !d.is_finite() {
            return render_non_finite(d);
        }
        match self {
            Self::Fixed => format!("{:.6}", d),
            Self::Scientific => render_scientific(d),
        }
    }
}

fn render_non_finite(d: f64) -> String {
    if d.is_nan() {
        "nan".to_string()
    } else if d.is_sign_negative() {
        "-inf".to_string()
    } else {
        "inf".to_string()
    }
}

// rust prints `3.141590e0`, C prints `3.141590e+00`
fn render_scientific(d: f64) -> String {
    let rust = format!("{:.6e}", d);
    let (mantissa, exponent) = rust.split_once('e').unwrap_or((rust.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
