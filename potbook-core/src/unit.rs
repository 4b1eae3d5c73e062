use crate::Currency;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// The scale an amount was entered in. Stacks and contributions are always whole chips; only
/// the operator-facing amounts carry a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "actual")]
    Actual,
    K,
    Mil,
}

impl Unit {
    pub const fn scale(&self) -> f64 {
        match self {
            Unit::Actual => 1.0,
            Unit::K => 1_000.0,
            Unit::Mil => 1_000_000.0,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::K
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Actual => write!(f, "actual"),
            Unit::K => write!(f, "K"),
            Unit::Mil => write!(f, "Mil"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actual" => Ok(Unit::Actual),
            "k" => Ok(Unit::K),
            "mil" | "m" => Ok(Unit::Mil),
            _ => Err(format!("Unknown unit: {s}")),
        }
    }
}

/// Converts an operator-entered amount into chips.
///
/// With no unit, amounts under 1000 are read as thousands and anything larger is taken to be
/// chips already.
pub fn to_actual(amount: f64, unit: Option<Unit>) -> Currency {
    if !amount.is_finite() {
        return 0;
    }
    let chips = match unit {
        Some(u) => amount * u.scale(),
        None if amount < 1000.0 => amount * Unit::K.scale(),
        None => amount,
    };
    chips.round() as Currency
}

pub fn to_display(actual: Currency, unit: Unit) -> f64 {
    actual as f64 / unit.scale()
}

pub fn pick_unit(actual: Currency) -> Unit {
    if actual >= 1_000_000 {
        Unit::Mil
    } else if actual >= 1_000 {
        Unit::K
    } else {
        Unit::Actual
    }
}

/// Never fails: anything that isn't a number is 0.
pub fn parse_amount(s: &str) -> f64 {
    s.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn with_commas(v: Currency) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_chips(actual: Currency, unit: Unit) -> String {
    match unit {
        Unit::K => format!("{:.1}K", to_display(actual, Unit::K)),
        Unit::Mil => format!("{:.2}M", to_display(actual, Unit::Mil)),
        Unit::Actual => with_commas(actual),
    }
}

pub fn format_stack(stack: Currency, preferred: Unit) -> String {
    if preferred == Unit::Actual {
        return format_chips(stack, Unit::Actual);
    }
    format_chips(stack, pick_unit(stack))
}

/// Amounts arrive as numbers or as whatever the operator typed.
pub(crate) fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        None => None,
        Some(Raw::Num(v)) => Some(v),
        Some(Raw::Text(s)) if s.trim().is_empty() => None,
        Some(Raw::Text(s)) => Some(parse_amount(&s)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_units() {
        assert_eq!(to_actual(2.5, Some(Unit::K)), 2500);
        assert_eq!(to_actual(1.25, Some(Unit::Mil)), 1_250_000);
        assert_eq!(to_actual(750.0, Some(Unit::Actual)), 750);
    }

    #[test]
    fn missing_unit_guesses_scale() {
        assert_eq!(to_actual(3.0, None), 3000);
        assert_eq!(to_actual(999.0, None), 999_000);
        assert_eq!(to_actual(1000.0, None), 1000);
        assert_eq!(to_actual(45_000.0, None), 45_000);
        assert_eq!(to_actual(f64::NAN, None), 0);
    }

    #[test]
    fn display_is_inverse() {
        assert_eq!(to_display(2500, Unit::K), 2.5);
        assert_eq!(to_display(2_000_000, Unit::Mil), 2.0);
        assert_eq!(to_display(12, Unit::Actual), 12.0);
    }

    #[test]
    fn appropriate_unit() {
        assert_eq!(pick_unit(999), Unit::Actual);
        assert_eq!(pick_unit(1000), Unit::K);
        assert_eq!(pick_unit(999_999), Unit::K);
        assert_eq!(pick_unit(1_000_000), Unit::Mil);
    }

    #[test]
    fn garbage_parses_to_zero() {
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount(" 1,500 "), 1500.0);
        assert_eq!(parse_amount("2.5"), 2.5);
    }

    #[test]
    fn chip_formatting() {
        assert_eq!(with_commas(0), "0");
        assert_eq!(with_commas(999), "999");
        assert_eq!(with_commas(1000), "1,000");
        assert_eq!(with_commas(-1_234_567), "-1,234,567");
        assert_eq!(format_chips(2500, Unit::K), "2.5K");
        assert_eq!(format_chips(1_250_000, Unit::Mil), "1.25M");
        assert_eq!(format_chips(48_000, Unit::Actual), "48,000");
        assert_eq!(format_stack(48_000, Unit::K), "48.0K");
        assert_eq!(format_stack(48_000, Unit::Actual), "48,000");
        assert_eq!(format_stack(300, Unit::K), "300");
    }

    #[test]
    fn unit_strings() {
        assert_eq!("actual".parse::<Unit>().unwrap(), Unit::Actual);
        assert_eq!("Mil".parse::<Unit>().unwrap(), Unit::Mil);
        assert!("bananas".parse::<Unit>().is_err());
        assert_eq!(serde_json::to_string(&Unit::Actual).unwrap(), "\"actual\"");
        assert_eq!(Unit::K.to_string(), "K");
    }
}
