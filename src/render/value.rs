//! Canonical string forms of cell values.

use super::ValueStyle;
use crate::model::{CellValue, DateSystem};

/// First serial past 9999-12-31 in the 1900 date system.
const MAX_SERIAL: f64 = 2_958_466.0;

/// Render a cell value as the text written to the output file.
///
/// `dates` is the epoch of `DateTime` serials. Compat output writes the serial
/// as stored; plain output converts it to a calendar date.
pub fn render_value(value: &CellValue, style: ValueStyle, dates: DateSystem) -> String {
    match (value, style) {
        (CellValue::Empty, _) => String::new(),
        (CellValue::Text(s), _) => s.clone(),

        (CellValue::Number(n), ValueStyle::Compat) => float_repr(*n),
        (CellValue::Bool(b), ValueStyle::Compat) => u8::from(*b).to_string(),
        (CellValue::DateTime(serial), ValueStyle::Compat) => float_repr(*serial),
        (CellValue::Error(e), ValueStyle::Compat) => e.code().to_string(),

        (CellValue::Number(n), ValueStyle::Plain) => plain_number(*n),
        (CellValue::Bool(true), ValueStyle::Plain) => "TRUE".to_string(),
        (CellValue::Bool(false), ValueStyle::Plain) => "FALSE".to_string(),
        (CellValue::DateTime(serial), ValueStyle::Plain) => {
            serial_to_iso(dates.to_1900_serial(*serial)).unwrap_or_else(|| plain_number(*serial))
        }
        (CellValue::Error(e), ValueStyle::Plain) => e.text().to_string(),
    }
}

/// Shortest round-trip float text with a mandatory fractional part.
///
/// Integral values keep a trailing `.0`; magnitudes below 1e-4 or at least
/// 1e16 switch to scientific notation with a signed, two-digit exponent
/// (`1e+16`, `2.5e-07`).
pub fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e3"
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exp) {
        fixed_notation(&digits, exp)
    } else {
        scientific_notation(&digits, exp)
    };

    if x.is_sign_negative() {
        format!("-{}", body)
    } else {
        body
    }
}

fn fixed_notation(digits: &str, exp: i32) -> String {
    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return format!("0.{}{}", zeros, digits);
    }

    let point = exp as usize + 1;
    if digits.len() <= point {
        format!("{}{}.0", digits, "0".repeat(point - digits.len()))
    } else {
        format!("{}.{}", &digits[..point], &digits[point..])
    }
}

fn scientific_notation(digits: &str, exp: i32) -> String {
    let (first, rest) = digits.split_at(1);
    let mantissa = if rest.is_empty() {
        first.to_string()
    } else {
        format!("{}.{}", first, rest)
    };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

/// Integers without a decimal point, everything else as shortest decimal.
fn plain_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        return format!("{}", x as i64);
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && x.is_finite() && !(1e-4..1e16).contains(&magnitude) {
        return format!("{:e}", x);
    }
    format!("{}", x)
}

/// Convert an Excel serial date to ISO 8601.
///
/// Returns a date (`2021-01-01`) or a date-time (`2021-01-01T12:00:00`) when
/// the serial has a time part. Serials before 1900-01-01 or past 9999 have
/// no calendar date.
pub fn serial_to_iso(serial: f64) -> Option<String> {
    if !(1.0..MAX_SERIAL).contains(&serial) {
        return None;
    }

    let total_seconds = (serial * 86_400.0).round() as i64;
    let days = total_seconds / 86_400;
    let seconds = total_seconds % 86_400;

    // Serial 60 is the 1900-02-29 that the 1900 date system invents
    let (year, month, day) = match days {
        60 => (1900, 2, 29),
        d if d > 60 => days_to_ymd(d - 1)?,
        d => days_to_ymd(d)?,
    };

    if seconds == 0 {
        return Some(format!("{:04}-{:02}-{:02}", year, month, day));
    }

    Some(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    ))
}

/// Convert days since 1899-12-31 to (year, month, day).
fn days_to_ymd(days: i64) -> Option<(i32, u32, u32)> {
    if days < 1 {
        return None;
    }

    let mut year = 1900;
    let mut remaining_days = days;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days <= days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let months_days = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for &days_in_month in &months_days {
        if remaining_days <= days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    Some((year, month, remaining_days as u32))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
