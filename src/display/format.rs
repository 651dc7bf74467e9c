//! Currency, date and phone formatting.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "CAD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
  #[default]
  #[serde(rename = "en-US")]
  EnUs,
  #[serde(rename = "en-CA")]
  EnCa,
}

impl Locale {
  fn currency_symbol(self, code: &str) -> Option<&'static str> {
    let symbol = match (self, code) {
      (Self::EnUs, "USD") => "$",
      (Self::EnUs, "CAD") => "CA$",
      (Self::EnUs, "AUD") => "A$",
      (Self::EnUs, "JPY") => "¥",
      (Self::EnUs, "CNY") => "CN¥",
      (Self::EnCa, "CAD") => "$",
      (Self::EnCa, "USD") => "US$",
      (Self::EnCa, "AUD") => "A$",
      (Self::EnCa, "JPY") => "JP¥",
      (Self::EnCa, "CNY") => "CN¥",
      (_, "EUR") => "€",
      (_, "GBP") => "£",
      (_, "INR") => "₹",
      (_, "MXN") => "MX$",
      _ => return None,
    };
    Some(symbol)
  }
}

/// Digits after the decimal point a currency is normally shown with.
fn currency_digits(code: &str) -> u8 {
  match code {
    "JPY" | "KRW" | "CLP" | "VND" | "ISK" => 0,
    _ => 2,
  }
}

/// Fraction digit bounds above this are clamped.
const MAX_FRACTION_DIGITS: u8 = 20;

/// Number format options for currency amounts.
///
/// Unset fraction digit bounds fall back to the currency's own precision,
/// and the maximum never drops below the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurrencyFormat {
  pub locale: Locale,
  pub minimum_fraction_digits: Option<u8>,
  pub maximum_fraction_digits: Option<u8>,
}

impl CurrencyFormat {
  pub fn new(locale: Locale) -> Self {
    Self {
      locale,
      ..Self::default()
    }
  }

  /// Whole units only, as chart axes show them.
  pub fn whole(locale: Locale) -> Self {
    Self::new(locale)
      .minimum_fraction_digits(0)
      .maximum_fraction_digits(0)
  }

  pub fn minimum_fraction_digits(mut self, digits: u8) -> Self {
    self.minimum_fraction_digits = Some(digits);
    self
  }

  pub fn maximum_fraction_digits(mut self, digits: u8) -> Self {
    self.maximum_fraction_digits = Some(digits);
    self
  }

  pub fn format(&self, amount: f64, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    let prefix = match self.locale.currency_symbol(&code) {
      Some(symbol) => symbol.to_string(),
      None => format!("{}\u{a0}", code),
    };

    if amount.is_nan() {
      return format!("{}NaN", prefix);
    }
    let sign = if amount.is_sign_negative() && amount != 0.0 {
      "-"
    } else {
      ""
    };
    if amount.is_infinite() {
      return format!("{}{}∞", sign, prefix);
    }

    let digits = currency_digits(&code);
    let min = self
      .minimum_fraction_digits
      .unwrap_or(digits)
      .min(MAX_FRACTION_DIGITS);
    let max = self
      .maximum_fraction_digits
      .unwrap_or_else(|| min.max(digits))
      .clamp(min, MAX_FRACTION_DIGITS);

    let scale = 10u128
      .checked_pow(u32::from(max))
      .unwrap_or(u128::MAX);
    let scaled = (amount.abs() * scale as f64).round() as u128;
    let whole = scaled / scale;
    let mut fraction = if max > 0 {
      format!("{:0width$}", scaled % scale, width = usize::from(max))
    } else {
      String::new()
    };
    while fraction.len() > usize::from(min) && fraction.ends_with('0') {
      fraction.pop();
    }

    let mut out = format!("{}{}{}", sign, prefix, group_thousands(whole));
    if !fraction.is_empty() {
      out.push('.');
      out.push_str(&fraction);
    }
    out
  }
}

fn group_thousands(value: u128) -> String {
  let digits = value.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

/// Format an amount the way entity tables show it.
///
/// A missing currency means CAD.
pub fn format_currency(amount: f64, currency: Option<&str>) -> String {
  CurrencyFormat::new(Locale::EnUs).format(amount, currency.unwrap_or(DEFAULT_CURRENCY))
}

/// Parse an ISO date or date-time into its calendar date.
///
/// Date-times keep the calendar date of their own offset.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
  let value = value.trim();
  if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
    return Some(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Some(dt.date_naive());
  }
  for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
      return Some(dt.date());
    }
  }
  // Postgres text form of timestamptz: "2024-01-15 10:30:00+00"
  DateTime::parse_from_str(&format!("{}00", value), "%Y-%m-%d %H:%M:%S%.f%z")
    .ok()
    .map(|dt| dt.date_naive())
}

pub fn format_date(value: &str, locale: Locale) -> String {
  match parse_date(value) {
    Some(date) => match locale {
      Locale::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
      Locale::EnCa => date.format("%Y-%m-%d").to_string(),
    },
    None => "Invalid Date".to_string(),
  }
}

/// An invoice is overdue when its due date has passed and it is neither
/// paid nor cancelled. An unreadable due date is never overdue.
pub fn is_overdue(status: Option<&str>, due_date: &str, today: NaiveDate) -> bool {
  if matches!(status, Some("Paid") | Some("Cancelled")) {
    return false;
  }
  parse_date(due_date).is_some_and(|due| due < today)
}

/// Normalize North American numbers to `+1 (AAA) BBB-CCCC`.
///
/// Anything that is not 10 digits, or 11 digits with a leading 1, comes
/// back unchanged.
pub fn format_phone(phone: &str) -> String {
  let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
  let local = match digits.len() {
    11 if digits.starts_with('1') => &digits[1..],
    10 => digits.as_str(),
    _ => return phone.to_string(),
  };
  format!("+1 ({}) {}-{}", &local[..3], &local[3..6], &local[6..])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_group_thousands() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1,000");
    assert_eq!(group_thousands(1234567), "1,234,567");
  }

  #[test]
  fn test_parse_date_variants() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
    assert_eq!(parse_date("2024-01-15"), expected);
    assert_eq!(parse_date("2024-01-15T10:30:00Z"), expected);
    assert_eq!(parse_date("2024-01-15T10:30:00.123456+00:00"), expected);
    assert_eq!(parse_date("2024-01-15T10:30:00"), expected);
    assert_eq!(parse_date("2024-01-15 10:30:00+00"), expected);
    assert_eq!(parse_date("not a date"), None);
    assert_eq!(parse_date(""), None);
  }
}
