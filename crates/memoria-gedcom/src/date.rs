//! GEDCOM date normalisation.
//!
//! GEDCOM dates are free-ish text with optional qualifier prefixes
//! (`ABT 1920`, `BEF 12 MAR 1851`). Qualifiers are stripped, then three
//! shapes are tried in order. Partial dates round down: `MON YYYY` becomes
//! the 1st of the month and a bare `YYYY` becomes January 1st — a precision
//! convention, not a real day-of-month fact.

use chrono::NaiveDate;

/// Qualifier tokens that may prefix a date value.
const QUALIFIERS: &[&str] = &[
  "ABT", "BEF", "AFT", "CAL", "EST", "FROM", "TO", "BET", "AND",
];

fn month_number(abbrev: &str) -> Option<u32> {
  let n = match abbrev.to_ascii_uppercase().as_str() {
    "JAN" => 1,
    "FEB" => 2,
    "MAR" => 3,
    "APR" => 4,
    "MAY" => 5,
    "JUN" => 6,
    "JUL" => 7,
    "AUG" => 8,
    "SEP" => 9,
    "OCT" => 10,
    "NOV" => 11,
    "DEC" => 12,
    _ => return None,
  };
  Some(n)
}

fn parse_year(token: &str) -> Option<i32> {
  if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
    token.parse().ok()
  } else {
    None
  }
}

fn parse_day(token: &str) -> Option<u32> {
  if (1..=2).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_digit())
  {
    token.parse().ok()
  } else {
    None
  }
}

/// Normalise a GEDCOM date value to a calendar date, or `None` when the
/// shape is not one of `DD MON YYYY`, `MON YYYY`, `YYYY`.
///
/// Unparseable dates never raise an error anywhere in the pipeline; an
/// import simply proceeds without that date.
pub fn normalize_date(value: &str) -> Option<NaiveDate> {
  let mut tokens: Vec<&str> = value.split_whitespace().collect();

  // Strip leading qualifiers (`ABT`, `BEF`, …).
  while let Some(first) = tokens.first() {
    if QUALIFIERS.iter().any(|q| first.eq_ignore_ascii_case(q)) {
      tokens.remove(0);
    } else {
      break;
    }
  }

  match tokens.as_slice() {
    [day, mon, year] => {
      let d = parse_day(day)?;
      let m = month_number(mon)?;
      let y = parse_year(year)?;
      NaiveDate::from_ymd_opt(y, m, d)
    }
    [mon, year] => {
      let m = month_number(mon)?;
      let y = parse_year(year)?;
      NaiveDate::from_ymd_opt(y, m, 1)
    }
    [year] => {
      let y = parse_year(year)?;
      NaiveDate::from_ymd_opt(y, 1, 1)
    }
    _ => None,
  }
}
