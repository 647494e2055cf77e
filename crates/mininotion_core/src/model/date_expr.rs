//! Due date input expressions.
//!
//! Accepts `YYYY-MM-DD`, `today`, `tomorrow`, `yesterday` and day offsets
//! such as `+3d` or `-1d`, always relative to a caller-supplied `today`.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_OFFSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])(\d{1,5})d$").expect("valid day offset regex"));

/// Parses a due date expression relative to `today`.
pub fn parse_date_expr(input: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let value = input.trim().to_ascii_lowercase();
    match value.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return shift(today, '+', 1, input),
        "yesterday" => return shift(today, '-', 1, input),
        _ => {}
    }

    if let Some(caps) = DAY_OFFSET_RE.captures(&value) {
        let sign = if &caps[1] == "-" { '-' } else { '+' };
        let days = caps[2]
            .parse::<u64>()
            .map_err(|err| format!("invalid day offset `{input}`: {err}"))?;
        return shift(today, sign, days, input);
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        format!("invalid date `{input}`; expected YYYY-MM-DD, today, tomorrow, yesterday or +Nd/-Nd")
    })
}

fn shift(today: NaiveDate, sign: char, days: u64, input: &str) -> Result<NaiveDate, String> {
    let shifted = if sign == '-' {
        today.checked_sub_days(Days::new(days))
    } else {
        today.checked_add_days(Days::new(days))
    };
    shifted.ok_or_else(|| format!("date offset `{input}` is out of range"))
}

#[cfg(test)]
mod tests {
    use super::parse_date_expr;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_iso_dates() {
        let today = date(2026, 10, 19);
        assert_eq!(parse_date_expr("2026-12-31", today), Ok(date(2026, 12, 31)));
    }

    #[test]
    fn parses_relative_keywords_and_offsets() {
        let today = date(2026, 10, 31);
        assert_eq!(parse_date_expr("Today", today), Ok(today));
        assert_eq!(parse_date_expr("tomorrow", today), Ok(date(2026, 11, 1)));
        assert_eq!(parse_date_expr("yesterday", today), Ok(date(2026, 10, 30)));
        assert_eq!(parse_date_expr("+3d", today), Ok(date(2026, 11, 3)));
        assert_eq!(parse_date_expr("-31d", today), Ok(date(2026, 9, 30)));
    }

    #[test]
    fn rejects_garbage() {
        let today = date(2026, 10, 19);
        assert!(parse_date_expr("next week", today).is_err());
        assert!(parse_date_expr("2026-02-30", today).is_err());
        assert!(parse_date_expr("+d", today).is_err());
    }
}
