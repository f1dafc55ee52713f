use chrono::{Datelike, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date. Anything else (including an empty string) is `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Signed number of days from `a` to `b`.
///
/// `NaiveDate` carries no time of day and no zone, so every date is an exact
/// midnight and the result is always a whole number.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> f64 {
    b.signed_duration_since(a).num_days() as f64
}

/// `"YYYY-MM"`, zero padded.
pub fn year_month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    next_month_start(date)?.pred_opt()
}

pub fn days_in_month(date: NaiveDate) -> Option<u32> {
    let start = month_start(date)?;
    let next = next_month_start(date)?;
    Some(next.signed_duration_since(start).num_days() as u32)
}

pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

pub fn is_year_end(date: NaiveDate) -> bool {
    date.month() == 12 && date.day() == 31
}

/// Moves `date` onto `reference_year`, keeping month and day.
///
/// Feb 29 only survives on a leap reference year; elsewhere it yields `None`.
pub fn to_reference_year(date: NaiveDate, reference_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(reference_year, date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-10"), NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(parse_date(" 2024-03-10 "), NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("10/03/2024"), None);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d("2024-01-01"), d("2024-02-15")), 45.0);
        assert_eq!(days_between(d("2024-02-15"), d("2024-01-01")), -45.0);
        // Crosses the March DST switch in most zones; still whole days.
        assert_eq!(days_between(d("2024-03-30"), d("2024-04-01")), 2.0);
    }

    #[test]
    fn test_year_month_key() {
        assert_eq!(year_month_key(d("2024-01-31")), "2024-01");
        assert_eq!(year_month_key(d("2025-11-02")), "2025-11");
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(month_start(d("2024-02-15")), Some(d("2024-02-01")));
        assert_eq!(next_month_start(d("2024-12-15")), Some(d("2025-01-01")));
        assert_eq!(month_end(d("2024-02-03")), Some(d("2024-02-29")));
        assert_eq!(days_in_month(d("2023-02-10")), Some(28));
        assert_eq!(days_in_month(d("2024-02-10")), Some(29));
        assert_eq!(days_in_month(d("2024-12-31")), Some(31));
    }

    #[test]
    fn test_reference_year() {
        assert_eq!(to_reference_year(d("2024-02-29"), 2000), Some(d("2000-02-29")));
        assert_eq!(to_reference_year(d("2024-02-29"), 2001), None);
        assert!(is_year_end(d("2023-12-31")));
        assert!(!is_year_end(d("2023-12-30")));
    }
}
