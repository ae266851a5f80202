//! Calendar-day enumeration for zero-filling sparse per-day aggregates.

use chrono::{Datelike, NaiveDate};

/// Every calendar date of `year` as ISO `yyyy-MM-dd` strings, ascending,
/// both endpoints inclusive (365 entries, 366 in a leap year).
///
/// Years chrono cannot represent yield an empty list.
#[must_use]
pub fn days_in_year(year: i32) -> Vec<String> {
    let mut days = Vec::with_capacity(366);
    let Some(mut day) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return days;
    };
    while day.year() == year {
        days.push(day.format("%Y-%m-%d").to_string());
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::days_in_year;

    #[test]
    fn common_year_has_365_days() {
        let days = days_in_year(2023);
        assert_eq!(days.len(), 365);
        assert_eq!(days.first().map(String::as_str), Some("2023-01-01"));
        assert_eq!(days.last().map(String::as_str), Some("2023-12-31"));
    }

    #[test]
    fn leap_year_has_366_days() {
        let days = days_in_year(2024);
        assert_eq!(days.len(), 366);
        assert!(days.contains(&"2024-02-29".to_string()));
    }

    #[test]
    fn days_are_strictly_ascending() {
        let days = days_in_year(2024);
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
