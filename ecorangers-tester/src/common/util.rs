use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use ecorangers_game::daily_challenge_level;

/// Parse a `YYYY-MM-DD` day, defaulting to today (UTC).
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    let Some(raw) = raw else {
        return Ok(Utc::now().date_naive());
    };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --date '{raw}', expected YYYY-MM-DD"))
}

/// Milliseconds since the Unix epoch at UTC midnight of `date`.
pub fn date_millis(date: NaiveDate) -> Result<u64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("midnight is always representable")?
        .and_utc()
        .timestamp_millis();
    u64::try_from(midnight).with_context(|| format!("date {date} is before 1970-01-01"))
}

/// Daily challenge level played on `date`.
pub fn challenge_level_for_date(date: NaiveDate) -> Result<u8> {
    Ok(daily_challenge_level(date_millis(date)?))
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecorangers_game::constants::MILLIS_PER_DAY;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,zen,  time-attack ");
        assert_eq!(parts, vec!["smoke", "zen", "time-attack"]);
    }

    #[test]
    fn dates_resolve_to_utc_midnight() {
        let day_two = parse_date(Some("1970-01-02")).unwrap();
        assert_eq!(date_millis(day_two).unwrap(), MILLIS_PER_DAY);
        let leap = parse_date(Some(" 2024-03-01 ")).unwrap();
        assert_eq!(date_millis(leap).unwrap() % MILLIS_PER_DAY, 0);
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(parse_date(Some("03/01/2024")).is_err());
        let before_epoch = parse_date(Some("1969-12-31")).unwrap();
        assert!(date_millis(before_epoch).is_err());
        assert!(parse_date(None).is_ok());
    }

    #[test]
    fn challenge_level_cycles_every_51_days() {
        let epoch = parse_date(Some("1970-01-01")).unwrap();
        assert_eq!(challenge_level_for_date(epoch).unwrap(), 10);
        let later = epoch + chrono::Days::new(51);
        assert_eq!(challenge_level_for_date(later).unwrap(), 10);
        let next = epoch + chrono::Days::new(50);
        assert_eq!(challenge_level_for_date(next).unwrap(), 60);
    }
}
