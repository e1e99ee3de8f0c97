use chrono::{DateTime, Datelike, NaiveDate};

use crate::locale::DateLocale;

const LV_MONTHS: [&str; 12] = [
    "janvāris", "februāris", "marts", "aprīlis", "maijs", "jūnijs", "jūlijs", "augusts",
    "septembris", "oktobris", "novembris", "decembris",
];

// Genitive forms, as used after a day number
const RU_MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
    "октября", "ноября", "декабря",
];

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Parses a feed timestamp into a calendar date.
///
/// Accepts RFC 2822 (RSS `pubDate`), RFC 3339 (JSON Feed, Atom) and bare
/// `YYYY-MM-DD`. The date is taken in the timestamp's own UTC offset.
pub fn parse_pub_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Formats a calendar date in the locale's long form with a two-digit day.
pub fn format_date(date: NaiveDate, locale: DateLocale) -> String {
    let month = date.month0() as usize;
    match locale {
        DateLocale::Latvian => {
            format!("{}. gada {:02}. {}", date.year(), date.day(), LV_MONTHS[month])
        }
        DateLocale::Russian => {
            format!("{:02} {} {} г.", date.day(), RU_MONTHS[month], date.year())
        }
        DateLocale::English => {
            format!("{} {:02}, {}", EN_MONTHS[month], date.day(), date.year())
        }
    }
}

/// Parses and formats a feed timestamp; `None` when it cannot be parsed.
pub fn format_pub_date(raw: &str, locale: DateLocale) -> Option<String> {
    parse_pub_date(raw).map(|date| format_date(date, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            parse_pub_date("Thu, 15 Oct 2026 10:00:00 GMT"),
            NaiveDate::from_ymd_opt(2026, 10, 15)
        );
        assert_eq!(
            parse_pub_date("Mon, 05 Jan 2026 23:30:00 +0200"),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
    }

    #[test]
    fn test_rfc3339_uses_own_offset() {
        assert_eq!(
            parse_pub_date("2026-10-15T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2026, 10, 15)
        );
    }

    #[test]
    fn test_bare_date() {
        assert_eq!(parse_pub_date("2026-03-01"), NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_unparsable() {
        assert_eq!(parse_pub_date(""), None);
        assert_eq!(parse_pub_date("yesterday"), None);
        assert_eq!(parse_pub_date("2026-13-45"), None);
        assert_eq!(format_pub_date("soon", DateLocale::Russian), None);
    }

    #[test]
    fn test_locale_formats() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(format_date(date, DateLocale::Latvian), "2026. gada 05. oktobris");
        assert_eq!(format_date(date, DateLocale::Russian), "05 октября 2026 г.");
        assert_eq!(format_date(date, DateLocale::English), "October 05, 2026");
    }

    #[test]
    fn test_format_pub_date() {
        assert_eq!(
            format_pub_date("Wed, 16 Dec 2026 08:00:00 GMT", DateLocale::Russian).as_deref(),
            Some("16 декабря 2026 г.")
        );
    }
}
