//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct for post dates, RSS feeds and
//! sitemaps.
//!
//! # Accepted formats
//!
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DDTHH:MM:SSZ`
//! - `DD-MM-YYYY` (used by existing content trees and the mtime fallback)
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("15-06-2024").unwrap();
//! assert_eq!(dt.to_rfc2822(), "Sat, 15 Jun 2024 00:00:00 GMT");
//! ```

/// UTC datetime without timezone complexity.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse any of the accepted formats.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::parse_iso(s).or_else(|| Self::parse_dmy(s))
    }

    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SSZ`.
    fn parse_iso(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        let date_ok = b.len() >= 10 && b[4] == b'-' && b[7] == b'-';
        if !date_ok {
            return None;
        }
        let (year, month, day) = (digits(&b[0..4])?, digits(&b[5..7])?, digits(&b[8..10])?);

        let (hour, minute, second) = match b.len() {
            10 => (0, 0, 0),
            20 if b[10] == b'T' && b[13] == b':' && b[16] == b':' && b[19] == b'Z' => {
                (digits(&b[11..13])?, digits(&b[14..16])?, digits(&b[17..19])?)
            }
            _ => return None,
        };

        Self::checked(year, month, day, hour, minute, second)
    }

    /// `DD-MM-YYYY`.
    fn parse_dmy(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != 10 || b[2] != b'-' || b[5] != b'-' {
            return None;
        }
        Self::checked(digits(&b[6..10])?, digits(&b[3..5])?, digits(&b[0..2])?, 0, 0, 0)
    }

    /// Build from parsed fields, `None` when they do not form a real instant.
    fn checked(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Option<Self> {
        let dt = Self::new(
            u16::try_from(year).ok()?,
            u8::try_from(month).ok()?,
            u8::try_from(day).ok()?,
            u8::try_from(hour).ok()?,
            u8::try_from(minute).ok()?,
            u8::try_from(second).ok()?,
        );
        dt.is_valid().then_some(dt)
    }

    /// Convert seconds since the Unix epoch.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;

        // Civil-from-days over 400-year eras.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as u16;

        Self::new(
            year,
            month,
            day,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Days since 1970-01-01, the inverse of the calendar step in
    /// [`from_unix_secs`](Self::from_unix_secs).
    fn days_since_epoch(self) -> i64 {
        let month = i64::from(self.month);
        let year = i64::from(self.year) - i64::from(month <= 2);
        let era = year.div_euclid(400);
        let yoe = year.rem_euclid(400);
        let mp = (month + 9) % 12;
        let doy = (153 * mp + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    pub fn is_valid(self) -> bool {
        let leap = self.year % 4 == 0 && (self.year % 100 != 0 || self.year % 400 == 0);
        let month_len = match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if leap => 29,
            2 => 28,
            _ => return false,
        };
        (1..=month_len).contains(&self.day) && self.hour < 24 && self.minute < 60 && self.second < 60
    }

    /// `DD-MM-YYYY`, the display format of post dates.
    pub fn to_dmy(self) -> String {
        format!("{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }

    /// `YYYY-MM-DD`, used for sitemap `<lastmod>`.
    pub fn to_ymd(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// RSS `pubDate`.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn to_rfc2822(self) -> String {
        // 1970-01-01 was a Thursday
        const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        let weekday = self.days_since_epoch().rem_euclid(7) as usize;
        let month = MONTHS.get(usize::from(self.month).wrapping_sub(1)).unwrap_or(&"Jan");
        format!(
            "{}, {:02} {month} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[weekday], self.day, self.year, self.hour, self.minute, self.second
        )
    }
}

/// Fixed-width ASCII decimal.
fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}
