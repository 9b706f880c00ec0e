//! Text conventions shared by the user and device forms.

use chrono::{DateTime, Local, TimeZone};

/// `YYYY-MM-DD HH:mm`, as the server parses it.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_datetime<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format(DATETIME_FORMAT).to_string()
}

/// The current local time in [`DATETIME_FORMAT`].
pub fn now_string() -> String {
    format_datetime(&Local::now())
}

/// `"Daily at 08:30"` -> `"08:30"`; other text is returned unchanged.
pub fn strip_daily_prefix(s: &str) -> &str {
    s.strip_prefix("Daily at ").unwrap_or(s)
}

/// How a user's devices expire. The discriminants are the wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpirationType {
    Never = 0,
    Global = 1,
    Specific = 2,
    Duration = 3,
    Daily = 4,
    Rolling = 5,
}

impl ExpirationType {
    pub const ALL: [ExpirationType; 6] = [
        ExpirationType::Never,
        ExpirationType::Global,
        ExpirationType::Specific,
        ExpirationType::Duration,
        ExpirationType::Daily,
        ExpirationType::Rolling,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    /// From the numeric code the server renders into `data-expires`.
    pub fn from_code(code: &str) -> Option<ExpirationType> {
        let n: i32 = code.trim().parse().ok()?;
        Self::ALL.into_iter().find(|t| t.code() == n)
    }

    /// Option value in the expiration `<select>`.
    pub fn select_value(self) -> &'static str {
        match self {
            ExpirationType::Never => "never",
            ExpirationType::Global => "global",
            ExpirationType::Specific => "specific",
            ExpirationType::Duration => "duration",
            ExpirationType::Daily => "daily",
            ExpirationType::Rolling => "rolling",
        }
    }

    pub fn from_select(value: &str) -> Option<ExpirationType> {
        Self::ALL.into_iter().find(|t| t.select_value() == value)
    }

    /// Whether the value textbox means anything for this type.
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            ExpirationType::Specific | ExpirationType::Duration | ExpirationType::Daily
        )
    }

    /// Format hint shown next to the value textbox.
    pub fn tooltip(self) -> &'static str {
        match self {
            ExpirationType::Specific => "(YYYY-MM-DD HH:mm)",
            ExpirationType::Duration => "(5h30m = 5 hours and 30 minutes)",
            ExpirationType::Daily => "(HH:mm)",
            _ => "",
        }
    }
}

/// Per-user device limit as chosen in the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceLimit {
    Global,
    Unlimited,
    Specific(i64),
}

impl DeviceLimit {
    /// Wire value: -1 global, 0 unlimited.
    pub fn code(self) -> i64 {
        match self {
            DeviceLimit::Global => -1,
            DeviceLimit::Unlimited => 0,
            DeviceLimit::Specific(n) => n,
        }
    }

    /// From the `special-limit` select and the limit textbox. A specific
    /// limit that does not parse falls back to the global default.
    pub fn from_form(special: &str, value: &str) -> DeviceLimit {
        match special {
            "global" => DeviceLimit::Global,
            "unlimited" => DeviceLimit::Unlimited,
            _ => value
                .trim()
                .parse()
                .map(DeviceLimit::Specific)
                .unwrap_or(DeviceLimit::Global),
        }
    }

    /// Select value for the limit the server rendered.
    pub fn select_value(rendered: &str) -> &'static str {
        match rendered.trim() {
            "-1" => "global",
            "0" => "unlimited",
            _ => "specific",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn datetime_format() {
        let t = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 59)
            .unwrap();
        assert_eq!(format_datetime(&t), "2024-03-07 09:05");
    }

    #[test]
    fn daily_prefix() {
        assert_eq!(strip_daily_prefix("Daily at 08:30"), "08:30");
        assert_eq!(strip_daily_prefix("08:30"), "08:30");
    }

    #[test]
    fn expiration_codes() {
        assert_eq!(ExpirationType::from_code("4"), Some(ExpirationType::Daily));
        assert_eq!(ExpirationType::from_code("9"), None);
        assert_eq!(ExpirationType::from_select("rolling").map(|t| t.code()), Some(5));
        assert!(ExpirationType::Duration.takes_value());
        assert!(!ExpirationType::Never.takes_value());
    }

    #[test]
    fn device_limits() {
        assert_eq!(DeviceLimit::from_form("global", "7").code(), -1);
        assert_eq!(DeviceLimit::from_form("unlimited", "").code(), 0);
        assert_eq!(DeviceLimit::from_form("specific", " 7 ").code(), 7);
        assert_eq!(DeviceLimit::from_form("specific", "x"), DeviceLimit::Global);
        assert_eq!(DeviceLimit::select_value("0"), "unlimited");
    }
}
