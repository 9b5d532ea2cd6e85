use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::domain::error::SchemaError;
use crate::util::time::{is_calendar_date, is_rfc3339_datetime, is_wall_time};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("static email pattern")
});

static HOST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("static host name pattern")
});

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#[0-9A-Fa-f]{3}|#[0-9A-Fa-f]{6}|(?i:aqua|black|blue|fuchsia|gray|green|lime|maroon|navy|olive|orange|purple|red|silver|teal|white|yellow))$")
        .expect("static color pattern")
});

/// Named semantic format accepted by the `format` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticFormat {
    Date,
    DateTime,
    Time,
    Url,
    Email,
    IpAddress,
    Ipv6,
    HostName,
    Color,
    UtcMillisec,
    Regex,
}

impl SemanticFormat {
    pub const ALL: [SemanticFormat; 11] = [
        Self::Date,
        Self::DateTime,
        Self::Time,
        Self::Url,
        Self::Email,
        Self::IpAddress,
        Self::Ipv6,
        Self::HostName,
        Self::Color,
        Self::UtcMillisec,
        Self::Regex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Time => "time",
            Self::Url => "url",
            Self::Email => "email",
            Self::IpAddress => "ip-address",
            Self::Ipv6 => "ipv6",
            Self::HostName => "host-name",
            Self::Color => "color",
            Self::UtcMillisec => "utc-millisec",
            Self::Regex => "regex",
        }
    }

    /// Whether `value` satisfies the format. Only strings are checked, except
    /// `utc-millisec` which also takes numbers; other shapes pass and are left
    /// to the `type` keyword.
    pub fn check(self, value: &Value) -> bool {
        match (self, value) {
            (Self::UtcMillisec, Value::Number(number)) => number.as_f64().is_some(),
            (_, Value::String(text)) => self.check_str(text),
            _ => true,
        }
    }

    fn check_str(self, text: &str) -> bool {
        match self {
            Self::Date => is_calendar_date(text),
            Self::DateTime => is_rfc3339_datetime(text),
            Self::Time => is_wall_time(text),
            Self::Url => Url::parse(text).is_ok_and(|url| url.has_host()),
            Self::Email => EMAIL.is_match(text),
            Self::IpAddress => text.parse::<Ipv4Addr>().is_ok(),
            Self::Ipv6 => text.parse::<Ipv6Addr>().is_ok(),
            Self::HostName => text.len() <= 255 && HOST_NAME.is_match(text),
            Self::Color => COLOR.is_match(text),
            Self::UtcMillisec => text.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Regex => Regex::new(text).is_ok(),
        }
    }
}

impl fmt::Display for SemanticFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownFormat {
                name: s.to_string(),
            })
    }
}
