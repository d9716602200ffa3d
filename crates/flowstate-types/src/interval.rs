//! Time intervals used to present and enter flow rates.
//!
//! Donors think in "tokens per month"; the streaming protocol works in base
//! units per second. A month is a twelfth of a 365-day year.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::TypesError;

/// Seconds in a day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Seconds in a week.
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Seconds in an average month (year / 12).
pub const SECONDS_PER_MONTH: u64 = SECONDS_PER_YEAR / 12;

/// Display interval for a flow rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "lowercase")]
pub enum TimeInterval {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeInterval {
    /// Length of the interval in seconds.
    pub fn seconds(self) -> u64 {
        match self {
            Self::Day => SECONDS_PER_DAY,
            Self::Week => SECONDS_PER_WEEK,
            Self::Month => SECONDS_PER_MONTH,
            Self::Year => SECONDS_PER_YEAR,
        }
    }

    /// Convert an amount streamed over one interval into a per-second rate.
    ///
    /// Truncates toward zero, as the protocol does when a rate is set.
    pub fn per_second(self, amount_per_interval: &BigInt) -> BigInt {
        amount_per_interval / BigInt::from(self.seconds())
    }

    /// Convert a per-second rate into the amount streamed over one interval.
    pub fn per_interval(self, rate_per_second: &BigInt) -> BigInt {
        rate_per_second * BigInt::from(self.seconds())
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for TimeInterval {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(TypesError::UnknownInterval(other.to_string())),
        }
    }
}
