use std::env;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::attachment::ImageSet;
use crate::errors::ConfigError;

pub const DEFAULT_PORT: u16 = 8080;

/// Timezone the cutoff is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    /// The host's zone, used when no name is configured.
    Local,
}

impl Zone {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Zone::Local);
        }

        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Named(tz) => now.with_timezone(tz).naive_local(),
            Zone::Local => now.with_timezone(&Local).naive_local(),
        }
    }
}

/// How the rendered response reaches Slack.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// POST to the request's `response_url`.
    #[default]
    Callback,
    /// Return the JSON as the body of the webhook response.
    Inline,
}

impl ResponseMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "" | "callback" => Ok(ResponseMode::Callback),
            "inline" => Ok(ResponseMode::Inline),
            other => Err(ConfigError::InvalidResponseMode(other.to_string())),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub zone: Zone,
    pub images: Option<ImageSet>,
    pub response_mode: ResponseMode,
    pub delivery_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn new(zone: Zone, images: Option<ImageSet>) -> Self {
        Self {
            zone,
            images,
            response_mode: ResponseMode::Callback,
            delivery_timeout: Duration::from_secs(10),
            port: DEFAULT_PORT,
        }
    }

    /// Reads `WFH_*` variables. `default_timeout` differs per shell: the
    /// lambda delivers inline with the invocation and keeps it short.
    pub fn from_env(default_timeout: Duration) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok(), default_timeout)
    }

    pub fn from_lookup<F>(lookup: F, default_timeout: Duration) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).unwrap_or_default();

        let zone = Zone::parse(&var("WFH_TIMEZONE"))?;
        let count = parse_image_count(&var("WFH_NUMBER_OF_IMAGES"))?;
        let images = ImageSet::new(&var("WFH_IMAGE_BASE_URL"), count);
        let response_mode = ResponseMode::parse(&var("WFH_RESPONSE_MODE"))?;

        let delivery_timeout = match var("WFH_DELIVERY_TIMEOUT_SECS").trim() {
            "" => default_timeout,
            value => Duration::from_secs(parse_number("WFH_DELIVERY_TIMEOUT_SECS", value)?),
        };

        let port = match var("WFH_PORT").trim() {
            "" => DEFAULT_PORT,
            value => parse_number("WFH_PORT", value)?,
        };

        Ok(Self {
            zone,
            images,
            response_mode,
            delivery_timeout,
            port,
        })
    }
}

fn parse_image_count(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ConfigError::InvalidImageCount(value.to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned(), Duration::from_secs(2))
    }

    #[test]
    fn minimal_environment() {
        let config = load(&[("WFH_NUMBER_OF_IMAGES", "250")]).unwrap();

        assert_eq!(config.zone, Zone::Local);
        assert_eq!(config.images, None);
        assert_eq!(config.response_mode, ResponseMode::Callback);
        assert_eq!(config.delivery_timeout, Duration::from_secs(2));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn full_environment() {
        let config = load(&[
            ("WFH_TIMEZONE", "Australia/Sydney"),
            ("WFH_IMAGE_BASE_URL", "https://storage.googleapis.com/wfh"),
            ("WFH_NUMBER_OF_IMAGES", "250"),
            ("WFH_RESPONSE_MODE", "Inline"),
            ("WFH_DELIVERY_TIMEOUT_SECS", "5"),
            ("WFH_PORT", "3000"),
        ])
        .unwrap();

        assert_eq!(config.zone, Zone::Named(chrono_tz::Australia::Sydney));
        assert_eq!(config.images.as_ref().map(ImageSet::count), Some(250));
        assert_eq!(config.response_mode, ResponseMode::Inline);
        assert_eq!(config.delivery_timeout, Duration::from_secs(5));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn image_count_is_required_and_positive() {
        for value in ["", "0", "-3", "many"] {
            let result = load(&[("WFH_NUMBER_OF_IMAGES", value)]);
            assert!(
                matches!(result, Err(ConfigError::InvalidImageCount(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_timezone_is_fatal() {
        let result = load(&[
            ("WFH_TIMEZONE", "Mars/Olympus_Mons"),
            ("WFH_NUMBER_OF_IMAGES", "1"),
        ]);
        assert!(matches!(result, Err(ConfigError::InvalidTimezone(name)) if name == "Mars/Olympus_Mons"));
    }

    #[test]
    fn bad_numbers_are_fatal() {
        let result = load(&[("WFH_NUMBER_OF_IMAGES", "1"), ("WFH_PORT", "http")]);
        assert!(matches!(result, Err(ConfigError::InvalidNumber { name: "WFH_PORT", .. })));

        let result = load(&[("WFH_NUMBER_OF_IMAGES", "1"), ("WFH_RESPONSE_MODE", "email")]);
        assert!(matches!(result, Err(ConfigError::InvalidResponseMode(_))));
    }

    #[test]
    fn named_zone_converts_to_wall_clock() {
        let zone = Zone::parse("Australia/Sydney").unwrap();
        // 23:30 UTC on a Tuesday is 09:30 Wednesday in Sydney (AEST, UTC+10).
        let now = Utc.with_ymd_and_hms(2024, 6, 4, 23, 30, 0).unwrap();

        let local = zone.local_time(now);

        assert_eq!(local.date().to_string(), "2024-06-05");
        assert_eq!((local.hour(), local.minute()), (9, 30));
    }
}
