use crate::services::notifications::{EmailConfig, WebhookConfig};
use chime_domain::{lead_time::DEFAULT_LEAD_MINUTES, Channel, Tz};
use std::{collections::HashMap, fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between two scheduler cycles
    pub interval: Duration,
    /// Additional delivery attempts after the first one fails
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Max number of due reminders delivered per cycle
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            batch_size: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    pub scheduler: SchedulerConfig,
    /// Lead used when a caller does not provide a positive one
    pub default_lead_minutes: i64,
    /// Channels used when a reminder is created without any
    pub default_channels: Vec<Channel>,
    /// Zone used for DST validation and for local time-of-day rules
    pub timezone: Tz,
    pub webhook: Option<WebhookConfig>,
    pub email: Option<EmailConfig>,
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env("PORT", 5000_usize);

        let scheduler = SchedulerConfig {
            interval: Duration::from_secs(parse_env("SCHEDULER_INTERVAL_SECS", 60_u64).max(1)),
            max_retries: parse_env("REMINDER_MAX_RETRIES", 3_u32),
            retry_delay: Duration::from_millis(parse_env("REMINDER_RETRY_DELAY_MILLIS", 5000_u64)),
            batch_size: parse_env("SCHEDULER_BATCH_SIZE", 100_usize).max(1),
        };

        let mut default_lead_minutes = parse_env("REMINDER_DEFAULT_LEAD_MINUTES", DEFAULT_LEAD_MINUTES);
        if default_lead_minutes <= 0 {
            warn!(
                "REMINDER_DEFAULT_LEAD_MINUTES must be positive, falling back to {}.",
                DEFAULT_LEAD_MINUTES
            );
            default_lead_minutes = DEFAULT_LEAD_MINUTES;
        }

        let default_channels = match std::env::var("REMINDER_DEFAULT_CHANNELS") {
            Ok(raw) => parse_channels(&raw),
            Err(_) => vec![Channel::app()],
        };

        let timezone = match std::env::var("REMINDER_TIMEZONE") {
            Ok(raw) => match raw.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!("The given REMINDER_TIMEZONE: {} is not a valid IANA timezone, using UTC.", raw);
                    Tz::UTC
                }
            },
            Err(_) => Tz::UTC,
        };

        Self {
            port,
            scheduler,
            default_lead_minutes,
            default_channels,
            timezone,
            webhook: webhook_from_env(),
            email: email_from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_channels(raw: &str) -> Vec<Channel> {
    let channels = raw
        .split(',')
        .filter(|c| !c.trim().is_empty())
        .map(Channel::new)
        .collect::<Vec<_>>();
    if channels.is_empty() {
        warn!("REMINDER_DEFAULT_CHANNELS is empty, falling back to the app channel.");
        return vec![Channel::app()];
    }
    channels
}

/// Parses `key=value;key2=value2`
fn parse_headers(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn webhook_from_env() -> Option<WebhookConfig> {
    let raw_url = std::env::var("REMINDER_WEBHOOK_URL").ok()?;
    let url = match url::Url::parse(&raw_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
        _ => {
            warn!(
                "The given REMINDER_WEBHOOK_URL: {} is not a valid http(s) url, the webhook channel is disabled.",
                raw_url
            );
            return None;
        }
    };
    info!("Webhook channel configured for {}", url);

    Some(WebhookConfig {
        url: url.to_string(),
        secret: std::env::var("REMINDER_WEBHOOK_SECRET").ok(),
        timeout: Duration::from_secs(parse_env("REMINDER_WEBHOOK_TIMEOUT_SECS", 10_u64)),
        headers: std::env::var("REMINDER_WEBHOOK_HEADERS")
            .map(|raw| parse_headers(&raw))
            .unwrap_or_default(),
    })
}

fn email_from_env() -> Option<EmailConfig> {
    let smtp_host = std::env::var("SMTP_HOST").ok()?;
    Some(EmailConfig {
        smtp_host,
        smtp_port: parse_env("SMTP_PORT", 587_u16),
        username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
        password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
        from_address: std::env::var("SMTP_FROM_ADDRESS").unwrap_or_default(),
        from_name: std::env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Chime".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "PORT",
            "SCHEDULER_INTERVAL_SECS",
            "REMINDER_MAX_RETRIES",
            "REMINDER_DEFAULT_CHANNELS",
            "REMINDER_TIMEZONE",
            "REMINDER_WEBHOOK_URL",
            "REMINDER_WEBHOOK_HEADERS",
            "SMTP_HOST",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear_env();
        let config = Config::new();
        assert_eq!(config.port, 5000);
        assert_eq!(config.scheduler.interval, Duration::from_secs(60));
        assert_eq!(config.scheduler.max_retries, 3);
        assert_eq!(config.scheduler.retry_delay, Duration::from_secs(5));
        assert_eq!(config.scheduler.batch_size, 100);
        assert_eq!(config.default_lead_minutes, 15);
        assert_eq!(config.default_channels, vec![Channel::app()]);
        assert_eq!(config.timezone, Tz::UTC);
        assert!(config.webhook.is_none());
        assert!(config.email.is_none());
    }

    #[test]
    #[serial]
    fn invalid_values_fall_back() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("REMINDER_MAX_RETRIES", "-1");
        std::env::set_var("REMINDER_TIMEZONE", "Nowhere/Special");
        std::env::set_var("REMINDER_WEBHOOK_URL", "ftp://example.com");
        let config = Config::new();
        assert_eq!(config.port, 5000);
        assert_eq!(config.scheduler.max_retries, 3);
        assert_eq!(config.timezone, Tz::UTC);
        assert!(config.webhook.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn reads_channels_and_webhook() {
        clear_env();
        std::env::set_var("REMINDER_DEFAULT_CHANNELS", "app, Email ,");
        std::env::set_var("REMINDER_TIMEZONE", "Europe/Oslo");
        std::env::set_var("REMINDER_WEBHOOK_URL", "https://hooks.example.com/reminders");
        std::env::set_var("REMINDER_WEBHOOK_HEADERS", "x-team=core; x-env = prod");
        let config = Config::new();
        assert_eq!(config.default_channels, vec![Channel::app(), Channel::email()]);
        assert_eq!(config.timezone, chrono_tz::Europe::Oslo);
        let webhook = config.webhook.expect("Webhook to be configured");
        assert_eq!(webhook.headers.get("x-env").map(|v| v.as_str()), Some("prod"));
        assert_eq!(webhook.timeout, Duration::from_secs(10));
        clear_env();
    }
}
