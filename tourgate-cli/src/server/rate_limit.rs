//! Fixed-window rate limiting for the optimisation endpoint.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use thiserror::Error;

use super::error::ApiError;

/// Client key used when the peer address is unavailable.
const UNKNOWN_CLIENT: &str = "unknown";
/// Tracked clients above which expired windows are pruned.
const PRUNE_THRESHOLD: usize = 1024;

/// Errors raised while parsing a [`RateLimitRule`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitRuleError {
    /// Neither `/` nor `per` separates the count from the window.
    #[error("expected `N/unit` or `N per unit`")]
    MissingSeparator,
    /// The request count is not a positive integer.
    #[error("request count {0:?} is not a positive integer")]
    InvalidCount(String),
    /// The window is not `unit` or `M units`.
    #[error("window {0:?} is not `unit` or `M units`")]
    InvalidWindow(String),
    /// The time unit is not recognised.
    #[error("unknown time unit {0:?} (expected second, minute, hour or day)")]
    UnknownUnit(String),
}

/// `limit` requests per `window`, per client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tourgate_cli::server::RateLimitRule;
///
/// let rule: RateLimitRule = "10 per 2 minutes".parse().expect("valid rule");
/// assert_eq!(rule.limit, 10);
/// assert_eq!(rule.window, Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    /// Requests allowed per window.
    pub limit: u32,
    /// Window length.
    pub window: Duration,
}

impl fmt::Display for RateLimitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} per {}s", self.limit, self.window.as_secs())
    }
}

impl FromStr for RateLimitRule {
    type Err = RateLimitRuleError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let text = rule.trim().to_ascii_lowercase();
        let (count_part, window_part) = text
            .split_once('/')
            .or_else(|| text.split_once(" per "))
            .ok_or(RateLimitRuleError::MissingSeparator)?;

        let count_text = count_part.trim();
        let digits = count_text
            .strip_suffix("requests")
            .or_else(|| count_text.strip_suffix("request"))
            .unwrap_or(count_text)
            .trim();
        let limit = digits
            .parse::<u32>()
            .ok()
            .filter(|&limit| limit > 0)
            .ok_or_else(|| RateLimitRuleError::InvalidCount(count_text.to_owned()))?;

        let window = parse_window(window_part.trim())?;
        Ok(Self { limit, window })
    }
}

fn parse_window(text: &str) -> Result<Duration, RateLimitRuleError> {
    let invalid = || RateLimitRuleError::InvalidWindow(text.to_owned());
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (multiplier, unit) = match tokens.as_slice() {
        [unit] => (1, *unit),
        [count, unit] => {
            let multiplier = count
                .parse::<u64>()
                .ok()
                .filter(|&value| value > 0)
                .ok_or_else(invalid)?;
            (multiplier, *unit)
        }
        _ => return Err(invalid()),
    };
    let unit_seconds: u64 = match unit {
        "second" | "seconds" => 1,
        "minute" | "minutes" => 60,
        "hour" | "hours" => 3_600,
        "day" | "days" => 86_400,
        other => return Err(RateLimitRuleError::UnknownUnit(other.to_owned())),
    };
    Ok(Duration::from_secs(unit_seconds.saturating_mul(multiplier)))
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Per-client fixed-window request counter.
#[derive(Debug)]
pub struct RateLimiter {
    rule: RateLimitRule,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// A limiter enforcing `rule`.
    #[must_use]
    pub fn new(rule: RateLimitRule) -> Self {
        Self {
            rule,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Active rule.
    #[must_use]
    pub const fn rule(&self) -> RateLimitRule {
        self.rule
    }

    /// Count a request from `client` at `now`; `false` when over the limit.
    ///
    /// A client's window opens with its first request and resets once
    /// `rule.window` has elapsed.
    pub fn check(&self, client: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, window| !self.expired(window, now));
        }
        let window = windows.entry(client.to_owned()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if self.expired(window, now) {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }
        if window.count < self.rule.limit {
            window.count += 1;
            true
        } else {
            false
        }
    }

    fn expired(&self, window: &Window, now: Instant) -> bool {
        now.saturating_duration_since(window.started_at) >= self.rule.window
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Middleware rejecting requests over the limit with `429 RATE_LIMITED`.
pub(super) async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(
            || UNKNOWN_CLIENT.to_owned(),
            |ConnectInfo(addr)| addr.ip().to_string(),
        );
    if limiter.check(&client, Instant::now()) {
        next.run(request).await
    } else {
        log::warn!("rate limit {} exceeded for {client}", limiter.rule());
        ApiError::rate_limited(limiter.rule()).into_response()
    }
}
