//! Login-endpoint rate limiting policy.
//!
//! Two independent budgets guard the login route: one keyed by client IP and
//! one keyed by normalized email. The IP budget is checked first and
//! short-circuits, so a blocked source cannot tell which accounts exist from
//! differing block messages, nor drain the email budget of an account it is
//! attacking.

use axum::http::HeaderMap;
use std::time::Duration;

use super::client_ip::client_ip;
use super::Limiter;

/// Shown when the per-IP budget is exhausted.
pub const IP_LIMITED_MESSAGE: &str =
    "Too many login attempts. Please wait a minute before trying again.";

/// Shown when the per-email budget is exhausted.
pub const EMAIL_LIMITED_MESSAGE: &str =
    "Too many login attempts for this account. Please wait a few minutes.";

const DEFAULT_IP_LIMIT: u32 = 10;
const DEFAULT_IP_WINDOW_SECONDS: u64 = 60;
const DEFAULT_EMAIL_LIMIT: u32 = 5;
const DEFAULT_EMAIL_WINDOW_SECONDS: u64 = 5 * 60;

/// Outcome of a login rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    Allowed,
    IpLimited,
    EmailLimited,
}

impl LoginDecision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// User-facing message for a denied attempt, `None` when allowed.
    #[must_use]
    pub fn reason(self) -> Option<&'static str> {
        match self {
            Self::Allowed => None,
            Self::IpLimited => Some(IP_LIMITED_MESSAGE),
            Self::EmailLimited => Some(EMAIL_LIMITED_MESSAGE),
        }
    }
}

/// Limits and window lengths for both login budgets.
#[derive(Clone, Copy, Debug)]
pub struct LoginLimiterConfig {
    ip_limit: u32,
    ip_window: Duration,
    email_limit: u32,
    email_window: Duration,
}

impl LoginLimiterConfig {
    /// Default policy: 10 attempts per IP per minute, 5 attempts per email
    /// per 5 minutes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ip_limit: DEFAULT_IP_LIMIT,
            ip_window: Duration::from_secs(DEFAULT_IP_WINDOW_SECONDS),
            email_limit: DEFAULT_EMAIL_LIMIT,
            email_window: Duration::from_secs(DEFAULT_EMAIL_WINDOW_SECONDS),
        }
    }

    #[must_use]
    pub fn with_ip_limit(mut self, limit: u32) -> Self {
        self.ip_limit = limit;
        self
    }

    #[must_use]
    pub fn with_ip_window_seconds(mut self, seconds: u64) -> Self {
        self.ip_window = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_email_limit(mut self, limit: u32) -> Self {
        self.email_limit = limit;
        self
    }

    #[must_use]
    pub fn with_email_window_seconds(mut self, seconds: u64) -> Self {
        self.email_window = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn ip_limit(&self) -> u32 {
        self.ip_limit
    }

    #[must_use]
    pub fn ip_window(&self) -> Duration {
        self.ip_window
    }

    #[must_use]
    pub fn email_limit(&self) -> u32 {
        self.email_limit
    }

    #[must_use]
    pub fn email_window(&self) -> Duration {
        self.email_window
    }
}

impl Default for LoginLimiterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Brute-force guard for a login endpoint.
#[derive(Debug)]
pub struct LoginLimiter {
    ip: Limiter,
    email: Limiter,
}

impl LoginLimiter {
    /// Creates a limiter with the default policy.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoginLimiterConfig::new())
    }

    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn with_config(config: LoginLimiterConfig) -> Self {
        Self {
            ip: Limiter::new(config.ip_limit(), config.ip_window()),
            email: Limiter::new(config.email_limit(), config.email_window()),
        }
    }

    /// Charges a login attempt against both budgets, IP first.
    ///
    /// An attempt denied at the IP layer never reaches the email budget, and
    /// an empty `email` skips the email budget entirely.
    pub fn check(&self, headers: &HeaderMap, remote_addr: &str, email: &str) -> LoginDecision {
        let ip = client_ip(headers, remote_addr);
        if !self.ip.allow(&ip) {
            return LoginDecision::IpLimited;
        }
        if !email.is_empty() && !self.email.allow(&normalize_email(email)) {
            return LoginDecision::EmailLimited;
        }
        LoginDecision::Allowed
    }

    /// Restores an email's full budget after a successful authentication, so
    /// a legitimate user who mistyped a password is not penalized going
    /// forward.
    ///
    /// The IP budget is never reset; IP abuse is independent of any single
    /// account's success.
    pub fn reset_email(&self, email: &str) {
        self.email.reset(&normalize_email(email));
    }
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
