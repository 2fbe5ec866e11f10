//! Simulated sign-in and registration.
//!
//! There is no account server. A login attempt validates its fields and then stays
//! pending for a fixed delay before it succeeds. At most one attempt is pending: a new
//! submission supersedes the previous one, and cancelling drops it, so a late completion
//! can never be applied to the wrong screen.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Result, VestigiumError};

pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(email: &str, password: &str) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(VestigiumError::MissingCredentials);
        }
        Ok(Credentials { email: email.to_string(), password: password.to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
}

impl Registration {
    /// All three fields are required; the first empty one is reported.
    pub fn validate(name: &str, email: &str, password: &str) -> Result<Self> {
        for (field, value) in [("name", name), ("email", email), ("password", password)] {
            if value.trim().is_empty() {
                return Err(VestigiumError::MissingField(field));
            }
        }
        info!(email = email.trim(), "registration accepted");
        Ok(Registration { name: name.trim().to_string(), email: email.trim().to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLogin {
    attempt: u64,
    email: String,
    deadline: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Idle,
    Pending { attempt: u64 },
    Succeeded { email: String },
}

#[derive(Debug)]
pub struct LoginFlow {
    delay: Duration,
    next_attempt: u64,
    pending: Option<PendingLogin>,
}

impl LoginFlow {
    pub fn new(delay: Duration) -> Self {
        LoginFlow { delay, next_attempt: 1, pending: None }
    }

    /// Start an attempt, replacing any attempt still in flight.
    pub fn submit(&mut self, email: &str, password: &str, now: Instant) -> Result<u64> {
        let credentials = Credentials::validate(email, password)?;
        if let Some(old) = self.pending.take() {
            debug!(attempt = old.attempt, "superseded pending login");
        }
        let attempt = self.next_attempt;
        self.next_attempt += 1;
        info!(attempt, email = %credentials.email, "simulating sign-in");
        self.pending = Some(PendingLogin {
            attempt,
            email: credentials.email,
            deadline: now + self.delay,
        });
        Ok(attempt)
    }

    /// Drop the pending attempt, if any. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => {
                debug!(attempt = p.attempt, "cancelled pending login");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve the pending attempt once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> LoginOutcome {
        let Some(pending) = &self.pending else {
            return LoginOutcome::Idle;
        };
        if now < pending.deadline {
            return LoginOutcome::Pending { attempt: pending.attempt };
        }
        match self.pending.take() {
            Some(p) => {
                info!(attempt = p.attempt, "sign-in complete");
                LoginOutcome::Succeeded { email: p.email }
            }
            None => LoginOutcome::Idle,
        }
    }
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(2000);

    #[test]
    fn test_credentials_required() {
        assert!(matches!(Credentials::validate("", "x"), Err(VestigiumError::MissingCredentials)));
        assert!(matches!(Credentials::validate("a@b.c", " "), Err(VestigiumError::MissingCredentials)));
        assert_eq!(Credentials::validate(" a@b.c ", "pw").unwrap().email, "a@b.c");
    }

    #[test]
    fn test_registration_reports_first_missing_field() {
        assert!(matches!(Registration::validate("", "", ""), Err(VestigiumError::MissingField("name"))));
        assert!(matches!(Registration::validate("Ana", "", "pw"), Err(VestigiumError::MissingField("email"))));
        assert!(matches!(Registration::validate("Ana", "a@b.c", ""), Err(VestigiumError::MissingField("password"))));
        assert!(Registration::validate("Ana", "a@b.c", "pw").is_ok());
    }

    #[test]
    fn test_invalid_submit_leaves_flow_idle() {
        let mut flow = LoginFlow::new(DELAY);
        assert!(flow.submit("", "", Instant::now()).is_err());
        assert!(!flow.is_pending());
    }

    #[test]
    fn test_login_succeeds_after_delay() {
        let mut flow = LoginFlow::new(DELAY);
        let start = Instant::now();
        let attempt = flow.submit("a@b.c", "pw", start).unwrap();
        assert_eq!(flow.poll(start + Duration::from_millis(500)), LoginOutcome::Pending { attempt });
        assert_eq!(
            flow.poll(start + DELAY),
            LoginOutcome::Succeeded { email: "a@b.c".into() }
        );
        assert_eq!(flow.poll(start + DELAY * 2), LoginOutcome::Idle);
    }

    #[test]
    fn test_cancelled_login_never_resolves() {
        let mut flow = LoginFlow::new(DELAY);
        let start = Instant::now();
        flow.submit("a@b.c", "pw", start).unwrap();
        assert!(flow.cancel());
        assert_eq!(flow.poll(start + DELAY * 3), LoginOutcome::Idle);
        assert!(!flow.cancel());
    }

    #[test]
    fn test_new_attempt_supersedes_old() {
        let mut flow = LoginFlow::new(DELAY);
        let start = Instant::now();
        let first = flow.submit("old@b.c", "pw", start).unwrap();
        let later = start + Duration::from_millis(1500);
        let second = flow.submit("new@b.c", "pw", later).unwrap();
        assert_ne!(first, second);

        // The first attempt's deadline passes without resolving anything.
        assert_eq!(flow.poll(start + DELAY), LoginOutcome::Pending { attempt: second });
        assert_eq!(
            flow.poll(later + DELAY),
            LoginOutcome::Succeeded { email: "new@b.c".into() }
        );
    }
}
