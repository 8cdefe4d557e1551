use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

struct Patterns {
    auth_token: Regex,
    password: Regex,
    authorization: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // "authToken": "..." in login responses
        auth_token: Regex::new(r#"("?(?:authToken|auth_token|token)"?\s*[:=]\s*"?)([^"\s,&}]+)"#)
            .expect("valid auth token pattern"),
        // password fields in JSON or form bodies
        password: Regex::new(r#"("?password"?\s*[:=]\s*"?)([^"\s,&}]+)"#)
            .expect("valid password pattern"),
        // Authorization headers; Responsys sends the raw token without a scheme
        authorization: Regex::new(r"(?i)(authorization:\s*)(?:bearer\s+)?(\S+)")
            .expect("valid authorization pattern"),
    })
}

/// Redacts Responsys credentials from text before it is logged
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let p = patterns();
        let redact = |caps: &Captures| format!("{}[REDACTED]", &caps[1]);

        let scrubbed = p.auth_token.replace_all(message, redact);
        let scrubbed = p.password.replace_all(&scrubbed, redact);
        p.authorization.replace_all(&scrubbed, redact).into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// Show only the first few characters of a token
pub fn redact_token(token: &str) -> String {
    match token.get(..6) {
        Some(prefix) if token.len() > 12 => format!("{prefix}...[REDACTED]"),
        _ => "[REDACTED]".to_string(),
    }
}
