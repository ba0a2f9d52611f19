use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Account roles. `Admin` is never assignable through the public API;
/// it is granted directly in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }

    pub fn from_db(s: &str) -> Role {
        match s {
            "publisher" => Role::Publisher,
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    /// Roles a user may pick at registration time.
    pub fn parse_registerable(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "publisher" => Some(Role::Publisher),
            _ => None,
        }
    }
}

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email regex must compile")
});

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Please add an email".into());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Please add a valid email".into());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".into());
    }
    Ok(())
}
