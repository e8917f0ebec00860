use serde_json::Value;

/// Name shown when an entry carries no usable username
pub const FALLBACK_USERNAME: &str = "User";

/// A ranked player as reported by the leaderboard endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntry {
    /// Username, already masked by the backend
    pub username: Option<String>,

    /// Total amount wagered in the period
    pub wager_amount: f64,
}

impl PlayerEntry {
    pub fn new(username: impl Into<String>, wager_amount: f64) -> Self {
        Self {
            username: Some(username.into()),
            wager_amount,
        }
    }

    /// Build an entry from untrusted JSON
    ///
    /// Returns `None` unless the value is an object with a numeric
    /// `wagerAmount`. A username that is not a string is treated as missing.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let wager_amount = object.get("wagerAmount")?.as_f64()?;
        let username = object
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            username,
            wager_amount,
        })
    }

    /// Name to render, falling back to `User` when missing or empty
    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => FALLBACK_USERNAME,
        }
    }
}
