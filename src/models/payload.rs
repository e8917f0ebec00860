use serde::Deserialize;
use serde_json::Value;

/// Body of a leaderboard response, decoded at the boundary
///
/// The endpoint has served two shapes over time: a bare array of entries,
/// and an object wrapping the entries with an `ended` flag. Any object with
/// an array `data` is the wrapped shape, whatever `ended` holds. Anything
/// else is kept as `Unrecognized` and renders as an empty board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LeaderboardPayload {
    Entries(Vec<Value>),
    Wrapped {
        data: Vec<Value>,
        #[serde(default)]
        ended: Value,
    },
    Unrecognized(Value),
}

impl LeaderboardPayload {
    /// Raw entries carried by the payload; empty when the shape is unrecognized
    pub fn entries(&self) -> &[Value] {
        match self {
            LeaderboardPayload::Entries(entries) => entries,
            LeaderboardPayload::Wrapped { data, .. } => data,
            LeaderboardPayload::Unrecognized(_) => &[],
        }
    }

    /// Whether the remote source reports the period as concluded
    ///
    /// `ended` is read by truthiness: `null`, `false`, `0`, and `""` are false,
    /// any other value is true.
    pub fn ended(&self) -> bool {
        match self {
            LeaderboardPayload::Wrapped { ended, .. } => is_truthy(ended),
            _ => false,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, LeaderboardPayload::Unrecognized(_))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
