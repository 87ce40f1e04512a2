use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PluginResult {
    pub status: CommandStatus,
    pub message: Value,
}

impl PluginResult {
    pub fn ok(message: impl Into<Value>) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Error,
            message: Value::String(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CommandStatus::Ok
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub presenting: bool,
    pub api_base_url: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_cordova_spelling() {
        let encoded = serde_json::to_value(PluginResult::error("Payment cancelled")).unwrap();
        assert_eq!(encoded, json!({ "status": "ERROR", "message": "Payment cancelled" }));

        let encoded = serde_json::to_value(PluginResult::ok(true)).unwrap();
        assert_eq!(encoded, json!({ "status": "OK", "message": true }));
    }
}
