use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use worker::{console_error, console_log, console_warn};

/// Per-request structured logger writing one JSON object per line.
pub struct Logger {
    request_id: String,
}

impl Logger {
    /// Create a logger tagged with a fresh request id
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Log an info message
    ///
    /// # Arguments
    ///
    /// * `message` - The log message
    /// * `data` - Optional additional data to include in the log
    pub fn info(&self, message: &str, data: Option<serde_json::Value>) {
        self.log("INFO", message, data);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str, data: Option<serde_json::Value>) {
        self.log("WARN", message, data);
    }

    /// Log an error message
    pub fn error(&self, message: &str, data: Option<serde_json::Value>) {
        self.log("ERROR", message, data);
    }

    /// Log at a level chosen from the response status: 5xx errors, 4xx warnings.
    pub fn status(&self, status: http::StatusCode, message: &str, data: Option<serde_json::Value>) {
        if status.is_server_error() {
            self.error(message, data);
        } else if status.is_client_error() {
            self.warn(message, data);
        } else {
            self.info(message, data);
        }
    }

    fn log(&self, level: &str, message: &str, data: Option<serde_json::Value>) {
        let log_data = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "request_id": self.request_id,
            "message": message,
            "data": data
        });

        match level {
            "WARN" => console_warn!("{}", log_data),
            "ERROR" => console_error!("{}", log_data),
            _ => console_log!("{}", log_data),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro to create a JSON object for additional log data
///
/// Usage: log_data!("key1" => "value1", "key2" => 42)
#[macro_export]
macro_rules! log_data {
    ($($key:expr => $value:expr),*) => {
        Some(serde_json::json!({ $($key: $value),* }))
    };
}
