use serde::Serialize;

/// Uniform JSON wrapper returned by the task routes and by every error.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
            error: None,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// Collection payload; `count` always matches `data.len()`.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len() as u64),
            data: Some(items),
            message: None,
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn message_with_count(message: impl Into<String>, count: u64) -> Self {
        Self {
            count: Some(count),
            ..Self::message(message)
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            message: Some(message.into()),
            error,
        }
    }
}
