use serde::{Deserialize, Serialize};

/// The JSON body of every API response: `{ok, message?, redirect?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ApiReply {
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
            redirect: None,
        }
    }

    /// Success, telling the client where to go next.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            redirect: Some(to.into()),
            ..Self::ok()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            redirect: None,
        }
    }
}
