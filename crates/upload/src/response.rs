//! What goes back to the client.

pub const PNG_CONTENT_TYPE: &str = "image/png";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    ClientError,
    ServerError,
}

impl ResponseStatus {
    /// Matching HTTP status code.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::ClientError => 400,
            Self::ServerError => 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionResponse {
    pub status: ResponseStatus,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl SubmissionResponse {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            content_type: PNG_CONTENT_TYPE,
            body: bytes,
        }
    }

    pub fn client_error(message: impl Into<String>) -> Self {
        Self::text(ResponseStatus::ClientError, message.into())
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::text(ResponseStatus::ServerError, message.into())
    }

    fn text(status: ResponseStatus, message: String) -> Self {
        Self {
            status,
            content_type: TEXT_CONTENT_TYPE,
            body: message.into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    /// Body as text, for plain-text error responses.
    pub fn text_body(&self) -> Option<&str> {
        if self.content_type == TEXT_CONTENT_TYPE {
            std::str::from_utf8(&self.body).ok()
        } else {
            None
        }
    }
}
