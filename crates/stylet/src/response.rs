//! Minimal HTTP response value for `render_response`.

/// An HTTP response: status code plus body.
///
/// Deliberately framework-agnostic; web integrations convert this into their
/// own response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    body: String,
}

impl Response {
    /// Creates an empty `200 OK` response.
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
        }
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// The response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replaces the response body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
