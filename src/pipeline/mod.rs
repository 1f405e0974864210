// Request pipeline module - per-request context carried through the proxy hooks

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Request context that holds the identity and timing of an HTTP request
/// as it flows through the proxy hooks
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    started: Instant,
    status: Option<u16>,
}

impl RequestContext {
    /// Create a new RequestContext
    /// Automatically generates a unique request ID (UUID v4) and captures the start time
    pub fn new(method: String, path: String) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            started: Instant::now(),
            status: None,
        }
    }

    /// Get the unique request ID
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Get the HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fill in method and path once the request header has been read
    pub fn set_request(&mut self, method: &str, path: &str) {
        self.method = method.to_string();
        self.path = path.to_string();
    }

    /// Status code of the response written for this request, if any
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    /// Time since the context was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_new() {
        let ctx = RequestContext::new("GET".to_string(), "/assets/u1/img1".to_string());
        assert_eq!(ctx.method(), "GET");
        assert_eq!(ctx.path(), "/assets/u1/img1");
        assert_eq!(ctx.status(), None);
        assert!(Uuid::parse_str(ctx.request_id()).is_ok());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new("GET".to_string(), "/".to_string());
        let b = RequestContext::new("GET".to_string(), "/".to_string());
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_set_request_and_status() {
        let mut ctx = RequestContext::new("GET".to_string(), "/".to_string());
        ctx.set_request("HEAD", "/assets/u1/img1");
        ctx.set_status(404);
        assert_eq!(ctx.method(), "HEAD");
        assert_eq!(ctx.path(), "/assets/u1/img1");
        assert_eq!(ctx.status(), Some(404));
    }
}
