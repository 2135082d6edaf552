//! Redirect-aware wrapper around a framework response
//!
//! The host framework's response type and its bootstrap entrypoint stay
//! external; this module pins down the two contracts the harness needs from
//! them and builds the redirect-following loop on top.

use std::ops::{Deref, DerefMut};

use http::Method;
use tracing::debug;

use crate::error::{Result, TestingError};

/// The response surface the harness needs from the host framework.
pub trait Response {
    /// Whether this response classifies as a redirect.
    fn is_redirect(&self) -> bool;

    /// The redirect destination. `None` on a non-redirect response.
    fn location(&self) -> Option<&str>;
}

/// An explicit request description handed to the application entrypoint.
///
/// Replaces ambient request state: the entrypoint sees exactly what the
/// caller built, nothing is read from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub uri: String,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
        }
    }

    /// A GET request, the shape the follow loop synthesizes per hop.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }
}

/// The application's single entrypoint: request description in, response
/// out. The follow loop is its only caller in this harness.
pub trait Entrypoint {
    type Response: Response;

    fn handle(&mut self, request: Request) -> Self::Response;
}

/// Default bound on redirect hops in [`TestResponse::follow`].
pub const DEFAULT_MAX_HOPS: usize = 10;

/// Wraps one response value for inspection during tests.
///
/// Derefs to the wrapped response, so everything the response itself exposes
/// stays callable through the wrapper.
#[derive(Debug)]
pub struct TestResponse<R> {
    response: R,
}

impl<R: Response> TestResponse<R> {
    pub fn new(response: R) -> Self {
        Self { response }
    }

    /// Whether the wrapped response is a redirect.
    pub fn is_redirecting(&self) -> bool {
        self.response.is_redirect()
    }

    /// The redirect target; `None` on a non-redirect response.
    pub fn redirecting_to(&self) -> Option<&str> {
        self.response.location()
    }

    /// Follow redirects until a non-redirect response is obtained.
    ///
    /// Each hop synthesizes a GET request for the current target, invokes
    /// the entrypoint, and replaces the wrapped response with the result.
    /// Bounded by [`DEFAULT_MAX_HOPS`]; a chain longer than that (a cycle,
    /// usually) yields [`TestingError::TooManyRedirects`].
    pub fn follow<A>(self, app: &mut A) -> Result<Self>
    where
        A: Entrypoint<Response = R>,
    {
        self.follow_with_limit(app, DEFAULT_MAX_HOPS)
    }

    /// [`follow`](Self::follow) with a caller-chosen hop bound.
    pub fn follow_with_limit<A>(mut self, app: &mut A, max_hops: usize) -> Result<Self>
    where
        A: Entrypoint<Response = R>,
    {
        let mut hops = 0;
        while self.is_redirecting() {
            let target = self.redirecting_to().unwrap_or_default().to_string();

            if hops == max_hops {
                return Err(TestingError::TooManyRedirects {
                    limit: max_hops,
                    target,
                });
            }
            hops += 1;

            debug!(hop = hops, target = %target, "following redirect");
            self.response = app.handle(Request::get(target));
        }
        Ok(self)
    }

    /// Unwrap the currently held response.
    pub fn into_inner(self) -> R {
        self.response
    }
}

impl<R> Deref for TestResponse<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.response
    }
}

impl<R> DerefMut for TestResponse<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Response for Plain {
        fn is_redirect(&self) -> bool {
            false
        }

        fn location(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn a_plain_response_is_not_redirecting() {
        let wrapped = TestResponse::new(Plain);
        assert!(!wrapped.is_redirecting());
        assert_eq!(wrapped.redirecting_to(), None);
    }

    #[test]
    fn synthesized_requests_are_gets() {
        let request = Request::get("/somewhere");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri, "/somewhere");
    }
}
