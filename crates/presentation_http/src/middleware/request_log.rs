//! Request logging middleware
//!
//! Emits one line per request with method, path, status, and latency,
//! after the response has been produced.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{extract::Request, response::Response};
use tower::{Layer, Service};
use tracing::info;

/// Layer that logs request completions
#[derive(Clone, Debug, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    /// Create a new request log layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog { inner }
    }
}

/// Middleware service that logs request completions
#[derive(Clone, Debug)]
pub struct RequestLog<S> {
    inner: S,
}

impl<S> Service<Request> for RequestLog<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let start = Instant::now();
            let response = inner.call(req).await?;
            let duration_ms = start.elapsed().as_millis();

            info!(
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                duration_ms,
                "Request completed"
            );

            Ok(response)
        })
    }
}
