//! Swallows broken-pipe errors on response writes.
//!
//! A client that disconnects mid-download (common for large clip downloads)
//! turns into an IO error once the body is polled by the server. Installed
//! once at the router level rather than per-handler, matching a single
//! app-wide error handler instead of scattering try/catch around every
//! response writer.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use http_body::{Body as HttpBody, Frame};
use tracing::warn;

pub async fn swallow_broken_pipe(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(BrokenPipeSwallowBody { inner: Box::pin(body) }))
}

struct BrokenPipeSwallowBody {
    inner: Pin<Box<Body>>,
}

impl HttpBody for BrokenPipeSwallowBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.inner.as_mut().poll_frame(cx) {
            Poll::Ready(Some(Err(err))) => {
                if err.to_string().to_lowercase().contains("broken pipe") {
                    warn!("client disconnected mid-response (broken pipe), swallowing");
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Err(err)))
                }
            }
            other => other,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }
}
