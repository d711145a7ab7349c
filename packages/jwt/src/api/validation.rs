//! Async result handling for token generation

use crate::{
    error::{TokenError, TokenResult},
    types::JwtToken,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Pending token generation
///
/// Resolves once the spawned pipeline finishes. There is no cancellation:
/// dropping this future does not stop the pipeline, it only discards the result.
pub struct AsyncTokenResult {
    receiver: oneshot::Receiver<TokenResult<JwtToken>>,
}

impl AsyncTokenResult {
    pub(crate) fn new(receiver: oneshot::Receiver<TokenResult<JwtToken>>) -> Self {
        Self { receiver }
    }
}

impl Future for AsyncTokenResult {
    type Output = TokenResult<JwtToken>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TokenError::internal("Channel closed"))),
            Poll::Pending => Poll::Pending,
        }
    }
}
