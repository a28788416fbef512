//! Response capture tee and end-of-request shadow handling.
//!
//! In run-parallel mode the legacy handler's response must reach the client
//! byte-for-byte while a copy of those bytes is kept for comparison against
//! the shadow response. [`CaptureBody`] wraps the response body, tees every
//! chunk into a buffer as it is polled, and uses its `Drop` as the
//! end-of-request hook: cancel the shadow, probe it (never wait), compare if
//! it finished on its own, and dispose the per-request state.

use crate::services::comparator::compare_responses;
use actix_web::body::{BodySize, BoxBody, MessageBody};
use actix_web::web::{Bytes, BytesMut};
use futures_util::FutureExt;
use log::{error, info};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Per-request shadow state, owned by the installed capture body.
pub struct ShadowState {
    /// One-shot trigger telling the in-flight shadow to stop.
    pub cancel: CancellationToken,
    /// The pending shadow request; resolves to the new service's response
    /// body, or `None` on failure or cancellation.
    pub handle: JoinHandle<Option<String>>,
}

/// Write-through wrapper over the outgoing response body.
///
/// Polling is a pure tee: chunks, errors, and completion pass through
/// unchanged, so the client sees exactly what the legacy handler produced.
pub struct CaptureBody {
    inner: BoxBody,
    captured: Arc<Mutex<BytesMut>>,
    state: Option<ShadowState>,
}

impl CaptureBody {
    /// Wraps a response body and takes ownership of the shadow state.
    pub fn install(inner: BoxBody, state: ShadowState) -> Self {
        Self {
            inner,
            captured: Arc::new(Mutex::new(BytesMut::new())),
            state: Some(state),
        }
    }

    /// All bytes written through the tee so far. Reading never alters what
    /// the client receives.
    pub fn captured_bytes(&self) -> Bytes {
        self.captured.lock().unwrap().clone().freeze()
    }
}

impl MessageBody for CaptureBody {
    type Error = <BoxBody as MessageBody>::Error;

    fn size(&self) -> BodySize {
        self.inner.size()
    }

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Bytes, Self::Error>>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.captured
                    .lock()
                    .unwrap()
                    .extend_from_slice(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            other => other,
        }
    }
}

impl Drop for CaptureBody {
    /// The end-of-request hook. Runs once, when the host tears the response
    /// down, whether the body completed or the client went away.
    fn drop(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };

        // Idempotent; a no-op if the shadow already finished.
        state.cancel.cancel();

        let mut handle = state.handle;
        if !handle.is_finished() {
            info!("Shadow response not available at end of request; skipping comparison");
            return;
        }

        match (&mut handle).now_or_never() {
            Some(Ok(shadow_body)) => {
                let captured = self.captured_bytes();
                compare_responses(&captured, shadow_body.as_deref());
            }
            Some(Err(e)) => error!("Shadow task failed: {}", e),
            None => {
                info!("Shadow response not available at end of request; skipping comparison")
            }
        }
    }
}
