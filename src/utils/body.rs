use actix_http::h1;
use actix_web::dev::ServiceRequest;
use actix_web::HttpMessage;
use actix_web::web::{Bytes, BytesMut};
use futures_util::StreamExt;
use log::error;

/// Drains the request payload into memory and puts it back.
///
/// Returns the buffered bytes, or `None` when the body is empty or the read
/// fails. On *every* exit path the payload is replaced with a fresh one
/// positioned at offset 0, so a downstream handler (or extractor) sees the
/// same unconsumed body the client sent. Read failures are logged, never
/// propagated.
pub async fn buffer_request_body(req: &mut ServiceRequest) -> Option<Bytes> {
    let mut payload = req.take_payload();
    let mut buf = BytesMut::new();
    let mut failed = false;

    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(bytes) => buf.extend_from_slice(&bytes),
            Err(e) => {
                error!("Failed to read request body: {}", e);
                failed = true;
                break;
            }
        }
    }

    let bytes = buf.freeze();

    // Repack whatever was read so downstream consumers still get a body.
    let (_, mut restored) = h1::Payload::create(true);
    restored.unread_data(bytes.clone());
    req.set_payload(restored.into());

    if failed || bytes.is_empty() {
        None
    } else {
        Some(bytes)
    }
}
