//! Ingestion endpoint
//!
//! One-shot HTTP surface for submitting blobs, plus the transport-free
//! [`Ingestor`] it wraps. The frame kind is carried out-of-band in the
//! request path (`/ingest/model`, `/ingest/labels`) and the file name in
//! the `name` query parameter; the request body is the raw blob.
//!
//! Ingestion is decoupled from delivery: a call returns once the frame has
//! been handed to the broadcast hub, without waiting for any subscriber.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hub::BroadcastHub;
use crate::protocol::{self, FrameKind};

/// Accepts blobs, frames them, and hands them to the broadcast hub
pub struct Ingestor {
    hub: Arc<BroadcastHub>,
}

impl Ingestor {
    /// Create an ingestor feeding the given hub
    ///
    /// The hub handle is passed in explicitly; the ingestor never reaches
    /// for ambient state.
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }

    /// Frame one blob and submit it for fan-out
    ///
    /// Returns the number of subscribers the frame was handed to, which may
    /// be zero. The return does not imply any subscriber has read the frame
    /// yet. Fails with [`Error::Frame`] on an over-long file name and
    /// [`Error::ShuttingDown`] once the relay has begun shutdown;
    /// per-subscriber delivery failures are never surfaced here.
    pub async fn ingest(&self, kind: FrameKind, file_name: &str, raw: &[u8]) -> Result<usize> {
        if self.hub.is_closed() {
            return Err(Error::ShuttingDown);
        }

        let frame = protocol::encode(kind, file_name, raw)?;

        tracing::info!(
            kind = %kind,
            file_name = file_name,
            bytes = raw.len(),
            "Blob ingested"
        );

        Ok(self.hub.publish(frame).await)
    }
}

/// Query parameters for ingestion requests
#[derive(Debug, Deserialize)]
struct IngestQuery {
    /// File name to embed in the wire frame
    name: String,
}

/// JSON body of every ingestion response
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum IngestResponse {
    Ok { subscribers: usize },
    Error { message: String },
}

/// Build the ingestion router
pub fn router(ingestor: Arc<Ingestor>, max_blob_size: usize) -> Router {
    Router::new()
        .route("/ingest/model", post(ingest_model))
        .route("/ingest/labels", post(ingest_labels))
        .layer(DefaultBodyLimit::max(max_blob_size))
        .with_state(ingestor)
}

async fn ingest_model(
    State(ingestor): State<Arc<Ingestor>>,
    Query(query): Query<IngestQuery>,
    body: Bytes,
) -> impl IntoResponse {
    respond(ingestor.ingest(FrameKind::Model, &query.name, &body).await)
}

async fn ingest_labels(
    State(ingestor): State<Arc<Ingestor>>,
    Query(query): Query<IngestQuery>,
    body: Bytes,
) -> impl IntoResponse {
    respond(ingestor.ingest(FrameKind::Labels, &query.name, &body).await)
}

fn respond(result: Result<usize>) -> (StatusCode, Json<IngestResponse>) {
    match result {
        Ok(subscribers) => (StatusCode::OK, Json(IngestResponse::Ok { subscribers })),
        Err(e) => {
            let status = match e {
                Error::Frame(_) => StatusCode::BAD_REQUEST,
                Error::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
                Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!(error = %e, "Ingestion rejected");
            (
                status,
                Json(IngestResponse::Error {
                    message: e.to_string(),
                }),
            )
        }
    }
}
