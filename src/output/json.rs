//! `--format json` rendering.
//!
//! Every JSON document lexora prints has the same shape, `{"data": ..., "meta": ...}`,
//! so scripts can read the payload without caring which command produced it.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub meta: EnvelopeMeta,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeMeta {
    /// When the document was rendered, serialized as RFC 3339
    #[serde(rename = "timestamp")]
    pub rendered_at: DateTime<Utc>,

    /// lexora release that rendered it
    pub version: &'static str,
}

impl<T> Envelope<T> {
    pub fn wrap(data: T) -> Self {
        Self {
            data,
            meta: EnvelopeMeta {
                rendered_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Wrap `data` in an [`Envelope`] and pretty-print it
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Envelope::wrap(data))
}
