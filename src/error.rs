//! Error types for the widget core.
//!
//! Library code reports failures through these `thiserror` enums. None of
//! them is fatal: cover errors fall back to a placeholder and host errors
//! are isolated to the instance that produced them.

use std::path::PathBuf;

use crate::host::WidgetId;

/// Why a cover file could not be turned into a bitmap.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("cover file {path} is unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cover file {0} is not a regular file")]
    NotAFile(PathBuf),

    #[error("cover file {path} is {len} bytes, limit is {max}")]
    TooLarge { path: PathBuf, len: u64, max: u64 },

    #[error("failed to decode cover {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failure reported by the host while updating one widget instance.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("widget {0} is no longer placed")]
    InstanceGone(WidgetId),

    #[error("host rejected update for widget {id}: {reason}")]
    Rejected { id: WidgetId, reason: String },

    #[error("failed to write preview for widget {id}: {source}")]
    Io {
        id: WidgetId,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preview cover for widget {id}: {source}")]
    Encode {
        id: WidgetId,
        #[source]
        source: image::ImageError,
    },
}
