//! Error types for skeleton edits and project persistence.

use std::path::PathBuf;

use thiserror::Error;

use crate::ids::BoneId;

/// Failures raised by structural edits and keyframe insertion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkeletonError {
    #[error("unknown bone {0}")]
    UnknownBone(BoneId),
    #[error("making {parent} the parent of {bone} would create a cycle")]
    CycleDetected { bone: BoneId, parent: BoneId },
    #[error("keyframe time must be finite and >= 0, got {time}")]
    InvalidKeyframe { time: f32 },
}

/// Failures raised while reading or writing a project file.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no project file at {}", .0.display())]
    NotFound(PathBuf),
    #[error("malformed project: {0}")]
    Malformed(String),
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    /// Short category label used in log lines.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Malformed(_) => "malformed",
            Self::Io { .. } => "io",
        }
    }
}
