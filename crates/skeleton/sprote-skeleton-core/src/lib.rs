//! Sprote skeleton core (renderer-agnostic)
//!
//! Data model and evaluation engine for 2D skeletal sprite animation: a forest
//! of bones with parent-relative rotations, one angle timeline per bone, the
//! time-to-pose evaluator shared by playback and export, JSON project
//! persistence, and an editing session that drives it all without a UI.

pub mod bone;
pub mod config;
pub mod error;
pub mod ids;
pub mod pose;
pub mod project;
pub mod session;
pub mod skeleton;
pub mod timeline;

// Re-exports for consumers (renderers, exporters, front-ends)
pub use bone::{Bone, NewBone};
pub use config::Config;
pub use error::{ProjectError, SkeletonError};
pub use ids::BoneId;
pub use pose::{evaluate, evaluate_detached, Pose, PosedBone};
pub use project::{load_project, load_project_or_empty, load_project_with, save_project};
pub use session::Session;
pub use skeleton::{DeletePolicy, Skeleton};
pub use timeline::{Keyframe, Timeline};
