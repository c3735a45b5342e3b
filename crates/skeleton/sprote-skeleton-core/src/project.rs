//! Project persistence: the skeleton with its timelines as a JSON document.
//!
//! The document is an ordered array of bone records:
//! `{ name, length, angle, x, y, parent, image_path, timeline: [{ time, angle }] }`
//! plus optional `id`, `parent_id` and `offset`. Files that carry only the
//! name-based `parent` link still load; parents then resolve to the first
//! record with that name.
//!
//! Loading is two-pass: every bone is created as a root first, then parents
//! are linked and keyframes replayed through [`crate::Timeline::add_keyframe`].

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bone::NewBone;
use crate::config::Config;
use crate::error::ProjectError;
use crate::ids::BoneId;
use crate::skeleton::Skeleton;

#[derive(Debug, Serialize, Deserialize)]
struct BoneRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    name: String,
    length: f32,
    #[serde(default)]
    angle: f32,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<u32>,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    offset: [f32; 2],
    #[serde(default)]
    timeline: Vec<KeyRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyRecord {
    time: f32,
    angle: f32,
}

/// Serialize the skeleton to a pretty-printed JSON document.
pub fn to_json_string(skeleton: &Skeleton) -> Result<String, ProjectError> {
    let position: HashMap<BoneId, u32> = skeleton
        .bones()
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id(), i as u32))
        .collect();

    let records: Vec<BoneRecord> = skeleton
        .bones()
        .iter()
        .enumerate()
        .map(|(i, bone)| {
            let parent = bone.parent().and_then(|p| skeleton.get(p));
            if bone.parent().is_some() && parent.is_none() {
                log::warn!(
                    "bone '{}' has a dangling parent link; saving it as a root",
                    bone.name
                );
            }
            BoneRecord {
                id: Some(i as u32),
                name: bone.name.clone(),
                length: bone.length,
                angle: bone.angle,
                x: bone.x,
                y: bone.y,
                parent: parent.map(|p| p.name.clone()),
                parent_id: parent.and_then(|p| position.get(&p.id()).copied()),
                image_path: bone.image_path.clone(),
                offset: [bone.offset.0, bone.offset.1],
                timeline: bone
                    .timeline
                    .keyframes()
                    .iter()
                    .map(|k| KeyRecord {
                        time: k.time,
                        angle: k.angle,
                    })
                    .collect(),
            }
        })
        .collect();

    serde_json::to_string_pretty(&records).map_err(|e| ProjectError::Malformed(e.to_string()))
}

/// Rebuild a skeleton from a JSON document, using the default canvas.
pub fn from_json_str(s: &str) -> Result<Skeleton, ProjectError> {
    from_json_str_with(s, &Config::default())
}

/// Rebuild a skeleton whose new bones will spawn at the centre of `cfg`'s canvas.
pub fn from_json_str_with(s: &str, cfg: &Config) -> Result<Skeleton, ProjectError> {
    let records: Vec<BoneRecord> =
        serde_json::from_str(s).map_err(|e| ProjectError::Malformed(format!("parse error: {e}")))?;

    let mut skeleton = Skeleton::with_config(cfg);
    let mut created: Vec<BoneId> = Vec::with_capacity(records.len());
    let mut by_file_id: HashMap<u32, BoneId> = HashMap::new();
    let mut by_name: HashMap<&str, BoneId> = HashMap::new();

    // Pass 1: every bone as a root.
    for (i, rec) in records.iter().enumerate() {
        let spec = NewBone {
            name: rec.name.clone(),
            length: rec.length,
            angle: rec.angle,
            parent: None,
            image_path: rec.image_path.clone(),
            offset: (rec.offset[0], rec.offset[1]),
        };
        let id = skeleton
            .add_bone(spec)
            .map_err(|e| ProjectError::Malformed(e.to_string()))?;
        if let Some(bone) = skeleton.get_mut(id) {
            bone.x = rec.x;
            bone.y = rec.y;
        }
        let file_id = rec.id.unwrap_or(i as u32);
        if by_file_id.insert(file_id, id).is_some() {
            return Err(ProjectError::Malformed(format!(
                "bone id {file_id} appears more than once"
            )));
        }
        if by_name.contains_key(rec.name.as_str()) {
            log::warn!(
                "duplicate bone name '{}'; name-based parent links resolve to the first one",
                rec.name
            );
        } else {
            by_name.insert(rec.name.as_str(), id);
        }
        created.push(id);
    }

    // Pass 2: parents and keyframes.
    for (rec, &id) in records.iter().zip(&created) {
        let parent = match (rec.parent_id, rec.parent.as_deref()) {
            (Some(pid), _) => by_file_id.get(&pid).copied(),
            (None, Some(name)) => by_name.get(name).copied(),
            (None, None) => None,
        };
        if parent.is_none() && (rec.parent_id.is_some() || rec.parent.is_some()) {
            log::warn!(
                "parent of bone '{}' could not be resolved; keeping it as a root",
                rec.name
            );
        }
        if parent.is_some() {
            skeleton
                .reparent(id, parent)
                .map_err(|e| ProjectError::Malformed(e.to_string()))?;
        }
        if let Some(bone) = skeleton.get_mut(id) {
            for k in &rec.timeline {
                bone.timeline
                    .add_keyframe(k.time, k.angle)
                    .map_err(|e| ProjectError::Malformed(format!("bone '{}': {e}", rec.name)))?;
            }
        }
    }

    Ok(skeleton)
}

/// Write the project to `path`. Failures are logged and returned; nothing panics.
pub fn save_project(skeleton: &Skeleton, path: impl AsRef<Path>) -> Result<(), ProjectError> {
    let path = path.as_ref();
    let dups = skeleton.duplicate_names();
    if !dups.is_empty() {
        log::warn!("saving with duplicate bone names {dups:?}; ids keep links intact");
    }
    let result = to_json_string(skeleton).and_then(|json| {
        fs::write(path, json).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })
    });
    match &result {
        Ok(()) => log::info!("project saved to {}", path.display()),
        Err(e) => log::error!("failed to save project ({}): {e}", e.category()),
    }
    result
}

fn read_project(path: &Path, cfg: &Config) -> Result<Skeleton, ProjectError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ProjectError::NotFound(path.to_path_buf()),
        _ => ProjectError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    from_json_str_with(&text, cfg)
}

/// Read a project from `path` onto the default canvas.
pub fn load_project(path: impl AsRef<Path>) -> Result<Skeleton, ProjectError> {
    load_project_with(path, &Config::default())
}

/// Read a project from `path` onto `cfg`'s canvas. Failures are logged and returned.
pub fn load_project_with(path: impl AsRef<Path>, cfg: &Config) -> Result<Skeleton, ProjectError> {
    let path = path.as_ref();
    let result = read_project(path, cfg);
    match &result {
        Ok(skeleton) => log::info!("loaded {} bones from {}", skeleton.len(), path.display()),
        Err(ProjectError::NotFound(p)) => log::warn!("no project file at {}", p.display()),
        Err(e) => log::error!("failed to load project ({}): {e}", e.category()),
    }
    result
}

/// Like [`load_project`], but a failure (already logged) yields an empty skeleton.
pub fn load_project_or_empty(path: impl AsRef<Path>) -> Skeleton {
    load_project(path).unwrap_or_default()
}
