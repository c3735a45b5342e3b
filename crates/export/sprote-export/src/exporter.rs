//! Export driver: sample the skeleton over time, rasterize, and write output.
//!
//! Sampling runs on a private clone of the skeleton, so the caller's bones,
//! poses and timelines are never touched. Each frame `i` is evaluated at
//! `i / fps` seconds with the bone's current angle as the timeline fallback.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, RgbaImage};
use serde::Serialize;
use sprote_skeleton_core::{pose, Skeleton};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::raster::Rasterizer;

/// What an export produced.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ExportSummary {
    pub frames: usize,
    /// Seconds of animation covered.
    pub duration: f32,
    pub output: PathBuf,
}

/// File name of frame `index` inside a PNG sequence directory.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:04}.png")
}

#[derive(Debug)]
pub struct Exporter<R: Rasterizer> {
    rasterizer: R,
}

impl<R: Rasterizer> Exporter<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    pub fn into_rasterizer(self) -> R {
        self.rasterizer
    }

    /// Render every frame in order and hand it to `sink`. Returns the frame count.
    pub fn render_frames<F>(
        &mut self,
        skeleton: &Skeleton,
        cfg: &ExportConfig,
        mut sink: F,
    ) -> Result<usize, ExportError>
    where
        F: FnMut(usize, RgbaImage) -> Result<(), ExportError>,
    {
        let total = cfg.frame_count()?;
        let mut scratch = skeleton.clone();
        for index in 0..total {
            let time = cfg.frame_time(index);
            let pose = pose::evaluate(&mut scratch, time);
            let frame = self.rasterizer.render(&pose)?;
            log::trace!("rendered frame {index} at t={time:.3}");
            sink(index, frame)?;
        }
        Ok(total)
    }

    /// Write `frame_0000.png`, `frame_0001.png`, ... into `dir`, creating it if needed.
    /// A failure part-way leaves the frames written so far in place.
    pub fn export_png_sequence(
        &mut self,
        skeleton: &Skeleton,
        cfg: &ExportConfig,
        dir: impl AsRef<Path>,
    ) -> Result<ExportSummary, ExportError> {
        let dir = dir.as_ref();
        // Validate before touching the filesystem.
        cfg.frame_count()?;
        fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;

        let frames = self.render_frames(skeleton, cfg, |index, frame| {
            let path = dir.join(frame_file_name(index));
            frame
                .save_with_format(&path, ImageFormat::Png)
                .map_err(|e| ExportError::image(path, e))
        })?;

        log::info!("exported {frames} frames to '{}'", dir.display());
        Ok(ExportSummary {
            frames,
            duration: frames as f32 / cfg.fps as f32,
            output: dir.to_path_buf(),
        })
    }

    /// Encode all frames as one infinitely looping GIF at `path`.
    pub fn export_gif(
        &mut self,
        skeleton: &Skeleton,
        cfg: &ExportConfig,
        path: impl AsRef<Path>,
    ) -> Result<ExportSummary, ExportError> {
        let path = path.as_ref();
        if cfg.frame_count()? == 0 {
            return Err(ExportError::InvalidArgument(
                "a GIF needs at least one frame".into(),
            ));
        }

        let mut frames = Vec::new();
        self.render_frames(skeleton, cfg, |_, frame| {
            frames.push(frame);
            Ok(())
        })?;
        let count = frames.len();

        let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| ExportError::image(path, e))?;
        let delay = Delay::from_numer_denom_ms(cfg.frame_delay_ms(), 1);
        encoder
            .encode_frames(
                frames
                    .into_iter()
                    .map(|buffer| Frame::from_parts(buffer, 0, 0, delay)),
            )
            .map_err(|e| ExportError::image(path, e))?;

        log::info!("GIF saved as '{}' ({count} frames)", path.display());
        Ok(ExportSummary {
            frames: count,
            duration: count as f32 / cfg.fps as f32,
            output: path.to_path_buf(),
        })
    }
}
