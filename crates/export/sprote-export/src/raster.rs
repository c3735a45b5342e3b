//! Turning an evaluated [`Pose`] into pixels.
//!
//! [`Rasterizer`] is the seam the exporter renders through. The bundled
//! [`SoftwareRasterizer`] draws each bone as a 3px yellow segment with a red
//! anchor disc and its attachment image rotated about the anchor. Labels are
//! not drawn.

use image::{Rgba, RgbaImage};
use sprote_skeleton_core::Pose;

use crate::assets::{AssetLoader, FsAssetLoader};
use crate::config::ExportConfig;
use crate::error::ExportError;

pub const BONE_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
pub const ANCHOR_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BONE_WIDTH: f32 = 3.0;
pub const ANCHOR_RADIUS: f32 = 5.0;

/// Draws one evaluated pose into a frame buffer.
pub trait Rasterizer {
    fn render(&mut self, pose: &Pose) -> Result<RgbaImage, ExportError>;
}

#[derive(Debug)]
pub struct SoftwareRasterizer<L: AssetLoader = FsAssetLoader> {
    width: u32,
    height: u32,
    background: Rgba<u8>,
    assets: L,
}

impl SoftwareRasterizer<FsAssetLoader> {
    pub fn new(cfg: &ExportConfig) -> Self {
        Self::with_assets(cfg, FsAssetLoader::new())
    }
}

impl<L: AssetLoader> SoftwareRasterizer<L> {
    pub fn with_assets(cfg: &ExportConfig, assets: L) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            background: Rgba(cfg.background),
            assets,
        }
    }

    pub fn assets_mut(&mut self) -> &mut L {
        &mut self.assets
    }
}

impl<L: AssetLoader> Rasterizer for SoftwareRasterizer<L> {
    fn render(&mut self, pose: &Pose) -> Result<RgbaImage, ExportError> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::InvalidArgument(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        let mut frame = RgbaImage::from_pixel(self.width, self.height, self.background);
        for bone in &pose.bones {
            draw_segment(&mut frame, (bone.x, bone.y), bone.end, BONE_WIDTH, BONE_COLOR);
            fill_disc(&mut frame, (bone.x, bone.y), ANCHOR_RADIUS, ANCHOR_COLOR);
            if let Some(path) = bone.image_path.as_deref() {
                if let Some(img) = self.assets.load(path) {
                    blit_rotated(&mut frame, img, (bone.x, bone.y), bone.global_angle);
                }
            }
        }
        Ok(frame)
    }
}

/// Clamp a float pixel range to the canvas.
fn span(lo: f32, hi: f32, limit: u32) -> Option<(u32, u32)> {
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(limit as f32 - 1.0);
    if !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return None;
    }
    Some((lo as u32, hi as u32))
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let a = src[3] as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    for c in 0..3 {
        dst[c] = (src[c] as f32 * a + dst[c] as f32 * (1.0 - a)).round() as u8;
    }
    dst[3] = dst[3].max(src[3]);
}

/// Thick line: every pixel whose centre lies within `width / 2` of the segment.
pub fn draw_segment(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>) {
    let half = width * 0.5;
    let (w, h) = img.dimensions();
    let Some((x0, x1)) = span(a.0.min(b.0) - half, a.0.max(b.0) + half, w) else {
        return;
    };
    let Some((y0, y1)) = span(a.1.min(b.1) - half, a.1.max(b.1) + half, h) else {
        return;
    };
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let t = if len2 > 0.0 {
                (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (cx, cy) = (a.0 + dx * t, a.1 + dy * t);
            if (px - cx).powi(2) + (py - cy).powi(2) <= half * half {
                blend(img.get_pixel_mut(x, y), color);
            }
        }
    }
}

pub fn fill_disc(img: &mut RgbaImage, c: (f32, f32), r: f32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let Some((x0, x1)) = span(c.0 - r, c.0 + r, w) else {
        return;
    };
    let Some((y0, y1)) = span(c.1 - r, c.1 + r, h) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            if (px - c.0).powi(2) + (py - c.1).powi(2) <= r * r {
                blend(img.get_pixel_mut(x, y), color);
            }
        }
    }
}

/// Draw `src` centred on `c`, rotated clockwise on screen by `angle_deg`
/// (the y-down convention bone angles use). Nearest-neighbour sampling.
pub fn blit_rotated(dst: &mut RgbaImage, src: &RgbaImage, c: (f32, f32), angle_deg: f32) {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (scx, scy) = (sw as f32 * 0.5, sh as f32 * 0.5);
    let reach = (scx * scx + scy * scy).sqrt();
    let (w, h) = dst.dimensions();
    let Some((x0, x1)) = span(c.0 - reach, c.0 + reach, w) else {
        return;
    };
    let Some((y0, y1)) = span(c.1 - reach, c.1 + reach, h) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (rx, ry) = (x as f32 + 0.5 - c.0, y as f32 + 0.5 - c.1);
            // Inverse rotation back into source space.
            let sx = rx * cos + ry * sin + scx;
            let sy = -rx * sin + ry * cos + scy;
            if sx < 0.0 || sy < 0.0 || sx >= sw as f32 || sy >= sh as f32 {
                continue;
            }
            let texel = *src.get_pixel(sx as u32, sy as u32);
            blend(dst.get_pixel_mut(x, y), texel);
        }
    }
}
