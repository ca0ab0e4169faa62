//! Texture handles and opacity masks
//!
//! Textures are owned by the presentation layer. The core only keeps an
//! opaque id plus the alpha channel, decoded once when the texture is
//! registered so the pixel-collision narrow phase never touches image data.

use std::rc::Rc;

use crate::error::AssetError;
use crate::sim::geom::IntRect;

/// Opaque texture identifier chosen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Per-texel opacity, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    /// Build from a raw alpha plane (one byte per texel)
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(AssetError::SizeMismatch {
                width,
                height,
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self { width, height, alpha })
    }

    /// Build from RGBA8 pixels, keeping only the alpha channel
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AssetError::SizeMismatch {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::from_alpha(width, height, alpha)
    }

    /// Build by evaluating `f(x, y)` for every texel
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> u8,
    ) -> Result<Self, AssetError> {
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self::from_alpha(width, height, alpha)
    }

    /// Nearest-neighbour rescale (asteroid tiers share one source image)
    pub fn scaled(&self, sx: f32, sy: f32) -> Result<Self, AssetError> {
        if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
            return Err(AssetError::InvalidScale { sx, sy });
        }
        let width = (self.width as f32 * sx) as u32;
        let height = (self.height as f32 * sy) as u32;
        Self::from_fn(width, height, |x, y| {
            let ox = ((x as f32 / sx) as u32).min(self.width - 1);
            let oy = ((y as f32 / sy) as u32).min(self.height - 1);
            self.alpha_at(ox as i32, oy as i32)
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at a texel, 0 outside the mask
    #[inline]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }
}

/// A registered texture: presentation id plus cached mask
#[derive(Debug)]
pub struct Texture {
    pub id: TextureId,
    mask: AlphaMask,
}

/// Shared, immutable texture reference
pub type TextureHandle = Rc<Texture>;

impl Texture {
    pub fn new(id: TextureId, mask: AlphaMask) -> TextureHandle {
        Rc::new(Self { id, mask })
    }

    /// Full texture rectangle
    pub fn bounds(&self) -> IntRect {
        IntRect::new(0, 0, self.mask.width() as i32, self.mask.height() as i32)
    }

    #[inline]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        self.mask.alpha_at(x, y)
    }
}

/// A texture slice drawn for one entity
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture: TextureHandle,
    pub sub_rect: IntRect,
}

impl Sprite {
    /// Sprite covering the whole texture
    pub fn new(texture: TextureHandle) -> Self {
        let sub_rect = texture.bounds();
        Self { texture, sub_rect }
    }

    /// Sprite covering an atlas slice
    pub fn with_sub_rect(texture: TextureHandle, sub_rect: IntRect) -> Result<Self, AssetError> {
        let full = texture.bounds();
        let inside = sub_rect.width > 0
            && sub_rect.height > 0
            && sub_rect.left >= 0
            && sub_rect.top >= 0
            && sub_rect.left + sub_rect.width <= full.width
            && sub_rect.top + sub_rect.height <= full.height;
        if !inside {
            return Err(AssetError::SubRectOutOfBounds {
                rect: [sub_rect.left, sub_rect.top, sub_rect.width, sub_rect.height],
                width: full.width as u32,
                height: full.height as u32,
            });
        }
        Ok(Self { texture, sub_rect })
    }

    /// Local size in world units
    pub fn size(&self) -> (f32, f32) {
        (self.sub_rect.width as f32, self.sub_rect.height as f32)
    }
}

/// Every sprite the simulation assigns to entities
#[derive(Debug, Clone)]
pub struct SpriteSet {
    /// Indexed by size tier (small, medium, large)
    pub asteroids: [Sprite; 3],
    pub ship: Sprite,
    pub ship_burner: Sprite,
    pub missile: Sprite,
    pub enemy_ship: Sprite,
    pub laser: Sprite,
}
