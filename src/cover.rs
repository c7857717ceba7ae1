//! Cover image resolution.
//!
//! Always produces a square bitmap. The item's cover file is used when it
//! is a readable regular file under the size limit and decodes cleanly;
//! every other outcome falls through to a generated monogram tile.

use std::{
    collections::hash_map::DefaultHasher,
    fs::File,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use image::{imageops::FilterType, ImageReader, Rgba, RgbaImage};
use tracing::debug;

use crate::{
    config::CoverConfig, error::CoverError, host::UnitConverter, session::SessionSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    File(PathBuf),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cover {
    pub image: RgbaImage,
    pub source: CoverSource,
}

impl Cover {
    pub fn size(&self) -> u32 {
        self.image.width()
    }
}

/// Decodes an image file and scales it to exactly `width` x `height`.
pub trait ImageLoader {
    fn load_and_scale(&self, path: &Path, width: u32, height: u32)
        -> Result<RgbaImage, CoverError>;
}

/// Produces a generated square image for `label`.
pub trait PlaceholderRenderer {
    fn render_placeholder(&self, label: &str, size: u32) -> RgbaImage;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingLoader;

impl ImageLoader for DecodingLoader {
    fn load_and_scale(
        &self,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, CoverError> {
        let io_error = |source| CoverError::Io {
            path: path.to_path_buf(),
            source,
        };
        let decoded = ImageReader::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()
            .map_err(|source| CoverError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(decoded
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8())
    }
}

/// Pixel sizes the resolver works with for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverSettings {
    pub max_file_bytes: u64,
    /// Used when the requested target size is not positive.
    pub fallback_size: u32,
    pub placeholder_size: u32,
}

impl CoverSettings {
    pub fn from_config(config: &CoverConfig, units: &(impl UnitConverter + ?Sized)) -> Self {
        Self {
            max_file_bytes: config.max_file_bytes,
            fallback_size: units.to_pixels(config.fallback_size_dp()).max(1),
            placeholder_size: config.placeholder_size_px(),
        }
    }
}

/// Upper bound on the decoded cover edge, whatever the host reports.
pub const MAX_TARGET_PX: u32 = 2048;

pub struct CoverResolver<'a> {
    loader: &'a dyn ImageLoader,
    placeholder: &'a dyn PlaceholderRenderer,
    settings: CoverSettings,
}

impl<'a> CoverResolver<'a> {
    pub fn new(
        loader: &'a dyn ImageLoader,
        placeholder: &'a dyn PlaceholderRenderer,
        settings: CoverSettings,
    ) -> Self {
        Self {
            loader,
            placeholder,
            settings,
        }
    }

    pub fn resolve(&self, item: &SessionSnapshot, target_size: u32) -> Cover {
        if !item.use_cover_replacement {
            match self.load_file(&item.cover_file, target_size) {
                Ok(image) => {
                    return Cover {
                        image,
                        source: CoverSource::File(item.cover_file.clone()),
                    }
                }
                Err(err) => {
                    debug!(target: "widget::cover", item = %item.id, error = %err, "Using placeholder cover");
                }
            }
        }

        self.placeholder_for(&item.name)
    }

    /// Placeholder at the fixed size, independent of any requested target.
    pub fn placeholder_for(&self, label: &str) -> Cover {
        Cover {
            image: self
                .placeholder
                .render_placeholder(label, self.settings.placeholder_size),
            source: CoverSource::Placeholder,
        }
    }

    fn load_file(&self, path: &Path, target_size: u32) -> Result<RgbaImage, CoverError> {
        check_source(path, self.settings.max_file_bytes)?;
        let size = if target_size > 0 {
            target_size.min(MAX_TARGET_PX)
        } else {
            self.settings.fallback_size
        };
        self.loader.load_and_scale(path, size, size)
    }
}

fn check_source(path: &Path, max_bytes: u64) -> Result<(), CoverError> {
    let io_error = |source| CoverError::Io {
        path: path.to_path_buf(),
        source,
    };
    let metadata = File::open(path)
        .and_then(|file| file.metadata())
        .map_err(io_error)?;
    if !metadata.is_file() {
        return Err(CoverError::NotAFile(path.to_path_buf()));
    }
    if metadata.len() >= max_bytes {
        return Err(CoverError::TooLarge {
            path: path.to_path_buf(),
            len: metadata.len(),
            max: max_bytes,
        });
    }
    Ok(())
}

const PALETTE: [[u8; 3]; 10] = [
    [0xE5, 0x39, 0x35],
    [0xD8, 0x1B, 0x60],
    [0x8E, 0x24, 0xAA],
    [0x5E, 0x35, 0xB1],
    [0x39, 0x49, 0xAB],
    [0x1E, 0x88, 0xE5],
    [0x00, 0x89, 0x7B],
    [0x43, 0xA0, 0x47],
    [0xF4, 0x51, 0x1E],
    [0x6D, 0x4C, 0x41],
];

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_COLOR: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

/// Colored tile with the label's initial, colour keyed by the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonogramPlaceholder;

impl MonogramPlaceholder {
    pub fn background_for(label: &str) -> Rgba<u8> {
        let [r, g, b] = PALETTE[(hash_bytes(label.as_bytes()) % PALETTE.len() as u64) as usize];
        Rgba([r, g, b, 0xFF])
    }

    pub fn initial_for(label: &str) -> char {
        label
            .chars()
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| glyph_rows(*c).is_some())
            .unwrap_or('?')
    }
}

impl PlaceholderRenderer for MonogramPlaceholder {
    fn render_placeholder(&self, label: &str, size: u32) -> RgbaImage {
        let size = size.max(1);
        let mut image = RgbaImage::from_pixel(size, size, Self::background_for(label));

        let Some(rows) = glyph_rows(Self::initial_for(label)) else {
            return image;
        };

        // Glyph covers roughly 40% of the tile height.
        let cell = (size / 5 * 2 / GLYPH_HEIGHT).max(1);
        let glyph_w = GLYPH_WIDTH * cell;
        let glyph_h = GLYPH_HEIGHT * cell;
        if glyph_w > size || glyph_h > size {
            return image;
        }
        let left = (size - glyph_w) / 2;
        let top = (size - glyph_h) / 2;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x0 = left + col * cell;
                let y0 = top + row as u32 * cell;
                for y in y0..y0 + cell {
                    for x in x0..x0 + cell {
                        image.put_pixel(x, y, GLYPH_COLOR);
                    }
                }
            }
        }

        image
    }
}

fn hash_bytes(data: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    hasher.finish()
}

fn glyph_rows(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        _ => return None,
    };
    Some(rows)
}
