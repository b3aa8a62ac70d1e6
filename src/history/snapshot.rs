use crate::draw::SurfaceError;
use cairo::{Format, ImageSurface};
use std::fmt;
use std::sync::Arc;

/// PNG encoding of the whole raster surface at one point in time.
///
/// Cloning shares the encoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    png: Arc<[u8]>,
}

impl HistorySnapshot {
    pub fn from_png(bytes: Vec<u8>) -> Self {
        Self { png: bytes.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

impl fmt::Debug for HistorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistorySnapshot")
            .field("bytes", &self.png.len())
            .finish()
    }
}

/// Pixel data of a decoded snapshot, detached from any Cairo surface so it
/// can cross threads.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub format: Format,
    pub data: Vec<u8>,
}

impl DecodedImage {
    /// Decodes PNG bytes and copies the pixels out of the temporary surface.
    pub fn decode(png: &[u8]) -> Result<Self, SurfaceError> {
        let mut reader = png;
        let surface = ImageSurface::create_from_png(&mut reader)?;
        Self::copy_from(&surface)
    }

    pub fn copy_from(surface: &ImageSurface) -> Result<Self, SurfaceError> {
        let mut data = Vec::new();
        surface.with_data(|pixels| data.extend_from_slice(pixels))?;
        Ok(Self {
            width: surface.width(),
            height: surface.height(),
            stride: surface.stride(),
            format: surface.format(),
            data,
        })
    }

    /// Rebuilds a Cairo surface that owns the pixel buffer.
    pub fn into_surface(self) -> Result<ImageSurface, SurfaceError> {
        let expected = self.stride as usize * self.height.max(0) as usize;
        if self.data.len() < expected {
            return Err(SurfaceError::Layout(format!(
                "{} bytes for {}x{} at stride {}",
                self.data.len(),
                self.width,
                self.height,
                self.stride
            )));
        }
        Ok(ImageSurface::create_for_data(
            self.data,
            self.format,
            self.width,
            self.height,
            self.stride,
        )?)
    }
}
