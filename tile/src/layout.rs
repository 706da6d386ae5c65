//! Defines the byte layout of tiles.
use crate::error::TileError;
use crate::pixel::{Pixel, PixelConvert};
use image_tile_texel::PixelFormat;

/// The byte layout of a tile.
///
/// An inner invariant is that the layout fits in memory: every derived size, up to and including
/// [`TileLayout::array_size`], is representable as a `usize`. Width, height and channel count are
/// never zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileLayout {
    /// The number of pixels along our width.
    width: u32,
    /// The number of pixels along our height.
    height: u32,
    /// The number of channels in each pixel.
    channel_count: usize,
    /// The representation of each channel.
    pixel_format: PixelFormat,
    pixel_count: usize,
    /// Bytes of a single channel, as reported by the converter.
    channel_size: usize,
    pixel_size: usize,
    array_size: usize,
}

impl TileLayout {
    /// Describe a tile, with channel sizes of the default [`Pixel`] converter.
    ///
    /// ```
    /// use image_tile::{PixelFormat, TileLayout};
    ///
    /// let layout = TileLayout::new(4, 2, 3, PixelFormat::UInt8)?;
    /// assert_eq!(layout.pixel_count(), 8);
    /// assert_eq!(layout.pixel_size(), 3);
    /// assert_eq!(layout.array_size(), 24);
    /// # Ok::<(), image_tile::TileError>(())
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        channel_count: usize,
        pixel_format: PixelFormat,
    ) -> Result<Self, TileError> {
        Self::with_converter(width, height, channel_count, pixel_format, &Pixel)
    }

    /// Describe a tile whose channel size is determined by a converter.
    pub fn with_converter<C: PixelConvert + ?Sized>(
        width: u32,
        height: u32,
        channel_count: usize,
        pixel_format: PixelFormat,
        converter: &C,
    ) -> Result<Self, TileError> {
        if width == 0 {
            return Err(TileError::ZERO_WIDTH);
        }

        if height == 0 {
            return Err(TileError::ZERO_HEIGHT);
        }

        let pixel_count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(TileError::OVERFLOW)?;

        Self::derive(
            (width, height),
            pixel_count,
            channel_count,
            pixel_format,
            converter.size_of(pixel_format),
        )
    }

    /// The layout of a tile with the same pixel grid, but other channels.
    pub(crate) fn with_channels<C: PixelConvert + ?Sized>(
        &self,
        channel_count: usize,
        pixel_format: PixelFormat,
        converter: &C,
    ) -> Result<Self, TileError> {
        Self::derive(
            (self.width, self.height),
            self.pixel_count,
            channel_count,
            pixel_format,
            converter.size_of(pixel_format),
        )
    }

    /// Compute all sizes that depend on format and channels.
    ///
    /// The only place that computes them, every constructor goes through here.
    fn derive(
        (width, height): (u32, u32),
        pixel_count: usize,
        channel_count: usize,
        pixel_format: PixelFormat,
        channel_size: usize,
    ) -> Result<Self, TileError> {
        if channel_count == 0 {
            return Err(TileError::ZERO_CHANNELS);
        }

        if channel_size == 0 {
            return Err(TileError::zero_channel_size(pixel_format));
        }

        let pixel_size = channel_size
            .checked_mul(channel_count)
            .ok_or(TileError::OVERFLOW)?;
        let array_size = pixel_size
            .checked_mul(pixel_count)
            .ok_or(TileError::OVERFLOW)?;

        Ok(TileLayout {
            width,
            height,
            channel_count,
            pixel_format,
            pixel_count,
            channel_size,
            pixel_size,
            array_size,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// The number of pixels, `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// The number of bytes of one channel.
    pub fn channel_size(&self) -> usize {
        self.channel_size
    }

    /// The number of bytes of one pixel.
    pub fn pixel_size(&self) -> usize {
        self.pixel_size
    }

    /// The number of bytes of all pixels.
    pub fn array_size(&self) -> usize {
        self.array_size
    }

    /// Alias of [`TileLayout::array_size`].
    pub fn byte_len(&self) -> usize {
        self.array_size
    }

    /// The byte offset of a pixel.
    ///
    /// Panics if the coordinate is outside the tile.
    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds of {}x{} tile",
            x,
            y,
            self.width,
            self.height,
        );

        // Both are less than the dimensions whose product fits.
        (y as usize * self.width as usize + x as usize) * self.pixel_size
    }

    /// The byte offset of a channel of a pixel.
    ///
    /// Panics if the coordinate is outside the tile or the channel does not exist.
    pub fn channel_offset(&self, x: u32, y: u32, channel: usize) -> usize {
        assert!(
            channel < self.channel_count,
            "channel {} out of bounds of {} channels",
            channel,
            self.channel_count,
        );

        self.pixel_offset(x, y) + channel * self.channel_size
    }
}
