//! The tile, a pixel buffer with owned or borrowed storage.
use core::{fmt, mem};

use image_tile_texel::{Buffer, PixelFormat, Sample};

use crate::error::TileError;
use crate::layout::TileLayout;
use crate::pixel::{Pixel, PixelConvert, ShuffleTable};

/// A fixed-size rectangular block of pixels.
///
/// Pixels are stored row-major without padding, each pixel holding the same number of channels of
/// one [`PixelFormat`]. The bytes are either allocated and owned by the tile or borrowed from the
/// caller for the lifetime `'data`. Tiles with owned storage are `Tile<'static>`.
///
/// ```
/// use image_tile::{PixelFormat, Tile};
///
/// let mut tile = Tile::new(4, 2, 3, PixelFormat::UInt8)?;
/// tile.set_pixel(1, 1, &[255u8, 128, 0]);
///
/// let copy = tile.duplicate()?;
/// assert_eq!(copy.array_size(), 24);
/// assert_eq!(copy.as_bytes(), tile.as_bytes());
/// # Ok::<(), image_tile::TileError>(())
/// ```
pub struct Tile<'data> {
    layout: TileLayout,
    storage: Storage<'data>,
}

/// The memory behind a tile.
///
/// Only the owned variant frees anything, and it does so in its own drop.
enum Storage<'data> {
    Owned(Buffer),
    /// Exactly `array_size` bytes of the caller's memory.
    Borrowed(&'data mut [u8]),
}

impl Tile<'static> {
    /// Allocate a tile of the given dimensions.
    ///
    /// The pixels are zero-initialized.
    pub fn new(
        width: u32,
        height: u32,
        channel_count: usize,
        pixel_format: PixelFormat,
    ) -> Result<Self, TileError> {
        Self::with_layout(TileLayout::new(
            width,
            height,
            channel_count,
            pixel_format,
        )?)
    }

    /// Allocate a tile for a layout.
    pub fn with_layout(layout: TileLayout) -> Result<Self, TileError> {
        Tile::allocate(layout, None)
    }
}

impl<'data> Tile<'data> {
    /// Create a tile that uses caller provided storage.
    ///
    /// The storage must hold at least the tile's array size, any further bytes are not touched.
    /// The tile never allocates nor frees.
    pub fn with_storage(
        width: u32,
        height: u32,
        channel_count: usize,
        pixel_format: PixelFormat,
        storage: &'data mut [u8],
    ) -> Result<Self, TileError> {
        let layout = TileLayout::new(width, height, channel_count, pixel_format)?;
        Tile::allocate(layout, Some(storage))
    }

    /// Create a tile for a layout, borrowing the storage if any is given and allocating otherwise.
    pub fn allocate(
        layout: TileLayout,
        storage: Option<&'data mut [u8]>,
    ) -> Result<Self, TileError> {
        let storage = Storage::new(layout.array_size(), storage)?;
        Ok(Tile { layout, storage })
    }

    /// Create a tile by converting a tile to another pixel format.
    ///
    /// Dimensions and channels are the same as the source, only the representation of each
    /// channel value changes.
    pub fn convert(
        source: &Tile<'_>,
        pixel_format: PixelFormat,
        storage: Option<&'data mut [u8]>,
    ) -> Result<Self, TileError> {
        Self::convert_with(source, pixel_format, storage, &Pixel)
    }

    /// Create a tile by converting with a specific converter.
    ///
    /// The converter is called once for all channel values of the source.
    pub fn convert_with<C: PixelConvert + ?Sized>(
        source: &Tile<'_>,
        pixel_format: PixelFormat,
        storage: Option<&'data mut [u8]>,
        converter: &C,
    ) -> Result<Self, TileError> {
        check_source(source, converter)?;

        let channel_count = source.channel_count();
        let layout = source
            .layout
            .with_channels(channel_count, pixel_format, converter)?;
        let mut tile = Tile::allocate(layout, storage)?;

        log::trace!(
            "converting {} channel values from {:?} to {:?}",
            source.pixel_count() * source.channel_count(),
            source.pixel_format(),
            pixel_format,
        );

        converter.convert(
            source.pixel_format(),
            source.as_bytes(),
            1,
            pixel_format,
            tile.as_bytes_mut(),
            1,
        );

        Ok(tile)
    }

    /// Create a tile by converting to another pixel format and shuffling channels.
    ///
    /// The new tile has as many channels as the table has entries.
    pub fn shuffle(
        source: &Tile<'_>,
        pixel_format: PixelFormat,
        table: &ShuffleTable,
        storage: Option<&'data mut [u8]>,
    ) -> Result<Self, TileError> {
        Self::shuffle_with(source, pixel_format, table, storage, &Pixel)
    }

    /// Create a shuffled tile with a specific converter.
    ///
    /// The converter determines the new channel count and is called once for all pixels.
    pub fn shuffle_with<C: PixelConvert + ?Sized>(
        source: &Tile<'_>,
        pixel_format: PixelFormat,
        table: &ShuffleTable,
        storage: Option<&'data mut [u8]>,
        converter: &C,
    ) -> Result<Self, TileError> {
        check_source(source, converter)?;

        let channel_count = converter
            .dest_channel_count(source.channel_count(), table)
            .inspect_err(|err| log::debug!("rejected shuffle table {:?}: {}", table, err))?;
        let layout = source
            .layout
            .with_channels(channel_count, pixel_format, converter)?;
        let mut tile = Tile::allocate(layout, storage)?;

        log::trace!(
            "shuffling {} pixels from {}x{:?} to {}x{:?}",
            source.pixel_count(),
            source.channel_count(),
            source.pixel_format(),
            channel_count,
            pixel_format,
        );

        converter.convert_and_shuffle(
            source.pixel_format(),
            source.channel_count(),
            source.as_bytes(),
            pixel_format,
            channel_count,
            tile.as_bytes_mut(),
            table,
        );

        Ok(tile)
    }

    /// Copy the tile into newly allocated, owned storage.
    ///
    /// The copy is independent of the lifetime of this tile and its storage.
    pub fn duplicate(&self) -> Result<Tile<'static>, TileError> {
        let buffer = Buffer::try_from_bytes(self.as_bytes())?;
        log::trace!("duplicated tile of {} bytes", buffer.len());

        Ok(Tile {
            layout: self.layout.clone(),
            storage: Storage::Owned(buffer),
        })
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    pub fn height(&self) -> u32 {
        self.layout.height()
    }

    pub fn channel_count(&self) -> usize {
        self.layout.channel_count()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.layout.pixel_format()
    }

    pub fn pixel_count(&self) -> usize {
        self.layout.pixel_count()
    }

    pub fn channel_size(&self) -> usize {
        self.layout.channel_size()
    }

    pub fn pixel_size(&self) -> usize {
        self.layout.pixel_size()
    }

    /// The size of the pixel array in bytes.
    pub fn array_size(&self) -> usize {
        self.layout.array_size()
    }

    /// The memory attributed to this tile, for budgeting many tiles.
    ///
    /// The sum of the tile value itself and its pixel array. Owned arrays count their whole
    /// allocation, which is rounded up to aligned chunks. Borrowed arrays count `array_size`.
    pub fn dynamic_size(&self) -> usize {
        mem::size_of::<Self>() + self.storage.footprint()
    }

    /// Check if the tile frees its storage when dropped.
    pub fn owns_storage(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Return the pixels as a native endian byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Return the pixels as a mutable native endian byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.storage.as_bytes_mut()
    }

    /// The bytes of one pixel.
    ///
    /// Panics if the coordinate is outside the tile.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let offset = self.layout.pixel_offset(x, y);
        &self.as_bytes()[offset..][..self.pixel_size()]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let offset = self.layout.pixel_offset(x, y);
        let len = self.pixel_size();
        &mut self.as_bytes_mut()[offset..][..len]
    }

    /// The bytes of one channel of a pixel.
    ///
    /// Panics if the coordinate is outside the tile or the channel does not exist.
    pub fn channel(&self, x: u32, y: u32, channel: usize) -> &[u8] {
        let offset = self.layout.channel_offset(x, y, channel);
        &self.as_bytes()[offset..][..self.channel_size()]
    }

    pub fn channel_mut(&mut self, x: u32, y: u32, channel: usize) -> &mut [u8] {
        let offset = self.layout.channel_offset(x, y, channel);
        let len = self.channel_size();
        &mut self.as_bytes_mut()[offset..][..len]
    }

    /// Read a channel as its sample type.
    ///
    /// Panics if `T` is not the sample of the pixel format, or out of bounds.
    pub fn get_channel<T: Sample>(&self, x: u32, y: u32, channel: usize) -> T {
        self.assert_sample::<T>();
        T::read(self.channel(x, y, channel))
    }

    pub fn set_channel<T: Sample>(&mut self, x: u32, y: u32, channel: usize, value: T) {
        self.assert_sample::<T>();
        value.write(self.channel_mut(x, y, channel))
    }

    /// Read all channels of a pixel.
    ///
    /// Panics if `T` is not the sample of the pixel format, out of bounds, or if `values` does not
    /// have one entry for each channel.
    pub fn get_pixel<T: Sample>(&self, x: u32, y: u32, values: &mut [T]) {
        self.assert_sample::<T>();
        self.assert_channels(values.len());

        let pixel = self.pixel(x, y);
        for (value, bytes) in values.iter_mut().zip(pixel.chunks_exact(mem::size_of::<T>())) {
            *value = T::read(bytes);
        }
    }

    /// Write all channels of a pixel.
    pub fn set_pixel<T: Sample>(&mut self, x: u32, y: u32, values: &[T]) {
        self.assert_sample::<T>();
        self.assert_channels(values.len());

        let pixel = self.pixel_mut(x, y);
        for (value, bytes) in values.iter().zip(pixel.chunks_exact_mut(mem::size_of::<T>())) {
            value.write(bytes);
        }
    }

    /// Write the same channel values to every pixel.
    pub fn fill<T: Sample>(&mut self, values: &[T]) {
        self.assert_sample::<T>();
        self.assert_channels(values.len());

        let pixel_size = self.pixel_size();
        for pixel in self.as_bytes_mut().chunks_exact_mut(pixel_size) {
            for (value, bytes) in values.iter().zip(pixel.chunks_exact_mut(mem::size_of::<T>())) {
                value.write(bytes);
            }
        }
    }

    /// View all channel values as a slice of samples.
    ///
    /// Returns `None` if borrowed storage is not aligned for `T`. Owned storage is always aligned.
    /// Panics if `T` is not the sample of the pixel format.
    pub fn as_samples<T: Sample>(&self) -> Option<&[T]> {
        self.assert_sample::<T>();
        bytemuck::try_cast_slice(self.as_bytes()).ok()
    }

    pub fn as_samples_mut<T: Sample>(&mut self) -> Option<&mut [T]> {
        self.assert_sample::<T>();
        bytemuck::try_cast_slice_mut(self.as_bytes_mut()).ok()
    }

    fn assert_sample<T: Sample>(&self) {
        assert_eq!(
            T::FORMAT,
            self.pixel_format(),
            "sample type does not match the pixel format"
        );
    }

    fn assert_channels(&self, len: usize) {
        assert_eq!(
            len,
            self.channel_count(),
            "expected one value for each channel"
        );
    }
}

/// The converter must read source channels with the size the source was laid out with.
fn check_source<C: PixelConvert + ?Sized>(
    source: &Tile<'_>,
    converter: &C,
) -> Result<(), TileError> {
    let format = source.pixel_format();
    let expected = source.channel_size();
    let actual = converter.size_of(format);

    if actual != expected {
        log::debug!(
            "converter reads {} byte {:?} channels, source has {}",
            actual,
            format,
            expected
        );
        return Err(TileError::converter_mismatch(format, expected, actual));
    }

    Ok(())
}

impl<'data> Storage<'data> {
    fn new(array_size: usize, external: Option<&'data mut [u8]>) -> Result<Self, TileError> {
        match external {
            Some(bytes) => {
                if bytes.len() < array_size {
                    log::debug!(
                        "rejected borrowed storage of {} bytes for {} byte tile",
                        bytes.len(),
                        array_size
                    );
                    return Err(TileError::storage_too_small(array_size, bytes.len()));
                }

                log::trace!("borrowing {} bytes of tile storage", array_size);
                Ok(Storage::Borrowed(&mut bytes[..array_size]))
            }
            None => {
                let buffer = Buffer::try_new(array_size)
                    .inspect_err(|err| log::debug!("tile allocation failed: {}", err))?;
                log::trace!("allocated {} bytes of tile storage", array_size);
                Ok(Storage::Owned(buffer))
            }
        }
    }

    fn footprint(&self) -> usize {
        match self {
            Storage::Owned(buffer) => buffer.capacity(),
            Storage::Borrowed(bytes) => bytes.len(),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Storage::Owned(buffer) => buffer.as_bytes(),
            Storage::Borrowed(bytes) => bytes,
        }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(buffer) => buffer.as_bytes_mut(),
            Storage::Borrowed(bytes) => bytes,
        }
    }
}

/// Duplicates into owned storage, see [`Tile::duplicate`].
///
/// Aborts on allocation failure, like other collections.
impl Clone for Tile<'_> {
    fn clone(&self) -> Self {
        Tile {
            layout: self.layout.clone(),
            storage: Storage::Owned(Buffer::from(self.as_bytes())),
        }
    }
}

impl fmt::Debug for Tile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("layout", &self.layout)
            .field("owns_storage", &self.owns_storage())
            .finish()
    }
}
