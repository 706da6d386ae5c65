//! Conversion between pixel formats and channel layouts.
//!
//! The tile never interprets channel values itself. It computes byte extents and hands whole
//! pixel streams to a [`PixelConvert`] implementation, by default the [`Pixel`] converter.
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::slice;

use image_tile_texel::{PixelFormat, Sample, SampleAction};

use crate::error::TileError;

/// The numeric conversion between pixel streams.
///
/// Byte slices passed to the conversion methods are native endian channel values of the given
/// format. They need not be aligned.
pub trait PixelConvert {
    /// The number of bytes of one channel value in a format.
    fn size_of(&self, format: PixelFormat) -> usize;

    /// Convert a run of channel values between formats.
    ///
    /// Strides are given in channels: the `i`-th value is read at channel index `i * src_stride`
    /// and written at channel index `i * dst_stride`. The run contains every value that starts in
    /// `src`.
    fn convert(
        &self,
        src_format: PixelFormat,
        src: &[u8],
        src_stride: usize,
        dst_format: PixelFormat,
        dst: &mut [u8],
        dst_stride: usize,
    );

    /// Convert a run of pixels between formats, rearranging their channels.
    ///
    /// `src` holds whole pixels of `src_channels` values each. Every pixel in `dst` holds
    /// `dst_channels` values selected from the source pixel by the shuffle table.
    #[allow(clippy::too_many_arguments)]
    fn convert_and_shuffle(
        &self,
        src_format: PixelFormat,
        src_channels: usize,
        src: &[u8],
        dst_format: PixelFormat,
        dst_channels: usize,
        dst: &mut [u8],
        table: &ShuffleTable,
    );

    /// The number of channels produced by shuffling pixels with the given channel count.
    fn dest_channel_count(
        &self,
        src_channels: usize,
        table: &ShuffleTable,
    ) -> Result<usize, TileError>;
}

/// The default converter.
///
/// Integer formats are normalized, their maximum value corresponds to `1.0` in any float format.
/// Converting into an integer format clamps to `[0, 1]` and rounds to the nearest value. Between
/// identical formats values are copied bit-exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel;

/// A mapping from source channels to destination channels.
///
/// The table has one entry per destination channel, naming the source channel it is read from.
/// Source channels may thus be reordered, replicated by naming them more than once, or dropped by
/// not naming them at all.
///
/// ```
/// use image_tile::ShuffleTable;
///
/// // RGBA to BGR, the alpha channel is dropped.
/// let table = ShuffleTable::new(&[2, 1, 0]);
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.source(0), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShuffleTable {
    sources: Box<[usize]>,
}

/// The function pointers to move a single channel value.
///
/// Read onto the common scale and write back from it, for one format each.
#[derive(Clone, Copy)]
struct ChannelOps {
    size: usize,
    read: fn(&[u8]) -> f64,
    write: fn(f64, &mut [u8]),
}

impl ShuffleTable {
    pub fn new(sources: &[usize]) -> Self {
        ShuffleTable {
            sources: sources.into(),
        }
    }

    /// A table passing all channels through in order.
    pub fn identity(channels: usize) -> Self {
        (0..channels).collect()
    }

    /// The number of destination channels.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The source channel of a destination channel.
    pub fn source(&self, channel: usize) -> Option<usize> {
        self.sources.get(channel).copied()
    }

    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    pub fn iter(&self) -> slice::Iter<'_, usize> {
        self.sources.iter()
    }

    /// Check that the table can be applied to pixels with some number of channels.
    pub fn validate(&self, src_channels: usize) -> Result<(), TileError> {
        if self.sources.is_empty() {
            return Err(TileError::EMPTY_SHUFFLE);
        }

        match self.sources.iter().find(|&&idx| idx >= src_channels) {
            Some(&index) => Err(TileError::shuffle_index(index, src_channels)),
            None => Ok(()),
        }
    }

    /// Check if the table passes pixels of this channel count through unchanged.
    pub fn is_identity(&self, src_channels: usize) -> bool {
        self.sources.len() == src_channels && self.sources.iter().copied().eq(0..src_channels)
    }
}

impl FromIterator<usize> for ShuffleTable {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        ShuffleTable {
            sources: iter.into_iter().collect::<Vec<_>>().into(),
        }
    }
}

impl<'a> IntoIterator for &'a ShuffleTable {
    type Item = &'a usize;
    type IntoIter = slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl ChannelOps {
    fn for_format(format: PixelFormat) -> Self {
        struct ToOps;

        impl SampleAction<ChannelOps> for ToOps {
            fn run<T: Sample>(self) -> ChannelOps {
                ChannelOps {
                    size: core::mem::size_of::<T>(),
                    read: |bytes| T::read(bytes).to_unit(),
                    write: |value, bytes| T::from_unit(value).write(bytes),
                }
            }
        }

        format.action(ToOps)
    }
}

impl PixelConvert for Pixel {
    fn size_of(&self, format: PixelFormat) -> usize {
        format.bytes()
    }

    fn convert(
        &self,
        src_format: PixelFormat,
        src: &[u8],
        src_stride: usize,
        dst_format: PixelFormat,
        dst: &mut [u8],
        dst_stride: usize,
    ) {
        assert!(src_stride > 0 && dst_stride > 0, "strides must not be zero");

        let src_size = src_format.bytes();
        let dst_size = dst_format.bytes();
        let count = (src.len() / src_size).div_ceil(src_stride);

        if src_format == dst_format && src_stride == 1 && dst_stride == 1 {
            let len = count * src_size;
            dst[..len].copy_from_slice(&src[..len]);
            return;
        }

        let src_step = src_stride * src_size;
        let dst_step = dst_stride * dst_size;

        if src_format == dst_format {
            for idx in 0..count {
                let value = &src[idx * src_step..][..src_size];
                dst[idx * dst_step..][..dst_size].copy_from_slice(value);
            }

            return;
        }

        let from = ChannelOps::for_format(src_format);
        let into = ChannelOps::for_format(dst_format);

        for idx in 0..count {
            let value = (from.read)(&src[idx * src_step..]);
            (into.write)(value, &mut dst[idx * dst_step..]);
        }
    }

    fn convert_and_shuffle(
        &self,
        src_format: PixelFormat,
        src_channels: usize,
        src: &[u8],
        dst_format: PixelFormat,
        dst_channels: usize,
        dst: &mut [u8],
        table: &ShuffleTable,
    ) {
        assert_eq!(
            table.len(),
            dst_channels,
            "shuffle table does not produce {} channels",
            dst_channels
        );

        if let Err(err) = table.validate(src_channels) {
            panic!("invalid shuffle table: {}", err);
        }

        let from = ChannelOps::for_format(src_format);
        let into = ChannelOps::for_format(dst_format);

        let src_pixel = from.size * src_channels;
        let dst_pixel = into.size * dst_channels;

        let pixels = src.chunks_exact(src_pixel);
        let targets = dst.chunks_exact_mut(dst_pixel);

        for (pixel, target) in pixels.zip(targets) {
            for (&source, channel) in table.iter().zip(target.chunks_exact_mut(into.size)) {
                let value = &pixel[source * from.size..][..from.size];

                if src_format == dst_format {
                    channel.copy_from_slice(value);
                } else {
                    (into.write)((from.read)(value), channel);
                }
            }
        }
    }

    fn dest_channel_count(
        &self,
        src_channels: usize,
        table: &ShuffleTable,
    ) -> Result<usize, TileError> {
        table.validate(src_channels)?;
        Ok(table.len())
    }
}
