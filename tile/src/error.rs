use core::fmt;

use image_tile_texel::{AllocError, PixelFormat};

/// Error that occurs when constructing, converting or persisting a tile.
///
/// All of these are reported to the immediate caller. None of them is transient, repeating the
/// same operation fails in the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileError {
    kind: TileErrorKind,
}

/// The reason for a [`TileError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TileErrorKind {
    /// A tile must be at least one pixel wide.
    ZeroWidth,
    /// A tile must be at least one pixel high.
    ZeroHeight,
    /// A pixel must have at least one channel.
    ZeroChannels,
    /// The byte size of the tile does not fit into memory.
    Overflow,
    /// The converter assigns no bytes to channels of this format.
    ZeroChannelSize { format: PixelFormat },
    /// The converter sizes the source channels differently than the source tile does.
    ConverterMismatch {
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
    /// Borrowed storage is shorter than the tile.
    StorageTooSmall { required: usize, actual: usize },
    /// The owned storage could not be allocated.
    Allocation { requested: usize },
    /// A shuffle table without any destination channel.
    EmptyShuffle,
    /// A shuffle table refers to a channel the source does not have.
    ShuffleIndex { index: usize, channels: usize },
    /// The operation is not provided for tiles.
    Unsupported,
}

impl TileError {
    pub(crate) const ZERO_WIDTH: Self = TileError::new(TileErrorKind::ZeroWidth);
    pub(crate) const ZERO_HEIGHT: Self = TileError::new(TileErrorKind::ZeroHeight);
    pub(crate) const ZERO_CHANNELS: Self = TileError::new(TileErrorKind::ZeroChannels);
    pub(crate) const OVERFLOW: Self = TileError::new(TileErrorKind::Overflow);
    pub(crate) const EMPTY_SHUFFLE: Self = TileError::new(TileErrorKind::EmptyShuffle);
    pub(crate) const UNSUPPORTED: Self = TileError::new(TileErrorKind::Unsupported);

    pub const fn new(kind: TileErrorKind) -> Self {
        TileError { kind }
    }

    pub(crate) fn storage_too_small(required: usize, actual: usize) -> Self {
        TileError::new(TileErrorKind::StorageTooSmall { required, actual })
    }

    pub(crate) fn zero_channel_size(format: PixelFormat) -> Self {
        TileError::new(TileErrorKind::ZeroChannelSize { format })
    }

    pub(crate) fn converter_mismatch(format: PixelFormat, expected: usize, actual: usize) -> Self {
        TileError::new(TileErrorKind::ConverterMismatch {
            format,
            expected,
            actual,
        })
    }

    pub(crate) fn shuffle_index(index: usize, channels: usize) -> Self {
        TileError::new(TileErrorKind::ShuffleIndex { index, channels })
    }

    pub fn kind(&self) -> TileErrorKind {
        self.kind
    }

    /// Check if this signals an operation that tiles do not provide at all.
    pub fn is_unsupported(&self) -> bool {
        self.kind == TileErrorKind::Unsupported
    }
}

impl From<AllocError> for TileError {
    fn from(err: AllocError) -> Self {
        TileError::new(TileErrorKind::Allocation {
            requested: err.requested(),
        })
    }
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TileErrorKind::ZeroWidth => write!(f, "tile width must not be zero"),
            TileErrorKind::ZeroHeight => write!(f, "tile height must not be zero"),
            TileErrorKind::ZeroChannels => write!(f, "tile channel count must not be zero"),
            TileErrorKind::Overflow => write!(f, "tile size overflows the address space"),
            TileErrorKind::ZeroChannelSize { format } => {
                write!(f, "converter reports zero bytes for {format:?} channels")
            }
            TileErrorKind::ConverterMismatch {
                format,
                expected,
                actual,
            } => write!(
                f,
                "source has {expected} byte {format:?} channels but the converter reads {actual}"
            ),
            TileErrorKind::StorageTooSmall { required, actual } => write!(
                f,
                "storage of {actual} bytes is too small for a tile of {required} bytes"
            ),
            TileErrorKind::Allocation { requested } => {
                write!(f, "failed to allocate {requested} bytes of tile storage")
            }
            TileErrorKind::EmptyShuffle => write!(f, "shuffle table has no channels"),
            TileErrorKind::ShuffleIndex { index, channels } => write!(
                f,
                "shuffle table refers to channel {index} of a pixel with {channels} channels"
            ),
            TileErrorKind::Unsupported => write!(f, "operation not implemented for tiles"),
        }
    }
}

impl core::error::Error for TileError {}
