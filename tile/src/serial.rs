//! Persisting tiles to byte streams.
use std::io::{Read, Write};

use crate::error::TileError;
use crate::tile::Tile;

/// A value that can be written to and restored from a byte stream.
///
/// Tiles implement this trait but do not provide the operation: both directions always fail with
/// an error for which [`TileError::is_unsupported`] holds. Nothing is read from or written to the
/// stream and the tile is left unchanged.
///
/// ```
/// use image_tile::{Persist, PixelFormat, Tile};
///
/// let tile = Tile::new(8, 8, 4, PixelFormat::Half)?;
/// let mut stream = Vec::new();
///
/// let err = tile.serialize(&mut stream).unwrap_err();
/// assert!(err.is_unsupported());
/// assert!(stream.is_empty());
/// # Ok::<(), image_tile::TileError>(())
/// ```
pub trait Persist {
    fn serialize<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), TileError>;

    fn deserialize<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<(), TileError>;
}

impl Persist for Tile<'_> {
    fn serialize<W: Write + ?Sized>(&self, _: &mut W) -> Result<(), TileError> {
        log::debug!("refusing to serialize {}x{} tile", self.width(), self.height());
        Err(TileError::UNSUPPORTED)
    }

    fn deserialize<R: Read + ?Sized>(&mut self, _: &mut R) -> Result<(), TileError> {
        log::debug!("refusing to deserialize {}x{} tile", self.width(), self.height());
        Err(TileError::UNSUPPORTED)
    }
}
