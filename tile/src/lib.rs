//! Fixed-size pixel tiles.
//!
//! A [`Tile`] is the unit of image storage of a rendering pipeline: `width × height` pixels of
//! `channel_count` channels each, stored contiguously in one [`PixelFormat`]. The tile either owns
//! its memory or borrows it from the caller, and can be created as a converted copy of another
//! tile with a different format or a shuffled set of channels.
//!
//! # Usage
//!
//! Creating a tile and converting it to floating point with channels reordered:
//! 1. Allocate the tile with its dimensions, channel count and format
//! 2. Write some pixels
//! 3. Derive a new tile with a shuffle table
//!
//! ```
//! use image_tile::{PixelFormat, ShuffleTable, Tile};
//!
//! let mut rgba = Tile::new(16, 16, 4, PixelFormat::UInt8)?;
//! rgba.fill(&[255u8, 0, 51, 255]);
//!
//! // Keep blue, green and red in that order, drop alpha.
//! let bgr = Tile::shuffle(&rgba, PixelFormat::Float, &ShuffleTable::new(&[2, 1, 0]), None)?;
//!
//! assert_eq!(bgr.channel_count(), 3);
//! assert_eq!(bgr.array_size(), 16 * 16 * 3 * 4);
//! assert_eq!(bgr.get_channel::<f32>(3, 7, 0), 0.2);
//! # Ok::<(), image_tile::TileError>(())
//! ```
//!
//! Tiles can also be placed in memory managed elsewhere, they will not free it:
//!
//! ```
//! use image_tile::{PixelFormat, Tile};
//!
//! let mut memory = vec![0u8; 64 * 64 * 2];
//! let mut tile = Tile::with_storage(64, 64, 1, PixelFormat::UInt16, &mut memory)?;
//! assert!(!tile.owns_storage());
//!
//! tile.set_channel(0, 0, 0, 0xffffu16);
//! drop(tile);
//! assert_eq!(&memory[..2], &[0xff, 0xff]);
//! # Ok::<(), image_tile::TileError>(())
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod error;
mod layout;
/// Conversion collaborators.
mod pixel;
#[cfg(feature = "std")]
mod serial;
/// The main tile module.
mod tile;

#[cfg(test)]
mod tests;

pub use self::error::{TileError, TileErrorKind};
pub use self::layout::TileLayout;
pub use self::pixel::{Pixel, PixelConvert, ShuffleTable};
#[cfg(feature = "std")]
pub use self::serial::Persist;
pub use self::tile::Tile;

pub use image_tile_texel::{f16, PixelFormat, Sample};
