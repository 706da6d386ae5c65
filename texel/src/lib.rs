// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! # Texel storage for tiles
//!
//! Byte storage and channel scalars shared by tile implementations.
//!
//! This library is strictly `no_std`. It offers an aligned, fallibly allocated [`Buffer`] of bytes
//! and the [`Sample`] trait which ties each [`PixelFormat`] to a plain-old-data Rust type. Samples
//! can be read from any byte slice regardless of alignment, while a [`Buffer`] is always aligned
//! well enough to be viewed as a slice of any sample type.
//!
//! ## Usage
//!
//! ```
//! use image_tile_texel::{Buffer, PixelFormat, Sample};
//!
//! let mut buffer = Buffer::new(4 * PixelFormat::Float.bytes());
//! buffer.as_samples_mut::<f32>().fill(0.25);
//!
//! let second = f32::read(&buffer.as_bytes()[4..]);
//! assert_eq!(second, 0.25);
//! assert_eq!(u8::from_unit(second.to_unit()), 64);
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod buf;
mod sample;

pub use self::buf::{AllocError, Buffer};
pub use self::sample::{PixelFormat, Sample, SampleAction};

/// The half precision float type used for [`PixelFormat::Half`].
pub use half::f16;
