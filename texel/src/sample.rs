// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
use core::{fmt, mem};

use bytemuck::Pod;
use half::f16;

/// The numeric storage representation of a single channel.
///
/// Integer formats are unsigned and interpreted as normalized values, i.e. the maximum value of
/// the type represents `1.0`. Floating point formats hold their value directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum PixelFormat {
    /// An 8-bit unsigned integer.
    UInt8,
    /// A 16-bit unsigned integer.
    UInt16,
    /// A 32-bit unsigned integer.
    UInt32,
    /// An IEEE 754 half precision float.
    Half,
    /// An IEEE 754 single precision float.
    Float,
    /// An IEEE 754 double precision float.
    Double,
}

/// A plain-old-data scalar that stores one channel of a pixel.
///
/// Samples are read from and written to byte slices without alignment requirements, matching
/// buffers that were provided from foreign allocations.
pub trait Sample: Pod + PartialEq + fmt::Debug {
    /// The format tag of this sample type.
    const FORMAT: PixelFormat;

    /// Read a sample from the start of a native endian byte slice.
    ///
    /// Panics if the slice is shorter than the sample.
    fn read(bytes: &[u8]) -> Self {
        bytemuck::pod_read_unaligned(&bytes[..mem::size_of::<Self>()])
    }

    /// Write the sample to the start of a byte slice, in native endian.
    ///
    /// Panics if the slice is shorter than the sample.
    fn write(self, bytes: &mut [u8]) {
        bytes[..mem::size_of::<Self>()].copy_from_slice(bytemuck::bytes_of(&self))
    }

    /// The value on the common, normalized scale.
    fn to_unit(self) -> f64;

    /// Create a sample from a value on the common scale.
    ///
    /// Integers clamp to `[0, 1]` and round half up. NaN becomes zero for integers.
    fn from_unit(value: f64) -> Self;
}

/// A computation generic over the sample type of a format.
///
/// See [`PixelFormat::action`].
pub trait SampleAction<R = ()> {
    fn run<T: Sample>(self) -> R;
}

impl PixelFormat {
    /// All the formats, in order of their tag.
    pub const ALL: [PixelFormat; 6] = [
        PixelFormat::UInt8,
        PixelFormat::UInt16,
        PixelFormat::UInt32,
        PixelFormat::Half,
        PixelFormat::Float,
        PixelFormat::Double,
    ];

    /// Determine the number of bytes of one channel in this format.
    pub const fn bytes(self) -> usize {
        match self {
            PixelFormat::UInt8 => 1,
            PixelFormat::UInt16 | PixelFormat::Half => 2,
            PixelFormat::UInt32 | PixelFormat::Float => 4,
            PixelFormat::Double => 8,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(
            self,
            PixelFormat::Half | PixelFormat::Float | PixelFormat::Double
        )
    }

    /// Run an action with the sample type that belongs to this format.
    pub fn action<R>(self, action: impl SampleAction<R>) -> R {
        match self {
            PixelFormat::UInt8 => action.run::<u8>(),
            PixelFormat::UInt16 => action.run::<u16>(),
            PixelFormat::UInt32 => action.run::<u32>(),
            PixelFormat::Half => action.run::<f16>(),
            PixelFormat::Float => action.run::<f32>(),
            PixelFormat::Double => action.run::<f64>(),
        }
    }
}

macro_rules! def_int_sample {
    ($($ty:ty => $format:ident),*) => {
        $(
            impl Sample for $ty {
                const FORMAT: PixelFormat = PixelFormat::$format;

                fn to_unit(self) -> f64 {
                    self as f64 / <$ty>::MAX as f64
                }

                fn from_unit(value: f64) -> Self {
                    // Saturating cast, NaN turns into zero.
                    (value.clamp(0.0, 1.0) * <$ty>::MAX as f64 + 0.5) as $ty
                }
            }
        )*
    };
}

def_int_sample!(u8 => UInt8, u16 => UInt16, u32 => UInt32);

impl Sample for f16 {
    const FORMAT: PixelFormat = PixelFormat::Half;

    fn to_unit(self) -> f64 {
        self.to_f64()
    }

    fn from_unit(value: f64) -> Self {
        f16::from_f64(value)
    }
}

impl Sample for f32 {
    const FORMAT: PixelFormat = PixelFormat::Float;

    fn to_unit(self) -> f64 {
        f64::from(self)
    }

    fn from_unit(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    const FORMAT: PixelFormat = PixelFormat::Double;

    fn to_unit(self) -> f64 {
        self
    }

    fn from_unit(value: f64) -> Self {
        value
    }
}
