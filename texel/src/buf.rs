// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019 The `image-rs` developers
use core::{fmt, mem};

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use crate::sample::Sample;

/// The unit of allocation, aligned for every supported sample type.
type MaxAligned = u64;

const MAX_ALIGN: usize = mem::align_of::<MaxAligned>();

/// Allocates and manages raw bytes.
///
/// Provides a utility to allocate a slice of bytes aligned to the maximally required alignment of
/// any [`Sample`]. The logical length is tracked by the buffer itself: [`Buffer::as_bytes`] always
/// has exactly the requested length even though the allocation is rounded up to whole aligned
/// units.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    /// The backing memory.
    inner: Vec<MaxAligned>,
    /// The logical number of bytes.
    len: usize,
}

/// The allocator refused to provide the requested number of bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    requested: usize,
}

impl Buffer {
    /// Allocate a new, zeroed buffer with a number of bytes.
    ///
    /// Aborts like `Vec` does when the allocation fails. See [`Buffer::try_new`] for a fallible
    /// version.
    pub fn new(length: usize) -> Self {
        let inner = alloc::vec![0; Self::alloc_len(length)];
        Buffer { inner, len: length }
    }

    /// Allocate a new, zeroed buffer, reporting allocation failure to the caller.
    pub fn try_new(length: usize) -> Result<Self, AllocError> {
        let alloc_len = Self::alloc_len(length);
        let mut inner = Vec::new();
        inner
            .try_reserve_exact(alloc_len)
            .map_err(|err| AllocError::new(length, err))?;
        inner.resize(alloc_len, 0);

        Ok(Buffer { inner, len: length })
    }

    /// Allocate a buffer holding a copy of the given bytes.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, AllocError> {
        let mut buffer = Self::try_new(bytes.len())?;
        buffer.as_bytes_mut().copy_from_slice(bytes);
        Ok(buffer)
    }

    /// The logical length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Retrieve the byte capacity of the allocated storage.
    ///
    /// This is at least [`Buffer::len`] but rounded up to the alignment unit.
    pub fn capacity(&self) -> usize {
        self.inner.capacity() * mem::size_of::<MaxAligned>()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<MaxAligned, u8>(&self.inner)[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<MaxAligned, u8>(&mut self.inner)[..self.len]
    }

    /// View the bytes as a slice of samples.
    ///
    /// Trailing bytes that do not form a complete sample are not part of the slice. The buffer is
    /// always sufficiently aligned so this can not fail.
    pub fn as_samples<T: Sample>(&self) -> &[T] {
        let bytes = self.as_bytes();
        let whole = bytes.len() - bytes.len() % mem::size_of::<T>();
        bytemuck::cast_slice(&bytes[..whole])
    }

    /// View the bytes as a mutable slice of samples.
    pub fn as_samples_mut<T: Sample>(&mut self) -> &mut [T] {
        let bytes = self.as_bytes_mut();
        let whole = bytes.len() - bytes.len() % mem::size_of::<T>();
        bytemuck::cast_slice_mut(&mut bytes[..whole])
    }

    /// Check if the buffer starts at the same address as a byte slice.
    pub fn ptr_eq(&self, other: &[u8]) -> bool {
        core::ptr::eq(self.as_bytes().as_ptr(), other.as_ptr())
    }

    /// Calculates the number of elements to have a byte buffer of requested length.
    fn alloc_len(length: usize) -> usize {
        const CHUNK_SIZE: usize = mem::size_of::<MaxAligned>();
        assert!(CHUNK_SIZE >= MAX_ALIGN);

        // We allocated enough chunks for at least the length. This can never overflow.
        length / CHUNK_SIZE + usize::from(length % CHUNK_SIZE != 0)
    }
}

impl From<&'_ [u8]> for Buffer {
    fn from(bytes: &'_ [u8]) -> Self {
        let mut buffer = Buffer::new(bytes.len());
        buffer.as_bytes_mut().copy_from_slice(bytes);
        buffer
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl AllocError {
    fn new(requested: usize, _: TryReserveError) -> Self {
        AllocError { requested }
    }

    /// The number of bytes that could not be allocated.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to allocate {} bytes of pixel storage", self.requested)
    }
}

impl core::error::Error for AllocError {}
