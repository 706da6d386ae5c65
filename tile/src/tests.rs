use alloc::vec;

use image_tile_texel::Buffer;

use crate::{PixelFormat, ShuffleTable, Tile, TileError, TileErrorKind, TileLayout};

#[test]
fn worked_example_sizes() -> Result<(), TileError> {
    let tile = Tile::new(4, 2, 3, PixelFormat::UInt8)?;

    assert_eq!(tile.pixel_count(), 8);
    assert_eq!(tile.channel_size(), 1);
    assert_eq!(tile.pixel_size(), 3);
    assert_eq!(tile.array_size(), 24);
    assert_eq!(tile.as_bytes().len(), 24);
    assert!(tile.owns_storage());

    let copy = tile.duplicate()?;
    assert_eq!(copy.array_size(), 24);
    assert_ne!(copy.as_bytes().as_ptr(), tile.as_bytes().as_ptr());
    assert_eq!(copy.as_bytes(), tile.as_bytes());

    Ok(())
}

#[test]
fn array_size_for_all_formats() -> Result<(), TileError> {
    for format in PixelFormat::ALL {
        for (width, height, channels) in [(1, 1, 1), (3, 5, 2), (64, 32, 4), (7, 1, 9)] {
            let tile = Tile::new(width, height, channels, format)?;
            let expected = width as usize * height as usize * channels * format.bytes();
            assert_eq!(tile.array_size(), expected, "{:?}", format);
            assert_eq!(tile.as_bytes().len(), expected, "{:?}", format);
        }
    }

    Ok(())
}

#[test]
fn zero_dimensions_rejected() {
    let kind = |result: Result<Tile<'static>, TileError>| result.unwrap_err().kind();

    assert_eq!(
        kind(Tile::new(0, 4, 3, PixelFormat::UInt8)),
        TileErrorKind::ZeroWidth
    );
    assert_eq!(
        kind(Tile::new(4, 0, 3, PixelFormat::UInt8)),
        TileErrorKind::ZeroHeight
    );
    assert_eq!(
        kind(Tile::new(4, 4, 0, PixelFormat::UInt8)),
        TileErrorKind::ZeroChannels
    );
}

#[test]
fn layout_byte_len() -> Result<(), TileError> {
    let layout = TileLayout::new(5, 3, 2, PixelFormat::UInt16)?;
    assert_eq!(layout.byte_len(), 5 * 3 * 2 * 2);
    assert_eq!(layout.byte_len(), layout.array_size());
    Ok(())
}

#[test]
fn oversized_layout_rejected() {
    let err = TileLayout::new(u32::MAX, u32::MAX, usize::MAX / 2, PixelFormat::Double);
    assert_eq!(err.unwrap_err().kind(), TileErrorKind::Overflow);
}

#[test]
fn borrowed_storage_is_used_in_place() -> Result<(), TileError> {
    let mut memory = [0u8; 40];
    let base = memory.as_ptr();

    let mut tile = Tile::with_storage(2, 2, 2, PixelFormat::UInt16, &mut memory)?;
    assert!(!tile.owns_storage());
    assert_eq!(tile.as_bytes().as_ptr(), base);
    // Only the bytes of the tile are part of it.
    assert_eq!(tile.as_bytes().len(), 16);

    tile.set_pixel(1, 1, &[0x0102u16, 0x0304]);
    drop(tile);

    let expected = [0x0102u16.to_ne_bytes(), 0x0304u16.to_ne_bytes()].concat();
    assert_eq!(&memory[12..16], &expected[..]);
    assert!(memory[16..].iter().all(|&b| b == 0));

    Ok(())
}

#[test]
fn borrowed_storage_too_small() {
    let mut memory = [0u8; 23];
    let err = Tile::with_storage(4, 2, 3, PixelFormat::UInt8, &mut memory).unwrap_err();

    assert_eq!(
        err.kind(),
        TileErrorKind::StorageTooSmall {
            required: 24,
            actual: 23
        }
    );
}

#[test]
fn duplicate_is_independent() -> Result<(), TileError> {
    let mut memory = vec![0u8; 4 * 4 * 4];
    let mut original = Tile::with_storage(4, 4, 1, PixelFormat::Float, &mut memory)?;
    original.fill(&[0.5f32]);

    let mut copy = original.duplicate()?;
    assert!(copy.owns_storage());
    copy.set_channel(2, 3, 0, 1.0f32);

    assert_eq!(original.get_channel::<f32>(2, 3, 0), 0.5);
    assert_eq!(copy.get_channel::<f32>(2, 3, 0), 1.0);
    assert_eq!(copy.get_channel::<f32>(1, 3, 0), 0.5);

    // The copy outlives the borrowed memory of its source.
    drop(original);
    drop(memory);
    assert_eq!(copy.get_channel::<f32>(0, 0, 0), 0.5);

    Ok(())
}

#[test]
fn clone_owns_storage() -> Result<(), TileError> {
    let mut memory = [7u8; 6];
    let tile = Tile::with_storage(3, 1, 2, PixelFormat::UInt8, &mut memory)?;

    let clone = tile.clone();
    assert!(clone.owns_storage());
    assert_eq!(clone.as_bytes(), &[7; 6]);
    assert_eq!(clone.layout(), tile.layout());

    Ok(())
}

#[test]
fn format_conversion_preserves_grid() -> Result<(), TileError> {
    let mut source = Tile::new(5, 3, 2, PixelFormat::UInt8)?;
    source.fill(&[255u8, 0]);
    source.set_pixel(4, 2, &[0u8, 255]);

    let converted = Tile::convert(&source, PixelFormat::UInt16, None)?;
    assert_eq!(converted.width(), 5);
    assert_eq!(converted.height(), 3);
    assert_eq!(converted.channel_count(), 2);
    assert_eq!(converted.array_size(), 5 * 3 * 2 * 2);

    let mut pixel = [0u16; 2];
    converted.get_pixel(0, 0, &mut pixel);
    assert_eq!(pixel, [0xffff, 0]);
    converted.get_pixel(4, 2, &mut pixel);
    assert_eq!(pixel, [0, 0xffff]);

    Ok(())
}

#[test]
fn conversion_into_borrowed_storage() -> Result<(), TileError> {
    let mut source = Tile::new(2, 2, 1, PixelFormat::Double)?;
    source.fill(&[0.25f64]);

    let mut memory = vec![0u8; 4];
    let converted = Tile::convert(&source, PixelFormat::UInt8, Some(&mut memory[..]))?;
    assert!(!converted.owns_storage());
    drop(converted);

    assert_eq!(memory, [64; 4]);
    Ok(())
}

#[test]
fn shuffle_drops_half_the_channels() -> Result<(), TileError> {
    let mut source = Tile::new(8, 8, 4, PixelFormat::UInt16)?;
    source.fill(&[1u16, 2, 3, 4]);

    let table = ShuffleTable::new(&[3, 1]);
    let shuffled = Tile::shuffle(&source, PixelFormat::UInt16, &table, None)?;

    assert_eq!(shuffled.channel_count(), 2);
    assert_eq!(shuffled.array_size(), source.array_size() / 2);

    let mut pixel = [0u16; 2];
    shuffled.get_pixel(7, 7, &mut pixel);
    assert_eq!(pixel, [4, 2]);

    Ok(())
}

#[test]
fn shuffle_rejects_bad_table() -> Result<(), TileError> {
    let source = Tile::new(2, 2, 3, PixelFormat::UInt8)?;

    let err = Tile::shuffle(&source, PixelFormat::UInt8, &ShuffleTable::new(&[0, 3]), None);
    assert_eq!(
        err.unwrap_err().kind(),
        TileErrorKind::ShuffleIndex {
            index: 3,
            channels: 3
        }
    );

    let err = Tile::shuffle(&source, PixelFormat::UInt8, &ShuffleTable::new(&[]), None);
    assert_eq!(err.unwrap_err().kind(), TileErrorKind::EmptyShuffle);

    Ok(())
}

#[test]
fn same_format_round_trip() -> Result<(), TileError> {
    for format in PixelFormat::ALL {
        let mut source = Tile::new(3, 3, 3, format)?;
        for (idx, byte) in source.as_bytes_mut().iter_mut().enumerate() {
            *byte = (idx * 37 % 251) as u8;
        }

        let duplicate = source.duplicate()?;
        let converted = Tile::convert(&source, format, None)?;
        let shuffled = Tile::shuffle(&source, format, &ShuffleTable::identity(3), None)?;

        assert_eq!(converted.as_bytes(), duplicate.as_bytes(), "{:?}", format);
        assert_eq!(shuffled.as_bytes(), duplicate.as_bytes(), "{:?}", format);
    }

    Ok(())
}

#[test]
fn dynamic_size_counts_array() -> Result<(), TileError> {
    let owned = Tile::new(16, 16, 4, PixelFormat::Float)?;
    assert_eq!(
        owned.dynamic_size(),
        core::mem::size_of::<Tile>() + 16 * 16 * 4 * 4
    );

    let mut memory = vec![0u8; 16 * 16 * 4 * 4];
    let borrowed = Tile::with_storage(16, 16, 4, PixelFormat::Float, &mut memory)?;
    assert_eq!(borrowed.dynamic_size(), owned.dynamic_size());

    Ok(())
}

#[test]
fn dynamic_size_counts_allocation() -> Result<(), TileError> {
    let tiny = Tile::new(1, 1, 1, PixelFormat::UInt8)?;
    let allocated = Buffer::try_new(1)?.capacity();
    assert!(allocated >= 8);
    assert_eq!(tiny.array_size(), 1);
    assert_eq!(tiny.dynamic_size(), core::mem::size_of::<Tile>() + allocated);

    // Odd sizes are rounded up for owned tiles, borrowed tiles count what they view.
    let owned = Tile::new(3, 1, 3, PixelFormat::UInt8)?;
    let allocated = Buffer::try_new(9)?.capacity();
    assert!(allocated >= 16);
    assert_eq!(owned.dynamic_size(), core::mem::size_of::<Tile>() + allocated);
    assert_eq!(owned.duplicate()?.dynamic_size(), owned.dynamic_size());

    let mut memory = vec![0u8; 32];
    let borrowed = Tile::with_storage(3, 1, 3, PixelFormat::UInt8, &mut memory)?;
    assert_eq!(borrowed.dynamic_size(), core::mem::size_of::<Tile>() + 9);

    Ok(())
}

#[test]
fn aligned_sample_views() -> Result<(), TileError> {
    let mut tile = Tile::new(4, 4, 3, PixelFormat::Float)?;
    tile.as_samples_mut::<f32>().unwrap().fill(0.75);
    assert_eq!(tile.get_channel::<f32>(3, 3, 2), 0.75);
    assert_eq!(tile.as_samples::<f32>().map(<[f32]>::len), Some(48));

    Ok(())
}

#[test]
#[should_panic(expected = "out of bounds")]
fn pixel_out_of_bounds() {
    let tile = Tile::new(4, 2, 3, PixelFormat::UInt8).unwrap();
    tile.pixel(4, 0);
}

#[test]
#[should_panic(expected = "channel 3 out of bounds")]
fn channel_out_of_bounds() {
    let tile = Tile::new(4, 2, 3, PixelFormat::UInt8).unwrap();
    tile.channel(0, 0, 3);
}

#[test]
#[should_panic(expected = "sample type does not match")]
fn wrong_sample_type() {
    let tile = Tile::new(4, 2, 3, PixelFormat::UInt8).unwrap();
    tile.get_channel::<u16>(0, 0, 0);
}

#[cfg(feature = "std")]
#[test]
fn persistence_unsupported() -> Result<(), TileError> {
    use crate::Persist;
    use std::io::Cursor;

    let mut tile = Tile::new(2, 2, 1, PixelFormat::UInt8)?;
    tile.fill(&[9u8]);

    let mut output = Vec::new();
    let err = tile.serialize(&mut output).unwrap_err();
    assert!(err.is_unsupported());
    assert!(output.is_empty());

    let mut input = Cursor::new(vec![1u8, 2, 3, 4]);
    let err = tile.deserialize(&mut input).unwrap_err();
    assert_eq!(err.kind(), TileErrorKind::Unsupported);
    assert_eq!(input.position(), 0);
    assert_eq!(tile.as_bytes(), &[9; 4]);

    Ok(())
}
