use brunch::Bench;

use image_tile::{PixelFormat, ShuffleTable, Tile, TileError};

#[derive(Debug)]
struct Convert {
    format_in: PixelFormat,
    channels: usize,
    format_out: PixelFormat,
    shuffle: Option<&'static [usize]>,
    sz: u32,
}

impl Convert {
    fn name(&self) -> String {
        format!(
            "convert({}x{:?}, {:?}, {:?}, {})",
            self.channels, self.format_in, self.format_out, self.shuffle, self.sz
        )
    }

    fn prepare(&self) -> Result<impl FnMut(), TileError> {
        let from = Tile::new(self.sz, self.sz, self.channels, self.format_in)?;
        let format = self.format_out;
        let table = self.shuffle.map(ShuffleTable::new);

        Ok(move || {
            let tile = match &table {
                Some(table) => Tile::shuffle(&from, format, table, None),
                None => Tile::convert(&from, format, None),
            };

            core::hint::black_box(tile.expect("Failed to convert tile"));
        })
    }
}

fn main() {
    let tests = [
        /* plain format changes */
        Convert {
            format_in: PixelFormat::UInt8,
            channels: 4,
            format_out: PixelFormat::UInt8,
            shuffle: None,
            sz: 64,
        },
        Convert {
            format_in: PixelFormat::UInt8,
            channels: 4,
            format_out: PixelFormat::Float,
            shuffle: None,
            sz: 64,
        },
        Convert {
            format_in: PixelFormat::Float,
            channels: 4,
            format_out: PixelFormat::UInt16,
            shuffle: None,
            sz: 64,
        },
        Convert {
            format_in: PixelFormat::Half,
            channels: 3,
            format_out: PixelFormat::Double,
            shuffle: None,
            sz: 64,
        },
        /* conversions that add or drop channels */
        Convert {
            format_in: PixelFormat::UInt8,
            channels: 4,
            format_out: PixelFormat::UInt8,
            shuffle: Some(&[2, 1, 0]),
            sz: 64,
        },
        Convert {
            format_in: PixelFormat::UInt8,
            channels: 3,
            format_out: PixelFormat::Float,
            shuffle: Some(&[0, 1, 2, 2]),
            sz: 64,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|convert| {
        Bench::new(format!("tile::conversion::main::{}", convert.name()))
            .run(convert.prepare().expect("Failed to setup benchmark"))
    }));
    benches.finish();
}
