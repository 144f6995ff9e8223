use std::{ffi::OsStr, path::Path};

use image::RgbaImage;

use crate::{
    constants::{PAGE_WIDTH, TILE_HEIGHT, TILE_WIDTH},
    error::StyError,
    parser::parse_sty,
    types::{PaletteCategory, Sty},
};

impl Sty {
    pub fn open_from_bytes(i: &[u8]) -> Result<Sty, StyError> {
        parse_sty(i)
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<Sty, StyError> {
        let file = std::fs::read(path).map_err(|op| StyError::IOError { source: op })?;

        Self::open_from_bytes(&file)
    }

    /// Converts a tile to RGBA through its resolved palette.
    pub fn tile_to_rgba8(&self, tile_index: usize) -> Result<RgbaImage, StyError> {
        let tile = &self.tiles[tile_index];

        let virtual_index = self.palette_base.offset(PaletteCategory::Tile) as usize + tile_index;
        let palette = self.physical_palette(virtual_index)?;

        let mut image = RgbaImage::new(TILE_WIDTH as u32, TILE_HEIGHT as u32);

        image.enumerate_rows_mut().for_each(|(_, pixel_row)| {
            pixel_row.for_each(|(x, y, pixel)| {
                let color_index = tile.0[(x + y * TILE_WIDTH as u32) as usize];
                *pixel = palette.rgba(color_index).into();
            })
        });

        Ok(image)
    }

    /// Converts a sprite to RGBA. Sprite pixels sit in the 256 pixel wide
    /// sprite store at the page coordinates decomposed from the entry offset.
    pub fn sprite_to_rgba8(&self, sprite_index: usize) -> Result<RgbaImage, StyError> {
        let entry = &self.sprites[sprite_index];

        let virtual_index =
            self.palette_base.offset(PaletteCategory::Sprite) as usize + sprite_index;
        let palette = self.physical_palette(virtual_index)?;

        let source_x = entry.offset as usize % PAGE_WIDTH;
        let source_y = entry.offset as usize / PAGE_WIDTH;

        let mut image = RgbaImage::new(entry.width as u32, entry.height as u32);

        image.enumerate_rows_mut().for_each(|(_, pixel_row)| {
            pixel_row.for_each(|(x, y, pixel)| {
                let store_index = (source_y + y as usize) * PAGE_WIDTH + source_x + x as usize;
                let color_index = self.sprite_store[store_index];
                *pixel = palette.rgba(color_index).into();
            })
        });

        Ok(image)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        test_utils::{chunk, style_file},
        Sty,
    };

    // Palette page where palette 1 maps color 1 to green; palette 0 maps
    // color 1 to red. Color 0 stays black in both.
    fn palette_page() -> Vec<u8> {
        let mut payload = vec![0u8; 65536];
        payload[(1 * 64) * 4..(1 * 64) * 4 + 4].copy_from_slice(&0x00FF0000u32.to_le_bytes());
        payload[(1 * 64 + 1) * 4..(1 * 64 + 1) * 4 + 4]
            .copy_from_slice(&0x0000FF00u32.to_le_bytes());
        payload
    }

    #[test]
    fn tiles_resolve_their_palette_from_the_tile_base() {
        let mut tile_page = vec![0u8; 65536];
        // tile 0, pixel (1, 0)
        tile_page[1] = 1;

        let mut palette_index = vec![0u8; 32768];
        // virtual palette 0 (tile 0) -> physical palette 1
        palette_index[0] = 1;

        let file = style_file(&[
            chunk(b"PALX", &palette_index),
            chunk(b"PPAL", &palette_page()),
            chunk(b"PALB", &[0u8; 16]),
            chunk(b"TILE", &tile_page),
        ]);

        let sty = Sty::open_from_bytes(&file).unwrap();
        let image = sty.tile_to_rgba8(0).unwrap();

        assert_eq!(image.dimensions(), (64, 64));
        assert_eq!(image.get_pixel(1, 0).0, [0, 255, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn sprites_read_page_coordinates_from_their_store_offset() {
        // 4x2 sprite at store offset 258, that is page coordinates (2, 1).
        let mut store = vec![0u8; 1024];
        store[1 * 256 + 2] = 1; // sprite pixel (0, 0)
        store[2 * 256 + 3] = 1; // sprite pixel (1, 1)

        let file = style_file(&[
            chunk(b"PALX", &vec![0u8; 32768]),
            chunk(b"PPAL", &palette_page()),
            chunk(b"PALB", &[0u8; 16]),
            chunk(b"SPRG", &store),
            chunk(b"SPRX", &[2, 1, 0, 0, 4, 2, 0, 0]),
        ]);

        let sty = Sty::open_from_bytes(&file).unwrap();
        let image = sty.sprite_to_rgba8(0).unwrap();

        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }
}
