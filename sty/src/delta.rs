use crate::{
    constants::PAGE_WIDTH,
    error::StyError,
    parser::parse_delta_entry,
    types::{DeltaFrame, PaletteCategory, Sty},
};

impl Sty {
    /// Reconstructs every delta variant of every sprite that has deltas.
    ///
    /// The delta store is one stream shared by all patch sets. It is consumed
    /// behind a single cursor, strictly in the order the sets were declared,
    /// so patch sets can never be replayed out of order or individually.
    pub fn delta_frames(&self) -> Result<Vec<DeltaFrame>, StyError> {
        let mut frames = vec![];
        let mut store = self.delta_store.as_slice();

        for delta in &self.deltas {
            let sprite_index = delta.sprite as usize;
            let base = self.sprite_to_rgba8(sprite_index)?;

            // Patches use the same palette as the sprite they modify.
            let virtual_index =
                self.palette_base.offset(PaletteCategory::Sprite) as usize + sprite_index;
            let palette = self.physical_palette(virtual_index)?;

            for (frame, &size) in delta.sizes.iter().enumerate() {
                let mut image = base.clone();
                let mut consumed = 0usize;
                let mut position = 0u32;

                while consumed < size as usize {
                    let (rest, entry) = parse_delta_entry(store).map_err(|op| {
                        StyError::NomError {
                            source: op.to_owned(),
                        }
                    })?;
                    store = rest;

                    position += entry.offset as u32;

                    let x = position % PAGE_WIDTH as u32;
                    let y = position / PAGE_WIDTH as u32;

                    for (run, &color_index) in entry.data.iter().enumerate() {
                        image.put_pixel(x + run as u32, y, palette.rgba(color_index).into());
                    }

                    position += entry.data.len() as u32;
                    consumed += 3 + entry.data.len();
                }

                frames.push(DeltaFrame {
                    sprite: delta.sprite,
                    frame,
                    image,
                });
            }
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        test_utils::{chunk, style_file},
        Sty,
    };

    // One page of palettes where palette 0 maps color 5 to red and color 6
    // to blue; everything else stays black.
    fn palette_page() -> Vec<u8> {
        let mut payload = vec![0u8; 65536];
        payload[5 * 64 * 4..5 * 64 * 4 + 4].copy_from_slice(&0x00FF0000u32.to_le_bytes());
        payload[6 * 64 * 4..6 * 64 * 4 + 4].copy_from_slice(&0x000000FFu32.to_le_bytes());
        payload
    }

    // A single 16x2 sprite at store offset 0, all pixels on color 0.
    fn style_with_deltas(dels: &[u8], delx: &[u8]) -> Sty {
        let file = style_file(&[
            chunk(b"PALX", &vec![0u8; 32768]),
            chunk(b"PPAL", &palette_page()),
            chunk(b"PALB", &[0u8; 16]),
            chunk(b"SPRG", &vec![0u8; 512]),
            chunk(b"SPRX", &[0, 0, 0, 0, 16, 2, 0, 0]),
            chunk(b"DELS", dels),
            chunk(b"DELX", delx),
        ]);

        Sty::open_from_bytes(&file).unwrap()
    }

    #[test]
    fn patch_runs_land_on_the_advanced_position() {
        let sty = style_with_deltas(
            &[10, 0, 2, 5, 6],
            &[0, 0, 1, 0, 5, 0], // sprite 0, one frame of 5 bytes
        );

        let frames = sty.delta_frames().unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].sprite, 0);
        assert_eq!(frames[0].frame, 0);

        let image = &frames[0].image;
        assert_eq!(image.dimensions(), (16, 2));
        assert_eq!(image.get_pixel(10, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(11, 0).0, [0, 0, 255, 255]);

        // every other pixel keeps the base color
        for (x, y, pixel) in image.enumerate_pixels() {
            if (x, y) != (10, 0) && (x, y) != (11, 0) {
                assert_eq!(pixel.0, [0, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn the_store_cursor_advances_across_frames() {
        // Two frames of the same sprite; the second frame's patches start
        // where the first frame's ended.
        let sty = style_with_deltas(
            &[1, 0, 2, 5, 6, 3, 0, 2, 6, 5],
            &[0, 0, 2, 0, 5, 0, 5, 0],
        );

        let frames = sty.delta_frames().unwrap();

        assert_eq!(frames.len(), 2);

        let first = &frames[0].image;
        assert_eq!(first.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(first.get_pixel(2, 0).0, [0, 0, 255, 255]);

        // Frames clone the base sprite, not the previous frame, and read
        // their own slice of the store.
        let second = &frames[1].image;
        assert_eq!(second.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(second.get_pixel(2, 0).0, [0, 0, 0, 255]);
        assert_eq!(second.get_pixel(3, 0).0, [0, 0, 255, 255]);
        assert_eq!(second.get_pixel(4, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let sty = style_with_deltas(&[10, 0, 2, 5, 6], &[0, 0, 1, 0, 5, 0]);

        let first = sty.delta_frames().unwrap();
        let second = sty.delta_frames().unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.image.as_raw(), b.image.as_raw());
        }
    }
}
