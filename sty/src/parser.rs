use nom::{
    bytes::complete::take,
    combinator::map,
    multi::count,
    number::complete::{le_i8, le_u16, le_u32, le_u8},
    sequence::tuple,
    IResult as _IResult,
};

use crate::{
    constants::{
        CAR_INFO_FIXED_LENGTH, COLORS_PER_PALETTE, DELTA_INDEX_HEADER_LENGTH,
        MAX_RECYCLABLE_CARS, OBJECT_INFO_LENGTH, PAGE_WIDTH, PAGE_WIDTH_IN_TILES,
        PALETTES_PER_PAGE, PALETTE_BASE_LENGTH, PALETTE_LENGTH, RECYCLABLE_END,
        SPRITE_BASE_LENGTH, SPRITE_ENTRY_LENGTH, STY_MAGIC, STY_VERSION, TILE_HEIGHT,
        TILE_LENGTH, TILE_WIDTH, VIRTUAL_PALETTE_COUNT,
    },
    error::StyError,
    types::{
        CarInfo, DeltaEntry, DoorInfo, FontBase, ObjectInfo, PaletteBase, PaletteIndex, Palette,
        SpriteBase, SpriteDelta, SpriteEntry, Sty, StyHeader, Surface, SurfaceKind, Tile,
    },
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

fn tag_name(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

fn nom_error(err: nom::Err<nom::error::Error<&[u8]>>) -> StyError {
    StyError::NomError {
        source: err.to_owned(),
    }
}

fn size_mismatch(tag: &[u8; 4], expected: usize, actual: usize) -> StyError {
    StyError::SizeMismatch {
        tag: tag_name(tag),
        expected,
        actual,
    }
}

fn expect_length(tag: &[u8; 4], expected: usize, payload: &[u8]) -> Result<(), StyError> {
    if payload.len() != expected {
        return Err(size_mismatch(tag, expected, payload.len()));
    }

    Ok(())
}

/// Colors are stored as 32 bit values with red in bits 16-23, green in 8-15
/// and blue in 0-7. The format carries no alpha so the output is always
/// opaque, including color 0.
fn convert_color(value: u32) -> [u8; 4] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8, 255]
}

fn parse_file_header(i: &[u8]) -> IResult<StyHeader> {
    map(tuple((count(le_u8, 4), le_u16)), |(magic, version)| {
        StyHeader { magic, version }
    })(i)
}

fn parse_chunk_header(i: &[u8]) -> IResult<([u8; 4], u32)> {
    tuple((
        map(take(4usize), |tag: &[u8]| [tag[0], tag[1], tag[2], tag[3]]),
        le_u32,
    ))(i)
}

fn decode_palette_index(payload: &[u8]) -> Result<PaletteIndex, StyError> {
    expect_length(b"PALX", VIRTUAL_PALETTE_COUNT * 2, payload)?;

    let (_, entries) = count(le_u16, VIRTUAL_PALETTE_COUNT)(payload).map_err(nom_error)?;

    Ok(PaletteIndex(entries))
}

fn decode_physical_palettes(payload: &[u8]) -> Result<Vec<Palette>, StyError> {
    if payload.len() % PALETTE_LENGTH != 0 {
        return Err(size_mismatch(
            b"PPAL",
            payload.len().next_multiple_of(PALETTE_LENGTH),
            payload.len(),
        ));
    }

    let palette_count = payload.len() / PALETTE_LENGTH;
    let page_count = palette_count / PALETTES_PER_PAGE;

    let (_, words) = count(le_u32, payload.len() / 4)(payload).map_err(nom_error)?;

    let mut palettes = vec![Palette::default(); palette_count];

    // Within a page of 64 palettes the stream is color-major:
    // C0P0 C0P1 .. C0P63, C1P0 .. C255P63. Transpose to palette-major.
    for page in 0..page_count {
        for color in 0..COLORS_PER_PALETTE {
            for palette in 0..PALETTES_PER_PAGE {
                let word = words[(page * COLORS_PER_PALETTE + color) * PALETTES_PER_PAGE + palette];
                palettes[page * PALETTES_PER_PAGE + palette].0[color] = convert_color(word);
            }
        }
    }

    Ok(palettes)
}

fn decode_palette_base(payload: &[u8]) -> Result<PaletteBase, StyError> {
    expect_length(b"PALB", PALETTE_BASE_LENGTH, payload)?;

    let (
        _,
        (
            tile,
            sprite,
            car_remap,
            ped_remap,
            code_object_remap,
            map_object_remap,
            user_remap,
            font_remap,
        ),
    ) = tuple((
        le_u16, le_u16, le_u16, le_u16, le_u16, le_u16, le_u16, le_u16,
    ))(payload)
    .map_err(nom_error)?;

    Ok(PaletteBase {
        tile,
        sprite,
        car_remap,
        ped_remap,
        code_object_remap,
        map_object_remap,
        user_remap,
        font_remap,
    })
}

fn decode_sprite_base(payload: &[u8]) -> Result<SpriteBase, StyError> {
    expect_length(b"SPRB", SPRITE_BASE_LENGTH, payload)?;

    let (_, (car, ped, code_object, map_object, user, font)) =
        tuple((le_u16, le_u16, le_u16, le_u16, le_u16, le_u16))(payload).map_err(nom_error)?;

    Ok(SpriteBase {
        car,
        ped,
        code_object,
        map_object,
        user,
        font,
    })
}

fn decode_tiles(payload: &[u8]) -> Result<Vec<Tile>, StyError> {
    if payload.len() % TILE_LENGTH != 0 {
        return Err(size_mismatch(
            b"TILE",
            payload.len().next_multiple_of(TILE_LENGTH),
            payload.len(),
        ));
    }

    let tile_count = payload.len() / TILE_LENGTH;
    let mut tiles = Vec::with_capacity(tile_count);

    // Tiles are packed into 256x256 pixel pages, 4x4 tiles each, and the
    // pages are stacked vertically in the payload.
    for tile_index in 0..tile_count {
        let tile_row = tile_index / PAGE_WIDTH_IN_TILES;
        let tile_col = tile_index % PAGE_WIDTH_IN_TILES;

        let mut color_indices = vec![0u8; TILE_LENGTH];

        for y in 0..TILE_HEIGHT {
            for x in 0..TILE_WIDTH {
                let page_index =
                    x + tile_col * TILE_WIDTH + (y + tile_row * TILE_HEIGHT) * PAGE_WIDTH;
                color_indices[x + y * TILE_WIDTH] = payload[page_index];
            }
        }

        tiles.push(Tile(color_indices));
    }

    Ok(tiles)
}

fn parse_sprite_entry(i: &[u8]) -> IResult<SpriteEntry> {
    map(
        tuple((le_u32, le_u8, le_u8, le_u16)),
        |(offset, width, height, pad)| SpriteEntry {
            offset,
            width,
            height,
            pad,
        },
    )(i)
}

fn decode_sprite_entries(payload: &[u8]) -> Result<Vec<SpriteEntry>, StyError> {
    if payload.len() % SPRITE_ENTRY_LENGTH != 0 {
        return Err(size_mismatch(
            b"SPRX",
            payload.len().next_multiple_of(SPRITE_ENTRY_LENGTH),
            payload.len(),
        ));
    }

    let (_, entries) = count(parse_sprite_entry, payload.len() / SPRITE_ENTRY_LENGTH)(payload)
        .map_err(nom_error)?;

    Ok(entries)
}

fn decode_sprite_deltas(payload: &[u8]) -> Result<Vec<SpriteDelta>, StyError> {
    let mut deltas = vec![];
    let mut i = payload;

    while !i.is_empty() {
        let consumed = payload.len() - i.len();

        let (rest, (sprite, frame_count, _pad)) = tuple((le_u16, le_u8, le_u8))(i)
            .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| {
                size_mismatch(b"DELX", consumed + DELTA_INDEX_HEADER_LENGTH, payload.len())
            })?;

        let sizes_length = frame_count as usize * 2;
        if rest.len() < sizes_length {
            return Err(size_mismatch(
                b"DELX",
                consumed + DELTA_INDEX_HEADER_LENGTH + sizes_length,
                payload.len(),
            ));
        }

        let (rest, sizes) = count(le_u16, frame_count as usize)(rest).map_err(nom_error)?;

        deltas.push(SpriteDelta { sprite, sizes });
        i = rest;
    }

    Ok(deltas)
}

/// One patch from the delta store: position advance, run length, then that
/// many color indices.
pub(crate) fn parse_delta_entry(i: &[u8]) -> IResult<DeltaEntry> {
    let (i, (offset, length)) = tuple((le_u16, le_u8))(i)?;
    let (i, data) = take(length as usize)(i)?;

    Ok((i, DeltaEntry { offset, data }))
}

fn decode_font_base(payload: &[u8]) -> Result<FontBase, StyError> {
    let (i, font_count) = le_u16(payload).map_err(nom_error)?;
    let (_, characters) = count(le_u16, font_count as usize)(i).map_err(nom_error)?;

    // The chunk stores character counts; the base of each font is the
    // running sum of the fonts before it.
    let mut bases = Vec::with_capacity(characters.len());
    let mut offset = 0u16;

    for &character_count in &characters {
        bases.push(offset);
        offset += character_count;
    }

    Ok(FontBase { characters, bases })
}

fn decode_car_infos(payload: &[u8]) -> Result<Vec<CarInfo>, StyError> {
    let mut cars = vec![];
    let mut i = payload;

    while !i.is_empty() {
        let consumed = payload.len() - i.len();

        if i.len() < CAR_INFO_FIXED_LENGTH {
            return Err(size_mismatch(
                b"CARI",
                consumed + CAR_INFO_FIXED_LENGTH,
                payload.len(),
            ));
        }

        let (rest, (model, sprite, width, height, num_remaps, passengers, wreck, rating)) =
            tuple((le_u8, le_u8, le_u8, le_u8, le_u8, le_u8, le_u8, le_u8))(i)
                .map_err(nom_error)?;
        let (rest, (front_wheel_offset, rear_wheel_offset, front_window_offset, rear_window_offset)) =
            tuple((le_i8, le_i8, le_i8, le_i8))(rest).map_err(nom_error)?;
        let (rest, (info_flags, info_flags2)) = tuple((le_u8, le_u8))(rest).map_err(nom_error)?;

        // remap list plus the door count byte
        if rest.len() < num_remaps as usize + 1 {
            return Err(size_mismatch(
                b"CARI",
                consumed + CAR_INFO_FIXED_LENGTH + num_remaps as usize + 1,
                payload.len(),
            ));
        }

        let (rest, remaps) = count(le_u8, num_remaps as usize)(rest).map_err(nom_error)?;
        let (rest, num_doors) = le_u8(rest).map_err(nom_error)?;

        if rest.len() < num_doors as usize * 2 {
            return Err(size_mismatch(
                b"CARI",
                consumed + CAR_INFO_FIXED_LENGTH + num_remaps as usize + 1 + num_doors as usize * 2,
                payload.len(),
            ));
        }

        let (rest, doors) = count(
            map(tuple((le_i8, le_i8)), |(rel_x, rel_y)| DoorInfo {
                rel_x,
                rel_y,
            }),
            num_doors as usize,
        )(rest)
        .map_err(nom_error)?;

        cars.push(CarInfo {
            model,
            sprite,
            width,
            height,
            passengers,
            wreck,
            rating,
            front_wheel_offset,
            rear_wheel_offset,
            front_window_offset,
            rear_window_offset,
            info_flags,
            info_flags2,
            remaps,
            doors,
        });

        i = rest;
    }

    Ok(cars)
}

fn decode_object_infos(payload: &[u8]) -> Result<Vec<ObjectInfo>, StyError> {
    if payload.len() % OBJECT_INFO_LENGTH != 0 {
        return Err(size_mismatch(
            b"OBJI",
            payload.len().next_multiple_of(OBJECT_INFO_LENGTH),
            payload.len(),
        ));
    }

    let (_, objects) = count(
        map(tuple((le_u8, le_u8)), |(model, sprites)| ObjectInfo {
            model,
            sprites,
        }),
        payload.len() / OBJECT_INFO_LENGTH,
    )(payload)
    .map_err(nom_error)?;

    Ok(objects)
}

fn decode_recyclable_cars(payload: &[u8]) -> Result<Vec<u8>, StyError> {
    if payload.len() > MAX_RECYCLABLE_CARS {
        return Err(size_mismatch(b"RECY", MAX_RECYCLABLE_CARS, payload.len()));
    }

    Ok(payload
        .iter()
        .copied()
        .take_while(|&model| model != RECYCLABLE_END)
        .collect())
}

fn decode_surfaces(payload: &[u8]) -> Result<Vec<Surface>, StyError> {
    let mut surfaces = vec![Surface::default(); SurfaceKind::COUNT];
    let mut i = payload;

    // Nine zero-terminated tile lists, one per surface behavior, in the
    // fixed SurfaceKind order. A short chunk leaves the tail empty.
    for surface in surfaces.iter_mut() {
        while !i.is_empty() {
            let (rest, value) = le_u16(i).map_err(nom_error)?;
            i = rest;

            if value == 0 {
                break;
            }

            surface.tiles.push(value);
        }

        if i.is_empty() {
            break;
        }
    }

    if !i.is_empty() {
        return Err(size_mismatch(
            b"SPEC",
            payload.len() - i.len(),
            payload.len(),
        ));
    }

    Ok(surfaces)
}

pub fn parse_sty(i: &[u8]) -> Result<Sty, StyError> {
    let file = i;

    let (i, header) = parse_file_header(i).map_err(nom_error)?;

    if header.magic != STY_MAGIC {
        return Err(StyError::MalformedHeader);
    }

    if header.version != STY_VERSION {
        return Err(StyError::UnsupportedVersion {
            version: header.version,
        });
    }

    let mut sty = Sty {
        header,
        ..Default::default()
    };

    let mut i = i;

    while !i.is_empty() {
        let offset = file.len() - i.len();

        let (rest, (tag, length)) = parse_chunk_header(i).map_err(nom_error)?;
        let length = length as usize;

        if length > rest.len() {
            return Err(StyError::TruncatedChunk {
                tag: tag_name(&tag),
                offset,
            });
        }

        let payload = &rest[..length];

        match &tag {
            b"PALX" => sty.palette_index = decode_palette_index(payload)?,
            b"PPAL" => sty.palettes = decode_physical_palettes(payload)?,
            b"PALB" => sty.palette_base = decode_palette_base(payload)?,
            b"SPRB" => sty.sprite_base = decode_sprite_base(payload)?,
            b"TILE" => sty.tiles = decode_tiles(payload)?,
            b"SPRG" => sty.sprite_store = payload.to_vec(),
            b"SPRX" => sty.sprites = decode_sprite_entries(payload)?,
            b"DELS" => sty.delta_store = payload.to_vec(),
            b"DELX" => sty.deltas = decode_sprite_deltas(payload)?,
            b"FONB" => sty.font_base = decode_font_base(payload)?,
            b"CARI" => sty.cars = decode_car_infos(payload)?,
            b"OBJI" => sty.objects = decode_object_infos(payload)?,
            b"RECY" => sty.recyclable_cars = decode_recyclable_cars(payload)?,
            b"SPEC" => sty.surfaces = decode_surfaces(payload)?,
            b"PSXT" => {
                return Err(StyError::UnsupportedChunk {
                    tag: tag_name(&tag),
                })
            }
            // Unknown chunks are skipped whole; consuming anything less
            // desyncs every chunk that follows.
            _ => {}
        }

        i = &rest[length..];
    }

    Ok(sty)
}
