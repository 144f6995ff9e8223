pub const STY_MAGIC: [u8; 4] = *b"GBST";
pub const STY_VERSION: u16 = 1;

pub const COLORS_PER_PALETTE: usize = 256;
pub const PALETTES_PER_PAGE: usize = 64;
pub const PALETTE_LENGTH: usize = COLORS_PER_PALETTE * 4;
pub const VIRTUAL_PALETTE_COUNT: usize = 16384;

pub const TILE_WIDTH: usize = 64;
pub const TILE_HEIGHT: usize = 64;
pub const TILE_LENGTH: usize = TILE_WIDTH * TILE_HEIGHT;

/// Tile and sprite graphics are packed into 256 pixel wide pages.
pub const PAGE_WIDTH: usize = 256;
pub const PAGE_WIDTH_IN_TILES: usize = PAGE_WIDTH / TILE_WIDTH;

pub const SPRITE_ENTRY_LENGTH: usize = 8;
pub const OBJECT_INFO_LENGTH: usize = 2;
pub const PALETTE_BASE_LENGTH: usize = 16;
pub const SPRITE_BASE_LENGTH: usize = 12;
pub const CAR_INFO_FIXED_LENGTH: usize = 14;
pub const DELTA_INDEX_HEADER_LENGTH: usize = 4;

pub const MAX_RECYCLABLE_CARS: usize = 64;
pub const RECYCLABLE_END: u8 = 255;
