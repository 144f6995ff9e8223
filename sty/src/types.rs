use image::RgbaImage;

use crate::{
    constants::{COLORS_PER_PALETTE, VIRTUAL_PALETTE_COUNT},
    error::StyError,
};

#[derive(Debug, Clone, Default)]
pub struct StyHeader {
    pub magic: Vec<u8>,
    pub version: u16,
}

/// Mapping of virtual palette numbers to physical palette numbers.
///
/// Every paletted asset refers to a virtual palette which has to be resolved
/// through this table before any color lookup.
#[derive(Debug, Clone, Default)]
pub struct PaletteIndex(pub Vec<u16>);

/// 256 RGBA colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(pub Vec<[u8; 4]>);

impl Default for Palette {
    fn default() -> Self {
        Self(vec![[0, 0, 0, 0]; COLORS_PER_PALETTE])
    }
}

impl Palette {
    pub fn rgba(&self, color_index: u8) -> [u8; 4] {
        self.0[color_index as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCategory {
    Tile,
    Sprite,
    CarRemap,
    PedRemap,
    CodeObjectRemap,
    MapObjectRemap,
    UserRemap,
    FontRemap,
}

/// Palette counts per category. The virtual palette space is carved into
/// contiguous category ranges by running sum over these counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteBase {
    pub tile: u16,
    pub sprite: u16,
    pub car_remap: u16,
    pub ped_remap: u16,
    pub code_object_remap: u16,
    pub map_object_remap: u16,
    pub user_remap: u16,
    pub font_remap: u16,
}

impl PaletteBase {
    fn counts(&self) -> [u16; 8] {
        [
            self.tile,
            self.sprite,
            self.car_remap,
            self.ped_remap,
            self.code_object_remap,
            self.map_object_remap,
            self.user_remap,
            self.font_remap,
        ]
    }

    pub fn count(&self, category: PaletteCategory) -> u16 {
        self.counts()[category as usize]
    }

    /// First virtual palette number of the category.
    pub fn offset(&self, category: PaletteCategory) -> u32 {
        self.counts()
            .iter()
            .take(category as usize)
            .map(|&count| count as u32)
            .sum()
    }

    pub fn total(&self) -> u32 {
        self.counts().iter().map(|&count| count as u32).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteCategory {
    Car,
    Ped,
    CodeObject,
    MapObject,
    User,
    Font,
}

/// Sprite counts per category, carving the flat sprite index space the same
/// way [`PaletteBase`] carves the virtual palette space.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteBase {
    pub car: u16,
    pub ped: u16,
    pub code_object: u16,
    pub map_object: u16,
    pub user: u16,
    pub font: u16,
}

impl SpriteBase {
    fn counts(&self) -> [u16; 6] {
        [
            self.car,
            self.ped,
            self.code_object,
            self.map_object,
            self.user,
            self.font,
        ]
    }

    pub fn count(&self, category: SpriteCategory) -> u16 {
        self.counts()[category as usize]
    }

    /// First sprite number of the category.
    pub fn offset(&self, category: SpriteCategory) -> u32 {
        self.counts()
            .iter()
            .take(category as usize)
            .map(|&count| count as u32)
            .sum()
    }

    pub fn total(&self) -> u32 {
        self.counts().iter().map(|&count| count as u32).sum()
    }
}

/// Per-font character counts with their running offsets into the font
/// sprite range.
#[derive(Debug, Clone, Default)]
pub struct FontBase {
    pub characters: Vec<u16>,
    pub bases: Vec<u16>,
}

/// 64x64 color indices, already unswizzled from the tile page atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile(pub Vec<u8>);

/// Location of one sprite inside the sprite graphics store.
#[derive(Debug, Clone, Copy)]
pub struct SpriteEntry {
    /// Offset relative to the start of the sprite graphics store.
    pub offset: u32,
    pub width: u8,
    pub height: u8,
    pub pad: u16,
}

/// Delta variant frame lengths for one sprite. The patch bytes themselves
/// live in the shared delta store and are consumed strictly in declaration
/// order.
#[derive(Debug, Clone)]
pub struct SpriteDelta {
    pub sprite: u16,
    pub sizes: Vec<u16>,
}

/// One sparse patch read from the delta store: a relative position advance
/// followed by a run of color indices.
#[derive(Debug, Clone, Copy)]
pub struct DeltaEntry<'a> {
    pub offset: u16,
    pub data: &'a [u8],
}

/// A reconstructed delta variant of a base sprite.
#[derive(Debug, Clone)]
pub struct DeltaFrame {
    pub sprite: u16,
    pub frame: usize,
    pub image: RgbaImage,
}

#[derive(Debug, Clone, Copy)]
pub struct DoorInfo {
    /// X position relative to the center of the car.
    pub rel_x: i8,
    /// Y position relative to the center of the car.
    pub rel_y: i8,
}

#[derive(Debug, Clone)]
pub struct CarInfo {
    pub model: u8,
    /// Car sprite number relative to the car sprite base.
    pub sprite: u8,
    /// Collision width in pixels, may differ from the sprite width.
    pub width: u8,
    pub height: u8,
    pub passengers: u8,
    /// Wreck graphic number, 99 if the car cannot wreck.
    pub wreck: u8,
    pub rating: u8,
    pub front_wheel_offset: i8,
    pub rear_wheel_offset: i8,
    pub front_window_offset: i8,
    pub rear_window_offset: i8,
    pub info_flags: u8,
    pub info_flags2: u8,
    /// Virtual palette numbers relative to the car remap palette base.
    pub remaps: Vec<u8>,
    pub doors: Vec<DoorInfo>,
}

#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub model: u8,
    /// Number of sprites stored for this model.
    pub sprites: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Grass,
    RoadSpecial,
    Water,
    Electrified,
    ElectrifiedPlatform,
    WoodFloor,
    MetalFloor,
    MetalWall,
    GrassWall,
}

impl SurfaceKind {
    pub const COUNT: usize = 9;
}

/// Tile numbers sharing one surface behavior.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub tiles: Vec<u16>,
}

#[derive(Debug)]
pub struct Sty {
    pub header: StyHeader,
    pub palette_index: PaletteIndex,
    pub palettes: Vec<Palette>,
    pub palette_base: PaletteBase,
    pub sprite_base: SpriteBase,
    pub font_base: FontBase,
    pub tiles: Vec<Tile>,
    pub sprite_store: Vec<u8>,
    pub sprites: Vec<SpriteEntry>,
    pub delta_store: Vec<u8>,
    pub deltas: Vec<SpriteDelta>,
    pub cars: Vec<CarInfo>,
    pub objects: Vec<ObjectInfo>,
    pub recyclable_cars: Vec<u8>,
    pub surfaces: Vec<Surface>,
}

impl Default for Sty {
    fn default() -> Self {
        Self {
            header: StyHeader::default(),
            palette_index: PaletteIndex::default(),
            palettes: vec![],
            palette_base: PaletteBase::default(),
            sprite_base: SpriteBase::default(),
            font_base: FontBase::default(),
            tiles: vec![],
            sprite_store: vec![],
            sprites: vec![],
            delta_store: vec![],
            deltas: vec![],
            cars: vec![],
            objects: vec![],
            recyclable_cars: vec![],
            // the surface list is fixed-size even when the chunk is absent
            surfaces: vec![Surface::default(); SurfaceKind::COUNT],
        }
    }
}

impl Sty {
    /// Resolves a virtual palette number to its physical palette number.
    pub fn physical_palette_index(&self, virtual_index: usize) -> Result<u16, StyError> {
        self.palette_index
            .0
            .get(virtual_index)
            .copied()
            .ok_or(StyError::InvalidIndex {
                index: virtual_index,
                limit: VIRTUAL_PALETTE_COUNT,
            })
    }

    /// Resolves a virtual palette number all the way to the physical palette.
    pub fn physical_palette(&self, virtual_index: usize) -> Result<&Palette, StyError> {
        let physical_index = self.physical_palette_index(virtual_index)? as usize;

        self.palettes
            .get(physical_index)
            .ok_or(StyError::InvalidIndex {
                index: physical_index,
                limit: self.palettes.len(),
            })
    }

    pub fn surface(&self, kind: SurfaceKind) -> &Surface {
        &self.surfaces[kind as usize]
    }

    /// Absolute sprite number of a category-relative index.
    pub fn sprite_index(&self, category: SpriteCategory, index: usize) -> usize {
        self.sprite_base.offset(category) as usize + index
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn palette_base() -> PaletteBase {
        PaletteBase {
            tile: 2,
            sprite: 3,
            car_remap: 5,
            ped_remap: 7,
            code_object_remap: 11,
            map_object_remap: 13,
            user_remap: 17,
            font_remap: 19,
        }
    }

    #[test]
    fn palette_base_offsets_are_running_sums() {
        let base = palette_base();

        assert_eq!(base.offset(PaletteCategory::Tile), 0);
        assert_eq!(base.offset(PaletteCategory::Sprite), 2);
        assert_eq!(base.offset(PaletteCategory::CarRemap), 5);
        assert_eq!(base.offset(PaletteCategory::PedRemap), 10);
        assert_eq!(base.offset(PaletteCategory::CodeObjectRemap), 17);
        assert_eq!(base.offset(PaletteCategory::MapObjectRemap), 28);
        assert_eq!(base.offset(PaletteCategory::UserRemap), 41);
        assert_eq!(base.offset(PaletteCategory::FontRemap), 58);
        assert_eq!(base.total(), 77);
    }

    #[test]
    fn palette_base_ranges_are_contiguous() {
        let base = palette_base();

        let categories = [
            PaletteCategory::Tile,
            PaletteCategory::Sprite,
            PaletteCategory::CarRemap,
            PaletteCategory::PedRemap,
            PaletteCategory::CodeObjectRemap,
            PaletteCategory::MapObjectRemap,
            PaletteCategory::UserRemap,
            PaletteCategory::FontRemap,
        ];

        let mut expected_start = 0;
        for category in categories {
            assert_eq!(base.offset(category), expected_start);
            expected_start += base.count(category) as u32;
        }
        assert_eq!(base.total(), expected_start);
    }

    #[test]
    fn sprite_base_offsets_are_running_sums() {
        let base = SpriteBase {
            car: 10,
            ped: 20,
            code_object: 30,
            map_object: 40,
            user: 50,
            font: 60,
        };

        assert_eq!(base.offset(SpriteCategory::Car), 0);
        assert_eq!(base.offset(SpriteCategory::Ped), 10);
        assert_eq!(base.offset(SpriteCategory::CodeObject), 30);
        assert_eq!(base.offset(SpriteCategory::MapObject), 60);
        assert_eq!(base.offset(SpriteCategory::User), 100);
        assert_eq!(base.offset(SpriteCategory::Font), 150);
        assert_eq!(base.total(), 210);
    }

    #[test]
    fn virtual_palette_resolution_goes_through_the_index_table() {
        let mut sty = Sty::default();
        sty.palette_index = PaletteIndex(vec![3, 1, 0]);
        sty.palettes = vec![Palette::default(); 4];

        assert_eq!(sty.physical_palette_index(0).unwrap(), 3);
        assert_eq!(sty.physical_palette_index(1).unwrap(), 1);
        assert_eq!(sty.physical_palette_index(2).unwrap(), 0);
    }

    #[test]
    fn out_of_range_virtual_index_fails() {
        let sty = Sty::default();

        assert!(matches!(
            sty.physical_palette_index(0),
            Err(StyError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn out_of_range_physical_index_fails() {
        let mut sty = Sty::default();
        sty.palette_index = PaletteIndex(vec![7]);
        sty.palettes = vec![Palette::default(); 2];

        assert!(matches!(
            sty.physical_palette(0),
            Err(StyError::InvalidIndex { index: 7, limit: 2 })
        ));
    }
}
