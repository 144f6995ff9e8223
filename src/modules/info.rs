use std::path::Path;

use sty::{SpriteCategory, Sty};

pub fn style_info(path: &Path) -> eyre::Result<()> {
    let sty = Sty::open_from_file(path)?;

    let delta_frame_count: usize = sty.deltas.iter().map(|delta| delta.sizes.len()).sum();
    let surface_tile_count: usize = sty
        .surfaces
        .iter()
        .map(|surface| surface.tiles.len())
        .sum();

    println!("{}", path.display());
    println!("  version:         {}", sty.header.version);
    println!(
        "  palettes:        {} physical, {} virtual in use",
        sty.palettes.len(),
        sty.palette_base.total()
    );
    println!("  tiles:           {}", sty.tiles.len());
    println!("  sprites:         {}", sty.sprites.len());

    for (name, category) in [
        ("car", SpriteCategory::Car),
        ("ped", SpriteCategory::Ped),
        ("code object", SpriteCategory::CodeObject),
        ("map object", SpriteCategory::MapObject),
        ("user", SpriteCategory::User),
        ("font", SpriteCategory::Font),
    ] {
        println!(
            "    {:<14} {} at {}",
            name,
            sty.sprite_base.count(category),
            sty.sprite_base.offset(category)
        );
    }

    println!("  fonts:           {}", sty.font_base.characters.len());
    println!(
        "  delta sets:      {} ({} frames)",
        sty.deltas.len(),
        delta_frame_count
    );
    println!("  cars:            {}", sty.cars.len());
    println!("  map objects:     {}", sty.objects.len());
    println!("  recyclable cars: {}", sty.recyclable_cars.len());
    println!("  surface tiles:   {}", surface_tile_count);

    Ok(())
}
