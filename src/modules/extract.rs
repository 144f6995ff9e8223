use std::path::{Path, PathBuf};

use eyre::eyre;
use image::RgbaImage;
use log::info;
use rayon::prelude::*;
use sty::Sty;

use crate::utils::img_stuffs::{ensure_dir, write_rgba8};

pub struct ExtractOptions {
    pub output: PathBuf,
    pub tiles: bool,
    pub sprites: bool,
    pub deltas: bool,
}

/// Decodes a style file once and writes the selected asset categories as
/// .png files under the output folder.
pub fn extract_style(path: &Path, options: &ExtractOptions) -> eyre::Result<()> {
    let sty = Sty::open_from_file(path)?;

    info!(
        "{}: {} palettes, {} tiles, {} sprites, {} delta sets",
        path.display(),
        sty.palettes.len(),
        sty.tiles.len(),
        sty.sprites.len(),
        sty.deltas.len()
    );

    if options.tiles {
        let dir = options.output.join("tiles");
        ensure_dir(&dir)?;

        let images = (0..sty.tiles.len())
            .map(|tile_index| {
                let image = sty.tile_to_rgba8(tile_index)?;

                Ok((dir.join(format!("{}.png", tile_index)), image))
            })
            .collect::<Result<Vec<_>, sty::error::StyError>>()?;

        write_images(&images)?;

        info!("Wrote {} tiles", images.len());
    }

    if options.sprites {
        let dir = options.output.join("sprites");
        ensure_dir(&dir)?;

        let images = (0..sty.sprites.len())
            .map(|sprite_index| {
                let image = sty.sprite_to_rgba8(sprite_index)?;

                Ok((dir.join(format!("{}.png", sprite_index)), image))
            })
            .collect::<Result<Vec<_>, sty::error::StyError>>()?;

        write_images(&images)?;

        info!("Wrote {} sprites", images.len());
    }

    if options.deltas {
        let dir = options.output.join("deltas");
        ensure_dir(&dir)?;

        let images = sty
            .delta_frames()?
            .into_iter()
            .map(|frame| {
                (
                    dir.join(format!("{}_{}.png", frame.sprite, frame.frame)),
                    frame.image,
                )
            })
            .collect::<Vec<_>>();

        write_images(&images)?;

        info!("Wrote {} delta frames", images.len());
    }

    Ok(())
}

fn write_images(images: &[(PathBuf, RgbaImage)]) -> eyre::Result<()> {
    let err: Vec<eyre::Error> = images
        .par_iter()
        .filter_map(|(path, image)| write_rgba8(image, path).err())
        .collect();

    if !err.is_empty() {
        let err_str = err
            .iter()
            .fold(String::new(), |acc, e| format!("{}\n{}", acc, e));

        return Err(eyre!(err_str));
    }

    Ok(())
}
