use std::{fs, path::Path};

use image::RgbaImage;

pub fn ensure_dir(path: impl AsRef<Path>) -> eyre::Result<()> {
    fs::create_dir_all(path)?;

    Ok(())
}

pub fn write_rgba8(image: &RgbaImage, path: impl AsRef<Path>) -> eyre::Result<()> {
    image.save(path.as_ref())?;

    Ok(())
}
