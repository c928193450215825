use crate::{
    error::{CanvasError, Result},
    models::{DownloadArtifact, GeneratedImage, SizeOption},
};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::io::Cursor;

/// Resamples generated images to the fixed download sizes and encodes them as PNG.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    filter: FilterType,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn render(&self, image: &GeneratedImage, option: SizeOption) -> Result<DownloadArtifact> {
        let resized = self.resize(image, option)?;
        let bytes = encode_png(&resized)?;

        Ok(DownloadArtifact {
            image_index: image.index,
            size: option,
            width: resized.width(),
            height: resized.height(),
            bytes,
            filename: artifact_filename(image.index, option),
        })
    }

    pub fn resize<'a>(
        &self,
        image: &'a GeneratedImage,
        option: SizeOption,
    ) -> Result<Cow<'a, DynamicImage>> {
        ensure_not_empty(&image.raster)?;
        Ok(match option.dimensions() {
            Some((width, height)) => {
                Cow::Owned(image.raster.resize_exact(width, height, self.filter))
            }
            None => Cow::Borrowed(&image.raster),
        })
    }

    /// The displayable raster at native size.
    pub fn preview_png(&self, image: &GeneratedImage) -> Result<Vec<u8>> {
        encode_png(&image.raster)
    }
}

pub fn encode_png(raster: &DynamicImage) -> Result<Vec<u8>> {
    ensure_not_empty(raster)?;
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// `generated_image_{index+1}_{size label}.png`
pub fn artifact_filename(index: usize, option: SizeOption) -> String {
    format!("generated_image_{}_{}.png", index + 1, option.file_label())
}

pub fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| CanvasError::EncodeFailure(format!("artifact is not a valid PNG: {}", e)))?;
    Ok((decoded.width(), decoded.height()))
}

fn ensure_not_empty(raster: &DynamicImage) -> Result<()> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(CanvasError::EncodeFailure(format!(
            "empty pixel buffer ({}x{})",
            raster.width(),
            raster.height()
        )));
    }
    Ok(())
}
