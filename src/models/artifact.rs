use crate::error::CanvasError;
use crate::models::request::Prompt;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PNG_MIME: &str = "image/png";

/// One raster produced by the model, tagged with its position in the batch.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub index: usize,
    pub prompt: Prompt,
    pub raster: DynamicImage,
}

impl GeneratedImage {
    pub fn new(index: usize, prompt: Prompt, raster: DynamicImage) -> Self {
        Self {
            index,
            prompt,
            raster,
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn caption(&self) -> String {
        format!("Generated Image {}", self.index + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizeOption {
    Original,
    Small,
    Medium,
    Large,
}

impl SizeOption {
    pub const ALL: [SizeOption; 4] = [
        SizeOption::Original,
        SizeOption::Small,
        SizeOption::Medium,
        SizeOption::Large,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SizeOption::Original => "Original",
            SizeOption::Small => "Small (256x256)",
            SizeOption::Medium => "Medium (512x512)",
            SizeOption::Large => "Large (1024x1024)",
        }
    }

    /// Target `(width, height)`, or `None` to keep the native size.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            SizeOption::Original => None,
            SizeOption::Small => Some((256, 256)),
            SizeOption::Medium => Some((512, 512)),
            SizeOption::Large => Some((1024, 1024)),
        }
    }

    /// Label as it appears in filenames: lowercased, spaces as underscores.
    pub fn file_label(&self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }

    fn variant_name(&self) -> &'static str {
        match self {
            SizeOption::Original => "original",
            SizeOption::Small => "small",
            SizeOption::Medium => "medium",
            SizeOption::Large => "large",
        }
    }
}

impl Default for SizeOption {
    fn default() -> Self {
        SizeOption::Original
    }
}

impl fmt::Display for SizeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeOption {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SizeOption::ALL
            .into_iter()
            .find(|option| {
                option.label().eq_ignore_ascii_case(wanted)
                    || option.variant_name().eq_ignore_ascii_case(wanted)
                    || option.file_label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CanvasError::InvalidRequest(format!("unknown size option '{}'", s)))
    }
}

impl TryFrom<String> for SizeOption {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SizeOption> for String {
    fn from(option: SizeOption) -> Self {
        option.label().to_string()
    }
}

/// Encoded, named PNG blob for one image at one size.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub image_index: usize,
    pub size: SizeOption,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl DownloadArtifact {
    pub fn mime(&self) -> &'static str {
        PNG_MIME
    }

    pub fn download_label(&self) -> String {
        format!("Download Image {} ({})", self.image_index + 1, self.size.label())
    }
}

/// An artifact that could not be encoded. Siblings are unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactFailure {
    pub image_index: usize,
    pub size: SizeOption,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub image: GeneratedImage,
    pub artifacts: Vec<DownloadArtifact>,
    pub failures: Vec<ArtifactFailure>,
}
