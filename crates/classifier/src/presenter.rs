//! Top-1 label overlay.
//!
//! Renders the best label onto the original image and writes the result to
//! disk. On-screen display is left to whatever viewer opens the file.

use crate::errors::ClassifyError;
use crate::postprocessing::RankedPrediction;
use ab_glyph::FontVec;
use anyhow::Context;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Top-left corner of the label text, in pixels.
const TEXT_ORIGIN: (i32, i32) = (10, 10);

const DEFAULT_FONT_SCALE: f32 = 24.0;

const SYSTEM_FONT_PATHS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub struct Presenter {
    font: Option<FontVec>,
    font_scale: f32,
}

impl Default for Presenter {
    /// No font: annotation is a no-op.
    fn default() -> Self {
        Self {
            font: None,
            font_scale: DEFAULT_FONT_SCALE,
        }
    }
}

impl Presenter {
    pub fn with_font_path(font_path: &Path) -> anyhow::Result<Self> {
        let font_data =
            std::fs::read(font_path).map_err(|e| ClassifyError::not_found(font_path, e))?;
        let font = FontVec::try_from_vec(font_data)
            .with_context(|| format!("Failed to parse font file: {}", font_path.display()))?;

        Ok(Self {
            font: Some(font),
            font_scale: DEFAULT_FONT_SCALE,
        })
    }

    /// Try a few well-known font locations, falling back to no font.
    pub fn with_system_font() -> Self {
        for path in SYSTEM_FONT_PATHS {
            if let Ok(presenter) = Self::with_font_path(Path::new(path)) {
                tracing::debug!(path, "Loaded system font");
                return presenter;
            }
        }

        tracing::debug!("No system font found, label overlay will be skipped");
        Self::default()
    }

    /// Use `font_path` if it loads, otherwise a system font.
    pub fn from_font_path(font_path: Option<&Path>) -> Self {
        match font_path {
            Some(path) => Self::with_font_path(path).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load font, falling back to system font"
                );
                Self::with_system_font()
            }),
            None => Self::with_system_font(),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `label` near the top-left corner. Returns false when no font is loaded.
    pub fn annotate(&self, image: &mut RgbImage, label: &str) -> bool {
        let Some(font) = &self.font else {
            tracing::debug!("No font loaded, skipping label overlay");
            return false;
        };

        draw_text_mut(
            image,
            TEXT_COLOR,
            TEXT_ORIGIN.0,
            TEXT_ORIGIN.1,
            self.font_scale,
            font,
            label,
        );
        true
    }

    /// Overlay the top prediction and save the image to `output_path`.
    pub fn present(
        &self,
        mut image: RgbImage,
        top: &RankedPrediction,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        self.annotate(&mut image, &top.label);

        image
            .save(output_path)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        tracing::info!(
            output = %output_path.display(),
            label = %top.label,
            "Annotated image saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str) -> RankedPrediction {
        RankedPrediction {
            index: 0,
            label: label.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_annotate_without_font_leaves_image_untouched() {
        let presenter = Presenter::default();
        let mut image = RgbImage::from_pixel(32, 32, Rgb([1, 2, 3]));
        let original = image.clone();

        assert!(!presenter.has_font());
        assert!(!presenter.annotate(&mut image, "tabby cat"));
        assert_eq!(image, original);
    }

    #[test]
    fn test_missing_font_is_resource_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.ttf");

        let err = Presenter::with_font_path(&path).err().unwrap();

        assert!(matches!(
            err.downcast_ref::<ClassifyError>(),
            Some(ClassifyError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn test_garbage_font_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        assert!(Presenter::with_font_path(&path).is_err());

        // Same outcome as having asked for a system font in the first place
        let presenter = Presenter::from_font_path(Some(&path));
        assert_eq!(presenter.has_font(), Presenter::with_system_font().has_font());
    }

    #[test]
    fn test_present_writes_image() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("annotated.png");
        let image = RgbImage::from_pixel(40, 20, Rgb([200, 200, 200]));

        Presenter::default()
            .present(image, &prediction("goldfish"), &output)
            .unwrap();

        let written = image::open(&output).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (40, 20));
    }

    #[test]
    fn test_annotate_with_system_font_draws_text() {
        let presenter = Presenter::with_system_font();
        if !presenter.has_font() {
            return;
        }

        let mut image = RgbImage::from_pixel(200, 60, Rgb([255, 255, 255]));
        assert!(presenter.annotate(&mut image, "tench"));
        assert!(image.pixels().any(|p| *p != Rgb([255, 255, 255])));
    }
}
