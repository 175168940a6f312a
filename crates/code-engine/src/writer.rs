//! Writing code images into the output directory.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{GrayImage, ImageFormat};

use crate::barcode::render_code128;
use crate::caption::CaptionFont;
use crate::naming::image_file_name;
use crate::qr::render_qr;
use crate::{CodeType, Result};

/// Produces a code image file for a piece of data.
pub trait Generate {
    /// Encode `data`, write it under `base`, and return the written path.
    fn generate(&self, code_type: CodeType, data: &str, base: &str) -> Result<PathBuf>;
}

/// Renders codes into PNG files inside a single output directory.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    output_dir: PathBuf,
    caption: Option<Arc<CaptionFont>>,
}

impl CodeGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            caption: None,
        }
    }

    /// Builder: print the encoded data under barcodes.
    pub fn with_caption_font(mut self, font: CaptionFont) -> Self {
        self.caption = Some(Arc::new(font));
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Final path of the image for `base`.
    pub fn path_for(&self, code_type: CodeType, base: &str) -> PathBuf {
        self.output_dir.join(image_file_name(base, code_type))
    }

    pub fn render(&self, code_type: CodeType, data: &str) -> Result<GrayImage> {
        match code_type {
            CodeType::Qr => render_qr(data),
            CodeType::Bar => render_code128(data, self.caption.as_deref()),
        }
    }

    /// Encode and write the image to a temporary file next to its final path.
    ///
    /// Nothing at the final path is touched until [`StagedImage::commit`].
    pub fn stage(&self, code_type: CodeType, data: &str, base: &str) -> Result<StagedImage> {
        let img = self.render(code_type, data)?;
        let target = self.path_for(code_type, base);
        StagedImage::write(&img, target)
    }

    /// Encode `data` and write it to `{output_dir}/{base}_{QR|BAR}.png`,
    /// replacing any previous file with that name.
    pub fn generate(&self, code_type: CodeType, data: &str, base: &str) -> Result<PathBuf> {
        let path = self.stage(code_type, data, base)?.commit()?;
        tracing::debug!(code_type = %code_type, path = %path.display(), "Code image written");
        Ok(path)
    }

    /// Whether the image at `path` is exactly what `data` renders to.
    pub fn matches(&self, path: &Path, code_type: CodeType, data: &str) -> Result<bool> {
        let on_disk = image::open(path)?.to_luma8();
        let expected = self.render(code_type, data)?;
        Ok(on_disk.dimensions() == expected.dimensions() && on_disk.as_raw() == expected.as_raw())
    }
}

impl Generate for CodeGenerator {
    fn generate(&self, code_type: CodeType, data: &str, base: &str) -> Result<PathBuf> {
        CodeGenerator::generate(self, code_type, data, base)
    }
}

/// A fully written and synced image waiting to be moved into place.
///
/// Dropping it without committing removes the temporary file.
#[derive(Debug)]
pub struct StagedImage {
    temp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedImage {
    fn write(img: &GrayImage, target: PathBuf) -> Result<Self> {
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = target.with_file_name(format!(".{file_name}.tmp"));

        let staged = Self {
            temp_path,
            target,
            committed: false,
        };

        let mut writer = BufWriter::new(File::create(&staged.temp_path)?);
        img.write_to(&mut writer, ImageFormat::Png)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        Ok(staged)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically move the staged file over the target path.
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.temp_path, &self.target)?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.temp_path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(path = %self.temp_path.display(), "Failed to remove staged image: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    fn generator() -> (tempfile::TempDir, CodeGenerator) {
        let dir = tempfile::tempdir().unwrap();
        let generator = CodeGenerator::new(dir.path());
        (dir, generator)
    }

    #[test]
    fn generate_writes_named_png() {
        let (_dir, generator) = generator();
        let path = generator.generate(CodeType::Qr, "ITEM-001", "ITEM-001").unwrap();
        assert_eq!(path.file_name().unwrap(), "ITEM-001_QR.png");
        assert!(path.exists());
        assert!(generator.matches(&path, CodeType::Qr, "ITEM-001").unwrap());
        assert!(!generator.matches(&path, CodeType::Qr, "ITEM-002").unwrap());
    }

    #[test]
    fn barcode_round_trips_through_file() {
        let (_dir, generator) = generator();
        let path = generator.generate(CodeType::Bar, "SKU-42", "SKU-42").unwrap();
        assert_eq!(path.file_name().unwrap(), "SKU-42_BAR.png");
        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(
            crate::barcode::read_code128_modules(&img).unwrap(),
            crate::barcode::encode_code128("SKU-42").unwrap()
        );
    }

    #[test]
    fn second_write_with_same_base_overwrites() {
        let (_dir, generator) = generator();
        let first = generator.generate(CodeType::Qr, "ITEM-001-A", "ITEM-001").unwrap();
        let second = generator.generate(CodeType::Qr, "ITEM-001-B", "ITEM-001").unwrap();
        assert_eq!(first, second);
        assert!(generator.matches(&second, CodeType::Qr, "ITEM-001-B").unwrap());
        assert!(!generator.matches(&second, CodeType::Qr, "ITEM-001-A").unwrap());
    }

    #[test]
    fn dropped_stage_leaves_target_untouched() {
        let (_dir, generator) = generator();
        let path = generator.generate(CodeType::Qr, "old", "label").unwrap();

        let staged = generator.stage(CodeType::Qr, "new", "label").unwrap();
        let temp = staged.temp_path().to_path_buf();
        assert!(temp.exists());
        drop(staged);

        assert!(!temp.exists());
        assert!(generator.matches(&path, CodeType::Qr, "old").unwrap());
    }

    #[test]
    fn failed_encode_keeps_previous_file() {
        let (_dir, generator) = generator();
        let path = generator.generate(CodeType::Bar, "GOOD-1", "label").unwrap();

        let err = generator.generate(CodeType::Bar, "", "label").unwrap_err();
        assert!(matches!(err, EngineError::Encode(_)));
        assert!(generator.matches(&path, CodeType::Bar, "GOOD-1").unwrap());
    }

    #[test]
    fn missing_output_dir_is_an_io_error() {
        let generator = CodeGenerator::new("/nonexistent/codes");
        let err = generator.generate(CodeType::Qr, "x", "x").unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn ensure_output_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CodeGenerator::new(dir.path().join("a/b"));
        generator.ensure_output_dir().unwrap();
        assert!(generator.output_dir().is_dir());
    }
}
