use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;

/// Label decoded from a frame, e.g. `{Source_Field7}{Plot_12}{Plant_3}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecimenLabel {
    /// Folder the photo is filed under (text between `Source_` and the next `}`)
    pub source: String,
    /// File stem (everything from the first `{` through the last `}`)
    pub stem: String,
}

impl SpecimenLabel {
    const SOURCE_MARKER: &'static str = "Source_";

    pub fn parse(text: &str) -> Option<Self> {
        let source_start = text.find(Self::SOURCE_MARKER)? + Self::SOURCE_MARKER.len();
        let source_end = source_start + text[source_start..].find('}')?;
        let open = text.find('{')?;
        let close = text.rfind('}')?;
        if close < open {
            return None;
        }

        Some(Self {
            source: text[source_start..source_end].to_string(),
            stem: text[open..=close].to_string(),
        })
    }
}

/// An image waiting to be written
pub struct PlannedImage {
    pub path: PathBuf,
    pub image: DynamicImage,
}

/// Plans unique output paths under a root directory and writes them in one go
pub struct OutputWriter {
    root: PathBuf,
    planned: Vec<PlannedImage>,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            planned: Vec::new(),
        }
    }

    /// Reserve `<root>/<source>/<stem>{Photo_N}.png` with the lowest N not yet
    /// on disk and not already planned
    pub fn plan(&mut self, label: &SpecimenLabel, image: DynamicImage) -> &Path {
        let folder = self.root.join(&label.source);
        let mut copy = 0;
        let path = loop {
            let candidate = folder.join(format!("{}{{Photo_{}}}.png", label.stem, copy));
            if !candidate.exists() && !self.planned.iter().any(|p| p.path == candidate) {
                break candidate;
            }
            copy += 1;
        };

        self.planned.push(PlannedImage { path, image });
        &self.planned[self.planned.len() - 1].path
    }

    pub fn len(&self) -> usize {
        self.planned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planned.is_empty()
    }

    /// Write everything only if exactly `expected` images were planned.
    /// On a mismatch nothing touches the disk.
    pub fn write_expected(self, expected: usize) -> Result<Vec<PathBuf>> {
        if self.len() != expected {
            anyhow::bail!(
                "Expected {} specimens with codes, but found {}",
                expected,
                self.len()
            );
        }
        self.write_all()
    }

    /// Create folders and save every planned image
    pub fn write_all(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.planned.len());

        for planned in self.planned {
            if let Some(parent) = planned.path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            planned.image.save(&planned.path)
                .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", planned.path.display(), e))?;
            log::info!("Wrote {}", planned.path.display());
            written.push(planned.path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use rstest::rstest;

    #[test]
    fn test_parse_label() {
        let label = SpecimenLabel::parse("{Source_Field7}{Plot_12}{Plant_3}").unwrap();
        assert_eq!(label.source, "Field7");
        assert_eq!(label.stem, "{Source_Field7}{Plot_12}{Plant_3}");
    }

    #[test]
    fn test_parse_trims_text_outside_braces() {
        let label = SpecimenLabel::parse("id: {Plot_1}{Source_North} end").unwrap();
        assert_eq!(label.source, "North");
        assert_eq!(label.stem, "{Plot_1}{Source_North}");
    }

    #[rstest]
    #[case("")]
    #[case("{Plot_1}")]
    #[case("Source_A")]
    #[case("{Source_A")]
    fn test_parse_rejects_malformed(#[case] text: &str) {
        assert_eq!(SpecimenLabel::parse(text), None);
    }

    fn tiny() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
    }

    #[test]
    fn test_plan_numbers_duplicates() {
        let dir = tempfile::TempDir::new().unwrap();
        let label = SpecimenLabel::parse("{Source_A}{Plant_1}").unwrap();
        let mut writer = OutputWriter::new(dir.path());

        let first = writer.plan(&label, tiny()).to_path_buf();
        let second = writer.plan(&label, tiny()).to_path_buf();

        assert_eq!(first, dir.path().join("A/{Source_A}{Plant_1}{Photo_0}.png"));
        assert_eq!(second, dir.path().join("A/{Source_A}{Plant_1}{Photo_1}.png"));
        assert_eq!(writer.len(), 2);
    }

    #[test]
    fn test_plan_skips_existing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("A")).unwrap();
        std::fs::write(dir.path().join("A/{Source_A}{Photo_0}.png"), b"").unwrap();

        let label = SpecimenLabel::parse("{Source_A}").unwrap();
        let mut writer = OutputWriter::new(dir.path());

        assert_eq!(writer.plan(&label, tiny()), dir.path().join("A/{Source_A}{Photo_1}.png"));
    }

    #[test]
    fn test_write_all_creates_folders() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut writer = OutputWriter::new(dir.path());
        writer.plan(&SpecimenLabel::parse("{Source_A}{P_1}").unwrap(), tiny());
        writer.plan(&SpecimenLabel::parse("{Source_B}{P_2}").unwrap(), tiny());

        let written = writer.write_all().unwrap();

        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|p| p.exists()));
        assert!(dir.path().join("B").is_dir());
    }

    #[test]
    fn test_write_expected_refuses_count_mismatch() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut writer = OutputWriter::new(dir.path());
        writer.plan(&SpecimenLabel::parse("{Source_A}{P_1}").unwrap(), tiny());

        let err = writer.write_expected(2).unwrap_err();

        assert_eq!(err.to_string(), "Expected 2 specimens with codes, but found 1");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_expected_with_nothing_planned() {
        let dir = tempfile::TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path());
        assert!(writer.is_empty());

        assert!(writer.write_expected(0).unwrap().is_empty());
    }

    #[test]
    fn test_write_expected_writes_on_match() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut writer = OutputWriter::new(dir.path());
        writer.plan(&SpecimenLabel::parse("{Source_A}{P_1}").unwrap(), tiny());
        writer.plan(&SpecimenLabel::parse("{Source_A}{P_2}").unwrap(), tiny());

        let written = writer.write_expected(2).unwrap();

        assert_eq!(written.len(), 2);
        assert!(dir.path().join("A/{Source_A}{P_2}{Photo_0}.png").exists());
    }
}
