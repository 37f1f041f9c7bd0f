//! Tesseract OCR backend implementation.
//!
//! Rasterises PDF pages with pdftoppm, runs the enhancement pre-pass on each
//! page image, then recognises it with the tesseract command-line tool.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tempfile::TempDir;

use super::backend::{OcrBackend, OcrError, OcrOptions, OcrResult};
use super::tools::check_binary;

/// Tesseract OCR backend.
#[derive(Debug, Clone, Default)]
pub struct TesseractBackend;

impl TesseractBackend {
    pub fn new() -> Self {
        Self
    }

    /// Render pages `1..=max_pages` to PNG files, returned in page order.
    fn rasterize(
        &self,
        pdf_path: &Path,
        output_dir: &Path,
        options: &OcrOptions,
    ) -> Result<Vec<PathBuf>, OcrError> {
        let status = Command::new("pdftoppm")
            .args(pdftoppm_args(options))
            .arg(pdf_path)
            .arg(output_dir.join("page"))
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(_) => {
                return Err(OcrError::OcrFailed(
                    "pdftoppm failed to convert PDF".to_string(),
                ))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::BackendNotAvailable(
                    "pdftoppm not found (install poppler-utils)".to_string(),
                ))
            }
            Err(e) => return Err(OcrError::Io(e)),
        }

        // pdftoppm pads page numbers to the same width within one run, so a
        // lexical sort is page order.
        let mut images: Vec<_> = std::fs::read_dir(output_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(OcrError::OcrFailed(
                "No images generated from PDF".to_string(),
            ));
        }
        Ok(images)
    }

    /// Load a page image, enhance it and write it next to the original.
    fn enhance_page(&self, image_path: &Path, options: &OcrOptions) -> Result<PathBuf, OcrError> {
        let page = image::open(image_path)
            .map_err(|e| OcrError::ImageError(format!("Failed to load image: {}", e)))?;
        let enhanced = options.enhancement.apply(&page);

        let out_path = image_path.with_extension("enhanced.png");
        enhanced
            .save(&out_path)
            .map_err(|e| OcrError::ImageError(format!("Failed to save image: {}", e)))?;
        Ok(out_path)
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path, options: &OcrOptions) -> Result<String, OcrError> {
        let psm = options.page_segmentation_mode.to_string();
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &options.languages, "--psm", &psm])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

/// pdftoppm flags for one run: PNG output at the configured DPI, pages
/// `1..=max_pages`. pdftoppm clamps `-l` to the document's page count.
fn pdftoppm_args(options: &OcrOptions) -> Vec<String> {
    vec![
        "-png".to_string(),
        "-r".to_string(),
        options.dpi.to_string(),
        "-f".to_string(),
        "1".to_string(),
        "-l".to_string(),
        options.max_pages.to_string(),
    ]
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract") && check_binary("pdftoppm")
    }

    fn availability_hint(&self) -> String {
        if !check_binary("tesseract") {
            "Tesseract not installed. Install with: apt install tesseract-ocr tesseract-ocr-ind"
                .to_string()
        } else if !check_binary("pdftoppm") {
            "pdftoppm not installed. Install with: apt install poppler-utils".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn ocr_pdf(&self, pdf_bytes: &[u8], options: &OcrOptions) -> Result<OcrResult, OcrError> {
        let start = Instant::now();

        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("document.pdf");
        std::fs::write(&pdf_path, pdf_bytes)?;

        let pages_dir = temp_dir.path().join("pages");
        std::fs::create_dir(&pages_dir)?;
        let images = self.rasterize(&pdf_path, &pages_dir, options)?;

        let mut page_texts = Vec::with_capacity(images.len());
        for image_path in &images {
            let enhanced = self.enhance_page(image_path, options)?;
            page_texts.push(self.run_tesseract(&enhanced, options)?);
        }

        Ok(OcrResult {
            text: page_texts.join("\n"),
            pages_processed: page_texts.len() as u32,
            backend: self.name(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
