//! Configuration management for reportscan.
//!
//! Every field has a default, so an absent or partial file is valid.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ocr::{
    Enhancement, OcrBackend, OcrOptions, PdfReader, ScanClassifier, DEFAULT_CONTRAST_FACTOR,
    DEFAULT_MIN_AVG_CHARS_PER_PAGE, DEFAULT_OCR_DPI, DEFAULT_OCR_LANGUAGES, DEFAULT_OCR_MAX_PAGES,
    DEFAULT_PAGE_SEGMENTATION_MODE, DEFAULT_SHARPNESS_FACTOR,
};
use crate::patterns::{Overlay, PatternError, PatternLibrary};
use crate::services::{BatchRunner, FileAnalyzer, DEFAULT_WORKERS};

/// File names looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "reportscan.toml",
    "reportscan.yaml",
    "reportscan.yml",
    "reportscan.json",
];

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Scan detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// PDFs averaging fewer characters per page than this are scans.
    pub min_avg_chars_per_page: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_avg_chars_per_page: DEFAULT_MIN_AVG_CHARS_PER_PAGE,
        }
    }
}

/// OCR fallback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub max_pages: u32,
    pub dpi: u32,
    pub languages: String,
    pub page_segmentation_mode: u8,
    pub contrast: f32,
    pub sharpness: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_OCR_MAX_PAGES,
            dpi: DEFAULT_OCR_DPI,
            languages: DEFAULT_OCR_LANGUAGES.to_string(),
            page_segmentation_mode: DEFAULT_PAGE_SEGMENTATION_MODE,
            contrast: DEFAULT_CONTRAST_FACTOR,
            sharpness: DEFAULT_SHARPNESS_FACTOR,
        }
    }
}

impl OcrConfig {
    pub fn to_options(&self) -> OcrOptions {
        OcrOptions {
            max_pages: self.max_pages,
            dpi: self.dpi,
            languages: self.languages.clone(),
            page_segmentation_mode: self.page_segmentation_mode,
            enhancement: Enhancement {
                contrast: self.contrast,
                sharpness: self.sharpness,
            },
        }
    }
}

/// Extra localized terms merged into the built-in overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    #[serde(skip_serializing_if = "Overlay::is_empty")]
    pub overlay: Overlay,
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Concurrent file workers.
    pub workers: usize,
    pub scan: ScanConfig,
    pub ocr: OcrConfig,
    pub patterns: PatternConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            scan: ScanConfig::default(),
            ocr: OcrConfig::default(),
            patterns: PatternConfig::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Discover a config file in the working directory, falling back to
    /// defaults when none exists or it cannot be parsed.
    pub async fn load() -> Self {
        let Ok(cwd) = std::env::current_dir() else {
            return Self::default();
        };
        Self::discover(&cwd).await
    }

    /// Discover a config file in `dir`.
    pub async fn discover(dir: &Path) -> Self {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            match Self::load_from_path(&path).await {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("{}; using defaults", e);
                    return Self::default();
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a specific file path.
    /// The format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ocr_options(&self) -> OcrOptions {
        self.ocr.to_options()
    }

    pub fn scan_classifier(&self) -> ScanClassifier {
        ScanClassifier::new(self.scan.min_avg_chars_per_page)
    }

    pub fn pattern_library(&self) -> Result<PatternLibrary, PatternError> {
        PatternLibrary::with_overlay(&self.patterns.overlay)
    }

    /// Wire up a batch runner using `ocr` for scanned PDFs.
    pub fn build_runner(&self, ocr: Arc<dyn OcrBackend>) -> Result<BatchRunner, PatternError> {
        let patterns = Arc::new(self.pattern_library()?);
        let pdf = PdfReader::new(self.scan_classifier(), ocr, self.ocr_options());
        let analyzer = FileAnalyzer::new(patterns, pdf);
        Ok(BatchRunner::new(Arc::new(analyzer)).with_workers(self.workers))
    }
}
