//! Input manager for résumés, job postings and ATS result files

use crate::error::{Result, ResolverError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::ats_result::AtsResult;
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read the text of a `.txt` or `.md` document.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResolverError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path)?;
        if !file_type.is_document() {
            return Err(ResolverError::UnsupportedFormat(format!(
                "Expected a .txt or .md document, got {:?}: {}",
                file_type,
                path.display()
            )));
        }

        let text = if file_type == FileType::Markdown {
            info!("Processing markdown file: {}", path.display());
            MarkdownExtractor.extract(path).await?
        } else {
            info!("Reading plain text file: {}", path.display());
            PlainTextExtractor.extract(path).await?
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load an upstream ATS result from a JSON file.
    pub async fn load_ats_result(&self, path: &Path) -> Result<AtsResult> {
        if self.detect_file_type(path)? != FileType::Json {
            return Err(ResolverError::UnsupportedFormat(format!(
                "ATS result must be a .json file: {}",
                path.display()
            )));
        }
        if !path.exists() {
            return Err(ResolverError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Loading ATS result: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        AtsResult::from_json_str(&content)
    }

    /// Concatenate several documents into one corpus, one per paragraph.
    pub async fn load_corpus(&mut self, paths: &[impl AsRef<Path>]) -> Result<String> {
        let mut texts = Vec::with_capacity(paths.len());
        for path in paths {
            texts.push(self.extract_text(path.as_ref()).await?);
        }
        Ok(texts.join("\n\n"))
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ResolverError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
