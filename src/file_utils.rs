use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Universal newline (CRLF, CR or LF)
static NEWLINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

// @const: Bytes sniffed when the extension is not conclusive
const SNIFF_LEN: u64 = 512;

/// Split text on every newline convention
pub fn split_lines(content: &str) -> Vec<&str> {
    NEWLINE_REGEX.split(content).collect()
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for a converted caption file
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));
        output_dir.as_ref().join(output_filename)
    }

    /// Find files with any of the given extensions below a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let matches = path.extension().is_some_and(|ext| {
                let ext = ext.to_string_lossy();
                extensions
                    .iter()
                    .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
            });
            if matches {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file's raw bytes
    pub async fn read_bytes<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path.as_ref()).await
    }

    /// Read a UTF-8 file to a string
    pub async fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect the caption format of a file from its extension, then its first line
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "smi" | "sami" => return Ok(FileType::Sami),
                "vtt" => return Ok(FileType::PlainTimed),
                "json" => return Ok(FileType::CaptionJson),
                _ => {}
            }
        }

        // Fall back to examining the first bytes
        let mut head = Vec::new();
        fs::File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?
            .take(SNIFF_LEN)
            .read_to_end(&mut head)?;
        let head = String::from_utf8_lossy(&head);
        let first_line = split_lines(head.trim_start_matches('\u{feff}').trim_start())
            .first()
            .map(|line| line.trim().to_lowercase())
            .unwrap_or_default();

        let file_type = if first_line.contains("<sami>") {
            FileType::Sami
        } else if first_line.starts_with("webvtt") {
            FileType::PlainTimed
        } else if first_line.starts_with('[') {
            FileType::CaptionJson
        } else {
            FileType::Unknown
        };

        Ok(file_type)
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// SAMI markup
    Sami,
    /// Plain-text timed captions
    PlainTimed,
    /// Caption record JSON
    CaptionJson,
    /// Unknown file type
    Unknown,
}
