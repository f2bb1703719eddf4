use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::caption::{self, CaptionRecord};
use crate::encoding::EncodingNormalizer;
use crate::errors::CaptionError;
use crate::file_utils::{FileManager, FileType};
use crate::format_reader::FormatReader;
use crate::language_utils::get_language_name;
use crate::sami::{SamiGenerator, SamiParser};
use crate::validation::TimelineValidator;

// @module: Application controller for caption conversion

/// Extensions picked up when converting SAMI files
pub const SAMI_EXTENSIONS: [&str; 2] = ["smi", "sami"];

/// Extensions picked up when converting caption JSON
pub const JSON_EXTENSIONS: [&str; 1] = ["json"];

/// Which way a conversion goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    /// SAMI markup → caption JSON
    ToJson,
    /// Caption JSON → SAMI markup
    ToSami,
}

impl ConversionDirection {
    fn input_extensions(self) -> &'static [&'static str] {
        match self {
            Self::ToJson => &SAMI_EXTENSIONS,
            Self::ToSami => &JSON_EXTENSIONS,
        }
    }

    fn output_extension(self) -> &'static str {
        match self {
            Self::ToJson => "json",
            Self::ToSami => "smi",
        }
    }
}

/// Outcome counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for caption conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
    reader: FormatReader,
    normalizer: EncodingNormalizer,
    generator: SamiGenerator,
    validator: TimelineValidator,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let reader = FormatReader::new(&config.sami, &config.plain_timed_header)
            .context("Failed to build header verifiers")?;
        let normalizer = EncodingNormalizer::new(config.encoding.profiles.clone());
        let generator = SamiGenerator::new(config.sami.clone());

        Ok(Self {
            config,
            reader,
            normalizer,
            generator,
            validator: TimelineValidator::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn check_timeline(&self, records: &[CaptionRecord]) -> Result<(), CaptionError> {
        if self.config.validation.enabled {
            self.validator.check(records, self.config.validation.strict)?;
        }
        Ok(())
    }

    /// Decode SAMI text that is already UTF-8
    pub fn parse_markup(&self, text: &str) -> Result<Vec<CaptionRecord>, CaptionError> {
        self.reader.verify_markup_text(text)?;
        let records = SamiParser::with_options(self.config.parser).parse_str(text);
        self.check_timeline(&records)?;
        Ok(records)
    }

    /// Normalize a raw SAMI buffer to UTF-8 and decode it
    pub fn decode_markup(&self, buffer: &[u8], language: &str) -> Result<Vec<CaptionRecord>, CaptionError> {
        let text = self.normalizer.normalize(buffer, language)?;
        self.parse_markup(&text)
    }

    /// Read and decode a SAMI file
    pub async fn load_markup<P: AsRef<Path>>(&self, path: P, language: &str) -> Result<Vec<CaptionRecord>, CaptionError> {
        let language_name = get_language_name(language).unwrap_or_else(|_| language.to_string());
        debug!("Decoding {:?} as {} captions", path.as_ref(), language_name);
        let data = FileManager::read_bytes(path.as_ref()).await?;
        self.decode_markup(&data, language)
    }

    /// Render records as SAMI
    pub fn render_markup(&self, records: &[CaptionRecord]) -> Result<String, CaptionError> {
        self.check_timeline(records)?;
        Ok(self.generator.generate(records))
    }

    /// Check a caption file's header, returning its detected type
    pub async fn verify_file<P: AsRef<Path>>(&self, path: P, language: &str) -> Result<FileType> {
        let path = path.as_ref();
        let file_type = FileManager::detect_file_type(path)?;

        match file_type {
            FileType::Sami => {
                self.reader.read_markup(path).await?;
            }
            FileType::PlainTimed => {
                let data = FileManager::read_bytes(path).await?;
                let text = self.normalizer.normalize(&data, language)?;
                let lines = self.reader.read_plain_timed(&text)?;
                debug!("Plain timed file has {} lines", lines.len());
            }
            FileType::CaptionJson => {
                let records = caption::load_records(path).await?;
                debug!("Caption JSON holds {} records", records.len());
            }
            FileType::Unknown => {
                return Err(anyhow::anyhow!("Unrecognised caption file: {:?}", path));
            }
        }

        Ok(file_type)
    }

    // @returns: Output path, or None when it exists and overwriting is off
    fn output_path_for(&self, input_file: &Path, output_dir: &Path, direction: ConversionDirection, force_overwrite: bool) -> Option<PathBuf> {
        let output_path = FileManager::generate_output_path(input_file, output_dir, direction.output_extension());
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return None;
        }
        Some(output_path)
    }

    /// Convert one SAMI file into caption JSON
    pub async fn convert_to_json(&self, input_file: &Path, output_dir: &Path, language: &str, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let Some(output_path) = self.output_path_for(input_file, output_dir, ConversionDirection::ToJson, force_overwrite) else {
            return Ok(None);
        };

        let records = self
            .load_markup(input_file, language)
            .await
            .with_context(|| format!("Failed to decode SAMI file: {:?}", input_file))?;
        let json = caption::records_to_json(&records)?;
        FileManager::write_to_file(&output_path, &json)?;

        info!("Converted {} captions: {:?}", records.len(), output_path);
        Ok(Some(output_path))
    }

    /// Convert one caption JSON file into SAMI
    pub async fn convert_to_sami(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let Some(output_path) = self.output_path_for(input_file, output_dir, ConversionDirection::ToSami, force_overwrite) else {
            return Ok(None);
        };

        let records = caption::load_records(input_file).await?;
        let markup = self.render_markup(&records)
            .with_context(|| format!("Failed to render SAMI for: {:?}", input_file))?;
        FileManager::write_to_file(&output_path, &markup)?;

        info!("Converted {} captions: {:?}", records.len(), output_path);
        Ok(Some(output_path))
    }

    /// Convert one file in the given direction
    pub async fn run(&self, input_file: &Path, output_dir: &Path, direction: ConversionDirection, language: &str, force_overwrite: bool) -> Result<Option<PathBuf>> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(output_dir)?;

        match direction {
            ConversionDirection::ToJson => self.convert_to_json(input_file, output_dir, language, force_overwrite).await,
            ConversionDirection::ToSami => self.convert_to_sami(input_file, output_dir, force_overwrite).await,
        }
    }

    /// Convert every matching file below a directory.
    ///
    /// Outputs land next to their inputs unless `output_dir` is given. A file
    /// that fails is logged and counted; the run carries on with the rest.
    pub async fn run_folder(&self, input_dir: &Path, output_dir: Option<&Path>, direction: ConversionDirection, language: &str, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(input_dir, direction.input_extensions())?;
        if files.is_empty() {
            return Err(anyhow::anyhow!(
                "No {} files found in directory: {:?}",
                direction.input_extensions().join("/"),
                input_dir
            ));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match output_dir {
                Some(dir) => dir.to_path_buf(),
                None => file.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.to_path_buf()),
            };

            match self.run(file, &target_dir, direction, language, force_overwrite).await {
                Ok(Some(_)) => summary.converted += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing {:?}: {:#}", file, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();
        info!(
            "Finished in {:.1}s: {} converted, {} skipped, {} failed",
            start_time.elapsed().as_secs_f64(),
            summary.converted,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }
}
