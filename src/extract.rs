//! CSV post-processing — pick an output file, pull one column out of it, and
//! write the values as a comma-terminated address list.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ExtractConfig;
use crate::error::{Error, Result};
use crate::prompt::Prompt;

/// Suffix appended to the source file's stem for the parsed output
const PARSED_SUFFIX: &str = "_parsed";

/// Destination extensions on offer. A single choice today; the selection
/// prompt stays so further formats can slot in.
const PARSED_EXTENSIONS: &[&str] = &[".txt"];

/// Menu label that ends the extraction loop
const DONE_SENTINEL: &str = "Done";

/// Interactive extractor over the fetcher's output directory.
pub struct Extractor {
    output_dir: PathBuf,
    parsed_dir: PathBuf,
    config: ExtractConfig,
}

impl Extractor {
    /// Wire the extractor to its source and destination directories
    pub fn new(
        output_dir: impl Into<PathBuf>,
        parsed_dir: impl Into<PathBuf>,
        config: ExtractConfig,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            parsed_dir: parsed_dir.into(),
            config,
        }
    }

    /// Enumerate candidate CSV files recursively under the output directory,
    /// skipping anything under the parsed-output directory, sorted for a
    /// stable listing.
    pub fn discover_candidates(&self) -> Vec<PathBuf> {
        let parsed_segment = self.parsed_dir.file_name().map(PathBuf::from);

        let mut candidates: Vec<PathBuf> = WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
            })
            .filter(|path| {
                parsed_segment
                    .as_ref()
                    .is_none_or(|segment| !path.components().any(|c| c.as_os_str() == segment))
            })
            .collect();

        candidates.sort();
        candidates
    }

    /// Run the interactive parse loop until the user is done or no candidate
    /// files remain. A failure on one file is reported and the loop moves on.
    pub fn run(&self, prompt: &mut dyn Prompt) -> Result<()> {
        loop {
            let candidates = self.discover_candidates();
            if candidates.is_empty() {
                prompt.say(&format!(
                    "No CSV files found under {}.",
                    self.output_dir.display()
                ))?;
                return Ok(());
            }

            let mut options: Vec<String> = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            options.push(DONE_SENTINEL.to_string());

            let source = match prompt.choose("Select a CSV file to parse:", &options)? {
                Some(index) if index < candidates.len() => &candidates[index],
                // "Done" or a cancelled prompt both end the loop
                _ => return Ok(()),
            };

            let extensions: Vec<String> = PARSED_EXTENSIONS.iter().map(|e| e.to_string()).collect();
            let extension = match prompt.choose("Select the output format:", &extensions)? {
                Some(index) => &extensions[index],
                None => continue,
            };

            match self.extract_file(source, extension) {
                Ok(destination) => {
                    prompt.say(&format!("Parsed output written to {}", destination.display()))?;

                    if prompt.confirm(&format!("Delete source file {}?", source.display()))? {
                        std::fs::remove_file(source)?;
                        tracing::info!(path = %source.display(), "Deleted source file");
                        prompt.say(&format!("Deleted {}", source.display()))?;
                    }
                }
                Err(e) => {
                    tracing::error!(path = %source.display(), error = %e, "Failed to parse file");
                    prompt.say(&format!("Failed to parse {}: {e}", source.display()))?;
                }
            }
        }
    }

    /// Extract the configured column from `source` into
    /// `{parsed_dir}/{stem}_parsed{extension}` and return the destination.
    ///
    /// Every row is treated as data (`has_headers(false)`): rows with too few
    /// fields are skipped silently, and a field matching the header sentinel
    /// (lowercased) is dropped wherever it appears. A file with no qualifying
    /// rows still produces an empty output file.
    pub fn extract_file(&self, source: &Path, extension: &str) -> Result<PathBuf> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(source)?;

        let mut values = String::new();
        let mut extracted = 0usize;
        for record in reader.records() {
            let record = record?;
            let Some(field) = record.get(self.config.column_index) else {
                continue;
            };
            let value = field.trim();
            if value.to_lowercase() == self.config.header_sentinel {
                continue;
            }
            values.push_str(value);
            values.push_str(",\n");
            extracted += 1;
        }

        let stem = source.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unusable file name: {}", source.display()),
            ))
        })?;

        std::fs::create_dir_all(&self.parsed_dir)?;
        let destination = self
            .parsed_dir
            .join(format!("{stem}{PARSED_SUFFIX}{extension}"));
        std::fs::write(&destination, &values)?;

        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            extracted,
            "Extracted column values"
        );

        Ok(destination)
    }
}
