use crate::domain::errors::LoadError;
use crate::domain::experiment::ExperimentKey;
use crate::domain::ports::SampleSource;
use crate::domain::samples::SampleMatrix;
use crate::infrastructure::dataset_resolver::DatasetResolver;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::debug;

/// Reads whitespace-delimited profiling output.
///
/// Blank lines and `#` comment lines are skipped. Every other line is one
/// trial and must provide every requested column as a finite number.
pub struct SampleLoader;

impl SampleLoader {
    pub fn load(path: &Path, columns: &[usize]) -> Result<SampleMatrix, LoadError> {
        let file = File::open(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let matrix = Self::load_from_reader(BufReader::new(file), path, columns)?;
        debug!(
            "Loaded {} trials x {} columns from {}",
            matrix.trials(),
            matrix.width(),
            path.display()
        );
        Ok(matrix)
    }

    /// Parses an already opened source. `path` is only used in error reports.
    pub fn load_from_reader<R: BufRead>(
        reader: R,
        path: &Path,
        columns: &[usize],
    ) -> Result<SampleMatrix, LoadError> {
        let required = columns.iter().max().map_or(0, |&c| c + 1);
        let mut matrix = SampleMatrix::new(columns.len());

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < required {
                return Err(LoadError::MalformedRow {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason: format!(
                        "expected at least {} fields, found {}",
                        required,
                        fields.len()
                    ),
                });
            }

            let mut row = Vec::with_capacity(columns.len());
            for &column in columns {
                row.push(parse_field(fields[column], path, line_no, column)?);
            }

            matrix
                .push_row(row)
                .map_err(|e| LoadError::MalformedRow {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason: e.to_string(),
                })?;
        }

        if matrix.is_empty() {
            return Err(LoadError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        Ok(matrix)
    }
}

fn parse_field(raw: &str, path: &Path, line: usize, column: usize) -> Result<f64, LoadError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(LoadError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason: format!("column {} is not finite: '{}'", column, raw),
        }),
        Err(_) => Err(LoadError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason: format!("column {} is not numeric: '{}'", column, raw),
        }),
    }
}

/// File-backed sample source: resolves each run to its dataset file.
pub struct FileSampleSource {
    resolver: DatasetResolver,
}

impl FileSampleSource {
    pub fn new(resolver: DatasetResolver) -> Self {
        Self { resolver }
    }
}

impl SampleSource for FileSampleSource {
    fn load(&self, key: &ExperimentKey, columns: &[usize]) -> Result<SampleMatrix, LoadError> {
        SampleLoader::load(&self.resolver.path_for(key), columns)
    }
}
