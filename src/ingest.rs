//! Sequence ingest for FASTA/FASTQ/line-delimited inputs, optionally
//! gzip-compressed. Format is inferred from the file extension.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bio::io::{fasta, fastq};
use flate2::read::MultiGzDecoder;

/// Errors raised while loading sequence files.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("error reading {format} record from {path}: {detail}")]
    Record {
        format: &'static str,
        path: String,
        detail: String,
    },
    #[error("non-UTF-8 symbols in sequence data from {path}")]
    NotUtf8 { path: String },
}

/// One named input sequence.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub name: String,
    pub sequence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceFormat {
    Fastq,
    Fasta,
    Lines,
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("bgz"))
        .unwrap_or(false)
}

fn infer_format(path: &Path) -> SequenceFormat {
    let mut ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "gz" || ext == "bgz" {
        if let Some(stem) = path.file_stem() {
            ext = Path::new(stem)
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_default();
        }
    }

    match ext.as_str() {
        "fastq" | "fq" => SequenceFormat::Fastq,
        "fasta" | "fa" | "fna" => SequenceFormat::Fasta,
        _ => SequenceFormat::Lines,
    }
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, IngestError> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn uppercase_sequence(bytes: &[u8], path: &Path) -> Result<String, IngestError> {
    let upper: Vec<u8> = bytes.iter().map(|b| b.to_ascii_uppercase()).collect();
    String::from_utf8(upper).map_err(|_| IngestError::NotUtf8 {
        path: path.display().to_string(),
    })
}

/// Load every sequence in `path`, uppercased, with record names where the
/// format carries them.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, IngestError> {
    let format = infer_format(path);
    let reader = open_reader(path)?;

    match format {
        SequenceFormat::Fastq => {
            let mut records = Vec::new();
            for record in fastq::Reader::new(reader).records() {
                let record = record.map_err(|e| IngestError::Record {
                    format: "FASTQ",
                    path: path.display().to_string(),
                    detail: e.to_string(),
                })?;
                records.push(SequenceRecord {
                    name: record.id().to_string(),
                    sequence: uppercase_sequence(record.seq(), path)?,
                });
            }
            Ok(records)
        }
        SequenceFormat::Fasta => {
            let mut records = Vec::new();
            for record in fasta::Reader::new(reader).records() {
                let record = record.map_err(|e| IngestError::Record {
                    format: "FASTA",
                    path: path.display().to_string(),
                    detail: e.to_string(),
                })?;
                records.push(SequenceRecord {
                    name: record.id().to_string(),
                    sequence: uppercase_sequence(record.seq(), path)?,
                });
            }
            Ok(records)
        }
        SequenceFormat::Lines => {
            let mut records = Vec::new();
            let mut reader = reader;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    break;
                }
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                records.push(SequenceRecord {
                    name: format!("seq{}", records.len()),
                    sequence: trimmed.to_ascii_uppercase(),
                });
            }
            Ok(records)
        }
    }
}

/// Load trimmed, non-empty lines verbatim (used for pattern files).
pub fn read_lines(path: &Path) -> Result<Vec<String>, IngestError> {
    let mut reader = open_reader(path)?;
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("gstree-{}-{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn infers_formats_from_extensions() {
        assert_eq!(infer_format(Path::new("reads.fastq")), SequenceFormat::Fastq);
        assert_eq!(infer_format(Path::new("reads.fq.gz")), SequenceFormat::Fastq);
        assert_eq!(infer_format(Path::new("genome.fa")), SequenceFormat::Fasta);
        assert_eq!(infer_format(Path::new("genome.fna.bgz")), SequenceFormat::Fasta);
        assert_eq!(infer_format(Path::new("notes.txt")), SequenceFormat::Lines);
    }

    #[test]
    fn reads_fasta_records_with_names() {
        let path = temp_file("in.fasta", ">first\nacgt\n>second\nTTAA\n");
        let records = read_sequences(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "first");
        assert_eq!(records[0].sequence, "ACGT");
        assert_eq!(records[1].sequence, "TTAA");
    }

    #[test]
    fn reads_plain_lines_and_skips_blanks() {
        let path = temp_file("in.txt", "acgt\n\n  ttaa  \n");
        let records = read_sequences(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "seq0");
        assert_eq!(records[1].sequence, "TTAA");
    }

    #[test]
    fn read_lines_keeps_pattern_case() {
        let path = temp_file("patterns.txt", "AnA\n\nxyz\n");
        let lines = read_lines(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(lines, vec!["AnA".to_string(), "xyz".to_string()]);
    }
}
