mod command;
pub mod frequency_matrix;
pub mod scanner;
mod utils;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str;

use bio::io::fasta;
use tracing::info;

#[doc(hidden)]
pub use command::PfmScanner;
pub use frequency_matrix::FrequencyMatrix;

#[derive(Debug)]
pub enum Error {
    IOError,
    FileNotFoundError(String),
    EmptySequenceError,
    InvalidSequenceError,
    InvalidNucleotideError(char),
    LengthMismatchError { expected: usize, found: usize },
    DimensionMismatchError { left: usize, right: usize },
    RangeError { column: usize, length: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IOError => write!(f, "I/O error"),
            Error::FileNotFoundError(path) => write!(f, "file '{}' does not exist", path),
            Error::EmptySequenceError => {
                write!(f, "empty sequence: a sequence line is blank or no sequences were loaded")
            }
            Error::InvalidSequenceError => write!(f, "sequence data is not valid UTF-8"),
            Error::InvalidNucleotideError(base) => {
                write!(f, "invalid nucleotide '{}': expected one of A, T, C, G", base)
            }
            Error::LengthMismatchError { expected, found } => {
                write!(f, "sequence length mismatch: expected {} columns, found {}", expected, found)
            }
            Error::DimensionMismatchError { left, right } => {
                write!(f, "cannot combine matrices with {} and {} columns", left, right)
            }
            Error::RangeError { column, length } => {
                write!(f, "column {} is out of range [1, {}]", column, length)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Loads the aligned binding sites from a multifasta file: header lines
/// (starting with `>`) are discarded and every remaining line is one site,
/// uppercased. A blank non-header line is a format error.
#[tracing::instrument]
pub fn load_sites(path_to_file: &str) -> Result<Vec<String>, Error> {
    info!("Loading aligned sites from '{}'...", path_to_file);
    let file = match File::open(path_to_file) {
        Ok(file) => file,
        Err(_) => return Err(Error::FileNotFoundError(path_to_file.to_string())),
    };
    let mut sequences = vec![];
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|_| Error::IOError)?;
        let line = line.trim();
        if line.starts_with('>') {
            continue;
        }
        if line.is_empty() {
            return Err(Error::EmptySequenceError);
        }
        sequences.push(line.to_uppercase());
    }
    if sequences.is_empty() {
        return Err(Error::EmptySequenceError);
    }
    info!("Done loading sites: {} entries", sequences.len());
    Ok(sequences)
}

/// Loads the scan target from a fasta file, concatenating the sequence data
/// of every record in order and uppercasing it.
#[tracing::instrument]
pub fn load_target(path_to_file: &str) -> Result<String, Error> {
    info!("Loading scan target from '{}'...", path_to_file);
    let file = match File::open(path_to_file) {
        Ok(file) => file,
        Err(_) => return Err(Error::FileNotFoundError(path_to_file.to_string())),
    };
    let mut records = fasta::Reader::new(file).records();
    let mut target = String::new();
    while let Some(Ok(record)) = records.next() {
        let s = match str::from_utf8(record.seq()) {
            Ok(v) => v,
            Err(_e) => return Err(Error::InvalidSequenceError),
        };
        target.push_str(&s.to_uppercase());
    }
    if target.is_empty() {
        return Err(Error::EmptySequenceError);
    }
    info!("Done loading target: {} bases", target.chars().count());
    Ok(target)
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::{scanner, Error, FrequencyMatrix};

    #[test]
    pub fn test_load_sites() {
        let sites = super::load_sites("sites.fasta").unwrap();
        assert_eq!(sites.len(), 5);
        assert_eq!(sites[0], "ATTAGGATA");
        assert!(sites.iter().all(|s| s.chars().count() == 9));
    }

    #[test]
    pub fn test_load_sites_missing_file() {
        let result = super::load_sites("does_not_exist.fasta");
        assert!(matches!(result, Err(Error::FileNotFoundError(_))));
    }

    #[test]
    pub fn test_load_sites_blank_line() {
        let path = std::env::temp_dir().join("pfm_scanner_blank_line.fasta");
        fs::write(&path, ">site1\nATTAGGATA\n\nATTAGGATC\n").unwrap();
        let result = super::load_sites(path.to_str().unwrap());
        assert!(matches!(result, Err(Error::EmptySequenceError)));
        fs::remove_file(&path).ok();
    }

    #[test]
    pub fn test_load_target() {
        let target = super::load_target("target.fasta").unwrap();
        assert_eq!(target, "GGCATTAGGATACGTTACGATTCGGATAGG");
    }

    #[test]
    pub fn test_sites_to_positions_end_to_end() {
        let sites = super::load_sites("sites.fasta").unwrap();
        let target = super::load_target("target.fasta").unwrap();
        let matrix = FrequencyMatrix::new(sites).unwrap();
        assert_eq!(matrix.weak_consensus(), "[AC]TT[AC]GG[AG]T[AC]");
        assert_eq!(scanner::search(&matrix, &target), vec![4, 20]);
    }
}
