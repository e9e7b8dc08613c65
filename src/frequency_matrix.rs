use std::fmt;

use tracing::trace;

use crate::utils::generate_vector_space_delimited;
use crate::Error;

/// Canonical base order used for the count rows, tie-breaking, weak-consensus
/// groups, and display. Changing this order changes the output.
pub const BASES: [char; 4] = ['A', 'T', 'C', 'G'];

fn base_index(base: char) -> Option<usize> {
    match base {
        'A' => Some(0),
        'T' => Some(1),
        'C' => Some(2),
        'G' => Some(3),
        _ => None,
    }
}

/// Position frequency matrix over a set of equal-length DNA sequences.
///
/// `counts` holds one row per base in [`BASES`] order and one entry per
/// column; `counts[row][i]` is the number of sequences whose base at column
/// `i` is `BASES[row]`. The matrix always holds at least one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyMatrix {
    sequences: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl FrequencyMatrix {
    /// Builds a matrix from a non-empty list of equal-length sequences.
    /// Input is uppercased; any symbol outside ATCG is rejected.
    pub fn new(sequences: Vec<String>) -> Result<Self, Error> {
        if sequences.is_empty() {
            return Err(Error::EmptySequenceError);
        }
        let sequences: Vec<String> = sequences.into_iter().map(|s| s.to_uppercase()).collect();
        let length = sequences[0].chars().count();
        if length == 0 {
            return Err(Error::EmptySequenceError);
        }
        for seq in &sequences {
            let found = seq.chars().count();
            if found != length {
                return Err(Error::LengthMismatchError {
                    expected: length,
                    found,
                });
            }
        }
        let counts = build_counts(&sequences, length)?;
        trace!("Built {}x{} frequency matrix", sequences.len(), length);
        Ok(Self { sequences, counts })
    }

    /// Common column count of all sequences in the matrix.
    pub fn len(&self) -> usize {
        self.counts[0].len()
    }

    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    fn check_column(&self, column: usize) -> Result<(), Error> {
        if column == 0 || column > self.len() {
            return Err(Error::RangeError {
                column,
                length: self.len(),
            });
        }
        Ok(())
    }

    fn column_counts(&self, i: usize) -> [usize; 4] {
        [
            self.counts[0][i],
            self.counts[1][i],
            self.counts[2][i],
            self.counts[3][i],
        ]
    }

    fn conserved_at(&self, i: usize) -> bool {
        let counts = self.column_counts(i);
        let max = counts.iter().fold(0, |m, &c| m.max(c));
        let total: usize = counts.iter().sum();
        max == total
    }

    /// True iff exactly one base occurs in the 1-indexed `column`.
    pub fn is_conserved(&self, column: usize) -> Result<bool, Error> {
        self.check_column(column)?;
        Ok(self.conserved_at(column - 1))
    }

    /// All conserved column numbers, 1-indexed, ascending.
    pub fn conserved_columns(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.conserved_at(i))
            .map(|i| i + 1)
            .collect()
    }

    fn most_frequent_at(&self, i: usize) -> char {
        // ties go to the earliest base in canonical A-T-C-G order
        let mut max_count = 0;
        let mut most_frequent = BASES[0];
        for (row, &base) in BASES.iter().enumerate() {
            if self.counts[row][i] > max_count {
                max_count = self.counts[row][i];
                most_frequent = base;
            }
        }
        most_frequent
    }

    /// Base with the highest count in the 1-indexed `column`.
    pub fn most_frequent_base(&self, column: usize) -> Result<char, Error> {
        self.check_column(column)?;
        Ok(self.most_frequent_at(column - 1))
    }

    /// Most frequent base of every column, concatenated.
    pub fn consensus(&self) -> String {
        (0..self.len()).map(|i| self.most_frequent_at(i)).collect()
    }

    /// Ambiguous consensus pattern: per column, a single literal base when
    /// only one base occurs, otherwise all occurring bases in canonical
    /// order enclosed in square brackets, e.g. `AT[CG]`.
    pub fn weak_consensus(&self) -> String {
        let mut pattern = String::new();
        for i in 0..self.len() {
            let present: Vec<char> = BASES
                .iter()
                .enumerate()
                .filter(|(row, _)| self.counts[*row][i] > 0)
                .map(|(_, &base)| base)
                .collect();
            if present.len() == 1 {
                pattern.push(present[0]);
            } else {
                pattern.push('[');
                pattern.extend(present);
                pattern.push(']');
            }
        }
        pattern
    }

    /// Adds one site to the matrix, updating the counts incrementally for
    /// the new sequence only. The matrix is left untouched on any failure.
    pub fn append(&mut self, site: &str) -> Result<(), Error> {
        let site = site.to_uppercase();
        let found = site.chars().count();
        if found != self.len() {
            return Err(Error::LengthMismatchError {
                expected: self.len(),
                found,
            });
        }
        let mut rows = Vec::with_capacity(found);
        for base in site.chars() {
            rows.push(base_index(base).ok_or(Error::InvalidNucleotideError(base))?);
        }
        for (i, &row) in rows.iter().enumerate() {
            self.counts[row][i] += 1;
        }
        self.sequences.push(site);
        Ok(())
    }

    /// Merges two matrices of equal column count into a fresh one whose
    /// counts are rebuilt from the concatenated sequence lists.
    pub fn combine(&self, other: &FrequencyMatrix) -> Result<FrequencyMatrix, Error> {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatchError {
                left: self.len(),
                right: other.len(),
            });
        }
        let mut combined = self.sequences.clone();
        combined.extend(other.sequences.iter().cloned());
        FrequencyMatrix::new(combined)
    }
}

fn build_counts(sequences: &[String], length: usize) -> Result<Vec<Vec<usize>>, Error> {
    let mut counts = vec![vec![0usize; length]; BASES.len()];
    for seq in sequences {
        for (i, base) in seq.chars().enumerate() {
            match base_index(base) {
                Some(row) => counts[row][i] += 1,
                None => return Err(Error::InvalidNucleotideError(base)),
            }
        }
    }
    Ok(counts)
}

impl fmt::Display for FrequencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = BASES
            .iter()
            .enumerate()
            .map(|(row, base)| {
                format!("{} {}", base, generate_vector_space_delimited(&self.counts[row]))
            })
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
