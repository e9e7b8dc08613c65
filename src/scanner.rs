use indicatif::{ProgressBar, ProgressStyle};
use tracing::trace;

use crate::frequency_matrix::FrequencyMatrix;

/// One weak-consensus column: either an exact base or a bracketed
/// alternation. Every token consumes exactly one window position.
#[derive(Debug, PartialEq, Eq)]
enum PatternToken {
    Literal(char),
    AnyOf(Vec<char>),
}

fn parse_pattern(weak_consensus: &str) -> Vec<PatternToken> {
    let mut tokens = vec![];
    let mut chars = weak_consensus.chars();
    while let Some(c) = chars.next() {
        if c == '[' {
            let mut group = vec![];
            for inner in chars.by_ref() {
                if inner == ']' {
                    break;
                }
                group.push(inner);
            }
            tokens.push(PatternToken::AnyOf(group));
        } else {
            tokens.push(PatternToken::Literal(c));
        }
    }
    tokens
}

fn window_matches(tokens: &[PatternToken], window: &[char]) -> bool {
    for (token, &base) in tokens.iter().zip(window) {
        let matched = match token {
            PatternToken::Literal(expected) => *expected == base,
            PatternToken::AnyOf(group) => group.contains(&base),
        };
        if !matched {
            return false;
        }
    }
    true
}

/// Finds every starting position where the matrix's weak consensus matches
/// `target`, as 1-indexed positions in ascending order. A target shorter
/// than the motif yields no positions.
#[tracing::instrument(skip_all)]
pub fn search(matrix: &FrequencyMatrix, target: &str) -> Vec<usize> {
    let weak_consensus = matrix.weak_consensus();
    trace!("Scanning for weak consensus {}", weak_consensus);
    let tokens = parse_pattern(&weak_consensus);
    let motif_length = matrix.len();
    let target_chars: Vec<char> = target.chars().collect();
    if motif_length > target_chars.len() {
        return vec![];
    }
    let num_windows = target_chars.len() - motif_length + 1;
    let pb = ProgressBar::new(num_windows as u64);
    let sty = ProgressStyle::with_template(
        "[{elapsed_precise}] {spinner:.green} {bar:40.cyan/blue} {pos:>7}/{len:7} {msg} ({eta})",
    )
    .unwrap();
    pb.set_style(sty);
    let mut positions = vec![];
    for i in 0..num_windows {
        if window_matches(&tokens, &target_chars[i..i + motif_length]) {
            trace!("Match at offset {}", i);
            positions.push(i + 1);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    positions
}

#[cfg(test)]
mod test {
    use super::{parse_pattern, search, PatternToken};
    use crate::frequency_matrix::FrequencyMatrix;

    fn matrix(sequences: &[&str]) -> FrequencyMatrix {
        FrequencyMatrix::new(sequences.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_parse_pattern() {
        let tokens = parse_pattern("A[CG]T");
        assert_eq!(
            tokens,
            vec![
                PatternToken::Literal('A'),
                PatternToken::AnyOf(vec!['C', 'G']),
                PatternToken::Literal('T'),
            ]
        );
    }

    #[test]
    fn test_search_exact_motif() {
        let m = matrix(&["ATG"]);
        assert_eq!(search(&m, "XXATGXX"), vec![3]);
    }

    #[test]
    fn test_search_ambiguous_motif() {
        // weak consensus A[CG]T matches ACT and AGT
        let m = matrix(&["ACT", "AGT"]);
        assert_eq!(m.weak_consensus(), "A[CG]T");
        assert_eq!(search(&m, "ACTAGT"), vec![1, 4]);
    }

    #[test]
    fn test_search_no_match() {
        let m = matrix(&["ATG"]);
        assert!(search(&m, "CCCCCC").is_empty());
    }

    #[test]
    fn test_search_target_equal_length() {
        let m = matrix(&["ATG"]);
        assert_eq!(search(&m, "ATG"), vec![1]);
    }

    #[test]
    fn test_search_target_shorter_than_motif() {
        let m = matrix(&["ATGATG"]);
        assert!(search(&m, "ATG").is_empty());
    }

    #[test]
    fn test_search_overlapping_matches() {
        let m = matrix(&["AA"]);
        assert_eq!(search(&m, "AAAA"), vec![1, 2, 3]);
    }
}
