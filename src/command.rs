use chrono::Utc;
use clap::{Args, Parser};
use clap_verbosity_flag::InfoLevel;
use tracing::info;

use crate::utils::{
    create_output_file, generate_vector_space_delimited, write_file_header, write_report,
};
use crate::{load_sites, load_target, scanner, Error, FrequencyMatrix};

/// Columns probed for conservation in the report.
const DEMO_COLUMNS: [usize; 4] = [5, 6, 7, 8];
/// Site appended to the matrix to demonstrate the mutation path.
const DEMO_SITE: &str = "ATTAGGATA";

/// PFM Scanner
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct PfmScanner {
    #[clap(flatten)]
    global_opts: GlobalOpts,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// file path of the aligned binding sites (multifasta)
    sites_file: String,

    /// file path of the DNA sequence to scan (fasta)
    target_file: String,

    /// save the report to file
    #[arg(short = 'o', long = "output")]
    output_file: Option<Option<String>>,
}

impl PfmScanner {
    pub fn exec(self) -> Result<(), Error> {
        let dt = Utc::now();
        let start_time: i64 = dt.timestamp_micros();
        info!("Welcome to PFM Scanner!");
        let sites = load_sites(&self.global_opts.sites_file)?;
        let target = load_target(&self.global_opts.target_file)?;
        let mut matrix = FrequencyMatrix::new(sites)?;
        let report = build_report(&mut matrix, &target)?;
        for line in &report {
            println!("{line}");
        }
        if let Some(save_flag) = &self.global_opts.output_file {
            let (mut file, file_path) = create_output_file(save_flag, matrix.len(), start_time)?;
            write_file_header(
                &mut file,
                &self.global_opts.sites_file,
                &self.global_opts.target_file,
                dt,
            )
            .map_err(|_| Error::IOError)?;
            write_report(&mut file, &report)?;
            info!("Report saved to {}", file_path);
        }
        let dt_end = Utc::now();
        if let Some(duration) = dt_end.signed_duration_since(dt).num_microseconds() {
            info!("Done in {} seconds", duration as f64 / 1_000_000.0);
        }
        Ok(())
    }
}

fn build_report(matrix: &mut FrequencyMatrix, target: &str) -> Result<Vec<String>, Error> {
    let mut report = vec![];
    report.push("Aligned site sequences:".to_string());
    report.push(generate_vector_space_delimited(matrix.sequences()));
    report.push("---".to_string());
    report.push("Position frequency matrix:".to_string());
    report.push(matrix.to_string());
    report.push("---".to_string());
    report.push(format!("Sequence length (columns): {}", matrix.len()));
    report.push("---".to_string());
    for column in DEMO_COLUMNS {
        let status = if matrix.is_conserved(column)? {
            "conserved"
        } else {
            "not conserved"
        };
        report.push(format!("Column {} is {}.", column, status));
    }
    report.push("---".to_string());
    report.push(format!(
        "Conserved columns: {}",
        generate_vector_space_delimited(&matrix.conserved_columns())
    ));
    report.push("---".to_string());
    report.push(format!(
        "Most frequent base in column 1: {}",
        matrix.most_frequent_base(1)?
    ));
    report.push("---".to_string());
    report.push(format!("Consensus: {}", matrix.consensus()));
    report.push(format!("Weak consensus: {}", matrix.weak_consensus()));
    report.push("---".to_string());
    matrix.append(DEMO_SITE)?;
    report.push(format!("Matrix after appending {}:", DEMO_SITE));
    report.push(matrix.to_string());
    report.push(format!(
        "Conserved columns after appending: {}",
        generate_vector_space_delimited(&matrix.conserved_columns())
    ));
    report.push("---".to_string());
    let doubled = matrix.combine(matrix)?;
    report.push("Matrix combined with itself:".to_string());
    report.push(doubled.to_string());
    report.push("---".to_string());
    report.push(format!(
        "Scan target ({} bases): {}",
        target.chars().count(),
        target
    ));
    let positions = scanner::search(matrix, target);
    if positions.is_empty() {
        report.push("No occurrences of the weak consensus found.".to_string());
    } else {
        report.push(format!(
            "Weak consensus occurrences (1-indexed): {}",
            generate_vector_space_delimited(&positions)
        ));
    }
    Ok(report)
}
