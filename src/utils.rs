use std::{
    fmt::Display,
    fs::{self, File},
    io::{self, Write},
};

use chrono::{DateTime, Utc};

use crate::Error;

pub fn generate_vector_space_delimited<T: Display>(vec: &[T]) -> String {
    let mut string = "".to_string();
    for val in vec {
        string.push_str(&format!("{val} "));
    }
    let string = string.trim().to_string();
    string
}

pub fn write_file_header(
    file: &mut fs::File,
    sites_file: &str,
    target_file: &str,
    dt: DateTime<Utc>,
) -> io::Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    writeln!(file, "PFM Scanner {}", version)?;
    writeln!(file, "Sites file: {}", sites_file)?;
    writeln!(file, "Target file: {}", target_file)?;
    writeln!(file, "Start time: {}", dt.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(
        file,
        "_________________________________________________________________________________________"
    )?;
    Ok(())
}

pub fn create_output_file(
    save_flag: &Option<String>,
    columns: usize,
    timestamp: i64,
) -> Result<(File, String), Error> {
    let save_path: String = save_flag
        .clone()
        .unwrap_or_else(|| format!("PfmScanner-report-{timestamp}-{}.txt", columns));
    let file = match fs::File::create(&save_path) {
        Ok(file) => file,
        Err(_err) => return Err(Error::IOError),
    };
    Ok((file, save_path))
}

pub fn write_report(file: &mut fs::File, report: &[String]) -> Result<(), Error> {
    for line in report {
        writeln!(file, "{line}").map_err(|_| Error::IOError)?;
    }
    Ok(())
}
