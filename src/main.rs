mod address;
mod error;
mod macros;
mod reader;
mod render;
mod writer;

use clap::Parser;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xlsm2text")]
#[command(version, about = "Render Excel workbooks and their VBA macros as diffable text")]
pub struct Args {
    /// Workbook to render (.xlsx, .xlsm, .xls, .xlsb or .ods)
    pub input: PathBuf,

    /// Any further argument writes to <INPUT>.csv instead of stdout
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<OsString>,
}

impl Args {
    /// Destination file, or `None` for stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        if self.rest.is_empty() {
            return None;
        }
        let mut path = self.input.clone().into_os_string();
        path.push(".csv");
        Some(PathBuf::from(path))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> error::Result<()> {
    log::info!("reading: {}", args.input.display());
    let document = reader::open_document(&args.input)?;

    match args.output_path() {
        None => {
            let stdout = io::stdout();
            let mut handle = BufWriter::new(stdout.lock());
            writer::write_document(&mut handle, &document)?;
        }
        Some(path) => {
            log::info!("output: {}", path.display());
            let file = File::create(&path)?;
            let mut out = BufWriter::new(file);
            writer::write_document(&mut out, &document)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_by_default() {
        let args = Args::try_parse_from(["xlsm2text", "book.xlsm"]).unwrap();
        assert_eq!(args.input, PathBuf::from("book.xlsm"));
        assert_eq!(args.output_path(), None);
    }

    #[test]
    fn test_second_argument_selects_file_output() {
        let args = Args::try_parse_from(["xlsm2text", "dir/book.xlsm", "anything"]).unwrap();
        assert_eq!(args.output_path(), Some(PathBuf::from("dir/book.xlsm.csv")));
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let args =
            Args::try_parse_from(["xlsm2text", "book.xlsx", "1", "--whatever", "-x"]).unwrap();
        assert_eq!(args.rest.len(), 3);
        assert_eq!(args.output_path(), Some(PathBuf::from("book.xlsx.csv")));
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["xlsm2text"]).is_err());
    }

    #[test]
    fn test_run_writes_csv_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("book.xlsx");
        let mut book = umya_spreadsheet::new_file();
        book.get_sheet_mut(&0)
            .unwrap()
            .get_cell_mut("B2")
            .set_value("Hello");
        umya_spreadsheet::writer::xlsx::write(&book, &input).unwrap();

        let args = Args {
            input: input.clone(),
            rest: vec![OsString::from("out")],
        };
        run(args).unwrap();

        let text = std::fs::read_to_string(dir.path().join("book.xlsx.csv")).unwrap();
        assert!(text.starts_with("Sheets {\n\nsheet Sheet1 {\n═ B2 "));
        assert!(text.contains("\n Hello\n"));
        assert!(text.ends_with("}\nMacros {\n}\n"));
    }

    #[test]
    fn test_run_reports_missing_input() {
        let args = Args {
            input: PathBuf::from("missing.xlsm"),
            rest: Vec::new(),
        };
        let err = run(args).unwrap_err();
        assert!(matches!(err, error::Error::FileNotFound(_)));
        assert_ne!(err.exit_code(), 0);
    }
}
