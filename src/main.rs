use clap::{Parser, ValueEnum};
use glue::{
    CombineConfig, DEFAULT_OUTPUT, FileEntry, GlueError, Result, combine_files, extract_document,
    select_files,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

const LOGO: &str = r"
  ▄████  ██▓     █    ██ ▓█████
 ██▒ ▀█▒▓██▒     ██  ▓██▒▓█   ▀
▒██░▄▄▄░▒██░    ▓██  ▒██░▒███
░▓█  ██▓▒██░    ▓▓█  ░██░▒▓█  ▄
░▒▓███▀▒░██████▒▒▒█████▓ ░▒████▒
 ░▒   ▒ ░ ▒░▓  ░░▒▓▒ ▒ ▒ ░░ ▒░ ░
  ░   ░ ░ ░ ▒  ░░░▒░ ░ ░  ░ ░  ░
░ ░   ░   ░ ░    ░░░ ░ ░    ░
      ░     ░  ░   ░        ░  ░
";

const LONG_HELP: &str = r"
Document format:
  -- path/to/file.ext
  ```ext
  <file contents>
  ```

Examples:
  # Combine every file not listed in .gitignore into combined.txt
  glue
  # Combine only Go sources, dropping tests
  glue -i '*_test.go' '**/*.go'
  # Ignore .gitignore, but still skip the vendor directory
  glue --all -i 'vendor/'
  # Show what would be combined, as JSON
  glue --list=json
  # Recreate the files from bundle.txt in the current directory
  glue --reverse -o bundle.txt
";

/// Combine and extract project files into/from a single text file.
#[derive(Parser, Debug)]
#[command(
    name = "glue",
    version,
    about = "Combine and extract project files into/from a single text file",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Glob patterns selecting the files to combine (default: all files)
    #[arg(value_name = "PATTERNS")]
    patterns: Vec<String>,

    /// Include all files, do not use .gitignore
    #[arg(short, long)]
    all: bool,

    /// Glob patterns to ignore (repeatable)
    #[arg(short, long, value_name = "GLOB", action = clap::ArgAction::Append)]
    ignore: Vec<String>,

    /// Output file name (the file to read with --reverse)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Reverse operation, recreate project from combined file
    #[arg(short, long)]
    reverse: bool,

    /// List the files that would be combined instead of writing them (plain, json)
    #[arg(
        long,
        value_name = "FORMAT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "plain",
        conflicts_with = "reverse"
    )]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the logo and all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ListFormat {
    /// One path per line
    Plain,
    /// JSON array for scripting
    Json,
}

#[derive(Serialize)]
struct FileInfo<'a> {
    path: &'a str,
    extension: &'a str,
    size: u64,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.quiet, cli.verbose);
    log::debug!("CLI args parsed: {cli:?}");

    if !cli.quiet && cli.list.is_none() {
        println!("{LOGO}");
    }

    let start = Instant::now();
    match run(&cli) {
        Ok(Some(count)) => {
            println!("Processed {count} files in {:?}", start.elapsed());
        }
        Ok(None) => {}
        Err(e) => {
            log::debug!("Aborting: {e:?}");
            println!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}

/// Runs the selected mode; `None` means nothing was written
fn run(cli: &Cli) -> Result<Option<usize>> {
    let root = Path::new(".");

    if cli.reverse {
        if !cli.patterns.is_empty() || !cli.ignore.is_empty() || cli.all {
            log::warn!("Patterns and --all have no effect with --reverse");
        }
        log::info!("Extracting {}", cli.output.display());
        return extract_document(&cli.output, root).map(Some);
    }

    let config = CombineConfig {
        output: cli.output.clone(),
        inclusion_patterns: cli.patterns.clone(),
        ignore_patterns: cli.ignore.clone(),
        use_ignore_file: !cli.all,
    };

    if let Some(format) = cli.list {
        let files = select_files(root, &config)?;
        list_files(&files, format)?;
        return Ok(None);
    }

    combine_files(root, &config).map(Some)
}

fn list_files(files: &[FileEntry], format: ListFormat) -> Result<()> {
    match format {
        ListFormat::Plain => {
            for file in files {
                println!("{}", file.path());
            }
        }
        ListFormat::Json => {
            let mut infos = Vec::with_capacity(files.len());
            for file in files {
                let metadata =
                    std::fs::metadata(file.source()).map_err(|source| GlueError::ReadFile {
                        path: file.source().to_path_buf(),
                        source,
                    })?;
                infos.push(FileInfo {
                    path: file.path(),
                    extension: file.extension(),
                    size: metadata.len(),
                });
            }
            println!("{}", serde_json::to_string_pretty(&infos)?);
        }
    }
    Ok(())
}
