// ABOUTME: CLI binary for the Washington Post extractor.
// ABOUTME: Decodes embedded "content" JSON fields from a saved page and writes news.txt.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use newsgrab::extract_embedded_file;
use newsgrab::logging::init_logging;
use newsgrab::options::TEXT_OUTPUT;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "wp-extract")]
#[command(about = "Recover Washington Post article text from a saved HTML dump")]
struct Args {
    /// Saved HTML page, usually site.html from newsgrab
    #[arg()]
    html_file: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };
    init_logging(false);

    info!(path = %args.html_file.display(), "Extracting Washington Post content");
    let content = match extract_embedded_file(&args.html_file) {
        Ok(content) => content,
        Err(e) => {
            error!(error = %e, "Error extracting Washington Post content");
            String::new()
        }
    };

    if content.is_empty() {
        println!("No content extracted");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = std::fs::write(TEXT_OUTPUT, &content) {
        error!(error = %e, path = TEXT_OUTPUT, "write failed");
        return ExitCode::from(1);
    }
    println!(
        "Washington Post content written to {} ({} characters)",
        TEXT_OUTPUT,
        content.chars().count()
    );
    ExitCode::SUCCESS
}
