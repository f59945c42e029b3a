// ABOUTME: CLI binary for the generic news extractor.
// ABOUTME: Loads a URL (or a saved page) and writes news.txt and site.html into the working directory.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use newsgrab::logging::init_logging;
use newsgrab::options::DEFAULT_DEBUG_PORT;
use newsgrab::{run, Input, Options};
use tracing::error;

const SESSION_HINT: &str = "\
To use an existing Chrome session, first start Chrome with:
  chrome --remote-debugging-port=9222
Use --wp (or -wp) for Washington Post articles";

#[derive(Parser, Debug)]
#[command(name = "newsgrab")]
#[command(about = "Extract the article text from a news page")]
#[command(after_help = SESSION_HINT)]
struct Args {
    /// News article URL
    #[arg()]
    url: Option<String>,

    /// Attach to a Chrome already running with remote debugging
    #[arg(long = "use-existing-session")]
    use_existing_session: bool,

    /// Run the Washington Post extractor over the saved HTML afterwards
    #[arg(long = "wp")]
    wp: bool,

    /// Remote debugging port used with --use-existing-session
    #[arg(long = "port", default_value_t = DEFAULT_DEBUG_PORT)]
    port: u16,

    /// Extract from a saved HTML file instead of loading a URL
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Accepts the legacy single-dash `-wp` spelling.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|a| if a == "-wp" { OsString::from("--wp") } else { a })
        .collect()
}

fn print_usage() {
    let mut cmd = Args::command();
    eprintln!("{}", cmd.render_usage());
    eprintln!("{}", SESSION_HINT);
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse_from(normalize_args(std::env::args_os())) {
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
    init_logging(args.verbose);

    let input = match (args.url, args.html) {
        (Some(_), Some(_)) => {
            eprintln!("error: cannot use both --html and a URL");
            return ExitCode::from(1);
        }
        (Some(url), None) => Input::Url(url),
        (None, Some(path)) => Input::HtmlFile(path),
        (None, None) => {
            print_usage();
            return ExitCode::from(1);
        }
    };

    let opts = Options::builder()
        .use_existing_session(args.use_existing_session)
        .debug_port(args.port)
        .publisher_mode(args.wp)
        .build();

    match run(&input, &opts).await {
        Ok(result) if result.is_empty() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "extraction failed");
            ExitCode::from(1)
        }
    }
}
