//! divisplit - Split long Divi text modules

use std::fs;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use divisplit::{Error, FallibleSink, Mode, Settings, SplitTags, decode_text, transform_json};

#[derive(Parser)]
#[command(name = "divisplit")]
#[command(version, about = "Split long Divi text modules in JSON exports", long_about = None)]
#[command(after_help = "EXAMPLES:
    divisplit export.json split.json             Split with default settings
    divisplit export.json --split h2,h3 --mode normal
    divisplit export.json out.json --settings settings.json --footnotes")]
struct Cli {
    /// Divi JSON export to transform
    #[arg(value_name = "INPUT")]
    input: String,

    /// Where to write the result (stdout if omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Settings JSON file (as saved by the settings form)
    #[arg(short, long, value_name = "FILE")]
    settings: Option<String>,

    /// Processing mode: normal, advanced or dev
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<Mode>,

    /// Comma-separated split tags, replacing the configured set (e.g. h2,h3,blockquote)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    split: Option<Vec<String>>,

    /// Maximum modules per row (0 = no limit)
    #[arg(long, value_name = "N")]
    max_modules_per_row: Option<usize>,

    /// Maximum paragraphs per module (0 = no limit)
    #[arg(long, value_name = "N")]
    max_paragraphs_per_module: Option<usize>,

    /// Link footnote references and collect notes into a list
    #[arg(long)]
    footnotes: bool,

    /// Turn bulleted interview lists into blockquotes
    #[arg(long)]
    interview_lists: bool,

    /// Do not merge fragmented em/span tags
    #[arg(long)]
    no_tag_merging: bool,

    /// Unwrap spans without attributes
    #[arg(long)]
    remove_empty_spans: bool,

    /// Drop icon glyph spans in front of links
    #[arg(long)]
    fix_link_icons: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    match s.to_ascii_lowercase().as_str() {
        "normal" => Ok(Mode::Normal),
        "advanced" => Ok(Mode::Advanced),
        "dev" => Ok(Mode::Dev),
        other => Err(format!("unknown mode '{other}' (expected normal, advanced or dev)")),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let settings = load_settings(cli)?;
    log::debug!("settings: {settings:?}");

    let bytes = fs::read(&cli.input)?;
    let input = decode_text(&bytes);

    let quiet = cli.quiet;
    let mut progress = FallibleSink::new(|line: &str| {
        if quiet {
            return Ok(());
        }
        writeln!(std::io::stderr(), "{line}")
    });
    let output = transform_json(&input, &settings, &mut progress)?;
    if progress.failures() > 0 {
        log::warn!("{} progress line(s) could not be written", progress.failures());
    }

    match &cli.output {
        Some(path) => fs::write(path, output)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Error> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::from_json(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };

    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    if let Some(tags) = &cli.split {
        settings.splits = SplitTags::NONE;
        for tag in tags.iter().filter(|t| !t.trim().is_empty()) {
            if !settings.splits.enable(tag) {
                return Err(Error::InvalidSettings(format!("unknown split tag '{tag}'")));
            }
        }
    }
    if let Some(n) = cli.max_modules_per_row {
        settings.max_modules_per_row = n;
    }
    if let Some(n) = cli.max_paragraphs_per_module {
        settings.max_paragraphs_per_module = n;
    }
    settings.process_footnotes |= cli.footnotes;
    settings.process_interview_lists |= cli.interview_lists;
    settings.remove_empty_spans |= cli.remove_empty_spans;
    settings.fix_link_icons |= cli.fix_link_icons;
    if cli.no_tag_merging {
        settings.process_tag_merging = false;
    }
    Ok(settings)
}
