use clap::error::ErrorKind;
use clap::Parser;
use log::LevelFilter;
use recipe_extractor::{
    ExtractError, ExtractionFailure, ExtractionResult, ExtractorConfig, RecipeExtractor,
    RecipeRecord, Reporter,
};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "Usage: recipe-extractor <youtube_url> [--quiet]";

#[derive(Parser)]
#[command(author, version, about = "Extract a structured recipe from a cooking video")]
struct Cli {
    /// Video URL (watch, youtu.be, embed or shorts link)
    url: Option<String>,

    /// Only print the JSON result on stdout, no progress output and no file
    #[arg(long, visible_alias = "json")]
    quiet: bool,
}

fn init_logger(quiet: bool) {
    let mut builder = if quiet {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Off);
        builder
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    };
    builder
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => return usage_error(),
    };

    let Some(url) = cli.url else {
        return usage_error();
    };

    init_logger(cli.quiet);
    let reporter = Reporter::new(cli.quiet);

    let (result, output_dir) = match ExtractorConfig::load() {
        Ok(config) => {
            let extractor = RecipeExtractor::new(config);
            let result = extractor.extract(&url, &reporter).await;
            (result, extractor.config().output_dir.clone())
        }
        Err(e) => {
            let failure = ExtractionFailure::new(ExtractError::from(e).to_string());
            (ExtractionResult::from(failure), PathBuf::from("."))
        }
    };

    // stdout carries exactly one JSON object, whatever the mode
    match serde_json::to_string(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("{}", json!({"success": false, "error": e.to_string()})),
    }

    if let ExtractionResult::Success(recipe) = &result {
        if !reporter.is_quiet() {
            show_and_save(recipe, &output_dir, &reporter).await;
        }
    }

    ExitCode::SUCCESS
}

fn usage_error() -> ExitCode {
    println!("{}", json!({"success": false, "error": USAGE}));
    ExitCode::FAILURE
}

/// Pretty-print the recipe on stderr and save it as `recipe_<video id>.json`
async fn show_and_save(recipe: &RecipeRecord, output_dir: &Path, reporter: &Reporter) {
    let pretty = match serde_json::to_string_pretty(recipe) {
        Ok(pretty) => pretty,
        Err(e) => {
            reporter.warn(format!("Failed to format recipe: {e}"));
            return;
        }
    };

    reporter.banner("EXTRACTED RECIPE");
    reporter.info(&pretty);

    let path = output_path(output_dir, &recipe.video_id);
    match tokio::fs::write(&path, pretty).await {
        Ok(()) => reporter.info(format!("Saved to: {}", path.display())),
        Err(e) => reporter.warn(format!("Could not save {}: {}", path.display(), e)),
    }
}

fn output_path(output_dir: &Path, video_id: &str) -> PathBuf {
    let video_id = if video_id.is_empty() { "unknown" } else { video_id };
    output_dir.join(format!("recipe_{video_id}.json"))
}
