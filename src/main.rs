use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webpconverter::models::{Config, ConvertToWebpOptions, DeleteFileOptions};
use webpconverter::plugin::WebpConverter;

#[derive(Debug, Parser)]
#[command(name = "webpconverter")]
#[command(about = "Convert images to WebP temp files and clean them up")]
struct CliArgs {
    /// Directory converted files are written to (defaults to the OS temp dir).
    #[arg(long, global = true, value_name = "DIR")]
    temp_dir: Option<PathBuf>,

    /// Only delete files the converter created.
    #[arg(long, global = true)]
    strict_delete: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an image to WebP.
    Convert {
        /// Source image path or file:// URI.
        file_uri: String,
        /// Quality 0-100 (default 100).
        #[arg(short, long, value_parser = parse_quality)]
        quality: Option<i64>,
    },
    /// Delete one converted file.
    Delete {
        /// Path or file:// URI returned by `convert`.
        file_uri: String,
    },
    /// Delete every converted file in the temp directory.
    Clear,
}

fn parse_quality(input: &str) -> std::result::Result<i64, String> {
    match input.parse::<i64>() {
        Ok(q) if (0..=100).contains(&q) => Ok(q),
        _ => Err(format!(
            "Invalid quality '{}'. Expected an integer from 0 to 100",
            input
        )),
    }
}

/// CLI flags win over the environment; validation runs on the merged result.
fn apply_overrides(
    mut config: Config,
    temp_dir: Option<&Path>,
    strict_delete: bool,
) -> webpconverter::Result<Config> {
    if let Some(dir) = temp_dir {
        config = config.with_temp_dir(dir);
    }
    if strict_delete {
        config = config.with_strict_delete(true);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webpconverter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = apply_overrides(
        Config::load_env(),
        args.temp_dir.as_deref(),
        args.strict_delete,
    )?;

    info!("Using temp directory {}", config.temp_dir.display());
    let plugin = WebpConverter::new(&config);

    let outcome = match args.command {
        Command::Convert { file_uri, quality } => plugin
            .convert_to_webp(ConvertToWebpOptions {
                file_uri: Some(file_uri),
                quality,
            })
            .await
            .map(serde_json::to_value),
        Command::Delete { file_uri } => plugin
            .delete_temp_file(DeleteFileOptions {
                file_uri: Some(file_uri),
            })
            .await
            .map(serde_json::to_value),
        Command::Clear => plugin
            .clear_all_temp_webps()
            .await
            .map(serde_json::to_value),
    };

    match outcome {
        Ok(value) => {
            println!("{}", value?);
            Ok(())
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            println!("{}", serde_json::to_string(&e)?);
            std::process::exit(1);
        }
    }
}
