//! 命令行入口：翻译一个 HTML 片段并输出响应 JSON

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use translation_bridge::env::{core, EnvVar};
use translation_bridge::translation::config::{load_translation_config, ConfigManager};
use translation_bridge::translation::{
    TranslateRequest, TranslationConfig, TranslationError, TranslationService,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target language
    #[arg(short, long, default_value = "")]
    to: String,

    /// Provider region (top-level domain of the translation host)
    #[arg(long)]
    tld: Option<String>,

    /// Send one request per text node instead of one per fragment
    #[arg(long)]
    no_batch: bool,

    /// UI locale used for language display names
    #[arg(short, long)]
    locale: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// HTML fragment file, reads stdin when omitted or "-"
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        "debug".to_string()
    } else {
        core::LogLevel::get_or_default("warn".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), TranslationError> {
    let config = load_config(args.config.as_ref())?;
    let content = read_content(args.file.as_ref())?;

    let mut request = TranslateRequest::new(content, args.to);
    if let Some(tld) = args.tld {
        request = request.with_tld(tld);
    }
    if args.no_batch {
        request = request.with_batch(false);
    }
    if let Some(locale) = args.locale {
        request = request.with_locale(locale);
    }

    let service = TranslationService::with_google(config)?;
    let response = service.translate(&request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<TranslationConfig, TranslationError> {
    match path {
        Some(path) => Ok(ConfigManager::from_file(&path.to_string_lossy())?.into_config()),
        None => Ok(load_translation_config()),
    }
}

fn read_content(path: Option<&PathBuf>) -> Result<String, TranslationError> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取文件失败 {}: {}", path.display(), e))
        }),
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}
