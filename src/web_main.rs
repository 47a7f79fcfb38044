//! Web 服务器主程序入口

use translation_bridge::env::{core, EnvConfig, EnvVar};
use translation_bridge::translation::config::load_translation_config;
use translation_bridge::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let translation_config = load_translation_config();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            core::LogLevel::get_or_default("info".to_string()),
        ))
        .init();

    let mut web_config = WebConfig::default();

    // 简单的命令行参数解析
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    web_config.bind_addr = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    web_config.port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--env-docs" => {
                print!("{}", translation_bridge::env::generate_env_docs());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    web_config.validate()?;

    if web_config.is_development() {
        if let Ok(env_config) = EnvConfig::from_env() {
            env_config.print_summary();
        }
    }

    let server = WebServer::new(web_config, translation_config);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("Translation Bridge Web Server");
    println!();
    println!("USAGE:");
    println!("    translation-bridge-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 5000]");
    println!("        --env-docs           Print environment variable documentation");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    translation-bridge-web");
    println!("    translation-bridge-web --bind 0.0.0.0 --port 3000");
}
