use clap::Parser;

use linkpulse::cli::{Cli, Commands};
use linkpulse::config::{StaticConfig, init_config};
use linkpulse::runtime::modes::run_server;
use linkpulse::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::GenerateConfig { output } => {
            match output {
                Some(path) => {
                    StaticConfig::default()
                        .save_to_file(&path)
                        .inspect_err(|e| eprintln!("{}", e.format_colored()))?;
                    println!("Sample configuration written to {}", path);
                }
                None => print!("{}", StaticConfig::generate_sample_config()),
            }
            Ok(())
        }
        Commands::Serve => {
            let config = init_config(cli.config.as_deref());

            // 必须持有 guard，否则缓冲中的日志会丢失
            let _log_guard = init_logging(&config.logging)
                .inspect_err(|e| eprintln!("{}", e.format_colored()))?;

            run_server(&config).await
        }
    }
}
