mod cli;

use report_media::{config, media::MediaService, media::UploadedFile, server};
use report_media_common::ReportKey;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Write;
use std::path::{Path, PathBuf};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting report-media server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let media = MediaService::from_config(&config.storage)?;
    server::start_server(config, media).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "report_media=trace,report_media_common=debug,tower_http=debug".to_string()
        } else {
            "report_media=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Ingest { report, files } => {
            ingest_files(&report, &files, cli.config.as_deref())
        }
        Commands::Fetch { path, output } => {
            fetch_file(&path, output.as_deref(), cli.config.as_deref())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("report-media {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn ingest_files(report: &str, files: &[PathBuf], config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let media = MediaService::from_config(&config.storage)?;
    let report_key = ReportKey::parse(report)?;

    let uploads = files
        .iter()
        .map(|path| -> Result<UploadedFile> {
            let data = std::fs::read(path)
                .with_context(|| format!("Failed to read input file: {:?}", path))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(UploadedFile::new(name, data))
        })
        .collect::<Result<Vec<_>>>()?;

    let paths = media.store().ingest(&report_key, &uploads)?;
    for path in paths {
        println!("{}", path);
    }
    Ok(())
}

fn fetch_file(path: &str, output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let media = MediaService::from_config(&config.storage)?;

    let retrieved = media.store().retrieve(path)?;
    eprintln!("Content-Type: {}", retrieved.content_type);

    match output {
        Some(out) => std::fs::write(out, &retrieved.data)
            .with_context(|| format!("Failed to write output file: {:?}", out))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&retrieved.data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Configuration is valid!");
    println!();
    println!("Server: {}:{}", config.server.host, config.server.port);
    println!("Max upload size: {} bytes", config.server.max_upload_bytes);
    println!(
        "Media root: {}",
        config
            .storage
            .base_dir
            .join(&config.storage.root_label)
            .display()
    );

    Ok(())
}
