mod cli;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mf_av::{extract_mp3, ExtractOptions, ToolRegistry};
use mf_core::config::Config;
use mf_core::download_name;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mp3forge=trace,mf_server=trace,mf_av=trace,mf_core=debug,tower_http=debug".to_string()
        } else {
            "mp3forge=debug,mf_server=debug,mf_av=debug,mf_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = Config::load_or_default(cli.config.as_deref());
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(mf_server::start(config))?;
            Ok(())
        }
        Commands::Convert { input, output } => {
            let config = Config::load_or_default(cli.config.as_deref());
            convert_file(&input, output, &config)
        }
        Commands::CheckTools => {
            let config = Config::load_or_default(cli.config.as_deref());
            check_tools(&config)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mp3forge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Default CLI output: the download name, next to the input.
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(download_name(&name))
}

fn convert_file(input: &Path, output: Option<PathBuf>, config: &Config) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let output = output.unwrap_or_else(|| default_output(input));
    if output == input {
        anyhow::bail!("Output {:?} would overwrite the input; pass --output", output);
    }

    let tools = ToolRegistry::discover(&config.tools);
    let options = ExtractOptions::from(&config.conversion);

    tracing::info!("Converting {:?} -> {:?}", input, output);

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(extract_mp3(&tools, input, &output, &options))?;

    println!("Wrote {}", output.display());
    println!("Took {:.2?}", result.elapsed);
    Ok(())
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg (with libmp3lame) to enable conversions.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Scratch dir: {}", config.server.scratch_root().display());
    println!("  Max upload: {} MiB", config.server.max_upload_mb);
    println!(
        "  Encoder: {} @ {}",
        config.conversion.audio_codec, config.conversion.audio_bitrate
    );

    let warnings = config.validate();
    for warning in &warnings {
        println!("  ! {warning}");
    }

    Ok(())
}
