// Secret Sidecar - serves preloaded secrets over a local HTTP interface
//
// This is the main entry point for the application.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use secret_sidecar::config::{
    BackendConfig, SecretsSource, DEFAULT_BIND, DEFAULT_PORT, DOTENV_INHERIT_VAR,
    PARAMETER_NAMES_VAR, REGION_VAR, SOURCE_VAR,
};
use secret_sidecar::loader::{self, ssm};
use secret_sidecar::logging;
use secret_sidecar::server::SidecarServer;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::info;

/// Secret Sidecar - serves preloaded secrets over HTTP
#[derive(Parser, Debug)]
#[command(name = "secret-sidecar")]
#[command(version)]
#[command(about = "Serves preloaded secrets over a local HTTP interface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load secrets and serve them over HTTP (default)
    Serve(ServeOpts),

    /// Load secrets once and list the loaded key names
    Check {
        /// Path to the env file (overrides SECRETS_DOTENV_PATH)
        #[arg(long)]
        env_file: Option<PathBuf>,
    },

    /// Check the backend configuration
    Doctor,
}

#[derive(Args, Debug)]
struct ServeOpts {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = DEFAULT_BIND)]
    bind: IpAddr,

    /// Path to the env file (overrides SECRETS_DOTENV_PATH)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl Default for ServeOpts {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            env_file: None,
        }
    }
}

fn backend_config(env_file: Option<PathBuf>) -> BackendConfig {
    let config = BackendConfig::from_env();
    match env_file {
        Some(path) => config.with_dotenv_path(path),
        None => config,
    }
}

async fn run_serve(opts: ServeOpts) -> Result<()> {
    let config = backend_config(opts.env_file);
    info!(source = %config.source, "Loading secrets");

    let report = loader::load(&config).await;

    let addr = SocketAddr::new(opts.bind, opts.port);
    SidecarServer::new(report.store, addr)
        .run_until_shutdown()
        .await
        .with_context(|| format!("Failed to serve on {}", addr))
}

async fn run_check(env_file: Option<PathBuf>) -> Result<()> {
    let config = backend_config(env_file);

    println!("🔍 Secret Sidecar Check");
    println!("Source: {}\n", config.source);

    let report = loader::load(&config).await;

    if let Some(e) = &report.error {
        println!("❌ {}", e);
    }

    println!("✓ Loaded {} secret(s)", report.store.len());
    for key in report.store.keys() {
        println!("   - {}", key);
    }

    if !report.failures.is_empty() {
        println!("\n❌ Failed parameters:");
        for failure in &report.failures {
            println!("   - {}: {}", failure.name, failure.error);
        }
    }

    Ok(())
}

fn run_doctor() -> Result<()> {
    println!("🔍 Secret Sidecar Doctor");
    println!("Checking configuration...\n");

    let config = BackendConfig::from_env();
    let mut all_checks_passed = true;

    // Check 1: selector
    print!("1. Checking ${}... ", SOURCE_VAR);
    match &config.source {
        SecretsSource::Unrecognized(value) => {
            println!("⚠");
            println!("   ⚠️  Unrecognized value '{}', falling back to dotenv", value);
        }
        source => println!("✓ ({})", source),
    }

    match &config.source {
        SecretsSource::Ssm => {
            // Check 2: region
            print!("2. Checking ${}... ", REGION_VAR);
            if config.region.as_deref().is_some_and(|r| !r.trim().is_empty()) {
                println!("✓");
            } else {
                println!("✗");
                println!("   ❌ ${} is not set", REGION_VAR);
                all_checks_passed = false;
            }

            // Check 3: parameter list
            print!("3. Checking ${}... ", PARAMETER_NAMES_VAR);
            if config
                .parameter_names
                .as_deref()
                .is_some_and(|n| !n.trim().is_empty())
            {
                println!("✓");
            } else {
                println!("✗");
                println!("   ❌ ${} is not set", PARAMETER_NAMES_VAR);
                all_checks_passed = false;
            }

            // Check 4: client
            print!("4. Checking parameter store client... ");
            if ssm::client_available() {
                println!("✓");
            } else {
                println!("✗");
                println!("   ❌ Built without the `ssm` feature");
                all_checks_passed = false;
            }
        }
        SecretsSource::Dotenv | SecretsSource::Unrecognized(_) => {
            // Check 2: env file
            print!("2. Checking env file {}... ", config.dotenv.path.display());
            if config.dotenv.path.exists() {
                println!("✓");
            } else if !config.dotenv.inherit_env {
                println!("✗");
                println!(
                    "   ❌ File not found and ${} disables the process environment; nothing will be served",
                    DOTENV_INHERIT_VAR
                );
                all_checks_passed = false;
            } else {
                println!("⊘");
                println!("   ⚠️  File not found; only the process environment will be served");
            }
        }
    }

    println!();
    if all_checks_passed {
        println!("✅ All checks passed! Configuration is ready.");
        Ok(())
    } else {
        println!("❌ Some checks failed. Please fix the issues above.");
        Err(anyhow::anyhow!("Doctor checks failed"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve(ServeOpts::default())) {
        Commands::Serve(opts) => {
            if let Err(e) = run_serve(opts).await {
                eprintln!("\nError: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Check { env_file } => {
            if let Err(e) = run_check(env_file).await {
                eprintln!("\nError: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Doctor => {
            if let Err(e) = run_doctor() {
                eprintln!("\nError: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
