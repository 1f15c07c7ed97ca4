//! Robot CLI - inspect servers and arm boot profiles on Hetzner Robot.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use robot::config::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_PASSWORD, ENV_TIMEOUT_SECS, ENV_URL, ENV_USERNAME,
};
use robot::{BootProfile, BootProfileKind, RobotClient, RobotConfig, Server};

/// Robot CLI - Hetzner dedicated server management.
#[derive(Parser)]
#[command(name = "robot")]
#[command(about = "Inspect dedicated servers and manage boot profiles")]
struct Cli {
    /// Robot webservice username.
    #[arg(long, env = ENV_USERNAME)]
    username: String,

    /// Robot webservice password.
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    password: String,

    /// Robot webservice base URL.
    #[arg(long, env = ENV_URL, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Request timeout in seconds.
    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Print JSON instead of tables.
    #[arg(long, default_value = "false")]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all servers of the account.
    Servers,

    /// Show details of one server.
    Server {
        /// Server number.
        #[arg(long)]
        number: u32,
    },

    /// Inspect or change the boot configuration.
    Boot {
        #[command(subcommand)]
        command: BootCommands,
    },
}

#[derive(Subcommand)]
enum BootCommands {
    /// Show the active boot profile.
    Get {
        /// Server number.
        #[arg(long)]
        number: u32,
    },

    /// Activate a boot profile for the next boot.
    Set {
        /// Server number.
        #[arg(long)]
        number: u32,

        /// Profile to activate (linux or rescue).
        #[arg(long)]
        profile: BootProfileKind,

        /// Distribution (linux) or rescue operating system.
        #[arg(long)]
        os: String,

        /// Installation language (linux only).
        #[arg(long, default_value = "")]
        lang: String,

        /// SSH key fingerprints to authorize (repeatable).
        #[arg(long = "authorized-key")]
        authorized_keys: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode output")?
    );
    Ok(())
}

fn print_server(server: &Server) {
    println!("\nServer Details:");
    println!("  Number:     {}", server.server_number);
    println!("  Name:       {}", server.name);
    println!("  Status:     {}", server.status);
    println!("  Product:    {}", server.product);
    println!("  Datacenter: {}", server.datacenter);
    println!("  IPv4:       {}", server.server_ip.as_deref().unwrap_or("-"));
    println!("  IPv6:       {}", server.server_ipv6.as_deref().unwrap_or("-"));
    println!("  Traffic:    {}", server.traffic);
    println!("  Paid until: {}", server.paid_until);
    println!("  Cancelled:  {}", server.cancelled);
    for subnet in &server.subnets {
        println!("  Subnet:     {}/{}", subnet.ip, subnet.mask);
    }
}

fn print_boot(boot: &BootProfile) {
    println!("\nBoot Configuration:");
    println!("  Server:   {}", boot.server_number);
    println!(
        "  Profile:  {}",
        boot.active_profile()
            .map_or("none", BootProfileKind::as_str)
    );
    println!("  OS:       {}", boot.operating_system().unwrap_or("-"));
    println!("  Language: {}", boot.language().unwrap_or("-"));
    println!("  IPv4:     {}", boot.server_ipv4.as_deref().unwrap_or("-"));
    println!("  IPv6:     {}", boot.server_ipv6.as_deref().unwrap_or("-"));
    println!(
        "  Password: {}",
        if boot.password.is_some() { "set" } else { "-" }
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RobotConfig::new(&cli.username, &cli.password)
        .with_base_url(&cli.url)
        .with_timeout_secs(cli.timeout);
    let client = RobotClient::new(config).context("Failed to create Robot client")?;

    match cli.command {
        Commands::Servers => {
            let servers = client
                .get_servers()
                .await
                .context("Failed to list servers")?;
            if cli.json {
                return print_json(&servers);
            }
            println!(
                "\n{:<10} {:<24} {:<12} {:<16} {:<12}",
                "NUMBER", "NAME", "STATUS", "IPv4", "DC"
            );
            println!("{}", "-".repeat(78));
            for server in servers {
                println!(
                    "{:<10} {:<24} {:<12} {:<16} {:<12}",
                    server.server_number,
                    server.name,
                    server.status,
                    server.server_ip.unwrap_or_default(),
                    server.datacenter
                );
            }
        }

        Commands::Server { number } => {
            let server = client
                .get_server(number)
                .await
                .with_context(|| format!("Unable to find server {number}"))?;
            if cli.json {
                return print_json(&server);
            }
            print_server(&server);
        }

        Commands::Boot { command } => {
            let boot = match command {
                BootCommands::Get { number } => client
                    .get_boot_profile(number)
                    .await
                    .with_context(|| format!("Unable to find boot profile for server {number}"))?,
                BootCommands::Set {
                    number,
                    profile,
                    os,
                    lang,
                    authorized_keys,
                } => client
                    .set_boot_profile(number, profile, &os, &lang, &authorized_keys)
                    .await
                    .with_context(|| format!("Failed to activate {profile} on server {number}"))?,
            };
            if cli.json {
                return print_json(&boot);
            }
            print_boot(&boot);
        }
    }

    Ok(())
}
