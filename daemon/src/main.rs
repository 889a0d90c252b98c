//! offset-agent: compute the carbon footprint of an energy reading and burn
//! matching VCU credits.

use anyhow::Context;
use clap::Parser;
use offset_agent::{
    init_logging, Assessor, CreditBurner, OffsetAgent, OffsetConfig, OffsetError,
};
use offset_chain::{AccountDirectory, ChainNetwork, CreditToken, HttpChain, StaticAccounts};
use offset_store::SqliteRegionLookup;
use offset_types::{ChainAddress, EnergyConsumption, Region};
use offset_wallet_core::identity::read_password_file;
use offset_wallet_core::{create_keyfile, KeyfileSigningIdentity};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "offset-agent", about = "Carbon offset agent")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "OFFSET_CONFIG")]
    config: Option<PathBuf>,

    /// Ethereum JSON-RPC endpoint.
    #[arg(long, env = "OFFSET_RPC_URL")]
    rpc_url: Option<String>,

    /// VCU credit token contract address.
    #[arg(long, env = "OFFSET_CREDIT_TOKEN")]
    credit_token: Option<ChainAddress>,

    /// Encrypted keyfile holding the signing identity.
    #[arg(long, env = "OFFSET_KEYFILE")]
    keyfile: Option<PathBuf>,

    /// File containing the keyfile password.
    #[arg(long, env = "OFFSET_PASSWORD_FILE")]
    password_file: Option<PathBuf>,

    /// SQLite database with the region emission factors.
    #[arg(long, env = "OFFSET_REGION_DB")]
    region_db: Option<PathBuf>,

    /// Timeout for each lookup and chain request, in seconds.
    #[arg(long, env = "OFFSET_RPC_TIMEOUT_SECS")]
    rpc_timeout_secs: Option<u64>,

    /// Accounts to use instead of the node's (comma-separated).
    #[arg(long, env = "OFFSET_ACCOUNTS", value_delimiter = ',')]
    accounts: Vec<ChainAddress>,

    /// Log format: "human" or "json".
    #[arg(long, env = "OFFSET_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "OFFSET_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Burn credits for an energy reading and print the receipt.
    Offset {
        /// Energy consumption in kilowatt-hours.
        #[arg(long, allow_negative_numbers = true)]
        kwh: f64,
        /// Region identifier, exactly as stored in the region table.
        #[arg(long)]
        region: String,
    },
    /// Compute the footprint and credit volume without touching the chain.
    Footprint {
        #[arg(long, allow_negative_numbers = true)]
        kwh: f64,
        #[arg(long)]
        region: String,
    },
    /// Manage the signing keyfile.
    Keyfile {
        #[command(subcommand)]
        action: KeyfileAction,
    },
    /// Manage the region emission factor table.
    Region {
        #[command(subcommand)]
        action: RegionAction,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(clap::Subcommand)]
enum KeyfileAction {
    /// Generate a new key and write it encrypted with the configured password.
    New {
        /// Output path (defaults to the configured keyfile).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Subcommand)]
enum RegionAction {
    /// Insert or replace the coefficient (gCO2/Wh) for a region.
    Set {
        #[arg(long)]
        region: String,
        #[arg(long)]
        coefficient: f64,
    },
}

impl Cli {
    /// File settings (or defaults) with CLI flags and env vars applied on top.
    fn effective_config(&self) -> Result<OffsetConfig, OffsetError> {
        let mut config = match &self.config {
            Some(path) => OffsetConfig::from_toml_file(path)?,
            None => OffsetConfig::default(),
        };
        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(token) = self.credit_token {
            config.credit_token_address = Some(token);
        }
        if let Some(keyfile) = &self.keyfile {
            config.keyfile = keyfile.clone();
        }
        if let Some(password_file) = &self.password_file {
            config.keyfile_password_file = password_file.clone();
        }
        if let Some(region_db) = &self.region_db {
            config.region_db = region_db.clone();
        }
        if let Some(secs) = self.rpc_timeout_secs {
            config.rpc_timeout_secs = secs;
        }
        if !self.accounts.is_empty() {
            config.accounts = self.accounts.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

fn open_regions(config: &OffsetConfig) -> anyhow::Result<SqliteRegionLookup> {
    let lookup = SqliteRegionLookup::open(&config.region_db)
        .with_context(|| format!("opening region database {}", config.region_db.display()))?;
    lookup.migrate()?;
    Ok(lookup)
}

fn build_agent(config: &OffsetConfig) -> anyhow::Result<OffsetAgent<SqliteRegionLookup>> {
    config.validate()?;
    let rpc = Arc::new(HttpChain::connect(&config.rpc_url)?);
    tracing::debug!(endpoint = rpc.url(), "chain endpoint configured");
    let accounts: Arc<dyn AccountDirectory> = if config.accounts.is_empty() {
        rpc.clone()
    } else {
        Arc::new(StaticAccounts::new(config.accounts.clone()))
    };
    let chain: Arc<dyn ChainNetwork> = rpc;
    let identity = Arc::new(KeyfileSigningIdentity::new(
        config.keyfile.clone(),
        config.keyfile_password_file.clone(),
    ));
    let burner = CreditBurner::new(
        identity,
        accounts,
        chain,
        CreditToken::new(config.token_address()?),
        config.rpc_timeout(),
    );
    Ok(OffsetAgent::new(open_regions(config)?, burner, config.rpc_timeout()))
}

async fn run_offset(config: &OffsetConfig, kwh: f64, region: &str) -> anyhow::Result<()> {
    let agent = build_agent(config)?;
    let receipt = agent
        .offset_with_receipt(EnergyConsumption::from_kwh(kwh), &Region::from(region))
        .await
        .map_err(|e| {
            let hint = match &e {
                OffsetError::SubmissionUncertain { hash, .. } => {
                    Some(format!("check transaction {hash} on chain before retrying"))
                }
                _ => None,
            };
            match hint {
                Some(hint) => anyhow::Error::new(e).context(hint),
                None => anyhow::Error::new(e),
            }
        })?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

async fn run_footprint(config: &OffsetConfig, kwh: f64, region: &str) -> anyhow::Result<()> {
    let assessment = Assessor::new(open_regions(config)?, config.rpc_timeout())
        .assess(EnergyConsumption::from_kwh(kwh), &Region::from(region))
        .await?;
    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

fn run_keyfile_new(config: &OffsetConfig, out: &Path) -> anyhow::Result<()> {
    if out.exists() {
        anyhow::bail!("{} already exists; refusing to overwrite", out.display());
    }
    let password = read_password_file(&config.keyfile_password_file)?;
    let private = offset_crypto::generate_private_key();
    let address = create_keyfile(out, &private, &password)?;
    tracing::info!(address = %address, path = %out.display(), "keyfile created");
    println!("{}", address.to_checksum());
    Ok(())
}

fn run_region_set(config: &OffsetConfig, region: &str, coefficient: f64) -> anyhow::Result<()> {
    if offset_types::EmissionFactor::new(coefficient).is_none() {
        anyhow::bail!("coefficient must be a positive number, got {coefficient}");
    }
    let lookup = open_regions(config)?;
    lookup.put_coefficient(&Region::from(region), coefficient)?;
    tracing::info!(region, coefficient, "region coefficient stored");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.effective_config()?;
    init_logging(config.parsed_log_format()?, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::debug!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Offset { kwh, ref region } => run_offset(&config, kwh, region).await,
        Command::Footprint { kwh, ref region } => run_footprint(&config, kwh, region).await,
        Command::Keyfile {
            action: KeyfileAction::New { ref out },
        } => run_keyfile_new(&config, out.as_deref().unwrap_or(&config.keyfile)),
        Command::Region {
            action:
                RegionAction::Set {
                    ref region,
                    coefficient,
                },
        } => run_region_set(&config, region, coefficient),
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
