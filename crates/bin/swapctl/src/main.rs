use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use confidential_swap::{
    ConfidentialSwap, EngineConfig, Identity, PoolId, SledStore, SystemClock, TokenId, TracingSink,
};

type Engine = ConfidentialSwap<SledStore, SystemClock, TracingSink>;

#[derive(Parser, Debug)]
#[command(name = "swapctl")]
#[command(about = "operator tool for a confidential swap store", long_about = None)]
struct Args {
    /// sled database path
    #[arg(long, default_value = "./swap.db", env = "SWAPCTL_DB")]
    db: PathBuf,

    /// engine config (json), defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// identity the call is made as, 32 bytes hex
    #[arg(long, env = "SWAPCTL_CALLER")]
    caller: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// write the access record, caller becomes owner
    Init {
        /// defaults to the caller
        #[arg(long)]
        fee_collector: Option<String>,
    },
    /// register an ordered token pair
    CreatePool { token_a: String, token_b: String },
    /// list all pools
    Pools,
    /// show one pool
    Pool { pool_id: String },
    /// a provider's share of a pool, defaults to the caller
    Position {
        pool_id: String,
        #[arg(long)]
        provider: Option<String>,
    },
    /// sweep a pool's swap fees, caller must be the fee collector
    CollectFees { pool_id: String },
    Pause,
    Unpause,
    SetFeeCollector { identity: String },
    /// nominate a new owner
    TransferOwnership { new_owner: String },
    /// caller takes over as owner
    AcceptOwnership,
    /// access state and config
    Status,
}

fn parse_identity(s: &str) -> Result<Identity> {
    Identity::from_hex(s).ok_or_else(|| anyhow!("invalid identity: {}", s))
}

fn parse_token(s: &str) -> Result<TokenId> {
    TokenId::from_hex(s).ok_or_else(|| anyhow!("invalid token: {}", s))
}

fn parse_pool(s: &str) -> Result<PoolId> {
    PoolId::from_hex(s).ok_or_else(|| anyhow!("invalid pool id: {}", s))
}

impl Args {
    fn caller(&self) -> Result<Identity> {
        let hex = self
            .caller
            .as_deref()
            .ok_or_else(|| anyhow!("--caller is required for this command"))?;
        parse_identity(hex)
    }

    fn engine_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => Ok(EngineConfig::from_json_file(path)?),
            None => Ok(EngineConfig::default()),
        }
    }

    fn open_store(&self) -> Result<SledStore> {
        SledStore::open(&self.db).with_context(|| format!("opening {}", self.db.display()))
    }

    fn open_engine(&self) -> Result<Engine> {
        let engine = ConfidentialSwap::open(
            self.open_store()?,
            SystemClock,
            TracingSink,
            self.engine_config()?,
        )?;
        Ok(engine)
    }
}

fn run(args: &Args) -> Result<Value> {
    let out = match &args.command {
        Command::Init { fee_collector } => {
            let owner = args.caller()?;
            let fee_collector = match fee_collector {
                Some(hex) => parse_identity(hex)?,
                None => owner,
            };
            let engine = ConfidentialSwap::initialize(
                args.open_store()?,
                SystemClock,
                TracingSink,
                args.engine_config()?,
                owner,
                fee_collector,
            )?;
            serde_json::to_value(engine.access())?
        }
        Command::CreatePool { token_a, token_b } => {
            let mut engine = args.open_engine()?;
            let pool_id =
                engine.create_pool(&args.caller()?, parse_token(token_a)?, parse_token(token_b)?)?;
            json!({ "pool_id": pool_id })
        }
        Command::Pools => {
            let engine = args.open_engine()?;
            serde_json::to_value(engine.pools()?)?
        }
        Command::Pool { pool_id } => {
            let engine = args.open_engine()?;
            serde_json::to_value(engine.get_pool(&parse_pool(pool_id)?)?)?
        }
        Command::Position { pool_id, provider } => {
            let engine = args.open_engine()?;
            let provider = match provider {
                Some(hex) => parse_identity(hex)?,
                None => args.caller()?,
            };
            serde_json::to_value(engine.position(&parse_pool(pool_id)?, &provider)?)?
        }
        Command::CollectFees { pool_id } => {
            let mut engine = args.open_engine()?;
            let (fees_a, fees_b) = engine.collect_fees(&args.caller()?, &parse_pool(pool_id)?)?;
            json!({ "fees_a": fees_a, "fees_b": fees_b })
        }
        Command::Pause => {
            let mut engine = args.open_engine()?;
            engine.pause(&args.caller()?)?;
            json!({ "paused": true })
        }
        Command::Unpause => {
            let mut engine = args.open_engine()?;
            engine.unpause(&args.caller()?)?;
            json!({ "paused": false })
        }
        Command::SetFeeCollector { identity } => {
            let mut engine = args.open_engine()?;
            engine.set_fee_collector(&args.caller()?, parse_identity(identity)?)?;
            serde_json::to_value(engine.access())?
        }
        Command::TransferOwnership { new_owner } => {
            let mut engine = args.open_engine()?;
            engine.transfer_ownership(&args.caller()?, parse_identity(new_owner)?)?;
            serde_json::to_value(engine.access())?
        }
        Command::AcceptOwnership => {
            let mut engine = args.open_engine()?;
            engine.accept_ownership(&args.caller()?)?;
            serde_json::to_value(engine.access())?
        }
        Command::Status => {
            let engine = args.open_engine()?;
            json!({
                "access": engine.access(),
                "config": engine.config(),
                "range_bits": engine.config().range_bits(),
                "pools": engine.pools()?.len(),
            })
        }
    };
    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swapctl=info,confidential_swap=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("database: {}", args.db.display());

    let out = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const OTHER: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const DOT: &str = "1010101010101010101010101010101010101010101010101010101010101010";
    const USDC: &str = "2020202020202020202020202020202020202020202020202020202020202020";
    const ZERO: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    fn call(db: &std::path::Path, caller: &str, cmd: &[&str]) -> Result<Value> {
        let db = db.to_string_lossy().to_string();
        let mut argv = vec!["swapctl", "--db", db.as_str(), "--caller", caller];
        argv.extend_from_slice(cmd);
        run(&Args::try_parse_from(argv)?)
    }

    #[test]
    fn test_operator_flow() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("swap.db");

        let access = call(&db, OWNER, &["init"]).unwrap();
        assert_eq!(access["owner"], OWNER);
        assert!(call(&db, OWNER, &["init"]).is_err());

        let created = call(&db, OTHER, &["create-pool", DOT, USDC]).unwrap();
        let pool_id = created["pool_id"].as_str().unwrap().to_string();

        let pool = call(&db, OTHER, &["pool", &pool_id]).unwrap();
        assert_eq!(pool["token_a"], DOT);
        assert_eq!(call(&db, OTHER, &["pools"]).unwrap().as_array().unwrap().len(), 1);

        assert!(call(&db, OTHER, &["pause"]).is_err());
        call(&db, OWNER, &["pause"]).unwrap();
        assert!(call(&db, OTHER, &["create-pool", USDC, DOT]).is_err());

        let status = call(&db, OWNER, &["status"]).unwrap();
        assert_eq!(status["access"]["paused"], true);
        assert_eq!(status["config"]["reveal_delay"], 300);
        assert_eq!(status["config"]["swap_fee_bps"], 30);

        // collection is blocked while paused, then only the collector may sweep
        assert!(call(&db, OWNER, &["collect-fees", &pool_id]).is_err());
        call(&db, OWNER, &["unpause"]).unwrap();
        assert!(call(&db, OTHER, &["collect-fees", &pool_id]).is_err());
        let fees = call(&db, OWNER, &["collect-fees", &pool_id]).unwrap();
        assert_eq!(fees["fees_a"], ZERO);

        let position = call(&db, OTHER, &["position", &pool_id]).unwrap();
        assert_eq!(position["provider"], OTHER);
        assert_eq!(position["commitment_a"], ZERO);

        call(&db, OWNER, &["transfer-ownership", OTHER]).unwrap();
        let access = call(&db, OTHER, &["accept-ownership"]).unwrap();
        assert_eq!(access["owner"], OTHER);
    }

    #[test]
    fn test_rejects_bad_identity() {
        let dir = tempfile::tempdir().unwrap();
        assert!(call(&dir.path().join("swap.db"), "not-hex", &["init"]).is_err());
    }
}
