// crowdmint CLI - Operator tool driving a persistent sale engine

use clap::{Parser, Subcommand};
use crowdmint::engine::{EngineConfig, EngineError, SaleEngine};
use crowdmint::identity::Address;
use crowdmint::sale::Round;
use crowdmint::storage::{CodecError, EngineStore, SnapshotCodec, StoreError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
enum CliError {
    #[error("Store is not initialized; run `crowdmint init` first")]
    NotInitialized,

    #[error("Store already holds an engine; use a fresh --store path")]
    AlreadyInitialized,

    #[error("Unknown export format: {0} (expected hex or base64)")]
    UnknownFormat(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Parser)]
#[command(name = "crowdmint", version, about = "Token ledger and crowdsale engine")]
struct Cli {
    /// Path to the engine store
    #[arg(long, global = true, default_value = "crowdmint.db")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new engine in the store
    Init {
        /// Ledger owner (default: derived from the label "owner")
        #[arg(long)]
        owner: Option<Address>,
        /// Admin identity (default: derived from the label "admin")
        #[arg(long)]
        admin: Option<Address>,
        /// Fund address (default: derived from the label "fund")
        #[arg(long)]
        fund: Option<Address>,
        /// Explicit sale escrow account (default: derived from the owner)
        #[arg(long)]
        escrow: Option<Address>,
        /// Total token supply
        #[arg(long)]
        supply: Option<u64>,
        /// Default sale allocation moved by `fund-sale --amount 0`
        #[arg(long)]
        sale_allocation: Option<u64>,
    },
    /// Print engine statistics
    Status,
    /// Derive a deterministic address from a label
    Addr { label: String },
    /// Print an account's balance and lock floor
    Balance { address: Address },
    /// Transfer from the caller's account
    Transfer {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: u64,
    },
    /// Move tokens between arbitrary accounts (admin only)
    AdminTransfer {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: u64,
    },
    /// Switch unprivileged transfers on or off (owner only)
    SetTransfers {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        enabled: bool,
    },
    /// Set an account's lock floor (owner only)
    Lock {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        target: Address,
        #[arg(long)]
        amount: u64,
    },
    /// Clear an account's lock floor (owner only)
    Unlock {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        target: Address,
    },
    /// Reassign the admin identity (owner only)
    SetAdmin {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        new_admin: Address,
    },
    /// Move the sale allocation into escrow (owner only, once)
    FundSale {
        #[arg(long)]
        caller: Address,
        /// Zero selects the configured default allocation
        #[arg(long, default_value_t = 0)]
        amount: u64,
    },
    /// Configure a round and enter set-up (owner only)
    SetupSale {
        #[arg(long)]
        caller: Address,
        /// early-investment, pre-sale, or crowd-sale
        #[arg(long)]
        round: Round,
        /// Tokens credited per contribution unit
        #[arg(long)]
        rate: u64,
        /// Reserved extension parameters
        #[arg(long, num_args = 3, default_values_t = [0u64, 0, 0])]
        reserved: Vec<u64>,
    },
    /// Open the configured round for contributions (owner only)
    StartSale {
        #[arg(long)]
        caller: Address,
        /// Maximum contribution units; zero is uncapped
        #[arg(long, default_value_t = 0)]
        cap: u64,
    },
    /// Close the running round (owner only)
    EndSale {
        #[arg(long)]
        caller: Address,
    },
    /// Whitelist management
    Whitelist {
        #[command(subcommand)]
        action: WhitelistCmd,
    },
    /// Allocation cap management
    Allocation {
        #[command(subcommand)]
        action: AllocationCmd,
    },
    /// Grant tokens from escrow against an allocation cap (owner only)
    Allocate {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        address: Address,
        #[arg(long)]
        amount: u64,
    },
    /// Purchase tokens with a contribution
    Purchase {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        contribution: u64,
    },
    /// Drain and print pending engine events
    Events,
    /// Print purchase receipts
    Receipts,
    /// Export the engine snapshot as text
    Export {
        /// hex or base64
        #[arg(long, default_value = "base64")]
        format: String,
    },
}

#[derive(Subcommand)]
enum WhitelistCmd {
    /// Admit addresses (owner only)
    Add {
        #[arg(long)]
        caller: Address,
        #[arg(required = true)]
        addresses: Vec<Address>,
    },
    /// Revoke addresses (owner only)
    Remove {
        #[arg(long)]
        caller: Address,
        #[arg(required = true)]
        addresses: Vec<Address>,
    },
    /// List members
    List,
}

#[derive(Subcommand)]
enum AllocationCmd {
    /// Set an address's cap (owner only)
    Set {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        address: Address,
        #[arg(long)]
        cap: u64,
    },
    /// Remove caps (owner only)
    Remove {
        #[arg(long)]
        caller: Address,
        #[arg(required = true)]
        addresses: Vec<Address>,
    },
    /// Show an address's remaining cap
    Show { address: Address },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn load_engine(store: &EngineStore) -> Result<SaleEngine, CliError> {
    store.load_engine()?.ok_or(CliError::NotInitialized)
}

/// Report drained events, then persist the mutated engine
fn persist(store: &EngineStore, engine: &mut SaleEngine) -> Result<(), CliError> {
    for event in engine.poll_events() {
        info!("event: {:?}", event);
    }
    store.save_engine(engine)?;
    store.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let store = EngineStore::open(&cli.store)?;

    match cli.command {
        Command::Init {
            owner,
            admin,
            fund,
            escrow,
            supply,
            sale_allocation,
        } => {
            if store.load_engine()?.is_some() {
                return Err(CliError::AlreadyInitialized);
            }

            let owner = owner.unwrap_or_else(|| Address::from_label("owner"));
            let admin = admin.unwrap_or_else(|| Address::from_label("admin"));
            let fund = fund.unwrap_or_else(|| Address::from_label("fund"));

            let mut config = EngineConfig::new(owner, admin, fund);
            if let Some(escrow) = escrow {
                config = config.with_sale_escrow(escrow);
            }
            if let Some(supply) = supply {
                config = config.with_total_supply(supply);
            }
            if let Some(allocation) = sale_allocation {
                config = config.with_sale_allocation(allocation);
            }

            let engine = SaleEngine::new(config)?;
            store.save_engine(&engine)?;
            store.flush()?;

            info!("engine initialized");
            println!("owner:   {}", engine.owner());
            println!("admin:   {}", engine.admin());
            println!("fund:    {}", engine.fund_address());
            println!("escrow:  {}", engine.sale_escrow());
            println!("supply:  {}", engine.total_supply());
        }
        Command::Status => {
            let engine = load_engine(&store)?;
            let stats = engine.stats();
            println!("owner:             {}", engine.owner());
            println!("admin:             {}", engine.admin());
            println!("fund:              {}", engine.fund_address());
            println!("escrow:            {}", engine.sale_escrow());
            println!("transfers enabled: {}", engine.transfer_enabled());
            println!("round:             {}", stats.round);
            println!("stage:             {}", stats.stage);
            println!("rate:              {}", engine.rate());
            println!("cap:               {}", engine.cap());
            println!("raised:            {}", stats.raised);
            println!("total supply:      {}", stats.total_supply);
            println!("circulating:       {}", stats.circulating_supply);
            println!("sale balance:      {}", stats.sale_balance);
            println!("forwarded total:   {}", stats.forwarded_total);
            println!("purchases:         {}", stats.purchase_count);
            println!("whitelist size:    {}", stats.whitelist_size);
            println!("allocation caps:   {}", stats.allocation_entries);
        }
        Command::Addr { label } => {
            println!("{}", Address::from_label(&label));
        }
        Command::Balance { address } => {
            let engine = load_engine(&store)?;
            println!("balance: {}", engine.balance_of(address));
            println!("locked:  {}", engine.locked_amount_of(address));
        }
        Command::Transfer { caller, to, amount } => {
            let mut engine = load_engine(&store)?;
            engine.transfer(caller, to, amount)?;
            persist(&store, &mut engine)?;
            info!("transferred {} from {} to {}", amount, caller.short(), to.short());
        }
        Command::AdminTransfer {
            caller,
            from,
            to,
            amount,
        } => {
            let mut engine = load_engine(&store)?;
            engine.admin_transfer(caller, from, to, amount)?;
            persist(&store, &mut engine)?;
            info!("admin moved {} from {} to {}", amount, from.short(), to.short());
        }
        Command::SetTransfers { caller, enabled } => {
            let mut engine = load_engine(&store)?;
            engine.set_transfer_enabled(caller, enabled)?;
            persist(&store, &mut engine)?;
            info!("transfers enabled: {}", enabled);
        }
        Command::Lock {
            caller,
            target,
            amount,
        } => {
            let mut engine = load_engine(&store)?;
            engine.lock_account(caller, target, amount)?;
            persist(&store, &mut engine)?;
            info!("locked {} on {}", amount, target.short());
        }
        Command::Unlock { caller, target } => {
            let mut engine = load_engine(&store)?;
            engine.unlock_account(caller, target)?;
            persist(&store, &mut engine)?;
            info!("unlocked {}", target.short());
        }
        Command::SetAdmin { caller, new_admin } => {
            let mut engine = load_engine(&store)?;
            engine.set_admin(caller, new_admin)?;
            persist(&store, &mut engine)?;
            info!("admin reassigned to {}", new_admin.short());
        }
        Command::FundSale { caller, amount } => {
            let mut engine = load_engine(&store)?;
            engine.fund_sale(caller, amount)?;
            persist(&store, &mut engine)?;
            info!("sale escrow funded; balance {}", engine.sale_balance());
        }
        Command::SetupSale {
            caller,
            round,
            rate,
            reserved,
        } => {
            let mut engine = load_engine(&store)?;
            let reserved = [reserved[0], reserved[1], reserved[2]];
            engine.set_up_sale(caller, round, reserved, rate)?;
            persist(&store, &mut engine)?;
            info!("sale configured: round {}, rate {}", round, rate);
        }
        Command::StartSale { caller, cap } => {
            let mut engine = load_engine(&store)?;
            engine.start_sale(caller, cap)?;
            persist(&store, &mut engine)?;
            info!("sale started: round {}, cap {}", engine.round(), cap);
        }
        Command::EndSale { caller } => {
            let mut engine = load_engine(&store)?;
            engine.end_sale(caller)?;
            persist(&store, &mut engine)?;
            info!("sale ended: raised {}", engine.raised());
        }
        Command::Whitelist { action } => match action {
            WhitelistCmd::Add { caller, addresses } => {
                let mut engine = load_engine(&store)?;
                engine.add_many_to_whitelist(caller, &addresses)?;
                persist(&store, &mut engine)?;
                info!("whitelisted {} address(es)", addresses.len());
            }
            WhitelistCmd::Remove { caller, addresses } => {
                let mut engine = load_engine(&store)?;
                engine.remove_many_from_whitelist(caller, &addresses)?;
                persist(&store, &mut engine)?;
                info!("removed {} address(es)", addresses.len());
            }
            WhitelistCmd::List => {
                let engine = load_engine(&store)?;
                for member in engine.whitelist_members() {
                    println!("{}", member);
                }
            }
        },
        Command::Allocation { action } => match action {
            AllocationCmd::Set {
                caller,
                address,
                cap,
            } => {
                let mut engine = load_engine(&store)?;
                engine.add_allocation(caller, address, cap)?;
                persist(&store, &mut engine)?;
                info!("allocation cap {} set for {}", cap, address.short());
            }
            AllocationCmd::Remove { caller, addresses } => {
                let mut engine = load_engine(&store)?;
                engine.remove_many_allocations(caller, &addresses)?;
                persist(&store, &mut engine)?;
                info!("removed {} allocation cap(s)", addresses.len());
            }
            AllocationCmd::Show { address } => {
                let engine = load_engine(&store)?;
                println!("remaining: {}", engine.remaining_allocation(address));
            }
        },
        Command::Allocate {
            caller,
            address,
            amount,
        } => {
            let mut engine = load_engine(&store)?;
            engine.allocate_tokens(caller, address, amount)?;
            persist(&store, &mut engine)?;
            info!("allocated {} to {}", amount, address.short());
        }
        Command::Purchase {
            caller,
            contribution,
        } => {
            let mut engine = load_engine(&store)?;
            let receipt = engine.purchase(caller, contribution)?;
            persist(&store, &mut engine)?;
            info!(
                "purchase #{}: {} tokens for contribution {}",
                receipt.seq(),
                receipt.token_amount(),
                receipt.contribution()
            );
        }
        Command::Events => {
            let mut engine = load_engine(&store)?;
            let events = engine.poll_events();
            if events.is_empty() {
                println!("no pending events");
            }
            for event in &events {
                println!("{:?}", event);
            }
            store.save_engine(&engine)?;
            store.flush()?;
        }
        Command::Receipts => {
            let engine = load_engine(&store)?;
            for receipt in engine.receipts() {
                println!(
                    "#{} buyer {} round {} contribution {} tokens {}",
                    receipt.seq(),
                    receipt.buyer().short(),
                    receipt.round(),
                    receipt.contribution(),
                    receipt.token_amount()
                );
            }
        }
        Command::Export { format } => {
            let engine = load_engine(&store)?;
            match format.as_str() {
                "hex" => println!("{}", SnapshotCodec::encode_hex(&engine)),
                "base64" => println!("{}", SnapshotCodec::encode_base64(&engine)),
                other => return Err(CliError::UnknownFormat(other.to_string())),
            }
        }
    }

    Ok(())
}
