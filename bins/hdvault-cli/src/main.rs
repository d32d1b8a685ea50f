//! hdvault — command-line front end for the hdvault wallet core.
//!
//! Creates, imports and resets an encrypted wallet file, manages its
//! accounts, and derives Solana and Ethereum keys from the stored mnemonic.

mod config;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use hdvault_wallet::mnemonic::is_valid_word;
use hdvault_wallet::store::{self, RecordLayout, StoredWallet};
use hdvault_wallet::{
    ChainKind, CombinedWallet, MnemonicPhrase, Strength, WalletError, WalletState,
    derive_account, generate_mnemonic,
};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::{CliConfig, parse_word_count};

/// Multi-chain HD wallet: one mnemonic, Solana and Ethereum accounts.
#[derive(Parser)]
#[command(name = "hdvault")]
#[command(version, about = "Deterministic Solana + Ethereum wallet")]
struct Cli {
    /// Path to wallet file (default: ~/.hdvault/wallet.dat).
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json").
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet lifecycle subcommands.
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Account management subcommands.
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },
    /// Mnemonic utilities that do not touch the wallet file.
    Mnemonic {
        #[command(subcommand)]
        action: MnemonicAction,
    },
    /// Derive a single keypair from the wallet mnemonic.
    Derive(DeriveArgs),
    /// Print the wallet as JSON records.
    Export(ExportArgs),
}

#[derive(Subcommand)]
enum WalletAction {
    /// Generate a new mnemonic and create a wallet.
    Create(WordsArgs),
    /// Create a wallet from an existing mnemonic.
    Import,
    /// Delete the wallet file and everything in it.
    Reset(ResetArgs),
}

#[derive(Subcommand)]
enum AccountsAction {
    /// List accounts.
    List(ListArgs),
    /// Derive and append an account at the next unused index.
    Add,
    /// Delete the account at a position (as shown by `accounts list`).
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
enum MnemonicAction {
    /// Print a fresh mnemonic.
    Generate(WordsArgs),
    /// Check a mnemonic for word count, wordlist membership and checksum.
    Validate,
}

#[derive(Args)]
struct WordsArgs {
    /// Number of words (12, 15, 18, 21 or 24).
    #[arg(short, long)]
    words: Option<usize>,
}

#[derive(Args)]
struct ResetArgs {
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Also print private keys.
    #[arg(long)]
    show_secrets: bool,
}

#[derive(Args)]
struct DeleteArgs {
    /// Zero-based position in the account list.
    position: usize,
}

#[derive(Args)]
struct DeriveArgs {
    /// SLIP-44 coin type (501 = Solana, 60 = Ethereum).
    #[arg(long)]
    coin_type: u32,

    /// Account index.
    #[arg(long)]
    index: u32,

    /// Also print the private key.
    #[arg(long)]
    show_secret: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Repeat the mnemonic in every record, as the browser wallet did.
    #[arg(long)]
    legacy: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = CliConfig::from_env()?;
    if let Some(file) = cli.file {
        cfg.wallet_file = file;
    }
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
    if let Some(format) = cli.log_format {
        cfg.log_format = format;
    }
    init_logging(&cfg.log_level, &cfg.log_format);

    let wallet_path = cfg.wallet_path();
    match cli.command {
        Commands::Wallet { action } => match action {
            WalletAction::Create(args) => {
                let strength = match args.words {
                    Some(n) => parse_word_count(n)?,
                    None => cfg.default_words,
                };
                wallet_create(&wallet_path, strength)
            }
            WalletAction::Import => wallet_import(&wallet_path),
            WalletAction::Reset(args) => wallet_reset(&wallet_path, args.yes),
        },
        Commands::Accounts { action } => match action {
            AccountsAction::List(args) => accounts_list(&wallet_path, args.show_secrets),
            AccountsAction::Add => accounts_add(&wallet_path),
            AccountsAction::Delete(args) => accounts_delete(&wallet_path, args.position),
        },
        Commands::Mnemonic { action } => match action {
            MnemonicAction::Generate(args) => {
                let strength = match args.words {
                    Some(n) => parse_word_count(n)?,
                    None => cfg.default_words,
                };
                mnemonic_generate(strength)
            }
            MnemonicAction::Validate => mnemonic_validate(),
        },
        Commands::Derive(args) => derive_keypair(&wallet_path, args),
        Commands::Export(args) => export(&wallet_path, args.legacy),
    }
}

/// Generate a mnemonic, show it once, and save a new wallet.
fn wallet_create(wallet_path: &Path, strength: Strength) -> Result<()> {
    ensure_absent(wallet_path)?;

    let mnemonic = generate_mnemonic(strength).context("Failed to generate mnemonic")?;
    println!("\n=== SECRET RECOVERY PHRASE ({} WORDS) ===", mnemonic.word_count());
    print_words(&mnemonic);
    println!("\nWARNING: This phrase will NOT be shown again.");
    println!("Anyone with these words controls every account in this wallet.");

    let mut state = WalletState::Uninitialized;
    state.create(mnemonic)?;
    save_new(wallet_path, &state)?;

    println!("\n=== WALLET CREATED ===");
    print_accounts(&state, false);
    println!("\nWallet saved to: {}", wallet_path.display());
    Ok(())
}

/// Import a wallet from a typed mnemonic.
fn wallet_import(wallet_path: &Path) -> Result<()> {
    ensure_absent(wallet_path)?;

    let phrase = prompt_secret("Enter mnemonic")?;
    let mut state = WalletState::Uninitialized;
    if let Err(e) = state.import(&phrase) {
        bail!("{}", explain_invalid_mnemonic(&phrase, &e));
    }
    save_new(wallet_path, &state)?;

    println!("\n=== WALLET IMPORTED ===");
    print_accounts(&state, false);
    println!("\nWallet saved to: {}", wallet_path.display());
    Ok(())
}

/// Remove the wallet file after confirmation.
fn wallet_reset(wallet_path: &Path, yes: bool) -> Result<()> {
    if !wallet_path.exists() {
        println!("No wallet at {}", wallet_path.display());
        return Ok(());
    }
    if !yes && !confirm("This permanently deletes the wallet file. Type 'reset' to continue")? {
        println!("Aborted.");
        return Ok(());
    }
    store::remove_file(wallet_path).context("Failed to remove wallet file")?;
    println!("Wallet removed. Only your recovery phrase can restore these accounts.");
    Ok(())
}

fn accounts_list(wallet_path: &Path, show_secrets: bool) -> Result<()> {
    let (state, _) = open_wallet(wallet_path)?;
    print_accounts(&state, show_secrets);
    Ok(())
}

fn accounts_add(wallet_path: &Path) -> Result<()> {
    let (mut state, password) = open_wallet(wallet_path)?;
    let account_index = {
        let added = state.add_account()?;
        print_account(None, added, false);
        added.account_index()
    };
    save(wallet_path, &state, &password)?;
    info!(account_index, "account added");
    Ok(())
}

fn accounts_delete(wallet_path: &Path, position: usize) -> Result<()> {
    let (mut state, password) = open_wallet(wallet_path)?;
    let removed = state.delete_account(position).map_err(|e| match e {
        WalletError::InvariantViolation(_) => {
            anyhow::anyhow!("You must keep at least one account")
        }
        other => other.into(),
    })?;
    save(wallet_path, &state, &password)?;
    println!(
        "Deleted account #{} ({}). Its index will not be reused.",
        removed.account_index(),
        removed.solana().public_key()
    );
    Ok(())
}

fn mnemonic_generate(strength: Strength) -> Result<()> {
    let mnemonic = generate_mnemonic(strength).context("Failed to generate mnemonic")?;
    println!("{}", mnemonic.phrase());
    Ok(())
}

fn mnemonic_validate() -> Result<()> {
    let phrase = prompt_secret("Enter mnemonic")?;
    match MnemonicPhrase::parse(&phrase) {
        Ok(m) => {
            println!("Valid {}-word mnemonic.", m.word_count());
            Ok(())
        }
        Err(e) => bail!("{}", explain_invalid_mnemonic(&phrase, &e)),
    }
}

fn derive_keypair(wallet_path: &Path, args: DeriveArgs) -> Result<()> {
    let (state, _) = open_wallet(wallet_path)?;
    let wallet = state.wallet().context("No wallet loaded")?;
    let keypair = derive_account(&wallet.seed(), args.coin_type, args.index)?;

    println!("Chain:       {}", keypair.chain());
    println!("Path:        {}", keypair.path());
    println!("Public key:  {}", keypair.public_key());
    if args.show_secret {
        println!("Private key: {}", keypair.encoded_private_key().as_str());
    }
    Ok(())
}

fn export(wallet_path: &Path, legacy: bool) -> Result<()> {
    let (state, _) = open_wallet(wallet_path)?;
    let wallet = state.wallet().context("No wallet loaded")?;
    let layout = if legacy {
        RecordLayout::Legacy
    } else {
        RecordLayout::Compact
    };
    let json = StoredWallet::from_wallet(wallet, layout).to_json()?;
    println!("{}", json.as_str());
    Ok(())
}

/// Load the wallet file into an active state, returning the password for
/// re-saving.
fn open_wallet(wallet_path: &Path) -> Result<(WalletState, Zeroizing<String>)> {
    if !wallet_path.exists() {
        bail!(
            "{} (no wallet at {}; run `hdvault wallet create` or `hdvault wallet import`)",
            WalletError::NotInitialized,
            wallet_path.display()
        );
    }
    let password = prompt_secret("Wallet password")?;
    let wallet = store::load_from_file(wallet_path, password.as_bytes())
        .context("Failed to load wallet (check password)")?;
    Ok((WalletState::from(wallet), password))
}

fn save_new(wallet_path: &Path, state: &WalletState) -> Result<()> {
    let password = prompt_secret("Enter wallet password")?;
    let confirm = prompt_secret("Confirm password")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    save(wallet_path, state, &password)
}

fn save(wallet_path: &Path, state: &WalletState, password: &str) -> Result<()> {
    let wallet = state.wallet().context("No wallet loaded")?;
    store::save_to_file(wallet_path, wallet, password.as_bytes())
        .context("Failed to save wallet")
}

fn ensure_absent(wallet_path: &Path) -> Result<()> {
    if wallet_path.exists() {
        bail!(
            "{}: wallet file already exists at {} (use `hdvault wallet reset` first)",
            WalletError::AlreadyInitialized,
            wallet_path.display()
        );
    }
    Ok(())
}

fn print_words(mnemonic: &MnemonicPhrase) {
    for (i, word) in mnemonic.words().enumerate() {
        print!("{:>2}. {:<10}", i + 1, word);
        if (i + 1) % 4 == 0 {
            println!();
        }
    }
    if mnemonic.word_count() % 4 != 0 {
        println!();
    }
}

fn print_accounts(state: &WalletState, show_secrets: bool) {
    let Some(wallet) = state.wallet() else {
        println!("No wallet loaded.");
        return;
    };
    for (position, account) in wallet.accounts().iter().enumerate() {
        print_account(Some(position), account, show_secrets);
    }
    println!(
        "\n{} account(s); next index {}",
        wallet.len(),
        wallet.next_account_index()
    );
}

fn print_account(position: Option<usize>, account: &CombinedWallet, show_secrets: bool) {
    match position {
        Some(p) => println!("\n[{p}] Account #{}", account.account_index()),
        None => println!("\nAccount #{}", account.account_index()),
    }
    for chain in ChainKind::ALL {
        let kp = account.keypair(chain);
        println!("  {:<9} {}  ({})", chain.name(), kp.public_key(), kp.path());
        if show_secrets {
            println!("  {:<9} {}", "", kp.encoded_private_key().as_str());
        }
    }
}

/// Turn a mnemonic error into a message naming the offending words.
fn explain_invalid_mnemonic(phrase: &str, err: &WalletError) -> String {
    let unknown: Vec<String> = phrase
        .split_whitespace()
        .enumerate()
        .filter(|(_, w)| !is_valid_word(w))
        .map(|(i, w)| format!("#{} '{w}'", i + 1))
        .collect();
    if unknown.is_empty() {
        err.to_string()
    } else {
        format!("{err}; not in the wordlist: {}", unknown.join(", "))
    }
}

/// Prompt for a secret without echo.
fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    rpassword::prompt_password(format!("{prompt}: "))
        .map(Zeroizing::new)
        .context("Failed to read input")
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}: ");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;
    Ok(line.trim().eq_ignore_ascii_case("reset"))
}

/// Initialize tracing on stderr so stdout stays machine-readable.
fn init_logging(level: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
    }
}
