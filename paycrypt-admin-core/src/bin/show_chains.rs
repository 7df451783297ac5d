use dotenv::dotenv;
use paycrypt_admin_core::{ChainRegistry, CoreSettings, FileStore, SelectionStore};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    dotenv().ok();
    paycrypt_admin_core::init();

    let settings = match CoreSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let registry = match ChainRegistry::from_env() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let persisted = FileStore::open(&settings.state_dir)
        .ok()
        .and_then(|store| SelectionStore::new(Arc::new(store)).load());

    println!("Paycrypt Admin Chain Configuration:\n");
    println!("  Default Chain: {}", settings.default_chain);
    println!(
        "  Persisted Selection: {}",
        persisted.map(|key| key.to_string()).unwrap_or_else(|| "(none)".to_string())
    );
    println!("  State Directory: {}", settings.state_dir.display());
    println!("  Backend URL: {}", settings.backend_url);
    println!(
        "  Wallet RPC URL: {}",
        settings.wallet_rpc_url.as_deref().unwrap_or("(not set)")
    );
    println!();

    for chain in registry.iter() {
        println!("  {} [{}]", chain.display_name, chain.key);
        println!("    Chain ID: {}", chain.numeric_id);
        println!("    RPC URL: {}", chain.rpc_endpoint);
        println!("    Explorer: {}", chain.explorer_base_url);
        println!("    Contract: {}", chain.contract_address);
    }

    ExitCode::SUCCESS
}
