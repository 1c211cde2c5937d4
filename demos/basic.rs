//! Basic example of using the `LedgerEngine`.
//!
//! Run with: `cargo run --example basic`

use paisa_ledger::{AddFunds, DeductFunds, LedgerEngine, MemoryStore, Transfer};
use rust_decimal::Decimal;
use uuid::Uuid;

fn main() {
    // Initialize logger (optional, but shows what's happening)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = LedgerEngine::new(MemoryStore::new());
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Top up Alice, spend a little, then send some Happy Paisa to Bob.
    let topup = AddFunds::new(alice, Decimal::new(10000, 2), "topup", None)
        .expect("valid amount");
    engine.add_funds(topup).expect("add_funds failed");

    let purchase = DeductFunds::new(alice, Decimal::new(3000, 2), "purchase", None)
        .expect("valid amount");
    engine.deduct_funds(purchase).expect("deduct_funds failed");

    let gift = Transfer::new(alice, bob, Decimal::new(5000, 2), "gift", Some("demo-1".to_string()))
        .expect("valid transfer");
    let result = engine.transfer(gift).expect("transfer failed");
    println!("transfer: {} (sender balance {:?})", result.message, result.balance);

    // A deduction beyond the balance is rejected, not an error.
    let overspend = DeductFunds::new(alice, Decimal::new(100000, 2), "overspend", None)
        .expect("valid amount");
    let rejected = engine.deduct_funds(overspend).expect("deduct_funds failed");
    println!("overspend: success={} message={}", rejected.success, rejected.message);

    // Export results to stdout
    println!("\n=== Final Wallet State ===");
    engine
        .export_wallets(std::io::stdout())
        .expect("Failed to export wallets");
}
