//! Claim costs, atomic claim payment, and the periodic upkeep ledger.

mod claim;
mod upkeep;

pub use claim::{ClaimReceipt, ClaimRequest, claim_cost, process_claim};
pub use upkeep::{LedgerEntry, UpkeepLedger, UpkeepOutcome, collect_upkeep, upkeep_bill};
