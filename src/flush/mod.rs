//! JSONL persistence for territory, upkeep ledger and the audit log.

mod jsonl;

pub use jsonl::{
    EVENTS_FILE, LEDGER_FILE, TERRITORY_FILE, append_events, flush_to_jsonl, load_events,
    load_ledger, load_ledger_or_default, load_territory, load_territory_or_default, save_ledger,
    save_territory,
};
