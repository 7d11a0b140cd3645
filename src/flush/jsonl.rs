use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bevy_ecs::world::World;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ecs::resources::EventLog;
use crate::economy::UpkeepLedger;
use crate::error::PersistError;
use crate::model::{CellRecord, Event, GridIndex, LedgerRecord};
use crate::territory::TerritoryManager;

pub const TERRITORY_FILE: &str = "territory.jsonl";
pub const LEDGER_FILE: &str = "ledger.jsonl";
pub const EVENTS_FILE: &str = "events.jsonl";

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_lines(&mut writer, items)
}

/// Like `write_jsonl`, but keeps whatever the file already holds.
fn append_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    write_lines(&mut BufWriter::new(file), items)
}

fn write_lines<T: Serialize>(
    writer: &mut impl Write,
    items: impl Iterator<Item = T>,
) -> io::Result<()> {
    for item in items {
        serde_json::to_writer(&mut *writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Read one item per non-blank line. Errors carry the 1-based line number.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PersistError> {
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| PersistError::Parse {
            line: idx + 1,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

// ---------------------------------------------------------------------------
// Territory
// ---------------------------------------------------------------------------

/// Write every cell that is not plain unnamed wilderness.
pub fn save_territory(territory: &TerritoryManager, path: &Path) -> Result<(), PersistError> {
    write_jsonl(path, territory.records().iter())?;
    Ok(())
}

pub fn load_territory(grid: GridIndex, path: &Path) -> Result<TerritoryManager, PersistError> {
    let records: Vec<CellRecord> = read_jsonl(path)?;
    Ok(TerritoryManager::from_records(grid, &records)?)
}

/// Load saved territory, or start from an all-wilderness grid when the file
/// is missing or unusable.
pub fn load_territory_or_default(grid: GridIndex, path: &Path) -> TerritoryManager {
    if !path.exists() {
        tracing::info!("no territory at {}, starting empty", path.display());
        return TerritoryManager::new(grid);
    }
    match load_territory(grid.clone(), path) {
        Ok(territory) => territory,
        Err(err) => {
            tracing::warn!(
                "failed to load territory from {}: {err}, starting empty",
                path.display()
            );
            TerritoryManager::new(grid)
        }
    }
}

// ---------------------------------------------------------------------------
// Upkeep ledger
// ---------------------------------------------------------------------------

pub fn save_ledger(ledger: &UpkeepLedger, path: &Path) -> Result<(), PersistError> {
    write_jsonl(path, ledger.records().iter())?;
    Ok(())
}

pub fn load_ledger(path: &Path) -> Result<UpkeepLedger, PersistError> {
    let records: Vec<LedgerRecord> = read_jsonl(path)?;
    Ok(UpkeepLedger::from_records(&records))
}

/// Missing or corrupt ledgers start empty; the next collection re-enrolls
/// every landholder.
pub fn load_ledger_or_default(path: &Path) -> UpkeepLedger {
    if !path.exists() {
        return UpkeepLedger::new();
    }
    load_ledger(path).unwrap_or_else(|err| {
        tracing::warn!(
            "failed to load upkeep ledger from {}: {err}, starting empty",
            path.display()
        );
        UpkeepLedger::new()
    })
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

pub fn append_events(events: &[Event], path: &Path) -> Result<(), PersistError> {
    append_jsonl(path, events.iter())?;
    Ok(())
}

pub fn load_events(path: &Path) -> Result<Vec<Event>, PersistError> {
    read_jsonl(path)
}

/// Flush the runtime state to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes:
/// - `territory.jsonl`: one cell record per line, rewritten each flush
/// - `ledger.jsonl`: one upkeep record per line, rewritten each flush
/// - `events.jsonl`: buffered audit events, appended and then cleared
pub fn flush_to_jsonl(world: &mut World, output_dir: &Path) -> Result<(), PersistError> {
    fs::create_dir_all(output_dir)?;

    if let Some(territory) = world.get_resource::<TerritoryManager>() {
        save_territory(territory, &output_dir.join(TERRITORY_FILE))?;
    }
    if let Some(ledger) = world.get_resource::<UpkeepLedger>() {
        save_ledger(ledger, &output_dir.join(LEDGER_FILE))?;
    }
    if let Some(mut log) = world.get_resource_mut::<EventLog>() {
        let mut events = log.take();
        if let Err(err) = append_events(&events, &output_dir.join(EVENTS_FILE)) {
            // Keep the events for the next attempt
            events.append(&mut log.events);
            log.events = events;
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnchorId, CellCoord, CellType, GroupId, OccupantId, ServerTime};

    fn grid() -> GridIndex {
        GridIndex::new(3000.0, 150.0)
    }

    #[test]
    fn parse_errors_report_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TERRITORY_FILE);
        fs::write(
            &path,
            "{\"id\":\"A0\",\"name\":null,\"type\":\"badlands\",\"owner_group_id\":null,\"claimant_id\":null,\"anchor_id\":null}\n\nnot json\n",
        )
        .unwrap();
        match load_territory(grid(), &path) {
            Err(PersistError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_territory_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TERRITORY_FILE);
        fs::write(&path, "garbage\n").unwrap();
        let territory = load_territory_or_default(grid(), &path);
        assert!(territory.records().is_empty());

        let missing = load_territory_or_default(grid(), &dir.path().join("nope.jsonl"));
        assert!(missing.records().is_empty());
    }

    #[test]
    fn invariant_violations_are_restore_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TERRITORY_FILE);
        // Claimed cell without an owner
        fs::write(
            &path,
            "{\"id\":\"A0\",\"name\":null,\"type\":\"claimed\",\"owner_group_id\":null,\"claimant_id\":null,\"anchor_id\":1}\n",
        )
        .unwrap();
        assert!(matches!(
            load_territory(grid(), &path),
            Err(PersistError::Restore(_))
        ));
    }

    #[test]
    fn flush_writes_all_files_and_drains_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = World::new();
        let mut territory = TerritoryManager::new(grid());
        territory
            .claim(CellCoord::new(0, 0), GroupId(1), OccupantId(10), AnchorId(1))
            .unwrap();
        let mut ledger = UpkeepLedger::new();
        ledger.enroll(GroupId(1), ServerTime::ZERO, 900);
        let mut log = EventLog::new();
        log.record(
            ServerTime::ZERO,
            crate::ecs::resources::EventDraft::new(crate::model::EventKind::Claimed, "claimed"),
        );
        world.insert_resource(territory);
        world.insert_resource(ledger);
        world.insert_resource(log);

        flush_to_jsonl(&mut world, dir.path()).unwrap();
        flush_to_jsonl(&mut world, dir.path()).unwrap();

        let territory = load_territory(grid(), &dir.path().join(TERRITORY_FILE)).unwrap();
        assert_eq!(territory.get("A0").unwrap().kind, CellType::Headquarters);
        let ledger = load_ledger(&dir.path().join(LEDGER_FILE)).unwrap();
        assert_eq!(
            ledger.get(GroupId(1)).unwrap().next_due,
            ServerTime::from_secs(900)
        );
        // Appended once, then the buffer was empty
        assert_eq!(load_events(&dir.path().join(EVENTS_FILE)).unwrap().len(), 1);
        assert!(world.resource::<EventLog>().events.is_empty());
    }
}
