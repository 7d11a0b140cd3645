use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use crate::collab::{Holder, ResourceVault};
use crate::config::UpkeepConfig;
use crate::model::{CellCoord, CellType, GroupId, LedgerRecord, ServerTime};
use crate::territory::{TerritoryChange, TerritoryManager, UnclaimReason};

/// Total upkeep for `taxable` claims: each claim's cost is keyed by its
/// ordinal position, and the bill is their sum.
pub fn upkeep_bill(taxable: usize, config: &UpkeepConfig) -> u64 {
    config.costs.sum_first(taxable)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub next_due: ServerTime,
    pub past_due: bool,
}

/// Per-group upkeep schedule.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct UpkeepLedger {
    entries: BTreeMap<GroupId, LedgerEntry>,
}

/// Result of one group's collection attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum UpkeepOutcome {
    Paid {
        group: GroupId,
        amount: u64,
        next_due: ServerTime,
    },
    /// Payment failed but the grace period has not run out.
    Delinquent {
        group: GroupId,
        owed: u64,
        overdue_secs: u64,
    },
    /// Payment failed past the grace period and one claim was forfeited.
    Forfeited {
        group: GroupId,
        owed: u64,
        change: TerritoryChange,
    },
}

impl UpkeepOutcome {
    pub fn group(&self) -> GroupId {
        match self {
            UpkeepOutcome::Paid { group, .. }
            | UpkeepOutcome::Delinquent { group, .. }
            | UpkeepOutcome::Forfeited { group, .. } => *group,
        }
    }
}

impl UpkeepLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[LedgerRecord]) -> Self {
        let entries = records
            .iter()
            .map(|r| {
                (
                    r.group_id,
                    LedgerEntry {
                        next_due: ServerTime::from_secs(r.next_due),
                        past_due: r.past_due,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn records(&self) -> Vec<LedgerRecord> {
        self.entries
            .iter()
            .map(|(group, entry)| LedgerRecord {
                group_id: *group,
                next_due: entry.next_due.as_secs(),
                past_due: entry.past_due,
            })
            .collect()
    }

    /// Start billing a group one period from `now`. Already-enrolled groups
    /// keep their schedule.
    pub fn enroll(&mut self, group: GroupId, now: ServerTime, period_secs: u64) -> bool {
        if self.entries.contains_key(&group) {
            return false;
        }
        self.entries.insert(
            group,
            LedgerEntry {
                next_due: now + period_secs,
                past_due: false,
            },
        );
        true
    }

    pub fn remove(&mut self, group: GroupId) -> Option<LedgerEntry> {
        self.entries.remove(&group)
    }

    pub fn get(&self, group: GroupId) -> Option<&LedgerEntry> {
        self.entries.get(&group)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enroll landholding groups that are missing and drop groups that hold
    /// nothing.
    pub fn sync(&mut self, territory: &TerritoryManager, now: ServerTime, period_secs: u64) {
        let owners = territory.owner_groups();
        self.entries.retain(|group, _| owners.contains(group));
        for group in owners {
            self.enroll(group, now, period_secs);
        }
    }
}

/// Bill every group whose due time has arrived.
///
/// The bill is withdrawn from the inventory of the group's headquarters
/// anchor. A group without a payable headquarters is treated as unable to pay.
pub fn collect_upkeep<V>(
    now: ServerTime,
    territory: &mut TerritoryManager,
    ledger: &mut UpkeepLedger,
    vault: &mut V,
    config: &UpkeepConfig,
) -> Vec<UpkeepOutcome>
where
    V: ResourceVault + ?Sized,
{
    if !config.enabled {
        return Vec::new();
    }
    ledger.sync(territory, now, config.period_secs);

    let due: Vec<(GroupId, LedgerEntry)> = ledger
        .entries
        .iter()
        .filter(|(_, entry)| now >= entry.next_due)
        .map(|(group, entry)| (*group, *entry))
        .collect();

    let mut outcomes = Vec::new();
    for (group, entry) in due {
        let taxable = territory.taxable_count(group);
        if taxable == 0 {
            continue;
        }
        let owed = upkeep_bill(taxable, config);
        let payer = territory
            .headquarters_of(group)
            .and_then(|hq| hq.anchor)
            .map(Holder::Anchor);
        let paid = payer.is_some_and(|holder| {
            u32::try_from(owed).is_ok_and(|amount| vault.withdraw(holder, amount))
        });

        if paid {
            let next_due = entry.next_due + config.period_secs;
            ledger.entries.insert(
                group,
                LedgerEntry {
                    next_due,
                    past_due: false,
                },
            );
            tracing::debug!("{group} paid {owed} upkeep, next due {next_due}");
            outcomes.push(UpkeepOutcome::Paid {
                group,
                amount: owed,
                next_due,
            });
            continue;
        }

        let overdue_secs = now.secs_since(entry.next_due);
        if overdue_secs <= config.grace_secs {
            tracing::warn!("{group} cannot pay {owed} upkeep, {overdue_secs}s overdue");
            outcomes.push(UpkeepOutcome::Delinquent {
                group,
                owed,
                overdue_secs,
            });
            continue;
        }

        let Some(target) = forfeit_target(territory, group) else {
            continue;
        };
        match territory.unclaim(target, UnclaimReason::UpkeepForfeit) {
            Ok(change) => {
                tracing::info!("{group} forfeited {target} for unpaid upkeep of {owed}");
                if territory.owned_count(group) == 0 {
                    ledger.entries.remove(&group);
                } else if let Some(e) = ledger.entries.get_mut(&group) {
                    e.past_due = true;
                }
                outcomes.push(UpkeepOutcome::Forfeited {
                    group,
                    owed,
                    change,
                });
            }
            Err(err) => tracing::warn!("Forfeit of {target} for {group} failed: {err}"),
        }
    }
    outcomes
}

/// The most exposed taxable claim: lowest depth, then non-headquarters, then
/// row-major order.
fn forfeit_target(territory: &TerritoryManager, group: GroupId) -> Option<CellCoord> {
    territory
        .owned_by(group)
        .into_iter()
        .filter(|c| c.kind.is_taxable())
        .min_by_key(|c| {
            (
                territory.depth_in_friendly_territory(c.coord),
                c.kind == CellType::Headquarters,
                c.coord,
            )
        })
        .map(|c| c.coord)
}
