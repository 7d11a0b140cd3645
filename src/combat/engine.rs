use crate::collab::WarRelations;
use crate::config::{CombatConfig, DecayConfig, TerritoryConfig};
use crate::model::{DamageInfo, GroupId, OccupantId, Structure, TerritoryCell, WorldPos};
use crate::territory::TerritoryManager;

use super::classifier::is_protected;

/// An occupant taking part in a hit, or the owner of a trap or turret.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Combatant {
    pub occupant: OccupantId,
    pub group: Option<GroupId>,
    pub position: WorldPos,
    /// Opted in to open combat.
    pub pvp: bool,
}

impl Combatant {
    pub fn new(occupant: OccupantId, group: Option<GroupId>, position: WorldPos) -> Self {
        Self {
            occupant,
            group,
            position,
            pvp: false,
        }
    }

    pub fn with_pvp(mut self, pvp: bool) -> Self {
        self.pvp = pvp;
        self
    }

    /// The same combatant standing somewhere else, e.g. acting through a
    /// device they placed.
    pub fn at(mut self, position: WorldPos) -> Self {
        self.position = position;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StructureTarget {
    pub structure: Structure,
    pub position: WorldPos,
    /// The occupant who placed it.
    pub owner: Option<OccupantId>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Target {
    Occupant(Combatant),
    Structure(StructureTarget),
}

impl Target {
    pub fn position(&self) -> WorldPos {
        match self {
            Target::Occupant(c) => c.position,
            Target::Structure(s) => s.position,
        }
    }
}

/// What to do with a hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Decision {
    Allow,
    /// Multiply every damage sub-type by this factor, in `(0, 1)` for
    /// table decisions and `[0, 1)` for decay.
    Scale(f32),
    Deny,
}

impl Decision {
    pub fn is_denied(self) -> bool {
        self == Decision::Deny
    }

    pub fn apply(self, damage: &mut DamageInfo) {
        match self {
            Decision::Allow => {}
            Decision::Scale(factor) => damage.scale(factor),
            Decision::Deny => damage.clear(),
        }
    }
}

/// Read-only view over territory, wars, and tuning used to judge hits.
pub struct CombatAuthorizer<'a, W: ?Sized> {
    territory: &'a TerritoryManager,
    wars: &'a W,
    combat: &'a CombatConfig,
    decay: &'a DecayConfig,
}

impl<'a, W: WarRelations + ?Sized> CombatAuthorizer<'a, W> {
    pub fn new(territory: &'a TerritoryManager, wars: &'a W, config: &'a TerritoryConfig) -> Self {
        Self {
            territory,
            wars,
            combat: &config.combat,
            decay: &config.decay,
        }
    }

    /// Judge one hit. `attacker` is `None` for environmental damage.
    pub fn authorize(
        &self,
        attacker: Option<&Combatant>,
        target: &Target,
        damage: &DamageInfo,
    ) -> Decision {
        if damage.is_decay() {
            return self.decay_decision(target.position());
        }
        let Some(attacker) = attacker else {
            return Decision::Allow;
        };
        self.evaluate(attacker, target, damage.is_suicide())
    }

    /// Whether a trap or turret owned by `owner` may fire at `victim`.
    /// `owner` should stand at the device's position.
    pub fn may_engage(&self, owner: &Combatant, victim: &Combatant) -> bool {
        !self
            .evaluate(owner, &Target::Occupant(*victim), false)
            .is_denied()
    }

    /// Decay never gets denied, only reduced by the land it falls on.
    pub fn decay_decision(&self, position: WorldPos) -> Decision {
        let kind = self.territory.get_by_position(position).kind;
        let reduction = self.decay.reduction_for(kind);
        if reduction <= 0.0 {
            Decision::Allow
        } else {
            Decision::Scale(1.0 - reduction)
        }
    }

    /// Badlands and configured PVP zones.
    pub fn is_dangerous_at(&self, position: WorldPos) -> bool {
        self.is_dangerous_cell(self.territory.get_by_position(position))
    }

    fn is_dangerous_cell(&self, cell: &TerritoryCell) -> bool {
        cell.kind.is_dangerous() || self.combat.pvp_zones.iter().any(|z| *z == cell.id)
    }

    fn is_self_hit(&self, attacker: &Combatant, target: &Target) -> bool {
        match target {
            Target::Occupant(victim) => victim.occupant == attacker.occupant,
            Target::Structure(s) => s.owner == Some(attacker.occupant),
        }
    }

    fn at_war(&self, a: Option<GroupId>, b: Option<GroupId>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a != b && self.wars.are_at_war(a, b),
            _ => false,
        }
    }

    fn evaluate(&self, attacker: &Combatant, target: &Target, suicide: bool) -> Decision {
        // 1. Self-damage, or damage to one's own structure.
        if self.is_self_hit(attacker, target) {
            return Decision::Allow;
        }
        // 2. Suicide.
        if suicide {
            return Decision::Allow;
        }

        // 3. Both parties in danger, or warring occupants.
        let attacker_in_danger = attacker.pvp || self.is_dangerous_at(attacker.position);
        let target_cell = self.territory.get_by_position(target.position());
        let target_in_danger = match target {
            Target::Occupant(victim) => victim.pvp || self.is_dangerous_cell(target_cell),
            Target::Structure(_) => self.is_dangerous_cell(target_cell),
        };
        if attacker_in_danger && target_in_danger {
            return Decision::Allow;
        }

        let structure = match target {
            Target::Occupant(victim) => {
                if self.at_war(attacker.group, victim.group) {
                    return Decision::Allow;
                }
                // 4. Occupants are not structures.
                return if self.combat.restrict_pvp {
                    Decision::Deny
                } else {
                    Decision::Allow
                };
            }
            Target::Structure(s) => s.structure,
        };

        // 4. Unprotected objects, plus unclaimed land when configured so.
        let exposed =
            self.combat.unclaimed_structures_exposed && !target_cell.kind.defends_structures();
        if !is_protected(&structure) || exposed {
            return Decision::Allow;
        }

        // 5. Wartime raid, softened by how deep the structure sits.
        if self.at_war(attacker.group, target_cell.owner) {
            let depth = self.territory.depth_in_friendly_territory(target_cell.coord);
            let bonus = self.combat.defensive_bonuses.get(depth as usize);
            return if bonus >= 1.0 {
                Decision::Deny
            } else if bonus <= 0.0 {
                Decision::Allow
            } else {
                Decision::Scale(1.0 - bonus)
            };
        }

        // 6. Everything else.
        Decision::Deny
    }
}
