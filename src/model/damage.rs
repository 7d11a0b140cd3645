use serde::{Deserialize, Serialize};

/// Damage sub-types carried by a single hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DamageType {
    Generic,
    Bullet,
    Slash,
    Stab,
    Blunt,
    Explosion,
    Heat,
    Decay,
    Suicide,
}

string_enum!(DamageType {
    Generic => "generic",
    Bullet => "bullet",
    Slash => "slash",
    Stab => "stab",
    Blunt => "blunt",
    Explosion => "explosion",
    Heat => "heat",
    Decay => "decay",
    Suicide => "suicide",
});

/// Amounts per damage sub-type for one hit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    pub amounts: Vec<(DamageType, f32)>,
}

impl DamageInfo {
    pub fn single(kind: DamageType, amount: f32) -> Self {
        Self {
            amounts: vec![(kind, amount)],
        }
    }

    pub fn with(mut self, kind: DamageType, amount: f32) -> Self {
        self.amounts.push((kind, amount));
        self
    }

    pub fn total(&self) -> f32 {
        self.amounts.iter().map(|(_, a)| a).sum()
    }

    /// The sub-type contributing the most damage.
    pub fn major_type(&self) -> Option<DamageType> {
        self.amounts
            .iter()
            .filter(|(_, a)| *a > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| *k)
    }

    pub fn is_decay(&self) -> bool {
        self.major_type() == Some(DamageType::Decay)
    }

    pub fn is_suicide(&self) -> bool {
        self.major_type() == Some(DamageType::Suicide)
    }

    /// Multiply every sub-type by `factor` (clamped to `[0, 1]`).
    pub fn scale(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        for (_, amount) in &mut self.amounts {
            *amount *= factor;
        }
    }

    pub fn clear(&mut self) {
        self.scale(0.0);
    }
}

/// Building material grade. `Twig` is the lowest and never protected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingGrade {
    Twig,
    Wood,
    Stone,
    Metal,
    Armored,
}

impl BuildingGrade {
    pub fn is_lowest(self) -> bool {
        self == BuildingGrade::Twig
    }
}

/// What kind of object a damage target is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureCategory {
    /// Walls, floors, foundations.
    BuildingBlock,
    Door,
    Window,
    StorageContainer,
    Barricade,
    /// The claim-marking anchor structure itself.
    Anchor,
    WaterCatchment,
    Workbench,
    Turret,
    Trap,
    Decoration,
    Other,
}

/// A damageable placed object.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub category: StructureCategory,
    pub grade: BuildingGrade,
}

impl Structure {
    pub fn new(category: StructureCategory, grade: BuildingGrade) -> Self {
        Self { category, grade }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_type_picks_largest_component() {
        let hit = DamageInfo::single(DamageType::Bullet, 10.0).with(DamageType::Heat, 25.0);
        assert_eq!(hit.major_type(), Some(DamageType::Heat));
        assert_eq!(DamageInfo::default().major_type(), None);
    }

    #[test]
    fn scaling_applies_to_every_component() {
        let mut hit = DamageInfo::single(DamageType::Slash, 40.0).with(DamageType::Blunt, 20.0);
        hit.scale(0.25);
        assert_eq!(hit.amounts, vec![(DamageType::Slash, 10.0), (DamageType::Blunt, 5.0)]);
        hit.scale(3.0);
        assert_eq!(hit.total(), 15.0);
        hit.clear();
        assert_eq!(hit.total(), 0.0);
    }

    #[test]
    fn decay_and_suicide_detection() {
        assert!(DamageInfo::single(DamageType::Decay, 1.0).is_decay());
        assert!(DamageInfo::single(DamageType::Suicide, 100.0).is_suicide());
        assert!(!DamageInfo::single(DamageType::Bullet, 1.0).is_decay());
    }
}
