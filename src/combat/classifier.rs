use crate::model::{Structure, StructureCategory};

/// Categories shielded regardless of whether they are building blocks.
const PROTECTED_CATEGORIES: [StructureCategory; 9] = [
    StructureCategory::Door,
    StructureCategory::Window,
    StructureCategory::StorageContainer,
    StructureCategory::Barricade,
    StructureCategory::Anchor,
    StructureCategory::WaterCatchment,
    StructureCategory::Workbench,
    StructureCategory::Turret,
    StructureCategory::Trap,
];

/// Whether territory rules restrict damage to this structure.
///
/// Lowest-grade objects and decorations are never protected. Anything else
/// is protected when it is a building block or its category is listed above.
pub fn is_protected(structure: &Structure) -> bool {
    if structure.grade.is_lowest() {
        return false;
    }
    match structure.category {
        StructureCategory::BuildingBlock => true,
        StructureCategory::Decoration | StructureCategory::Other => false,
        category => PROTECTED_CATEGORIES.contains(&category),
    }
}
