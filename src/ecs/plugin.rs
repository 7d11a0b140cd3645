use bevy_app::{App, Plugin};

use super::systems::actions::ActionsPlugin;
use super::systems::anchors::AnchorsPlugin;
use super::systems::presence::PresencePlugin;
use super::systems::upkeep::UpkeepPlugin;

/// Aggregate plugin that installs every territory system.
pub struct TerritoryPlugin;

impl Plugin for TerritoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ActionsPlugin, PresencePlugin, AnchorsPlugin, UpkeepPlugin));
    }
}
