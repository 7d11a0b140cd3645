id_newtype!(
    /// A political group (faction, clan) that can own territory.
    GroupId,
    "group"
);

id_newtype!(
    /// A single occupant (player) of the world.
    OccupantId,
    "occupant"
);

id_newtype!(
    /// The physical anchor structure that marks a claim in the world.
    AnchorId,
    "anchor"
);
