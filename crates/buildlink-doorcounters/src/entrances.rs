//! Counted entrances of the building.

use crate::model::Entrance;

const ENTRANCES: [(&str, &str); 3] = [
    ("a", "Door A - direction parking lot"),
    ("b", "Door B - direction Build building"),
    ("c", "Door C - direction campus"),
];

/// All entrances, ordered by id.
pub fn entrances() -> Vec<Entrance> {
    ENTRANCES
        .iter()
        .map(|&(id, name)| Entrance::new(id, name))
        .collect()
}

/// Look up one entrance by id.
pub fn entrance(id: &str) -> Option<Entrance> {
    ENTRANCES
        .iter()
        .find(|&&(entrance_id, _)| entrance_id == id)
        .map(|&(id, name)| Entrance::new(id, name))
}
