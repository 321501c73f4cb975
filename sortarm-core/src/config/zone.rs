//! Zone table
//!
//! Zones are fixed base positions around the arm. One of them is the pickup
//! station where objects arrive; the others are drop-off zones that can each
//! be assigned a color.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::session::ConfigError;
use crate::classify::Color;

/// Minimum number of zones (pickup plus two drop-offs)
pub const MIN_ZONES: usize = 3;

/// Maximum number of zones
pub const MAX_ZONES: usize = 4;

/// How high the zone surface is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeightClass {
    #[default]
    Ground,
    Elevated,
}

impl HeightClass {
    pub const ALL: [HeightClass; 2] = [HeightClass::Ground, HeightClass::Elevated];

    pub const fn name(self) -> &'static str {
        match self {
            HeightClass::Ground => "Ground",
            HeightClass::Elevated => "Elevated",
        }
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            HeightClass::Ground => "Gnd",
            HeightClass::Elevated => "Elev",
        }
    }
}

/// A base position the arm can pick from or drop at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Zone {
    /// Base angle
    pub angle: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: HeightClass,
    /// Color sorted into this zone
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<Color>,
}

impl Zone {
    pub const fn ground(angle: i32) -> Self {
        Self {
            angle,
            height: HeightClass::Ground,
            color: None,
        }
    }

    pub const fn elevated(angle: i32) -> Self {
        Self {
            angle,
            height: HeightClass::Elevated,
            color: None,
        }
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Where a classified object goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Drop at the drop-off zone with this index
    Zone(usize),
    /// Put the object back at the pickup station
    Pickup,
}

/// Ordered zones with a designated pickup station
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneTable {
    pub entries: Vec<Zone, MAX_ZONES>,
    /// Index of the pickup station in `entries`
    pub pickup: usize,
}

impl Default for ZoneTable {
    /// Pickup at 0°, then red, green and blue drop-offs
    fn default() -> Self {
        let mut entries = Vec::new();
        for zone in [
            Zone::ground(0),
            Zone::ground(100).with_color(Color::Red),
            Zone::ground(150).with_color(Color::Green),
            Zone::ground(200).with_color(Color::Blue),
        ] {
            let _ = entries.push(zone);
        }
        Self { entries, pickup: 0 }
    }
}

impl ZoneTable {
    /// Create an empty table
    pub const fn new(pickup: usize) -> Self {
        Self {
            entries: Vec::new(),
            pickup,
        }
    }

    /// Append a zone
    pub fn push(&mut self, zone: Zone) -> Result<(), ConfigError> {
        self.entries
            .push(zone)
            .map_err(|_| ConfigError::TooManyZones)
    }

    /// Builder-style `push` that drops zones beyond capacity
    pub fn with(mut self, zone: Zone) -> Self {
        let _ = self.entries.push(zone);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Zone> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Zone> {
        self.entries.get_mut(index)
    }

    pub fn pickup_index(&self) -> usize {
        self.pickup
    }

    pub fn pickup_zone(&self) -> Option<&Zone> {
        self.entries.get(self.pickup)
    }

    pub fn is_pickup(&self, index: usize) -> bool {
        index == self.pickup
    }

    /// Drop-off zones in index order, with their table index
    pub fn drop_zones(&self) -> impl Iterator<Item = (usize, &Zone)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != self.pickup)
    }

    pub fn drop_zone_count(&self) -> usize {
        self.drop_zones().count()
    }

    /// Table index of the `n`th drop-off zone (0-based)
    pub fn drop_zone_index(&self, n: usize) -> Option<usize> {
        self.drop_zones().nth(n).map(|(index, _)| index)
    }

    /// 1-based drop-off number used on screen, `None` for the pickup
    pub fn drop_number(&self, index: usize) -> Option<usize> {
        self.drop_zones()
            .position(|(i, _)| i == index)
            .map(|n| n + 1)
    }

    /// Choose the destination for an object of `color`
    ///
    /// The lowest-index drop-off zone assigned `color` wins. Unknown objects
    /// and colors no zone wants go back to the pickup station.
    pub fn dispatch(&self, color: Color) -> Dispatch {
        if color == Color::Unknown {
            return Dispatch::Pickup;
        }
        self.drop_zones()
            .find(|(_, zone)| zone.color == Some(color))
            .map_or(Dispatch::Pickup, |(index, _)| Dispatch::Zone(index))
    }

    /// Zone closest to a base angle, lowest index on a tie
    pub fn nearest(&self, angle: i32) -> usize {
        let mut best = 0;
        let mut best_distance = i32::MAX;
        for (index, zone) in self.entries.iter().enumerate() {
            let distance = (zone.angle - angle).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_table() -> ZoneTable {
        ZoneTable::new(0)
            .with(Zone::ground(0))
            .with(Zone::ground(100).with_color(Color::Blue))
            .with(Zone::ground(150).with_color(Color::Red))
            .with(Zone::ground(200).with_color(Color::Green))
    }

    #[test]
    fn test_dispatch_matches_color() {
        let zones = scenario_table();
        assert_eq!(zones.dispatch(Color::Blue), Dispatch::Zone(1));
        assert_eq!(zones.dispatch(Color::Red), Dispatch::Zone(2));
        assert_eq!(zones.dispatch(Color::Green), Dispatch::Zone(3));
    }

    #[test]
    fn test_unknown_and_unassigned_go_to_pickup() {
        let zones = scenario_table();
        assert_eq!(zones.dispatch(Color::Unknown), Dispatch::Pickup);
        assert_eq!(zones.dispatch(Color::Yellow), Dispatch::Pickup);
    }

    #[test]
    fn test_pickup_color_is_ignored() {
        let mut zones = scenario_table();
        zones.get_mut(0).unwrap().color = Some(Color::Yellow);
        assert_eq!(zones.dispatch(Color::Yellow), Dispatch::Pickup);
    }

    #[test]
    fn test_duplicate_color_lowest_index_wins() {
        let mut zones = scenario_table();
        zones.get_mut(3).unwrap().color = Some(Color::Blue);
        assert_eq!(zones.dispatch(Color::Blue), Dispatch::Zone(1));
    }

    #[test]
    fn test_nearest_tie_prefers_lowest_index() {
        let zones = scenario_table();
        assert_eq!(zones.nearest(125), 1);
        assert_eq!(zones.nearest(130), 2);
        assert_eq!(zones.nearest(40), 0);
        assert_eq!(zones.nearest(260), 3);
    }

    #[test]
    fn test_drop_numbers_skip_pickup() {
        let zones = ZoneTable::new(2)
            .with(Zone::ground(0))
            .with(Zone::ground(60))
            .with(Zone::ground(120));
        assert_eq!(zones.drop_number(0), Some(1));
        assert_eq!(zones.drop_number(1), Some(2));
        assert_eq!(zones.drop_number(2), None);
        assert_eq!(zones.drop_zone_index(1), Some(1));
        assert_eq!(zones.drop_zone_count(), 2);
    }

    #[test]
    fn test_push_beyond_capacity_fails() {
        let mut zones = scenario_table();
        assert_eq!(zones.push(Zone::ground(250)), Err(ConfigError::TooManyZones));
    }

    fn any_color() -> impl Strategy<Value = Color> {
        prop_oneof![
            Just(Color::Red),
            Just(Color::Green),
            Just(Color::Blue),
            Just(Color::Yellow),
            Just(Color::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn prop_dispatch_is_lowest_matching_drop_zone(
            assigned in proptest::collection::vec(proptest::option::of(any_color()), 3..=4),
            pickup in 0usize..3,
            color in any_color(),
        ) {
            let mut zones = ZoneTable::new(pickup);
            for (i, c) in assigned.iter().enumerate() {
                zones.push(Zone { angle: i as i32 * 50, height: HeightClass::Ground, color: *c }).unwrap();
            }

            let expected = if color == Color::Unknown {
                Dispatch::Pickup
            } else {
                assigned
                    .iter()
                    .enumerate()
                    .find(|(i, c)| *i != pickup && **c == Some(color))
                    .map_or(Dispatch::Pickup, |(i, _)| Dispatch::Zone(i))
            };
            prop_assert_eq!(zones.dispatch(color), expected);
        }

        #[test]
        fn prop_nearest_is_minimal(angle in -50i32..400) {
            let zones = scenario_table();
            let chosen = zones.nearest(angle);
            let best = (zones.get(chosen).unwrap().angle - angle).abs();
            for (i, zone) in zones.entries.iter().enumerate() {
                let d = (zone.angle - angle).abs();
                prop_assert!(d > best || (d == best && i >= chosen));
            }
        }
    }
}
