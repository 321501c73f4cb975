//! World model
//!
//! Tracks the objects lying at each base angle and the one held in the
//! gripper. Closing the gripper low over a station grabs the first object
//! there; opening it sets the held object down wherever the base points.

use heapless::Vec;
use sortarm_core::classify::{Color, SensorSample};
use sortarm_core::traits::Rgb;

/// Objects the world can hold
pub const MAX_OBJECTS: usize = 32;

/// Geometry of the simulated arm and stations, reported angles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WorldConfig {
    /// Base angle of the pickup station
    pub pickup_angle: i32,
    /// How far off a station the base may point and still reach it
    pub station_tolerance: i32,
    /// The gripper reaches objects on a station with the elbow at or below
    pub reach_height: i32,
    /// Elbow angle holding the gripper in front of the sensor
    pub sensor_height: i32,
    /// Elbow error at which the sensor still sees the held object
    pub sensor_window: i32,
    /// Gripper angle when closed on an object
    pub object_grip_angle: i32,
    /// Gripper opened past this angle lets go
    pub release_below: i32,
    /// Base travel from the pickup at which a slippery object falls out
    pub slip_distance: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            pickup_angle: 0,
            station_tolerance: 8,
            reach_height: 56,
            sensor_height: 58,
            sensor_window: 6,
            object_grip_angle: -40,
            release_below: -60,
            slip_distance: 20,
        }
    }
}

/// A block the arm can sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimObject {
    /// What the sensor reads with the object in view
    pub reading: SensorSample,
    /// Falls out of the gripper once carried away from the pickup
    pub slippery: bool,
}

impl SimObject {
    pub const fn new(color: Option<Color>, reflection: u8, rgb: Rgb) -> Self {
        Self {
            reading: SensorSample {
                color,
                reflection,
                rgb,
            },
            slippery: false,
        }
    }

    /// A block the sensor cannot put a color to
    pub const fn unreadable() -> Self {
        Self::new(None, 3, Rgb::new(2, 2, 2))
    }

    /// A big block of a common color, with plausible raw readings
    pub const fn typical(color: Color) -> Self {
        match color {
            Color::Red => Self::new(Some(Color::Red), 62, Rgb::new(58, 9, 7)),
            Color::Green => Self::new(Some(Color::Green), 14, Rgb::new(6, 22, 9)),
            Color::Blue => Self::new(Some(Color::Blue), 12, Rgb::new(4, 9, 24)),
            Color::Yellow => Self::new(Some(Color::Yellow), 71, Rgb::new(62, 55, 12)),
            Color::Unknown => Self::unreadable(),
            other => Self::new(Some(other), 40, Rgb::new(30, 30, 30)),
        }
    }

    pub const fn slippery(mut self) -> Self {
        self.slippery = true;
        self
    }
}

/// Where an object ended up after leaving the gripper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Placement {
    /// Base angle
    pub angle: i32,
    /// Elbow angle when released
    pub height: i32,
    pub object: SimObject,
    /// Fell out instead of being set down
    pub lost: bool,
}

#[derive(Debug, Clone, Copy)]
struct Lying {
    angle: i32,
    object: SimObject,
}

/// Objects around the arm
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    lying: Vec<Lying, MAX_OBJECTS>,
    held: Option<SimObject>,
    placements: Vec<Placement, MAX_OBJECTS>,
    /// Releases past `placements` capacity
    unrecorded: u32,
    picks: u32,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            lying: Vec::new(),
            held: None,
            placements: Vec::new(),
            unrecorded: 0,
            picks: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Queue an object at the pickup station
    pub fn feed(&mut self, object: SimObject) -> Result<(), SimObject> {
        self.place(self.config.pickup_angle, object)
    }

    /// Put an object at a base angle
    pub fn place(&mut self, angle: i32, object: SimObject) -> Result<(), SimObject> {
        self.lying
            .push(Lying { angle, object })
            .map_err(|lying| lying.object)
    }

    pub fn held(&self) -> Option<&SimObject> {
        self.held.as_ref()
    }

    /// Objects released from the gripper, in order
    ///
    /// Only the first [`MAX_OBJECTS`] releases are recorded.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Releases that happened after `placements` filled up
    pub fn unrecorded_placements(&self) -> u32 {
        self.unrecorded
    }

    /// Objects lying within reach of `angle`
    pub fn objects_at(&self, angle: i32) -> usize {
        self.lying
            .iter()
            .filter(|l| (l.angle - angle).abs() <= self.config.station_tolerance)
            .count()
    }

    /// Objects waiting at the pickup station
    pub fn waiting(&self) -> usize {
        self.objects_at(self.config.pickup_angle)
    }

    /// Objects grabbed so far
    pub fn picks(&self) -> u32 {
        self.picks
    }

    fn reachable(&self, base: i32, elbow: i32) -> Option<usize> {
        if elbow > self.config.reach_height {
            return None;
        }
        self.lying
            .iter()
            .position(|l| (l.angle - base).abs() <= self.config.station_tolerance)
    }

    /// Reported gripper angle the jaws cannot close past
    pub fn grip_obstacle(&self, base: i32, elbow: i32) -> Option<i32> {
        (self.held.is_some() || self.reachable(base, elbow).is_some())
            .then_some(self.config.object_grip_angle)
    }

    /// Apply the effect of the arm's new pose
    ///
    /// Returns the sensor reading for whatever is in front of the sensor.
    pub fn settle(
        &mut self,
        base: i32,
        elbow: i32,
        gripper: i32,
        gripper_stalled: bool,
    ) -> Option<SensorSample> {
        let cfg = self.config;

        if self.held.is_none()
            && gripper_stalled
            && (gripper - cfg.object_grip_angle).abs() <= 1
        {
            if let Some(index) = self.reachable(base, elbow) {
                let lying = self.lying.remove(index);
                self.held = Some(lying.object);
                self.picks += 1;
            }
        }

        if let Some(object) = self.held {
            if gripper < cfg.release_below {
                self.release(base, elbow, object, false);
            } else if object.slippery && (base - cfg.pickup_angle).abs() > cfg.slip_distance {
                self.release(base, elbow, object, true);
            }
        }

        self.held
            .filter(|_| (elbow - cfg.sensor_height).abs() <= cfg.sensor_window)
            .map(|object| object.reading)
    }

    fn release(&mut self, base: i32, elbow: i32, object: SimObject, lost: bool) {
        self.held = None;
        // set down on top of the station, picked first next time
        let _ = self.lying.insert(
            0,
            Lying {
                angle: base,
                object,
            },
        );
        let placement = Placement {
            angle: base,
            height: elbow,
            object,
            lost,
        };
        if self.placements.push(placement).is_err() {
            self.unrecorded += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_requires_low_elbow_at_station() {
        let mut world = World::new(WorldConfig::default());
        world.feed(SimObject::typical(Color::Red)).unwrap();

        assert_eq!(world.grip_obstacle(0, 58), None);
        assert_eq!(world.grip_obstacle(90, 30), None);
        assert_eq!(world.grip_obstacle(3, 30), Some(-40));

        world.settle(3, 30, -40, true);
        assert!(world.held().is_some());
        assert_eq!(world.waiting(), 0);
        assert_eq!(world.picks(), 1);
    }

    #[test]
    fn test_sensor_sees_held_object_at_sensor_height() {
        let mut world = World::new(WorldConfig::default());
        world.feed(SimObject::typical(Color::Blue)).unwrap();
        world.settle(0, 30, -40, true);

        assert_eq!(world.settle(0, 40, -40, false), None);
        let reading = world.settle(0, 58, -40, false).unwrap();
        assert_eq!(reading.color, Some(Color::Blue));
    }

    #[test]
    fn test_open_releases_at_base_angle() {
        let mut world = World::new(WorldConfig::default());
        world.feed(SimObject::typical(Color::Green)).unwrap();
        world.settle(0, 30, -40, true);
        world.settle(100, 30, -70, false);

        assert!(world.held().is_none());
        assert_eq!(world.objects_at(100), 1);
        let placement = world.placements()[0];
        assert_eq!(placement.angle, 100);
        assert!(!placement.lost);
    }

    #[test]
    fn test_slippery_object_falls_out() {
        let mut world = World::new(WorldConfig::default());
        world.feed(SimObject::typical(Color::Red).slippery()).unwrap();
        world.settle(0, 30, -40, true);
        world.settle(15, 58, -40, false);
        assert!(world.held().is_some());
        world.settle(30, 58, -40, false);
        assert!(world.held().is_none());
        assert!(world.placements()[0].lost);
    }

    #[test]
    fn test_releases_past_capacity_are_counted() {
        let mut world = World::new(WorldConfig::default());
        world.feed(SimObject::unreadable()).unwrap();
        for _ in 0..MAX_OBJECTS + 3 {
            world.settle(0, 30, -40, true);
            world.settle(0, 30, -70, false);
        }
        assert_eq!(world.picks(), MAX_OBJECTS as u32 + 3);
        assert_eq!(world.placements().len(), MAX_OBJECTS);
        assert_eq!(world.unrecorded_placements(), 3);
        assert_eq!(world.waiting(), 1);
    }
}
