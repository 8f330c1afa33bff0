//! Static station topology: rooms, doors, device registry, crew roster
//!
//! The world is immutable input to every kernel system. Nothing here changes
//! at runtime; everything mutable lives in [`crate::state`].

use serde::{Deserialize, Serialize};

use crate::core::error::{KernelError, Result};
use crate::core::types::{DeviceSystem, NpcId, RoomId};

/// A station room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

/// A door connecting two rooms (undirected)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Door {
    pub a: RoomId,
    pub b: RoomId,
}

/// A monitored device: one station system and the room crew go to service it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Device {
    pub system: DeviceSystem,
    /// Where the device physically sits and where responders gather
    pub room: RoomId,
}

/// Crew member occupation, driving default movement and work behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Miner,
    Engineer,
    Medic,
    Security,
    Captain,
}

/// A roster entry for one crew member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: NpcId,
    pub name: String,
    pub role: Role,
}

/// Immutable station definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub devices: Vec<Device>,
    pub crew: Vec<CrewMember>,
}

impl World {
    /// The default eight-room station with a six-person crew
    pub fn station_default() -> Self {
        let room = |id: u8, name: &str| Room {
            id: RoomId(id),
            name: name.to_string(),
        };
        let crew = |id: u8, name: &str, role: Role| CrewMember {
            id: NpcId(id),
            name: name.to_string(),
            role,
        };

        Self {
            rooms: vec![
                room(0, "Bridge"),
                room(1, "Mess"),
                room(2, "Quarters"),
                room(3, "Med Bay"),
                room(4, "Mine Face"),
                room(5, "Thermal Control"),
                room(6, "Reactor"),
                room(7, "Comms Array"),
            ],
            doors: vec![
                Door { a: RoomId(0), b: RoomId(1) },
                Door { a: RoomId(0), b: RoomId(7) },
                Door { a: RoomId(1), b: RoomId(2) },
                Door { a: RoomId(1), b: RoomId(3) },
                Door { a: RoomId(1), b: RoomId(4) },
                Door { a: RoomId(1), b: RoomId(6) },
                Door { a: RoomId(4), b: RoomId(5) },
                Door { a: RoomId(5), b: RoomId(6) },
            ],
            devices: vec![
                Device { system: DeviceSystem::Thermal, room: RoomId(5) },
                Device { system: DeviceSystem::Atmos, room: RoomId(3) },
                Device { system: DeviceSystem::Radiation, room: RoomId(6) },
                Device { system: DeviceSystem::Power, room: RoomId(6) },
                Device { system: DeviceSystem::Hull, room: RoomId(4) },
                Device { system: DeviceSystem::Comms, room: RoomId(7) },
            ],
            crew: vec![
                crew(0, "Okafor", Role::Captain),
                crew(1, "Reyes", Role::Miner),
                crew(2, "Lindqvist", Role::Miner),
                crew(3, "Okonkwo", Role::Engineer),
                crew(4, "Marsh", Role::Medic),
                crew(5, "Dietrich", Role::Security),
            ],
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn crew_member(&self, id: NpcId) -> Option<&CrewMember> {
        self.crew.iter().find(|c| c.id == id)
    }

    /// Room crew gather in to respond to a system alarm
    pub fn response_room(&self, system: DeviceSystem) -> Option<RoomId> {
        self.devices
            .iter()
            .find(|d| d.system == system)
            .map(|d| d.room)
    }

    /// The room where mining yield happens
    pub fn mining_room(&self) -> RoomId {
        // The hull device marks the rock face; mining happens there.
        self.response_room(DeviceSystem::Hull).unwrap_or(RoomId(4))
    }

    /// Rooms directly connected to `from`, in ascending id order
    pub fn adjacent(&self, from: RoomId) -> Vec<RoomId> {
        let mut out: Vec<RoomId> = self
            .doors
            .iter()
            .filter_map(|d| {
                if d.a == from {
                    Some(d.b)
                } else if d.b == from {
                    Some(d.a)
                } else {
                    None
                }
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// First step of the shortest door path from `from` to `to`
    ///
    /// Breadth-first over the door list; ties break toward lower room ids so
    /// routing is deterministic. Returns `None` when unreachable or already there.
    pub fn next_step(&self, from: RoomId, to: RoomId) -> Option<RoomId> {
        if from == to {
            return None;
        }
        let mut visited = vec![from];
        let mut frontier: Vec<(RoomId, RoomId)> =
            self.adjacent(from).into_iter().map(|r| (r, r)).collect();
        while !frontier.is_empty() {
            let mut next_frontier = Vec::new();
            for (room, first) in &frontier {
                if *room == to {
                    return Some(*first);
                }
                if visited.contains(room) {
                    continue;
                }
                visited.push(*room);
                for neighbor in self.adjacent(*room) {
                    if !visited.contains(&neighbor) {
                        next_frontier.push((neighbor, *first));
                    }
                }
            }
            frontier = next_frontier;
        }
        None
    }

    /// Check referential integrity of doors, devices, and roster
    pub fn validate(&self) -> Result<()> {
        for door in &self.doors {
            if self.room(door.a).is_none() || self.room(door.b).is_none() {
                return Err(KernelError::InvalidWorld(format!(
                    "door {:?}-{:?} references unknown room",
                    door.a, door.b
                )));
            }
        }
        for device in &self.devices {
            if self.room(device.room).is_none() {
                return Err(KernelError::InvalidWorld(format!(
                    "device {:?} placed in unknown room {:?}",
                    device.system, device.room
                )));
            }
        }
        if self.crew.is_empty() {
            return Err(KernelError::InvalidWorld("empty crew roster".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_station_validates() {
        assert!(World::station_default().validate().is_ok());
    }

    #[test]
    fn test_every_system_has_a_response_room() {
        let world = World::station_default();
        for system in DeviceSystem::ALL {
            assert!(world.response_room(system).is_some(), "{system:?}");
        }
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let world = World::station_default();
        for room in &world.rooms {
            for neighbor in world.adjacent(room.id) {
                assert!(world.adjacent(neighbor).contains(&room.id));
            }
        }
    }

    #[test]
    fn test_next_step_reaches_thermal_from_quarters() {
        let world = World::station_default();
        // Quarters(2) -> Mess(1) -> Mine Face(4) -> Thermal Control(5)
        let mut at = RoomId(2);
        let mut hops = 0;
        while at != RoomId(5) {
            at = world.next_step(at, RoomId(5)).expect("path exists");
            hops += 1;
            assert!(hops < 10, "routing loop");
        }
        assert_eq!(hops, 3);
    }

    #[test]
    fn test_next_step_none_when_already_there() {
        let world = World::station_default();
        assert_eq!(world.next_step(RoomId(1), RoomId(1)), None);
    }
}
