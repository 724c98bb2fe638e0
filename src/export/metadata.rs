//! JSON sidecar describing the exported home in meters.

use crate::types::Home;
use serde::{Deserialize, Serialize};

const CM_PER_M: f32 = 100.0;

/// Coordinate-system description for consumers of the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub up: String,
    pub handedness: String,
    /// World axis that plan y maps to.
    pub plan_y_axis: String,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            up: "Y".to_string(),
            handedness: "right".to_string(),
            plan_y_axis: "Z".to_string(),
        }
    }
}

/// A furniture piece as seen by downstream tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: Option<String>,
    pub catalog_id: Option<String>,
    /// World position (x, elevation, plan y).
    pub position: [f32; 3],
    /// Yaw in degrees, clockwise on the plan.
    pub rotation: f32,
    /// Width, height, depth.
    pub size: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub index: usize,
    pub name: Option<String>,
    pub points: Vec<[f32; 2]>,
    /// Square meters.
    pub area: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInfo {
    pub index: usize,
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub height: f32,
    pub thickness: f32,
}

/// Metadata sidecar. Lengths are in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeMetadata {
    pub units: String,
    pub coordinate_system: CoordinateSystem,
    pub devices: Vec<DeviceInfo>,
    pub rooms: Vec<RoomInfo>,
    pub walls: Vec<WallInfo>,
}

impl HomeMetadata {
    /// Describe a home. Walls without their own height or thickness take the
    /// given defaults (centimeters).
    pub fn from_home(home: &Home, default_wall_height: f32, default_wall_thickness: f32) -> Self {
        let devices = home
            .furniture
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.visible)
            .map(|(index, piece)| DeviceInfo {
                index,
                name: piece.name.clone(),
                catalog_id: piece.catalog_id.clone(),
                position: [piece.x, piece.elevation, piece.y].map(meters),
                rotation: piece.angle.to_degrees(),
                size: [piece.width, piece.height, piece.depth].map(meters),
            })
            .collect();

        let rooms = home
            .rooms
            .iter()
            .enumerate()
            .map(|(index, room)| RoomInfo {
                index,
                name: room.name.clone(),
                points: room.points.iter().map(|p| p.map(meters)).collect(),
                area: room.area() / (CM_PER_M * CM_PER_M),
            })
            .collect();

        let walls = home
            .walls
            .iter()
            .enumerate()
            .map(|(index, wall)| WallInfo {
                index,
                start: wall.start.map(meters),
                end: wall.end.map(meters),
                height: meters(wall.height.unwrap_or(default_wall_height)),
                thickness: meters(wall.thickness.unwrap_or(default_wall_thickness)),
            })
            .collect();

        Self {
            units: "meters".to_string(),
            coordinate_system: CoordinateSystem::default(),
            devices,
            rooms,
            walls,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn meters(cm: f32) -> f32 {
    cm / CM_PER_M
}
