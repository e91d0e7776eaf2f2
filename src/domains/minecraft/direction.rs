//! Yaw to compass direction mapping.
//!
//! Minecraft measures yaw clockwise from south: 0° faces south (+Z),
//! 90° west (-X), 180° north (-Z) and -90° east (+X).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four horizontal compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cardinal {
    North,
    South,
    East,
    West,
}

impl Cardinal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize `yaw` into `[-180, 180)` degrees.
///
/// `rem_euclid` keeps the remainder non-negative for negative operands.
pub fn normalize_yaw(yaw: f64) -> f64 {
    (yaw + 180.0).rem_euclid(360.0) - 180.0
}

/// Map a yaw angle to the direction the entity is facing.
///
/// Each range includes its lower bound and excludes its upper bound.
pub fn yaw_to_cardinal(yaw: f64) -> Cardinal {
    let yaw = normalize_yaw(yaw);

    if (-45.0..45.0).contains(&yaw) {
        Cardinal::South
    } else if (45.0..135.0).contains(&yaw) {
        Cardinal::West
    } else if yaw >= 135.0 || yaw < -135.0 {
        Cardinal::North
    } else {
        Cardinal::East
    }
}
