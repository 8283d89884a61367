//! Static colony buildings and movement resolution against them.

use crate::input::MoveAxes;
use glam::{Vec2, Vec3};
use shared::{MAX_ALTITUDE, WORLD_RADIUS};

/// Size of the box used to test the local actor against buildings
pub const PLAYER_FOOTPRINT: Vec3 = Vec3::new(1.0, 2.0, 1.0);
/// Gap left between an actor and a building face it walked into
pub const CLEARANCE: f32 = 0.5;
/// How far below a ceiling an actor ends up after bumping into it
pub const CEILING_DROP: f32 = 2.0;
/// Slack for staying on a rooftop across float noise
pub const LANDING_TOLERANCE: f32 = 0.1;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Touching faces count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildingKind {
    /// Hemisphere on a cylindrical base
    Dome { radius: f32, height: f32 },
    /// Rectangular habitat module
    Pod { width: f32, height: f32, depth: f32 },
}

/// One static building and its collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub kind: BuildingKind,
    pub bounds: Aabb,
}

impl Obstacle {
    /// The collision box covers the dome cap only: the base cylinder is
    /// walkable underneath it.
    pub fn dome(radius: f32, height: f32, x: f32, z: f32) -> Self {
        let base = height / 2.0;
        Self {
            kind: BuildingKind::Dome { radius, height },
            bounds: Aabb::new(
                Vec3::new(x - radius, base, z - radius),
                Vec3::new(x + radius, base + radius, z + radius),
            ),
        }
    }

    pub fn pod(width: f32, height: f32, depth: f32, x: f32, z: f32) -> Self {
        Self {
            kind: BuildingKind::Pod {
                width,
                height,
                depth,
            },
            bounds: Aabb::new(
                Vec3::new(x - width / 2.0, 0.0, z - depth / 2.0),
                Vec3::new(x + width / 2.0, height, z + depth / 2.0),
            ),
        }
    }
}

/// The eight colony buildings.
pub fn colony_layout() -> Vec<Obstacle> {
    vec![
        Obstacle::dome(10.0, 5.0, -400.0, -400.0),
        Obstacle::pod(8.0, 4.0, 8.0, -350.0, 300.0),
        Obstacle::dome(12.0, 6.0, 200.0, -300.0),
        Obstacle::pod(10.0, 5.0, 10.0, 300.0, 400.0),
        Obstacle::dome(15.0, 7.0, -200.0, 200.0),
        Obstacle::pod(6.0, 3.0, 6.0, 400.0, -200.0),
        Obstacle::dome(8.0, 4.0, -300.0, -100.0),
        Obstacle::pod(12.0, 6.0, 12.0, 100.0, 350.0),
    ]
}

/// Pulls a point back onto the world boundary circle, leaving `y` alone.
pub fn clamp_to_radius(position: Vec3) -> Vec3 {
    let horizontal = Vec2::new(position.x, position.z);
    if horizontal.length() <= WORLD_RADIUS {
        return position;
    }
    let clamped = horizontal.clamp_length_max(WORLD_RADIUS);
    Vec3::new(clamped.x, position.y, clamped.y)
}

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub position: Vec3,
    /// Came to rest on a rooftop; vertical intent was zeroed
    pub landed: bool,
}

/// Per-tick displacement for the given intent: `speed` horizontally and a
/// fixed fraction of the vertical axis.
pub fn displacement(axes: MoveAxes, speed: f32, vertical_step: f32) -> Vec3 {
    // Camera looks down +Z, so positive X input moves toward -X.
    Vec3::new(-axes.x * speed, axes.y * vertical_step, axes.z * speed)
}

/// Moves `current` by `delta` and resolves the result against every
/// obstacle, then against the world bounds.
///
/// Each axis is resolved independently. A horizontal axis is clamped to the
/// face plus `CLEARANCE` only when the previous position was outside that
/// face. Vertically the actor lands on a roof while falling or is pushed below
/// a ceiling while rising. Beyond the world radius the radial clamp of the
/// unobstructed candidate replaces any horizontal adjustment.
pub fn resolve_move(
    current: Vec3,
    delta: Vec3,
    vertical_intent: f32,
    obstacles: &[Obstacle],
) -> MoveOutcome {
    let candidate = current + delta;
    let footprint = Aabb::from_center_size(candidate, PLAYER_FOOTPRINT);

    let mut adjusted = candidate;
    let mut vertical_hit = false;
    let mut intent = vertical_intent;
    let mut landed = false;

    for obstacle in obstacles {
        let bounds = &obstacle.bounds;
        if !footprint.intersects(bounds) {
            continue;
        }

        if intent <= 0.0
            && candidate.y <= bounds.max.y
            && current.y >= bounds.max.y - LANDING_TOLERANCE
        {
            adjusted.y = bounds.max.y;
            vertical_hit = true;
            landed = true;
            intent = 0.0;
        }

        if intent > 0.0 && candidate.y >= bounds.min.y && current.y < bounds.min.y {
            adjusted.y = bounds.min.y - CEILING_DROP;
            vertical_hit = true;
        }

        if delta.x < 0.0 && candidate.x < bounds.max.x && current.x >= bounds.max.x {
            adjusted.x = bounds.max.x + CLEARANCE;
        }
        if delta.x > 0.0 && candidate.x > bounds.min.x && current.x <= bounds.min.x {
            adjusted.x = bounds.min.x - CLEARANCE;
        }
        if delta.z < 0.0 && candidate.z < bounds.max.z && current.z >= bounds.max.z {
            adjusted.z = bounds.max.z + CLEARANCE;
        }
        if delta.z > 0.0 && candidate.z > bounds.min.z && current.z <= bounds.min.z {
            adjusted.z = bounds.min.z - CLEARANCE;
        }
    }

    let horizontal = Vec2::new(candidate.x, candidate.z);
    let (x, z) = if horizontal.length() > WORLD_RADIUS {
        let clamped = horizontal.clamp_length_max(WORLD_RADIUS);
        (clamped.x, clamped.y)
    } else {
        (adjusted.x, adjusted.z)
    };

    let y = if vertical_hit { adjusted.y } else { candidate.y };
    let y = y.clamp(0.0, MAX_ALTITUDE);

    MoveOutcome {
        position: Vec3::new(x, y, z),
        landed,
    }
}
