//! Axis-aligned geometry for level objects
//!
//! Screen space, top-left origin, y grows downward. A rectangle is defined by:
//! - pos: top-left corner
//! - size: width and height

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{GROUND_INSET, PICKUP_SIZE, SURFACE_TRIM};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other)
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// How a static object responds to contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Land on top, pass through sides and underside
    #[default]
    Solid,
    /// Land on top and get launched upward
    Bounce,
    /// Costs a life on any overlap
    Hazard,
    /// Completes the level on any overlap
    Goal,
}

/// A platform, pad, spike or goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticGeometry {
    pub kind: GeometryKind,
    /// Visual rectangle
    pub rect: Rect,
    /// Distance from the visual top down to the collidable top.
    /// Every kind is trimmed, spikes and goals included.
    #[serde(default)]
    pub inset_top: f32,
}

impl StaticGeometry {
    pub fn new(kind: GeometryKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind,
            rect: Rect::new(x, y, w, h),
            inset_top: SURFACE_TRIM,
        }
    }

    pub fn solid(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(GeometryKind::Solid, x, y, w, h)
    }

    /// Ground tile: solid with the grass art sitting above the real floor
    pub fn ground(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            inset_top: GROUND_INSET + SURFACE_TRIM,
            ..Self::solid(x, y, w, h)
        }
    }

    pub fn bounce(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(GeometryKind::Bounce, x, y, w, h)
    }

    pub fn hazard(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(GeometryKind::Hazard, x, y, w, h)
    }

    pub fn goal(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(GeometryKind::Goal, x, y, w, h)
    }

    /// Collidable region; the bottom edge stays where the art ends
    pub fn hitbox(&self) -> Rect {
        let inset = self.inset_top.clamp(0.0, self.rect.size.y);
        Rect::new(
            self.rect.pos.x,
            self.rect.pos.y + inset,
            self.rect.size.x,
            self.rect.size.y - inset,
        )
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    LifeToken,
}

/// A pickup entity. Stays in its level's list once collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub rect: Rect,
    pub collected: bool,
}

impl Collectible {
    pub fn coin(x: f32, y: f32) -> Self {
        Self {
            kind: CollectibleKind::Coin,
            rect: Rect::new(x, y, PICKUP_SIZE, PICKUP_SIZE),
            collected: false,
        }
    }

    pub fn life_token(x: f32, y: f32) -> Self {
        Self {
            kind: CollectibleKind::LifeToken,
            ..Self::coin(x, y)
        }
    }
}
