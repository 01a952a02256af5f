// Obstacle shapes and named map configurations
//
// Built-in maps are laid out for the classic 800x400 field and scaled to
// whatever field the match is played on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::centroid;

/// Reference field the built-in layouts are authored for
const REFERENCE_SIZE: Vec2 = Vec2::new(800.0, 400.0);

/// Static geometry the ball bounces off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Obstacle {
    Circle { center: Vec2, radius: f32 },
    /// Four vertices in order (clockwise or counter-clockwise)
    Rhombus { vertices: [Vec2; 4] },
    Rectangle { origin: Vec2, width: f32, height: f32 },
}

impl Obstacle {
    /// Rhombus centred on `center` with the given half-diagonals
    pub fn rhombus(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Obstacle::Rhombus {
            vertices: [
                center + Vec2::new(0.0, -half_height),
                center + Vec2::new(half_width, 0.0),
                center + Vec2::new(0.0, half_height),
                center + Vec2::new(-half_width, 0.0),
            ],
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Obstacle::Circle { center, .. } => *center,
            Obstacle::Rhombus { vertices } => centroid(vertices),
            Obstacle::Rectangle {
                origin,
                width,
                height,
            } => *origin + Vec2::new(*width, *height) * 0.5,
        }
    }

    /// Same obstacle stretched by `scale` on each axis
    pub fn scaled(&self, scale: Vec2) -> Self {
        match self {
            Obstacle::Circle { center, radius } => Obstacle::Circle {
                center: *center * scale,
                radius: radius * scale.min_element(),
            },
            Obstacle::Rhombus { vertices } => Obstacle::Rhombus {
                vertices: vertices.map(|v| v * scale),
            },
            Obstacle::Rectangle {
                origin,
                width,
                height,
            } => Obstacle::Rectangle {
                origin: *origin * scale,
                width: width * scale.x,
                height: height * scale.y,
            },
        }
    }
}

/// A named obstacle layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl MapConfig {
    pub fn empty() -> Self {
        Self {
            name: "classic".to_string(),
            obstacles: Vec::new(),
        }
    }

    /// Look up a built-in map by name
    pub fn builtin(name: &str) -> Option<Self> {
        let obstacles = match name {
            "classic" => Vec::new(),
            "pillars" => vec![
                Obstacle::Circle {
                    center: Vec2::new(400.0, 110.0),
                    radius: 28.0,
                },
                Obstacle::Circle {
                    center: Vec2::new(400.0, 290.0),
                    radius: 28.0,
                },
            ],
            "diamond" => vec![Obstacle::rhombus(Vec2::new(400.0, 200.0), 45.0, 70.0)],
            "blocks" => vec![
                Obstacle::Rectangle {
                    origin: Vec2::new(250.0, 60.0),
                    width: 24.0,
                    height: 80.0,
                },
                Obstacle::Rectangle {
                    origin: Vec2::new(526.0, 260.0),
                    width: 24.0,
                    height: 80.0,
                },
            ],
            "mixed" => vec![
                Obstacle::rhombus(Vec2::new(400.0, 200.0), 35.0, 50.0),
                Obstacle::Circle {
                    center: Vec2::new(230.0, 90.0),
                    radius: 20.0,
                },
                Obstacle::Circle {
                    center: Vec2::new(570.0, 310.0),
                    radius: 20.0,
                },
                Obstacle::Rectangle {
                    origin: Vec2::new(560.0, 70.0),
                    width: 40.0,
                    height: 20.0,
                },
                Obstacle::Rectangle {
                    origin: Vec2::new(200.0, 310.0),
                    width: 40.0,
                    height: 20.0,
                },
            ],
            _ => return None,
        };

        Some(Self {
            name: name.to_string(),
            obstacles,
        })
    }

    /// Names of all built-in maps, in menu order
    pub fn builtin_names() -> &'static [&'static str] {
        &["classic", "pillars", "diamond", "blocks", "mixed"]
    }

    /// Resolve a name against custom maps first, then the built-in ones.
    ///
    /// Custom maps are used as written; built-in layouts are authored for
    /// 800x400 and stretched to `field`.
    pub fn resolve(name: &str, custom: &[MapConfig], field: Vec2) -> Option<Self> {
        if let Some(map) = custom.iter().find(|m| m.name == name) {
            return Some(map.clone());
        }
        let map = Self::builtin(name)?;
        let scale = field / REFERENCE_SIZE;
        Some(Self {
            name: map.name,
            obstacles: map.obstacles.iter().map(|o| o.scaled(scale)).collect(),
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::empty()
    }
}
