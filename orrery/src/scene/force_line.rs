use crate::framework::math::{Rgba, Vec2, distance};
use crate::scene::planet::Planet;

/// Gravitational constant, for flavour only.
pub const G: f64 = 6.67430e-11;

/// Decorative segment between two planets. `strength` is never applied as
/// a force.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceLine {
    pub from: usize,
    pub to: usize,
    pub start: Vec2,
    pub end: Vec2,
    pub strength: f64,
    pub color: Rgba,
}

pub fn strength(a: &Planet, b: &Planet) -> f64 {
    let d = distance(a.position, b.position) as f64;
    if d <= f64::EPSILON {
        return 0.0;
    }
    G * a.radius as f64 * b.radius as f64 / (d * d)
}

/// One line per unordered pair, in `(0,1), (0,2), .., (1,2), ..` order.
pub fn connect(planets: &[Planet], color: Rgba) -> Vec<ForceLine> {
    let mut lines = Vec::with_capacity(
        planets.len() * planets.len().saturating_sub(1) / 2,
    );

    for (i, a) in planets.iter().enumerate() {
        for (j, b) in planets.iter().enumerate().skip(i + 1) {
            lines.push(ForceLine {
                from: i,
                to: j,
                start: a.position,
                end: b.position,
                strength: strength(a, b),
                color,
            });
        }
    }

    lines
}
