//! Collision detection and response for balls against pegs and walls
//!
//! Circle-vs-circle tests against the peg field, penetration resolution
//! along the contact normal, and reflection with restitution. A bounded
//! random horizontal perturbation is folded into every peg bounce so that
//! balls spawned at similar positions fan out instead of tracing identical
//! paths.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::consts::MIN_COLLISION_DIST;
use crate::sim::board::Peg;
use crate::sim::state::Ball;

/// An overlap between a ball and a peg.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Index of the peg in the board's peg list.
    pub peg: usize,
    /// Unit normal from peg center toward ball center.
    pub normal: Vec2,
    /// Overlap depth along the normal.
    pub penetration: f32,
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Test a ball against one peg.
///
/// Returns `None` when there is no overlap, or when the centers are so
/// close that no collision normal can be formed; the overlap is left for
/// the next tick rather than normalizing a degenerate vector.
pub fn peg_contact(ball: &Ball, peg: &Peg, index: usize) -> Option<Contact> {
    let delta = ball.pos - peg.pos;
    let dist = delta.length();
    if dist < MIN_COLLISION_DIST {
        return None;
    }
    let penetration = ball.radius + peg.radius - dist;
    if penetration <= 0.0 {
        return None;
    }
    Some(Contact {
        peg: index,
        normal: delta / dist,
        penetration,
    })
}

/// Resolve a ball against every peg it overlaps this tick.
///
/// Contacts are resolved deepest penetration first; each remaining peg is
/// re-tested against the corrected position before its turn, with at most
/// one resolution per peg per tick. This is a discrete approximation, not
/// continuous collision detection, an accepted trade-off for a large,
/// frequently-changing live set.
///
/// Returns the indices of pegs actually struck.
pub fn resolve_peg_collisions(
    ball: &mut Ball,
    pegs: &[Peg],
    cfg: &GameConfig,
    rng: &mut Pcg32,
) -> Vec<usize> {
    let mut contacts: Vec<Contact> = pegs
        .iter()
        .enumerate()
        .filter_map(|(i, peg)| peg_contact(ball, peg, i))
        .collect();
    if contacts.is_empty() {
        return Vec::new();
    }
    contacts.sort_by(|a, b| b.penetration.total_cmp(&a.penetration));

    let mut hit = Vec::with_capacity(contacts.len());
    for contact in contacts {
        // The ball moved while resolving earlier contacts; re-test.
        let Some(current) = peg_contact(ball, &pegs[contact.peg], contact.peg) else {
            continue;
        };
        ball.pos += current.normal * current.penetration;
        // Only reflect if moving toward the surface.
        if ball.vel.dot(current.normal) < 0.0 {
            ball.vel = reflect(ball.vel, current.normal) * cfg.restitution;
        }
        ball.vel.x += rng.random_range(-cfg.perturbation..=cfg.perturbation);
        hit.push(contact.peg);
    }
    hit
}

/// Keep the ball inside the side walls, damping the horizontal velocity on
/// contact. Returns true if a wall was hit.
pub fn clamp_to_walls(ball: &mut Ball, left: f32, right: f32, restitution: f32) -> bool {
    if ball.pos.x - ball.radius < left {
        ball.pos.x = left + ball.radius;
        if ball.vel.x < 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
        }
        true
    } else if ball.pos.x + ball.radius > right {
        ball.pos.x = right - ball.radius;
        if ball.vel.x > 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
        }
        true
    } else {
        false
    }
}
