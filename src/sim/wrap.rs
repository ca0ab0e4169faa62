//! Toroidal screen wrapping
//!
//! An entity becomes bound the first tick its whole sprite is inside the
//! view and never unbinds. A bound entity whose sprite crosses an edge is
//! drawn a second time one view-width (or height) away; once its centre has
//! left the view it is moved onto that ghost.

use glam::Vec2;

use super::entity::Body;
use super::geom::Rect;

/// True when the entity's bounds lie completely within the view
pub fn is_fully_inside(body: &Body, view: &Rect) -> bool {
    let bounds = Rect::centered(body.pos, body.global_bounds().size());
    view.contains_rect(&bounds)
}

/// Flip `unbound -> bound` when the entity is fully visible
///
/// Returns true only on the tick the transition happens.
pub fn assign_bounds(body: &mut Body, view: &Rect) -> bool {
    if body.bounds_assigned || !is_fully_inside(body, view) {
        return false;
    }
    body.bounds_assigned = true;
    true
}

/// Per-axis offset to the opposite side for a sprite crossing an edge
fn seam_offset(body: &Body, view: &Rect) -> Vec2 {
    let half = body.global_bounds().size() / 2.0;
    let center = body.pos;

    let dx = if center.x - half.x < view.left {
        view.width
    } else if center.x + half.x > view.right() {
        -view.width
    } else {
        0.0
    };

    let dy = if center.y - half.y < view.top {
        view.height
    } else if center.y + half.y > view.bottom() {
        -view.height
    } else {
        0.0
    };

    Vec2::new(dx, dy)
}

/// Positions of the ghost copies for a bound entity straddling an edge
///
/// One ghost per crossed axis, plus the diagonal copy at a corner.
pub fn ghost_positions(body: &Body, view: Option<&Rect>) -> Vec<Vec2> {
    let Some(view) = view else {
        return Vec::new();
    };
    if !body.bounds_assigned {
        return Vec::new();
    }

    let offset = seam_offset(body, view);
    let mut ghosts = Vec::with_capacity(3);
    if offset.x != 0.0 {
        ghosts.push(body.pos + Vec2::new(offset.x, 0.0));
    }
    if offset.y != 0.0 {
        ghosts.push(body.pos + Vec2::new(0.0, offset.y));
    }
    if offset.x != 0.0 && offset.y != 0.0 {
        ghosts.push(body.pos + offset);
    }
    ghosts
}

/// Teleport a bound entity onto its ghost once its centre is outside the view
///
/// Returns true if the entity was moved.
pub fn apply_wrap(body: &mut Body, view: Option<&Rect>) -> bool {
    let Some(view) = view else {
        return false;
    };
    if !body.bounds_assigned {
        return false;
    }

    if view.contains_closed(body.pos) {
        return false;
    }

    body.pos += seam_offset(body, view);
    true
}
