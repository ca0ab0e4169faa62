//! Two-phase collision detection
//!
//! Broad phase rejects on world-space bounding boxes of the rotated sprites.
//! Narrow phase walks every integer pixel of the overlap, maps it back into
//! each sprite's texture through the inverse world transform and tests the
//! cached alpha masks. Cost scales with the overlap area, which stays small
//! for the sprite sizes involved.

use glam::Vec2;

use super::entity::Body;
use super::geom::Rect;
use crate::consts::ALPHA_THRESHOLD;

/// Bounding-box only test, for callers that do not need pixel accuracy
pub fn bounding_box_collision(a: &Body, b: &Body) -> bool {
    if !a.solid || !b.solid {
        return false;
    }
    a.global_bounds().intersects(&b.global_bounds())
}

/// Pixel-perfect collision between two bodies
pub fn collides(a: &Body, b: &Body) -> bool {
    if !a.solid || !b.solid {
        return false;
    }

    let Some(overlap) = a.global_bounds().intersection(&b.global_bounds()) else {
        return false;
    };

    pixels_overlap(a, b, &overlap)
}

fn pixels_overlap(a: &Body, b: &Body, overlap: &Rect) -> bool {
    let inv_a = a.transform().inverse();
    let inv_b = b.transform().inverse();
    let rect_a = a.sprite.sub_rect;
    let rect_b = b.sprite.sub_rect;

    let x0 = overlap.left.ceil() as i32;
    let y0 = overlap.top.ceil() as i32;
    let x1 = overlap.right();
    let y1 = overlap.bottom();

    let mut x = x0;
    while (x as f32) < x1 {
        let mut y = y0;
        while (y as f32) < y1 {
            let world = Vec2::new(x as f32, y as f32);

            let local_a = inv_a.transform_point2(world).floor();
            let local_b = inv_b.transform_point2(world).floor();
            let (ax, ay) = (local_a.x as i32 + rect_a.left, local_a.y as i32 + rect_a.top);
            let (bx, by) = (local_b.x as i32 + rect_b.left, local_b.y as i32 + rect_b.top);

            if rect_a.contains(ax, ay)
                && rect_b.contains(bx, by)
                && a.sprite.texture.alpha_at(ax, ay) > ALPHA_THRESHOLD
                && b.sprite.texture.alpha_at(bx, by) > ALPHA_THRESHOLD
            {
                return true;
            }
            y += 1;
        }
        x += 1;
    }

    false
}
