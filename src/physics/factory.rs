//! Body factories (`spec.md` §6). Thin glue over `Body::new`, but their exact
//! signatures are part of the documented external interface, so they're
//! built out in full rather than left for callers to reimplement.

use anyhow::Result;
use std::f64::consts::PI;

use super::body::{Body, BodyOptions};
use super::vector::Vector;

/// Axis-aligned rectangle. Vertices are centered on `(x + w/2, y + h/2)`.
pub fn rect(x: f64, y: f64, w: f64, h: f64, opts: Option<BodyOptions>) -> Result<Body> {
    let hw = w / 2.0;
    let hh = h / 2.0;
    let mut opts = opts.unwrap_or_default();
    opts.vertices = vec![
        Vector::new(-hw, -hh),
        Vector::new(hw, -hh),
        Vector::new(hw, hh),
        Vector::new(-hw, hh),
    ];
    opts.position = Vector::new(x + hw, y + hh);
    Body::new(opts)
}

/// A rectangular line segment from `(x1, y1)` to `(x2, y2)`, `width` wide,
/// oriented along the segment. `flip` mirrors the segment's perpendicular
/// offset (which side the width grows toward).
pub fn line(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    flip: bool,
    opts: Option<BodyOptions>,
) -> Result<Body> {
    let p1 = Vector::new(x1, y1);
    let p2 = Vector::new(x2, y2);
    let delta = p2 - p1;
    let length = delta.magnitude();
    let angle = delta.y.atan2(delta.x);
    let hw = length / 2.0;
    let hh = width / 2.0;

    let mut local = vec![
        Vector::new(-hw, -hh),
        Vector::new(hw, -hh),
        Vector::new(hw, hh),
        Vector::new(-hw, hh),
    ];
    if flip {
        for v in local.iter_mut() {
            v.y = -v.y;
        }
    }

    let mut opts = opts.unwrap_or_default();
    opts.vertices = local;
    opts.position = (p1 + p2) * 0.5;
    opts.angle = angle;
    Body::new(opts)
}

/// A circle approximated by a regular 20-gon, as `spec.md` §1/§6 require
/// (circles never get their own narrow-phase code path).
pub fn circle(x: f64, y: f64, r: f64, opts: Option<BodyOptions>) -> Result<Body> {
    const SIDES: usize = 20;
    let vertices: Vec<Vector> = (0..SIDES)
        .map(|i| {
            let theta = 2.0 * PI * (i as f64) / (SIDES as f64);
            Vector::new(r * theta.cos(), r * theta.sin())
        })
        .collect();

    let mut opts = opts.unwrap_or_default();
    opts.vertices = vertices;
    opts.position = Vector::new(x, y);
    Body::new(opts)
}

/// Four static rectangles enclosing an `(x, y, w, h)` interior, `wall_width`
/// thick. `opts` seeds every wall's options (`is_static` is always forced
/// to `true` regardless of what's passed in — a cage with a dynamic wall
/// isn't a cage).
pub fn cage(
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    wall_width: f64,
    opts: Option<BodyOptions>,
) -> Result<Vec<Body>> {
    let base = opts.unwrap_or_default();
    let wall = |vx: f64, vy: f64, vw: f64, vh: f64| -> Result<Body> {
        let mut o = base.clone();
        o.is_static = true;
        rect(vx, vy, vw, vh, Some(o))
    };

    Ok(vec![
        wall(x - wall_width, y - wall_width, w + 2.0 * wall_width, wall_width)?,
        wall(x - wall_width, y + h, w + 2.0 * wall_width, wall_width)?,
        wall(x - wall_width, y, wall_width, h)?,
        wall(x + w, y, wall_width, h)?,
    ])
}

/// Grid placement driven by each created body's own AABB extent: `cols` x
/// `rows` bodies, each produced by `body_creator(x, y, col, row)`, packed
/// edge-to-edge rather than on a fixed-size cell grid.
pub fn stack(
    x: f64,
    y: f64,
    cols: usize,
    rows: usize,
    mut body_creator: impl FnMut(f64, f64, usize, usize) -> Result<Body>,
) -> Result<Vec<Body>> {
    let mut bodies = Vec::with_capacity(cols * rows);
    let mut cursor_y = y;

    for row in 0..rows {
        let mut cursor_x = x;
        let mut row_height: f64 = 0.0;

        for col in 0..cols {
            let body = body_creator(cursor_x, cursor_y, col, row)?;
            let width = body.bounds.max.x - body.bounds.min.x;
            let height = body.bounds.max.y - body.bounds.min.y;
            cursor_x += width;
            row_height = row_height.max(height);
            bodies.push(body);
        }

        cursor_y += row_height;
    }

    Ok(bodies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_centered_on_x_plus_half_w() {
        let body = rect(0.0, 0.0, 10.0, 20.0, None).unwrap();
        assert!((body.position.x - 5.0).abs() < 1e-9);
        assert!((body.position.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn circle_is_a_twenty_gon() {
        let body = circle(0.0, 0.0, 5.0, None).unwrap();
        assert_eq!(body.vertices.len(), 20);
        for v in &body.vertices {
            assert!((v.magnitude() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn line_has_the_requested_length() {
        let body = line(0.0, 0.0, 10.0, 0.0, 2.0, false, None).unwrap();
        let xs: Vec<f64> = body.vertices.iter().map(|v| v.x).collect();
        let span = xs.iter().cloned().fold(f64::MIN, f64::max)
            - xs.iter().cloned().fold(f64::MAX, f64::min);
        assert!((span - 10.0).abs() < 1e-9);
    }

    #[test]
    fn cage_produces_four_static_walls() {
        let walls = cage(0.0, 0.0, 100.0, 100.0, 10.0, None).unwrap();
        assert_eq!(walls.len(), 4);
        assert!(walls.iter().all(|w| w.is_static));
    }

    #[test]
    fn stack_packs_bodies_edge_to_edge_by_row() {
        let bodies = stack(0.0, 0.0, 3, 2, |x, y, _col, _row| rect(x, y, 10.0, 10.0, None)).unwrap();
        assert_eq!(bodies.len(), 6);
        assert!((bodies[0].position.x - 5.0).abs() < 1e-9);
        assert!((bodies[1].position.x - 15.0).abs() < 1e-9);
        assert!((bodies[2].position.x - 25.0).abs() < 1e-9);
        assert!((bodies[3].position.y - 15.0).abs() < 1e-9);
    }
}
