//! Polygon triangulation for glyph caps.
//!
//! Glyph outlines arrive as closed contours where solids and holes are
//! distinguished by containment parity. Holes are eliminated by
//! splicing a bridge to the enclosing ring, and the resulting simple
//! polygons are ear-clipped. Glyph contours are tiny (tens of points),
//! so the quadratic passes here are nowhere near a bottleneck.

use glam::Vec2;

const EPS: f32 = 1e-9;

/// Triangulate a set of closed contours into triangles over a shared
/// point list.
///
/// Returns the flattened point list (outer rings first, then holes, in
/// input order) and triangle index triples into it. Degenerate
/// contours (fewer than three points) are ignored.
#[must_use]
pub fn triangulate_contours(contours: &[Vec<Vec2>]) -> (Vec<Vec2>, Vec<u32>) {
    let contours: Vec<&Vec<Vec2>> =
        contours.iter().filter(|c| c.len() >= 3).collect();

    let mut points: Vec<Vec2> = Vec::new();
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for c in &contours {
        let start = points.len() as u32;
        points.extend_from_slice(c);
        ranges.push((start, points.len() as u32));
    }

    // Containment parity: even depth = solid ring, odd = hole
    let depth: Vec<usize> = contours
        .iter()
        .enumerate()
        .map(|(i, c)| {
            contours
                .iter()
                .enumerate()
                .filter(|&(j, other)| {
                    j != i && point_in_polygon(c[0], other)
                })
                .count()
        })
        .collect();

    let mut indices = Vec::new();
    for (i, c) in contours.iter().enumerate() {
        if depth[i] % 2 != 0 {
            continue;
        }
        // Holes directly inside this ring
        let holes: Vec<usize> = (0..contours.len())
            .filter(|&h| {
                depth[h] == depth[i] + 1
                    && point_in_polygon(contours[h][0], c)
            })
            .collect();

        let mut ring = oriented_ring(&points, ranges[i], true);
        let mut hole_rings: Vec<Vec<u32>> = holes
            .iter()
            .map(|&h| oriented_ring(&points, ranges[h], false))
            .collect();
        // Bridge right-most holes first so later bridges cannot cross
        hole_rings.sort_by(|a, b| {
            let ax = max_x(&points, a);
            let bx = max_x(&points, b);
            bx.total_cmp(&ax)
        });
        for hole in &hole_rings {
            ring = eliminate_hole(&points, &ring, hole);
        }

        ear_clip(&points, &ring, &mut indices);
    }

    (points, indices)
}

/// Total unsigned area covered by the triangles of a triangulation.
/// Exposed for tests and sanity checks.
#[must_use]
pub fn triangulation_area(points: &[Vec2], indices: &[u32]) -> f32 {
    indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            );
            cross(a, b, c).abs() * 0.5
        })
        .sum()
}

/// Twice the signed area of a closed index ring.
fn ring_area(points: &[Vec2], ring: &[u32]) -> f32 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let a = points[ring[i] as usize];
        let b = points[ring[(i + 1) % ring.len()] as usize];
        area += a.x * b.y - b.x * a.y;
    }
    area
}

/// Index ring for a contour range, oriented counter-clockwise for
/// solids and clockwise for holes.
fn oriented_ring(points: &[Vec2], range: (u32, u32), ccw: bool) -> Vec<u32> {
    let mut ring: Vec<u32> = (range.0..range.1).collect();
    let area = ring_area(points, &ring);
    if (area > 0.0) != ccw {
        ring.reverse();
    }
    ring
}

fn max_x(points: &[Vec2], ring: &[u32]) -> f32 {
    ring.iter()
        .map(|&i| points[i as usize].x)
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Cross product of (b−a) × (c−a).
fn cross(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Even-odd point-in-polygon test.
pub(crate) fn point_in_polygon(p: Vec2, poly: &[Vec2]) -> bool {
    let mut inside = false;
    let n = poly.len();
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y)
            && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Point strictly inside triangle test (barycentric sign checks).
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    (d1 > EPS && d2 > EPS && d3 > EPS)
        || (d1 < -EPS && d2 < -EPS && d3 < -EPS)
}

/// Whether `p` vetoes the candidate ear `(a, b, c)`: inside or on its
/// boundary, with corner-coincident points (bridge duplicates)
/// exempt. A reflex vertex lying exactly on the ear's chord must
/// block, otherwise the clipped triangle crosses the polygon boundary.
fn blocks_ear(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    if p == a || p == b || p == c {
        return false;
    }
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    (d1 >= -EPS && d2 >= -EPS && d3 >= -EPS)
        || (d1 <= EPS && d2 <= EPS && d3 <= EPS)
}

/// Proper segment intersection (shared endpoints do not count).
fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
}

/// Whether polygon vertex `ring[pi]` is visible from point `m` along a
/// bridge segment that stays inside the ring.
fn bridge_is_clear(points: &[Vec2], ring: &[u32], m: Vec2, pi: usize) -> bool {
    let p = points[ring[pi] as usize];
    for e in 0..ring.len() {
        let next = (e + 1) % ring.len();
        if e == pi || next == pi {
            continue;
        }
        let a = points[ring[e] as usize];
        let b = points[ring[next] as usize];
        if segments_cross(m, p, a, b) {
            return false;
        }
    }
    true
}

/// Splice a hole ring into the outer ring with a two-way bridge.
///
/// The bridge runs from the hole's right-most vertex to a visible
/// outer vertex to its right (falling back to the nearest vertex when
/// no strictly-rightward candidate is visible). Bridge endpoints are
/// duplicated, which ear clipping handles as zero-width walls.
fn eliminate_hole(points: &[Vec2], ring: &[u32], hole: &[u32]) -> Vec<u32> {
    // Right-most hole vertex
    let (hi, _) = hole.iter().enumerate().fold(
        (0, f32::NEG_INFINITY),
        |(best, best_x), (i, &idx)| {
            let x = points[idx as usize].x;
            if x > best_x {
                (i, x)
            } else {
                (best, best_x)
            }
        },
    );
    let m = points[hole[hi] as usize];

    // Candidate outer vertices, nearest first; prefer ones to the right
    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = points[ring[a] as usize].distance_squared(m);
        let db = points[ring[b] as usize].distance_squared(m);
        da.total_cmp(&db)
    });

    let bridge = candidates
        .iter()
        .copied()
        .find(|&pi| {
            points[ring[pi] as usize].x >= m.x
                && bridge_is_clear(points, ring, m, pi)
        })
        .or_else(|| {
            candidates
                .iter()
                .copied()
                .find(|&pi| bridge_is_clear(points, ring, m, pi))
        })
        .unwrap_or(0);

    // ring[..=bridge] + hole[hi..] + hole[..=hi] + ring[bridge..]
    let mut merged =
        Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=bridge]);
    merged.extend_from_slice(&hole[hi..]);
    merged.extend_from_slice(&hole[..=hi]);
    merged.extend_from_slice(&ring[bridge..]);
    merged
}

/// Ear-clip a counter-clockwise simple polygon (bridge duplicates
/// allowed) into `indices`.
fn ear_clip(points: &[Vec2], ring: &[u32], indices: &mut Vec<u32>) {
    let mut ring: Vec<u32> = ring.to_vec();

    while ring.len() > 3 {
        let n = ring.len();
        let mut clipped = false;

        for i in 0..n {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let (a, b, c) = (
                points[prev as usize],
                points[cur as usize],
                points[next as usize],
            );
            if cross(a, b, c) <= EPS {
                continue;
            }
            let blocked = ring.iter().any(|&other| {
                other != prev
                    && other != cur
                    && other != next
                    && blocks_ear(points[other as usize], a, b, c)
            });
            if blocked {
                continue;
            }
            indices.extend_from_slice(&[prev, cur, next]);
            let _ = ring.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            // Numerically stuck (collinear run or duplicate cluster):
            // drop the flattest vertex and keep going
            let mut flattest = 0;
            let mut flattest_cross = f32::INFINITY;
            for i in 0..ring.len() {
                let n = ring.len();
                let a = points[ring[(i + n - 1) % n] as usize];
                let b = points[ring[i] as usize];
                let c = points[ring[(i + 1) % n] as usize];
                let cr = cross(a, b, c).abs();
                if cr < flattest_cross {
                    flattest_cross = cr;
                    flattest = i;
                }
            }
            let _ = ring.remove(flattest);
        }
    }

    if ring.len() == 3 {
        let (a, b, c) = (
            points[ring[0] as usize],
            points[ring[1] as usize],
            points[ring[2] as usize],
        );
        if cross(a, b, c).abs() > EPS {
            indices.extend_from_slice(&ring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(origin: Vec2, size: f32) -> Vec<Vec2> {
        vec![
            origin,
            origin + Vec2::new(size, 0.0),
            origin + Vec2::new(size, size),
            origin + Vec2::new(0.0, size),
        ]
    }

    #[test]
    fn square_yields_two_triangles_of_full_area() {
        let contours = vec![square(Vec2::ZERO, 2.0)];
        let (points, indices) = triangulate_contours(&contours);
        assert_eq!(indices.len() / 3, 2);
        assert!((triangulation_area(&points, &indices) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn winding_does_not_matter_for_a_solid() {
        let mut reversed = square(Vec2::ZERO, 2.0);
        reversed.reverse();
        let (points, indices) = triangulate_contours(&[reversed]);
        assert!((triangulation_area(&points, &indices) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn concave_polygon_triangulates_fully() {
        // An L shape: 6 vertices, area 3
        let l_shape = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let (points, indices) = triangulate_contours(&[l_shape]);
        assert_eq!(indices.len() / 3, 4);
        assert!((triangulation_area(&points, &indices) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn concave_corner_on_a_chord_keeps_triangles_inside() {
        // The corner (1,1) lies exactly on the (0,2)-(2,0) diagonal,
        // so an ear test that only blocks on strictly interior points
        // clips a triangle that escapes past it
        let l_shape = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let (points, indices) = triangulate_contours(&[l_shape]);
        let outside = Vec2::new(1.2, 1.05);
        for t in indices.chunks_exact(3) {
            assert!(!point_in_triangle(
                outside,
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            ));
        }
        assert!((triangulation_area(&points, &indices) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn hole_area_is_subtracted() {
        let contours = vec![
            square(Vec2::ZERO, 4.0),
            square(Vec2::new(1.0, 1.0), 2.0),
        ];
        let (points, indices) = triangulate_contours(&contours);
        assert!(
            (triangulation_area(&points, &indices) - 12.0).abs() < 1e-4
        );
    }

    #[test]
    fn two_separate_solids_both_triangulate() {
        let contours = vec![
            square(Vec2::ZERO, 1.0),
            square(Vec2::new(5.0, 0.0), 1.0),
        ];
        let (points, indices) = triangulate_contours(&contours);
        assert!((triangulation_area(&points, &indices) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_contours_are_ignored() {
        let contours = vec![
            vec![Vec2::ZERO, Vec2::X],
            square(Vec2::ZERO, 1.0),
        ];
        let (points, indices) = triangulate_contours(&contours);
        assert!((triangulation_area(&points, &indices) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn no_triangle_lands_inside_the_hole() {
        let contours = vec![
            square(Vec2::ZERO, 4.0),
            square(Vec2::new(1.0, 1.0), 2.0),
        ];
        let (points, indices) = triangulate_contours(&contours);
        let hole_center = Vec2::new(2.0, 2.0);
        for t in indices.chunks_exact(3) {
            assert!(!point_in_triangle(
                hole_center,
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            ));
        }
    }
}
