use std::f64::consts::{FRAC_PI_2, PI};

use chimney_types::Line;

use crate::outline::build_wall_outline;

/// Closed, counter-clockwise outline of one course.
///
/// The four walls are the `a` outline along the front, the `b` outline
/// turned a quarter at `(a, 0)`, the `a` outline turned a half at `(a, b)`
/// and the `b` outline turned three quarters at `(0, b)`. Each wall ends on
/// its own axis, so joins between walls are axis-aligned; the polygon closes
/// along `x = 0` back to the origin.
pub fn build_course_perimeter(a: f64, seq_a: &[u32], b: f64, seq_b: &[u32], e: f64) -> Line {
    let line_a = build_wall_outline(a, e, seq_a);
    let line_b = build_wall_outline(b, e, seq_b);

    let mut perimeter = line_a.clone();
    perimeter.extend_from(&line_b.transformed(FRAC_PI_2, a, 0.0));
    perimeter.extend_from(&line_a.transformed(PI, a, b));
    perimeter.extend_from(&line_b.transformed(3.0 * FRAC_PI_2, 0.0, b));
    perimeter
}
