use chimney_types::{Line, Point2};

/// Zig-zag outline of one wall of a course.
///
/// The wall of length `w` is divided into `sum(seq)` modules of width
/// `(w + e) / sum(seq)`. Each brick leaves an `e × e` mortar notch at its
/// far end. The notch of the last brick is dropped, so the outline ends on
/// the wall axis at the start of the last brick and has `4·len(seq) − 3`
/// points.
pub fn build_wall_outline(w: f64, e: f64, seq: &[u32]) -> Line {
    let modules: u32 = seq.iter().sum();
    if modules == 0 {
        return Line::default();
    }
    let x = (w + e) / modules as f64;

    let mut line = Line::default();
    let mut start = 0.0;
    for &count in seq {
        let len = count as f64 * x;
        line.push(Point2::new(start, 0.0));
        line.push(Point2::new(start + len - e, 0.0));
        line.push(Point2::new(start + len - e, e));
        line.push(Point2::new(start + len, e));
        start += len;
    }
    line.truncate_tail(3);
    line
}
