use chimney_types::CoursePair;
use serde::{Deserialize, Serialize};

use crate::error::{Axis, ConfigurationError};

/// Brick widths a sequence may contain, in modules.
pub const ALLOWED_WIDTHS: [u32; 3] = [2, 3, 4];

/// Modules per wall, shared by every course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCounts {
    pub a: u32,
    pub b: u32,
}

impl ModuleCounts {
    pub fn along(&self, axis: Axis) -> u32 {
        match axis {
            Axis::A => self.a,
            Axis::B => self.b,
        }
    }
}

fn axis_entries(pair: &CoursePair) -> [(Axis, &[u32]); 2] {
    [(Axis::A, &pair.a[..]), (Axis::B, &pair.b[..])]
}

/// Check the course table for allowed brick widths and rectangular consistency.
///
/// Every pair must add up to the same number of modules on each axis so that
/// courses line up. Returns those common totals.
pub fn validate_sequences(seqs: &[CoursePair]) -> Result<ModuleCounts, ConfigurationError> {
    let first = seqs.first().ok_or(ConfigurationError::NoCourses)?;

    for (pair, course) in seqs.iter().enumerate() {
        for (axis, seq) in axis_entries(course) {
            if seq.is_empty() {
                return Err(ConfigurationError::EmptySequence { pair, axis });
            }
        }
    }

    for (pair, course) in seqs.iter().enumerate() {
        for (axis, seq) in axis_entries(course) {
            if let Some(&width) = seq.iter().find(|w| !ALLOWED_WIDTHS.contains(*w)) {
                return Err(ConfigurationError::BrickWidth { pair, axis, width });
            }
        }
    }

    let counts = ModuleCounts {
        a: first.modules_a(),
        b: first.modules_b(),
    };
    for axis in [Axis::A, Axis::B] {
        let expected = counts.along(axis);
        for (pair, course) in seqs.iter().enumerate() {
            let found = match axis {
                Axis::A => course.modules_a(),
                Axis::B => course.modules_b(),
            };
            if found != expected {
                return Err(ConfigurationError::Rectangularity {
                    pair,
                    axis,
                    expected,
                    found,
                });
            }
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> Vec<CoursePair> {
        vec![
            CoursePair::new([2, 2, 2, 2], [3, 4, 2, 3]),
            CoursePair::new([3, 2, 3], [2, 2, 2, 2, 2, 2]),
        ]
    }

    #[test]
    fn accepts_consistent_table() {
        assert_eq!(
            validate_sequences(&scenario_a()),
            Ok(ModuleCounts { a: 8, b: 12 })
        );
    }

    #[test]
    fn rejects_width_five() {
        let mut seqs = scenario_a();
        seqs[1].a = vec![5, 3];
        assert_eq!(
            validate_sequences(&seqs),
            Err(ConfigurationError::BrickWidth {
                pair: 1,
                axis: Axis::A,
                width: 5
            })
        );
    }

    #[test]
    fn names_mismatched_pair() {
        let mut seqs = scenario_a();
        seqs.push(CoursePair::new([4, 4], [3, 3, 3, 2]));
        assert_eq!(
            validate_sequences(&seqs),
            Err(ConfigurationError::Rectangularity {
                pair: 2,
                axis: Axis::B,
                expected: 12,
                found: 11
            })
        );
    }

    #[test]
    fn width_check_runs_before_sums() {
        let seqs = vec![
            CoursePair::new([2, 2], [2, 2]),
            CoursePair::new([2, 2, 2], [1, 3]),
        ];
        assert!(matches!(
            validate_sequences(&seqs),
            Err(ConfigurationError::BrickWidth { pair: 1, .. })
        ));
    }

    #[test]
    fn rejects_empty_tables() {
        assert_eq!(validate_sequences(&[]), Err(ConfigurationError::NoCourses));
        let seqs = vec![CoursePair::new([2, 2], Vec::<u32>::new())];
        assert_eq!(
            validate_sequences(&seqs),
            Err(ConfigurationError::EmptySequence {
                pair: 0,
                axis: Axis::B
            })
        );
    }
}
