//! Named chimney configurations used across scenarios and the sample generator.

use std::f64::consts::FRAC_PI_4;

use chimney_types::{ChimneyParams, CoursePair};

/// The three reference chimneys: a square stack with two flues, a narrow
/// stack with three, and a wide stack with three flues side by side.
pub fn sample_configurations() -> Vec<ChimneyParams> {
    vec![
        ChimneyParams::new(
            4.3333,
            6.5,
            6.916667,
            18,
            vec![
                CoursePair::new([2, 2, 2, 2], [3, 4, 2, 3]),
                CoursePair::new([3, 2, 3], [2, 2, 2, 2, 2, 2]),
                CoursePair::new([2, 2, 2, 2], [3, 2, 4, 3]),
                CoursePair::new([3, 2, 3], [2, 2, 2, 2, 2, 2]),
            ],
        )
        .with_divisions(1, 2)
        .with_roof(FRAC_PI_4, 4.3333),
        ChimneyParams::new(
            3.25,
            8.6666,
            4.875,
            13,
            vec![
                CoursePair::new([3, 3], [2, 2, 2, 2, 2, 2, 2, 2]),
                CoursePair::new([2, 2, 2], [3, 4, 4, 2, 3]),
                CoursePair::new([3, 3], [2, 2, 2, 2, 2, 2, 2, 2]),
                CoursePair::new([2, 2, 2], [3, 2, 4, 4, 3]),
            ],
        )
        .with_divisions(1, 3)
        .with_roof(FRAC_PI_4, 3.25),
        ChimneyParams::new(
            10.8333,
            4.3333,
            1.75,
            15,
            vec![
                CoursePair::new([3, 4, 4, 4, 2, 3], [2, 2, 2, 2]),
                CoursePair::new([2, 2, 2, 2, 2, 2, 2, 2, 2, 2], [3, 2, 3]),
                CoursePair::new([3, 2, 4, 4, 4, 3], [2, 2, 2, 2]),
                CoursePair::new([2, 2, 2, 2, 2, 2, 2, 2, 2, 2], [3, 2, 3]),
            ],
        )
        .with_divisions(3, 1)
        .with_roof(FRAC_PI_4, 7.583333),
    ]
}

/// Two alternating courses under a cap.
pub fn scenario_a() -> ChimneyParams {
    ChimneyParams::new(
        4.3333,
        6.5,
        6.916667,
        2,
        vec![
            CoursePair::new([2, 2, 2, 2], [3, 4, 2, 3]),
            CoursePair::new([3, 2, 3], [2, 2, 2, 2, 2, 2]),
        ],
    )
}

/// The first sample: two flues across `b`, eighteen courses.
pub fn scenario_b() -> ChimneyParams {
    sample_configurations().swap_remove(0)
}

/// Four courses with the ridge over the middle of the footprint, so the
/// roof line crosses both `b` walls inside the stack.
pub fn short_stack() -> ChimneyParams {
    ChimneyParams::new(
        4.3333,
        6.5,
        1.0,
        4,
        vec![
            CoursePair::new([2, 2, 2, 2], [3, 4, 2, 3]),
            CoursePair::new([3, 2, 3], [2, 2, 2, 2, 2, 2]),
        ],
    )
    .with_divisions(1, 2)
    .with_roof(FRAC_PI_4, 4.3333 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chimney_ops::ChimneyConfig;

    #[test]
    fn every_fixture_validates() {
        let mut all = sample_configurations();
        all.extend([scenario_a(), scenario_b(), short_stack()]);
        for (i, params) in all.into_iter().enumerate() {
            assert!(ChimneyConfig::new(params).is_ok(), "fixture {}", i);
        }
    }

    #[test]
    fn scenario_b_is_the_first_sample() {
        let b = scenario_b();
        assert_eq!((b.div_a, b.div_b, b.count), (1, 2, 18));
    }
}
