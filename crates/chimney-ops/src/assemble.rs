use chimney_types::{Line, SketchPlane};
use csg_kernel::{GeometryError, GeometryKernel, SolidHandle};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::ChimneyConfig;
use crate::error::{ChimneyError, Stage, StageContext};
use crate::perimeter::build_course_perimeter;

/// Layout of one course: a brick slab with a thin mortar slab on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoursePlan {
    /// 1-based, counted downward from the cap.
    pub number: u32,
    /// Bottom of the brick slab, `−number · f`.
    pub z: f64,
    /// Outline of the brick slab, extruded up by `f − e`.
    pub perimeter: Line,
    /// Outline of the mortar slab, extruded up by `e` from `z + f − e`.
    pub gap: Line,
}

/// Rectangle inset by `e` from the footprint.
pub fn gap_outline(config: &ChimneyConfig) -> Line {
    let e = config.e();
    Line::rectangle(e, e, config.a() - e, config.b() - e)
}

/// Per-course layout, top course first.
pub fn plan_courses(config: &ChimneyConfig) -> Vec<CoursePlan> {
    let gap = gap_outline(config);
    (1..=config.count())
        .map(|number| {
            let pair = config.course(number as usize - 1);
            CoursePlan {
                number,
                z: -(number as f64) * config.f(),
                perimeter: build_course_perimeter(
                    config.a(),
                    &pair.a,
                    config.b(),
                    &pair.b,
                    config.e(),
                ),
                gap: gap.clone(),
            }
        })
        .collect()
}

fn build_course(
    kernel: &mut dyn GeometryKernel,
    plan: &CoursePlan,
    config: &ChimneyConfig,
) -> Result<SolidHandle, ChimneyError> {
    let stage = Stage::Course {
        number: plan.number,
    };
    let g = config.brick_height();
    let bricks = kernel
        .extrude(
            &plan.perimeter,
            &SketchPlane::horizontal(plan.z),
            [0.0, 0.0, g],
        )
        .at_stage(stage)?;
    let gap = kernel
        .extrude(
            &plan.gap,
            &SketchPlane::horizontal(plan.z + g),
            [0.0, 0.0, config.e()],
        )
        .at_stage(stage)?;
    kernel.union(bricks, gap).at_stage(stage)
}

/// Stack every course, union them top to bottom, and put the cap on top.
#[instrument(skip(kernel, config), fields(count = config.count()))]
pub fn assemble(
    kernel: &mut dyn GeometryKernel,
    config: &ChimneyConfig,
) -> Result<SolidHandle, ChimneyError> {
    let plans = plan_courses(config);
    let mut courses = Vec::with_capacity(plans.len());
    for plan in &plans {
        debug!(
            number = plan.number,
            z = plan.z,
            points = plan.perimeter.len(),
            "building course"
        );
        courses.push(build_course(kernel, plan, config)?);
    }

    let mut courses = courses.into_iter();
    // `count >= 1` is a configuration invariant.
    let Some(first) = courses.next() else {
        return Err(ChimneyError::Geometry {
            stage: Stage::CourseStack,
            source: GeometryError::EmptyResult {
                operation: "course stack".to_string(),
            },
        });
    };
    let stack = courses.try_fold(first, |acc, course| {
        kernel.union(acc, course).at_stage(Stage::CourseStack)
    })?;

    let cap = kernel
        .extrude(
            &Line::rectangle(0.0, 0.0, config.a(), config.b()),
            &SketchPlane::horizontal(0.0),
            [0.0, 0.0, config.h()],
        )
        .at_stage(Stage::Cap)?;
    let chimney = kernel.union(stack, cap).at_stage(Stage::Cap)?;
    info!(courses = plans.len(), "assembled course stack and cap");
    Ok(chimney)
}
