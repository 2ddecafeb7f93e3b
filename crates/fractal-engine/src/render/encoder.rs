//! Recording a `FramePlan` through a pass backend.

use super::params::{BlurParams, CompositeParams, FrameInputs, GenerateParams};
use super::plan::{Dispatch, FramePlan, Pass, Surface};

/// Backend that turns planned passes into work.
///
/// Calls arrive in plan order. Implementations must not reorder them and
/// must make each pass's writes visible to every later pass.
pub trait PassEncoder {
    /// Generation: overwrites albedo and primary height.
    fn generate(&mut self, params: &GenerateParams, dispatch: Dispatch);

    /// One blur axis: reads `src`, overwrites `dst`.
    fn blur(&mut self, params: &BlurParams, src: Surface, dst: Surface, dispatch: Dispatch);

    /// Composite: reads albedo and primary height, draws the framebuffer.
    fn composite(&mut self, params: &CompositeParams);
}

/// Builds each pass's parameter block from `inputs` and records the plan.
pub fn record<E>(plan: &FramePlan, inputs: &FrameInputs, encoder: &mut E)
where
    E: PassEncoder + ?Sized,
{
    let dispatch = plan.dispatch();

    for pass in plan.passes() {
        match *pass {
            Pass::Generate => encoder.generate(&GenerateParams::new(inputs), dispatch),
            Pass::Blur(axis) => {
                let params = BlurParams::new(axis, inputs.resolution);
                encoder.blur(&params, pass.reads()[0], pass.writes()[0], dispatch);
            }
            Pass::Composite => encoder.composite(&CompositeParams::new(inputs)),
        }
    }
}
