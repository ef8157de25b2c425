use parking_lot::RwLock;
use std::sync::Arc;

use crate::simulation::{RenderState, SimulationController};

/// The one controller instance, shared by the drive task and the render loop.
/// Every access goes through the lock, which serializes ticks and resets.
pub type Blackboard = Arc<RwLock<SimulationController>>;

pub fn new_blackboard(controller: SimulationController) -> Blackboard {
    Arc::new(RwLock::new(controller))
}

pub fn snapshot(bb: &Blackboard) -> RenderState {
    bb.read().render_state()
}

pub fn reset(bb: &Blackboard) {
    bb.write().reset();
}
