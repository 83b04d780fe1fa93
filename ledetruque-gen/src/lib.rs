pub mod block;
pub mod history;
pub mod metrics;
pub mod popularity;
pub mod sampler;
pub mod simulate;
pub mod weights;

pub use block::{generate_block, GenerationContext, Strategy};
pub use simulate::{simulate, ReferenceSource, SimulationReport};
