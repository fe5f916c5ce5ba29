// Engine module - pure pipeline stages between raw lines and artifacts.
// No I/O and no async here; the runtime layer owns files and the model call.

pub mod aggregate;
pub mod exceptions;
pub mod parser;
pub mod report;
pub mod signature;
pub mod validate;

pub use aggregate::Aggregator;
pub use parser::parse_line;
pub use report::{build_report, render_markdown};
pub use signature::{Normalizer, SignatureConfig};
pub use validate::validate;
