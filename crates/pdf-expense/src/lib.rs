mod assemble;
pub mod constants;
pub mod format;
mod logos;
pub mod merge;
pub mod metrics;
mod options;
mod ordering;
pub mod recap;
pub mod render;
mod session;
mod types;

pub use assemble::{GenerationStep, generate, generate_with_progress};
pub use merge::{AppendOutcome, ImagePlacement, append_attachment, append_bytes, fit_image};
pub use options::*;
pub use ordering::order_attachments;
pub use recap::{RecapDocument, build_recap, plan_pages};
pub use session::ReportSession;
pub use types::*;
