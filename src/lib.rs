pub mod changes;
pub mod jobs;
pub mod pipeline;
pub mod snapshot;
pub mod tool;
