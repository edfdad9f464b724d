// Application layer: the concrete pipeline and the console report built on top of core.

pub mod pipelines;
pub mod report;
