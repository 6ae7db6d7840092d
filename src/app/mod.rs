// Application layer: pipelines that wire the adapters to the normalization core.

pub mod pipelines;
pub mod runner;
