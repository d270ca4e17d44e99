// Application layer: pipelines wiring the core to storage and remote sources.

pub mod pipelines;
