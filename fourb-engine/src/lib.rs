//! # 4B Biomechanical Scoring Engine
//!
//! Turns raw swing telemetry (body-pose sequences, bat-sensor readings,
//! ball-flight data) into the four normalized category scores (Brain,
//! Body, Bat, Ball), a composite score, a weakest-link diagnosis, and a
//! per-athlete predictive model relating sub-scores to bat speed.
//!
//! Every invocation is a stateless, synchronous computation over an
//! in-memory batch. Storage, transport, and auth belong to external
//! collaborators; the engine accepts their outputs as input and hands
//! durable records back through the traits in [`store`].

pub mod analysis;
pub mod cache;
pub mod error;
pub mod pipeline;
pub mod store;

pub use error::{EngineError, EngineResult};
pub use pipeline::{PipelineConfig, SessionOutcome, SessionPipeline, SwingInput};
