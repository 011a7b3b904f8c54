//! Use cases
//!
//! One module per operation the coordinator exposes: session creation
//! (the invite dispatcher) and response submission (the response collector
//! plus decision evaluator).

pub mod create_session;
pub mod submit_response;
