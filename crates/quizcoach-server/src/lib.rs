//! quizcoach-server — the HTTP layer over the feedback pipeline.

pub mod routes;
pub mod state;
pub mod store;
