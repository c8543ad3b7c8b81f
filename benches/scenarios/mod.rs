//! Scenario benchmarks: whole voices and a session under load.

mod session;
mod voices;

pub use session::bench_session;
pub use voices::bench_voices;
