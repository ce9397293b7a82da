//! Inbound transports feeding shared state.
//!
//! Two independent listeners run for the lifetime of the process: a UDP
//! socket for fire-and-forget readings and a TCP listener for reliable
//! alert submissions. Each feeds shared state directly; neither ever
//! holds a lock while waiting on the network.

pub mod alert;
pub mod metrics;

pub use alert::AlertReceiver;
pub use metrics::MetricsReceiver;
