pub mod agents;
pub mod alerts;
pub mod health;
pub mod history;
pub mod stats;
