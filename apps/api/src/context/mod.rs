// Comprehensive context: aggregation from the store and rendering into the
// system prompt. Aggregation does I/O; composition is pure.

pub mod aggregator;
pub mod composer;
pub mod handlers;
pub mod tables;
