//! Grocer application services.
//!
//! Persistence, order submission and payment polling around the `grocer`
//! pricing engine.

pub mod context;
pub mod dispatch;
pub mod gateway;
pub mod last_order;
pub mod payments;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test;
