pub mod analysis;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod message;
pub mod notifier;
pub mod session;

#[cfg(test)]
mod tests;
