pub mod config;
pub mod error;
pub mod logging;

pub mod analyzer;
pub mod catalog;
pub mod controller;
pub mod counter;
pub mod filter;
pub mod history;
pub mod http;
pub mod interaction;
pub mod rate_limit;
pub mod report;
pub mod retry;
pub mod rules;
pub mod selector;
pub mod store;
pub mod validator;

#[cfg(test)]
mod testing;
