#![forbid(unsafe_code)]

pub mod analyze;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod gallery;
pub mod locale;
pub mod logging;
pub mod message;
pub mod page;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod run;
