pub mod api;
pub mod autocomplete;
pub mod config;
pub mod draft;
pub mod errors;
pub mod init;
pub mod logging;
pub mod session;
pub mod ui;
pub mod upload;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;
