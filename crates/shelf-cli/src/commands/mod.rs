pub mod add;
pub mod auth;
pub mod common;
pub mod completions;
pub mod config_cmd;
pub mod edit;
pub mod install;
pub mod list;
pub mod menu;
pub mod pull;
pub mod push;
pub mod remove;
pub mod run;
pub mod source_cmd;
pub mod sync;
