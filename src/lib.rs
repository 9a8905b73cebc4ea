//! Couplet generator - serves a web page and a JSON endpoint that turns two
//! keywords into a themed Spring Festival couplet
//!
//! Keywords are rendered into a fixed prompt, sent to the DeepSeek
//! chat-completion API, and the nested JSON reply is validated before it is
//! returned as `{ upper, lower, horizontal }`.

pub mod ai;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{Error, ErrorKind, Result};
