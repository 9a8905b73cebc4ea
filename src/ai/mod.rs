//! Upstream model integration for couplet generation
//!
//! The dispatcher depends on [`CoupletService`] only; the DeepSeek client is
//! the production implementation and [`MockCoupletClient`] backs tests.

pub mod deepseek;
pub mod mock;

pub use deepseek::DeepSeekCoupletClient;
pub use mock::MockCoupletClient;

use crate::models::{Couplet, PromptPair};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CoupletService: Send + Sync {
    /// Perform one completion for the rendered prompts and return a validated couplet.
    async fn generate_couplet(&self, prompts: &PromptPair) -> Result<Couplet>;
}
