use super::CoupletService;
use crate::models::{Couplet, PromptPair};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted reply for [`MockCoupletClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Couplet(Couplet),
    Configuration(String),
    UpstreamStatus(u16, String),
    InvalidCouplet(String),
}

impl MockReply {
    fn into_result(self) -> Result<Couplet> {
        match self {
            MockReply::Couplet(couplet) => Ok(couplet),
            MockReply::Configuration(msg) => Err(Error::Configuration(msg)),
            MockReply::UpstreamStatus(status, body) => Err(Error::UpstreamStatus { status, body }),
            MockReply::InvalidCouplet(content) => Err(Error::InvalidCouplet { content }),
        }
    }
}

pub struct MockCoupletClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<PromptPair>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockCoupletClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_couplet(self, couplet: Couplet) -> Self {
        self.with_reply(MockReply::Couplet(couplet))
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn received_prompts(&self) -> Vec<PromptPair> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockCoupletClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoupletService for MockCoupletClient {
    async fn generate_couplet(&self, prompts: &PromptPair) -> Result<Couplet> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompts.clone());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Default mock response
            Ok(Couplet {
                upper: "新开湖畔春风暖".to_string(),
                lower: "二食窗前笑语多".to_string(),
                horizontal: "万事顺遂".to_string(),
            })
        } else {
            let index = (*count - 1) % replies.len();
            replies[index].clone().into_result()
        }
    }
}
