use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::debug;

use crate::config::EditorConfig;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 助手面板的快捷建议
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub static SUGGESTIONS: [Suggestion; 5] = [
    Suggestion {
        label: "Auto-categorize emails",
        prompt: "Create automation to auto-categorize incoming emails based on content",
    },
    Suggestion {
        label: "Auto-assign to team members",
        prompt: "Build automation to assign conversations to specific team members",
    },
    Suggestion {
        label: "Send welcome emails",
        prompt: "Set up automation to send personalized welcome emails to new customers",
    },
    Suggestion {
        label: "Tag urgent conversations",
        prompt: "Create automation to identify and tag urgent support requests",
    },
    Suggestion {
        label: "Auto-respond to FAQs",
        prompt: "Build automation to detect and auto-respond to common questions",
    },
];

pub const CANNED_REPLY: &str =
    "I can help you with that. What specific part of the automation would you like assistance with?";

/// 对话能力
#[async_trait]
pub trait AssistChat: Send + Sync {
    async fn reply(&self, message: &str) -> Result<ChatMessage>;
}

/// 固定延迟后返回固定回复
#[derive(Clone, Debug)]
pub struct CannedAssistant {
    delay: Duration,
    reply: String,
}

impl CannedAssistant {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            reply: CANNED_REPLY.to_string(),
        }
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self::new(config.chat_delay())
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }
}

impl Default for CannedAssistant {
    fn default() -> Self {
        Self::with_config(&EditorConfig::default())
    }
}

#[async_trait]
impl AssistChat for CannedAssistant {
    async fn reply(&self, message: &str) -> Result<ChatMessage> {
        debug!(len = message.len(), "assistant received message");
        sleep(self.delay).await;
        Ok(ChatMessage::assistant(self.reply.clone()))
    }
}

/// 对话会话：保存历史，忽略空白输入
pub struct AssistSession<C> {
    chat: C,
    messages: Vec<ChatMessage>,
}

impl<C: AssistChat> AssistSession<C> {
    pub fn new(chat: C) -> Self {
        Self {
            chat,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 还没有消息时才显示建议
    pub fn suggestions(&self) -> &'static [Suggestion] {
        if self.messages.is_empty() {
            &SUGGESTIONS
        } else {
            &[]
        }
    }

    /// 发送一条消息并等待回复；空白消息返回 `None`
    pub async fn send(&mut self, text: &str) -> Result<Option<&ChatMessage>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.messages.push(ChatMessage::user(text));
        let reply = self.chat.reply(text).await?;
        self.messages.push(reply);
        Ok(self.messages.last())
    }

    pub async fn send_suggestion(&mut self, suggestion: &Suggestion) -> Result<Option<&ChatMessage>> {
        self.send(suggestion.prompt).await
    }
}
