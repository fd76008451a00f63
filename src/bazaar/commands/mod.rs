use crate::config::{MarketConfig, PromotionQuote};
use crate::model::{Category, Listing};

pub mod admin;
pub mod category;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod moderate;
pub mod promote;
pub mod purge;
pub mod restore;
pub mod search;
pub mod submit;
pub mod template;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured result every command returns. The CLI (or any other client)
/// turns this into output; commands themselves never print.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_listings: Vec<Listing>,
    pub listed_listings: Vec<Listing>,
    pub categories: Vec<Category>,
    pub quote: Option<PromotionQuote>,
    pub config: Option<MarketConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_listings(mut self, listings: Vec<Listing>) -> Self {
        self.affected_listings = listings;
        self
    }

    pub fn with_listed_listings(mut self, listings: Vec<Listing>) -> Self {
        self.listed_listings = listings;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_quote(mut self, quote: PromotionQuote) -> Self {
        self.quote = Some(quote);
        self
    }
}
