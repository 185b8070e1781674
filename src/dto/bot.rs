use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::BotButton;

pub const WELCOME_MESSAGE_KEY: &str = "welcome_message";
pub const SITE_ABOUT_KEY: &str = "site_about";
pub const DEFAULT_BECOME_SELLER_TITLE: &str = "Sotuvchi bo'lish";

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct BecomeSellerPage {
    pub title: String,
    pub content: String,
}

impl BecomeSellerPage {
    /// First line is the title, the rest (trimmed) is the content.
    pub fn from_text(text: &str) -> Self {
        let mut lines = text.split('\n');
        let title = lines
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_BECOME_SELLER_TITLE)
            .to_string();
        let content = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        Self { title, content }
    }

    /// Editable form shown to admins, the inverse of `from_text`.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.content)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BotOverview {
    pub welcome_message: String,
    pub buttons: Vec<BotButton>,
    pub site_about: String,
    pub become_seller: BecomeSellerPage,
    /// `become_seller` joined back into the single text the admin edits.
    pub become_seller_text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveWelcomeMessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveResponseRequest {
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBotButtonRequest {
    pub text: String,
    pub action: Option<String>,
    pub order_index: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBotButtonRequest {
    pub text: Option<String>,
    pub action: Option<String>,
    pub order_index: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct BotButtonList {
    #[schema(value_type = Vec<BotButton>)]
    pub items: Vec<BotButton>,
}
