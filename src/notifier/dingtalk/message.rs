// DingTalk robot webhook payloads
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub msgtype: String,
    #[serde(rename = "feedCard", skip_serializing_if = "Option::is_none")]
    pub feed_card: Option<FeedCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<At>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedCard {
    pub links: Vec<FeedCardLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedCardLink {
    pub title: String,
    #[serde(rename = "messageURL")]
    pub message_url: String,
    #[serde(rename = "picURL")]
    pub pic_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct At {
    #[serde(rename = "isAtAll")]
    pub is_at_all: bool,
}

#[derive(Debug, Deserialize)]
pub struct WebhookResponse {
    #[serde(rename = "errcode", default)]
    pub error_code: i64,
    #[serde(rename = "errmsg", default)]
    pub error_message: String,
}
