pub mod message;
pub mod sender;

use crate::model::{Job, NotifyError};
use message::{At, FeedCard, FeedCardLink, Message};
use reqwest::Client;
use std::time::Duration;
use url::form_urlencoded;

const PLACEHOLDER_SIZE: u32 = 400;
const PLACEHOLDER_BACKGROUND: &str = "1ff22a";
const PLACEHOLDER_FOREGROUND: &str = "0011ff";

pub struct DingTalkNotifier {
    pub webhook_url: String,
    pub client: Client,
}

impl DingTalkNotifier {
    pub fn new(webhook_url: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { webhook_url, client })
    }

    /// Sends all jobs as a single feed card.
    pub async fn notify(&self, jobs: &[Job]) -> Result<(), NotifyError> {
        sender::send_message(self, &feed_card(jobs)).await
    }
}

/// One feed-card link per job, with everyone mentioned.
pub fn feed_card(jobs: &[Job]) -> Message {
    let links = jobs
        .iter()
        .map(|job| FeedCardLink {
            title: job.title.clone(),
            message_url: job.url.clone(),
            pic_url: placeholder_image(
                PLACEHOLDER_SIZE,
                PLACEHOLDER_SIZE,
                PLACEHOLDER_BACKGROUND,
                PLACEHOLDER_FOREGROUND,
                job.primary_category().unwrap_or_default(),
                "png",
            ),
        })
        .collect();

    Message {
        msgtype: "feedCard".to_string(),
        feed_card: Some(FeedCard { links }),
        at: Some(At { is_at_all: true }),
    }
}

/// dummyimage.com URL rendering `text` on a solid background.
pub fn placeholder_image(
    width: u32,
    height: u32,
    background: &str,
    foreground: &str,
    text: &str,
    format: &str,
) -> String {
    let text: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("https://dummyimage.com/{width}x{height}/{background}/{foreground}.{format}&text={text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, categories: &[&str]) -> Job {
        Job {
            url: format!("http://www.gaoxiaojob.com/{title}.html"),
            title: title.to_string(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn image_uses_primary_category() {
        let message = feed_card(&[job("a", &["Education", "Engineering"])]);
        let link = &message.feed_card.unwrap().links[0];

        assert_eq!(
            link.pic_url,
            "https://dummyimage.com/400x400/1ff22a/0011ff.png&text=Engineering"
        );
        assert_eq!(link.title, "a");
        assert_eq!(link.message_url, "http://www.gaoxiaojob.com/a.html");
    }

    #[test]
    fn image_text_is_query_escaped() {
        let url = placeholder_image(400, 400, "fff", "000", "高校 教师", "png");
        assert!(url.ends_with("&text=%E9%AB%98%E6%A0%A1+%E6%95%99%E5%B8%88"));
    }

    #[test]
    fn job_without_categories_gets_blank_image_text() {
        let message = feed_card(&[job("a", &[])]);
        assert!(message.feed_card.unwrap().links[0].pic_url.ends_with("&text="));
    }

    #[test]
    fn one_message_for_many_jobs() {
        let jobs: Vec<_> = (0..30).map(|i| job(&i.to_string(), &["x"])).collect();
        let message = feed_card(&jobs);

        assert_eq!(message.msgtype, "feedCard");
        assert_eq!(message.feed_card.unwrap().links.len(), 30);
        assert!(message.at.unwrap().is_at_all);
    }
}
