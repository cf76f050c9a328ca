// notifier/dingtalk/sender.rs

use crate::model::NotifyError;
use crate::notifier::dingtalk::DingTalkNotifier;
use crate::notifier::dingtalk::message::{Message, WebhookResponse};
use tracing::{info, warn};

/// Posts `message` to the webhook. Transport failures come back as-is,
/// a non-zero `errcode` as [`NotifyError::Api`].
pub async fn send_message(
    notifier: &DingTalkNotifier,
    message: &Message,
) -> Result<(), NotifyError> {
    let response = notifier
        .client
        .post(&notifier.webhook_url)
        .json(message)
        .send()
        .await
        .inspect_err(|e| warn!("DingTalk send() failed: {:?}", e))?;

    let status = response.status();
    let body: WebhookResponse = response.json().await?;
    check_response(body)?;
    info!("DingTalk message delivered [{}]", status);
    Ok(())
}

pub fn check_response(response: WebhookResponse) -> Result<(), NotifyError> {
    if response.error_code != 0 {
        warn!(
            "DingTalk rejected message [{}]: {}",
            response.error_code, response.error_message
        );
        return Err(NotifyError::Api {
            code: response.error_code,
            message: response.error_message,
        });
    }
    Ok(())
}
