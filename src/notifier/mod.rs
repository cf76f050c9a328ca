pub mod dingtalk;

pub use dingtalk::DingTalkNotifier;
