use crate::mirror::classify::MessageKind;
use crate::transport::Transport;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::time::Duration;
use tracing::{error, info};

/// Counts from one completed fan-out round.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryStats {
    pub success: usize,
    pub failure: usize,
    pub total: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Complete,
    Partial,
    Failed,
}

impl Verdict {
    pub fn from_counts(success: usize, total: usize) -> Self {
        if success == 0 {
            Self::Failed
        } else if success >= total {
            Self::Complete
        } else {
            Self::Partial
        }
    }

    fn line(self) -> &'static str {
        match self {
            Self::Complete => "🎯 The message was copied to all groups!",
            Self::Partial => "⚠️ The message was copied partially",
            Self::Failed => "🚨 Failed to copy the message",
        }
    }
}

/// Render the delivery report posted back to the source group.
pub fn compose_summary<Tz>(
    sender: &str,
    kind: MessageKind,
    stats: DeliveryStats,
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut text = format!(
        "📊 *Message sync report*\n\n\
         👤 Sender: {}\n\
         📝 Message type: {}\n\
         ✅ Copied successfully: {}/{} groups\n",
        sender, kind, stats.success, stats.total
    );
    if stats.failure > 0 {
        text.push_str(&format!("❌ Failures: {}\n", stats.failure));
    }
    text.push_str(&format!(
        "⏱️ Total time (sending only): {} seconds\n\
         🕐 Time: {}\n\n",
        stats.elapsed.as_secs_f64().round() as u64,
        now.format("%H:%M:%S")
    ));
    text.push_str(Verdict::from_counts(stats.success, stats.total).line());
    text
}

/// Post the report into `chat_id`. A failed post is logged, never raised.
pub async fn post_summary(transport: &dyn Transport, chat_id: &str, text: &str) {
    match transport.send_text(chat_id, text).await {
        Ok(_) => info!("posted sync report to {}", chat_id),
        Err(e) => error!("failed to post sync report to {}: {}", chat_id, e),
    }
}
