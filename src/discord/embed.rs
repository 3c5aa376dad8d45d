use chrono::Local;
use serde_json::{json, Value};

use crate::notify::Notification;

const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const EMBED_COLOR: u32 = 0x76B900;

pub fn create_embed(notification: &Notification) -> Value {
    json!({
        "title": truncate(&notification.subject, TITLE_LIMIT),
        "description": truncate(&notification.body, DESCRIPTION_LIMIT),
        "color": EMBED_COLOR,
        "footer": {
            "text": format!("{} - Detected: {}",
                notification.vendor_name,
                Local::now().format("%Y-%m-%d %H:%M:%S")
            )
        }
    })
}

/// Cuts `text` to at most `limit` characters, marking the cut with "...".
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(subject: &str, body: &str) -> Notification {
        Notification {
            vendor_name: "Best Buy".to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn embed_carries_subject_and_body() {
        let embed = create_embed(&notification(
            "RTX 3080 in Stock ONLINE at Best Buy",
            "FE is in stock ONLINE at Best Buy\nhttps://bb.test\n\n",
        ));

        assert_eq!(embed["title"], "RTX 3080 in Stock ONLINE at Best Buy");
        assert_eq!(embed["description"], "FE is in stock ONLINE at Best Buy\nhttps://bb.test\n\n");
        assert!(embed["footer"]["text"]
            .as_str()
            .unwrap()
            .starts_with("Best Buy - Detected: "));
    }

    #[test]
    fn oversized_description_is_truncated() {
        let body = "x".repeat(5000);
        let embed = create_embed(&notification("s", &body));
        let description = embed["description"].as_str().unwrap();

        assert_eq!(description.chars().count(), DESCRIPTION_LIMIT);
        assert!(description.ends_with("..."));
    }
}
