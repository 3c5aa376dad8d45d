use std::collections::HashMap;

/// Number of leading characters of a body checked against the previous body.
pub const DEDUP_PREFIX_CHARS: usize = 20;

/// Last body sent per vendor, owned by the poll loop and passed through each cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyState {
    last_sent: HashMap<String, String>,
}

impl NotifyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously sent body, or "" when nothing was sent yet.
    pub fn last_sent(&self, vendor_name: &str) -> &str {
        self.last_sent.get(vendor_name).map(String::as_str).unwrap_or("")
    }

    pub fn record_sent(&mut self, vendor_name: &str, body: String) {
        self.last_sent.insert(vendor_name.to_string(), body);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NoStock,
    Unchanged,
    Send,
}

/// A body is new when its first 20 characters do not occur anywhere in the
/// previous body.
///
/// This is a prefix-membership check, not content equality: two different
/// states sharing a 20-character prefix are treated as unchanged, and a shift
/// in the first 20 characters of an otherwise identical state is treated as
/// new.
pub fn decide(previous: &str, body: &str) -> Decision {
    if body.is_empty() {
        return Decision::NoStock;
    }

    let prefix: String = body.chars().take(DEDUP_PREFIX_CHARS).collect();
    if previous.contains(&prefix) {
        Decision::Unchanged
    } else {
        Decision::Send
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "EVGA RTX 3080 XC3 is in stock ONLINE at Newegg\nhttps://newegg.test/1\n\n";

    #[test]
    fn empty_body_is_never_sent() {
        assert_eq!(decide("", ""), Decision::NoStock);
        assert_eq!(decide(BODY, ""), Decision::NoStock);
    }

    #[test]
    fn first_body_is_sent() {
        assert_eq!(decide("", BODY), Decision::Send);
    }

    #[test]
    fn repeated_body_is_suppressed() {
        assert_eq!(decide(BODY, BODY), Decision::Unchanged);
    }

    #[test]
    fn changed_prefix_is_sent_despite_overlapping_content() {
        let body = format!("ASUS TUF RTX 3080 is in stock ONLINE at Newegg\nhttps://newegg.test/2\n\n{BODY}");
        assert_eq!(decide(BODY, &body), Decision::Send);
    }

    #[test]
    fn prefix_found_later_in_previous_body_is_suppressed() {
        let previous = format!("ASUS TUF RTX 3080 is in stock ONLINE at Newegg\nhttps://newegg.test/2\n\n{BODY}");
        assert_eq!(decide(&previous, BODY), Decision::Unchanged);
    }

    #[test]
    fn shared_prefix_with_different_content_is_suppressed() {
        let previous = "EVGA RTX 3080 XC3 is in stock ONLINE at Newegg\nhttps://newegg.test/old\n\n";
        let body = "EVGA RTX 3080 XC3 is AVAILABLE FOR BACKORDER at Newegg\nhttps://newegg.test/1\n\n";
        assert_eq!(decide(previous, body), Decision::Unchanged);
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let previous = "Rüschenbeck Ø RTX 3080 is in stock ONLINE";
        assert_eq!(decide(previous, previous), Decision::Unchanged);
        assert_eq!(decide("", "ééééééééééééééééééééééé"), Decision::Send);
    }

    #[test]
    fn state_defaults_to_empty_and_is_replaced() {
        let mut state = NotifyState::new();
        assert_eq!(state.last_sent("Newegg"), "");

        state.record_sent("Newegg", "first".to_string());
        state.record_sent("Newegg", "second".to_string());
        assert_eq!(state.last_sent("Newegg"), "second");
        assert_eq!(state.last_sent("Best Buy"), "");
    }
}
