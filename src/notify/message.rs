use crate::models::{BackorderStatus, OnlineStatus, StockReport, StoreStatus};

/// Renders one paragraph per item and stock kind, in discovery order.
pub fn format_body(report: &StockReport, vendor_name: &str) -> String {
    let mut body = String::new();

    for record in report {
        if record.online_status == OnlineStatus::InStock {
            body.push_str(&format!(
                "{} is in stock ONLINE at {}\n{}\n\n",
                record.item_name, vendor_name, record.url
            ));
        }
        if record.store_status == StoreStatus::InStore {
            body.push_str(&format!(
                "{} is in stock IN STORE at {}\n{}\n{}\n\n",
                record.item_name,
                vendor_name,
                record.store_locations.join(", ").to_uppercase(),
                record.url
            ));
        }
        if record.backorder_status == BackorderStatus::Available {
            body.push_str(&format!(
                "{} is AVAILABLE FOR BACKORDER at {}\n{}\n\n",
                record.item_name, vendor_name, record.url
            ));
        }
    }

    body
}

/// Subject naming every stock category mentioned in `body`.
pub fn derive_subject(product: &str, vendor_name: &str, body: &str) -> String {
    let lower = body.to_lowercase();
    let online = lower.contains("online");
    let in_store = lower.contains("in store");
    let backorder = lower.contains("backorder");

    let in_stock = match (online, in_store) {
        (true, true) => Some("ONLINE and IN STORE"),
        (true, false) => Some("ONLINE"),
        (false, true) => Some("IN STORE"),
        (false, false) => None,
    };

    match (in_stock, backorder) {
        (Some(kind), false) => format!("{product} in Stock {kind} at {vendor_name}"),
        (Some(kind), true) => {
            format!("{product} in Stock {kind} and available for BACKORDER at {vendor_name}")
        }
        (None, true) => format!("{product} available for BACKORDER at {vendor_name}"),
        (None, false) => format!("{product} stock update at {vendor_name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StockRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn body_lists_each_status_paragraph_in_item_order() {
        let mut strix = StockRecord::in_stock_online("ASUS Strix", "https://cc.test/1");
        strix.add_store_location("Richmond Hill");
        strix.add_store_location("Markham Unionville");
        let mut eagle = StockRecord::new("Gigabyte Eagle", "https://cc.test/2");
        eagle.backorder_status = BackorderStatus::Available;
        let report: StockReport = [strix, eagle].into_iter().collect();

        assert_eq!(
            format_body(&report, "Canada Computers"),
            "ASUS Strix is in stock ONLINE at Canada Computers\nhttps://cc.test/1\n\n\
             ASUS Strix is in stock IN STORE at Canada Computers\nRICHMOND HILL, MARKHAM UNIONVILLE\nhttps://cc.test/1\n\n\
             Gigabyte Eagle is AVAILABLE FOR BACKORDER at Canada Computers\nhttps://cc.test/2\n\n"
        );
    }

    #[test]
    fn records_without_stock_render_nothing() {
        let mut record = StockRecord::new("Card", "https://x");
        record.online_status = OnlineStatus::OutOfStock;
        record.store_status = StoreStatus::NoStoreStock;
        let report: StockReport = [record].into_iter().collect();

        assert_eq!(format_body(&report, "Newegg"), "");
        assert_eq!(format_body(&StockReport::new(), "Newegg"), "");
    }

    #[test]
    fn subject_combines_online_and_in_store() {
        let body = "X is in stock ONLINE at V\nu\n\nX is in stock IN STORE at V\nRICHMOND HILL\nu\n\n";
        assert_eq!(derive_subject("RTX 3080", "V", body), "RTX 3080 in Stock ONLINE and IN STORE at V");
    }

    #[test]
    fn subject_matches_categories_case_insensitively() {
        assert_eq!(derive_subject("GPU", "Best Buy", "x is in stock online"), "GPU in Stock ONLINE at Best Buy");
        assert_eq!(derive_subject("GPU", "Best Buy", "x In Store y"), "GPU in Stock IN STORE at Best Buy");
    }

    #[test]
    fn backorder_only_body_gets_backorder_subject() {
        let body = "X is AVAILABLE FOR BACKORDER at Best Buy\nhttps://bb.test/x\n\n";
        assert_eq!(derive_subject("RTX 3080", "Best Buy", body), "RTX 3080 available for BACKORDER at Best Buy");
    }

    #[test]
    fn backorder_is_appended_to_in_stock_categories() {
        let body = "A is in stock ONLINE at B\nu\n\nC is AVAILABLE FOR BACKORDER at B\nu\n\n";
        assert_eq!(
            derive_subject("RTX 3080", "B", body),
            "RTX 3080 in Stock ONLINE and available for BACKORDER at B"
        );
    }
}
