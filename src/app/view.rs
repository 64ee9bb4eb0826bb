use std::fmt::Write;

use crate::scan::decoder::ScanConfig;

use super::amount::QUICK_PICKS;
use super::state::{Detail, Notice, Pending, ViewState};

/// Renders the active mode as plain text for the terminal.
pub fn render(state: &ViewState, scan_config: &ScanConfig, link: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Stock Scanner ==");

    match state {
        ViewState::Idle => {
            let _ = writeln!(out, "[scan] Scan QR code    [open <id>] Enter item number");
        }
        ViewState::PermissionCheck => {
            let _ = writeln!(out, "Checking camera access...");
        }
        ViewState::Scanning => {
            let _ = writeln!(
                out,
                "Scanning ({}x{} box, {} fps). Scan a code or type it, [cancel] to abort.",
                scan_config.box_width, scan_config.box_height, scan_config.fps
            );
        }
        ViewState::Loading(Pending::Lookup { params }) => {
            let _ = writeln!(out, "Loading item {}...", params.id);
        }
        ViewState::Loading(Pending::Update { detail, target }) => {
            let _ = writeln!(
                out,
                "Updating {} to {} {}...",
                detail.item.name,
                target,
                detail.item.unit_label()
            );
        }
        ViewState::Error(banner) => {
            let _ = writeln!(out, "! {}", banner.message);
            let _ = writeln!(out, "  [again] Scan again");
        }
        ViewState::Detail(detail) => render_detail(&mut out, detail),
    }

    let _ = writeln!(out, "-- {}", link);
    out
}

fn render_detail(out: &mut String, detail: &Detail) {
    let item = &detail.item;

    match &detail.notice {
        Some(Notice::Success { message, .. }) => {
            let _ = writeln!(out, "OK {}", message);
        }
        Some(Notice::Failure(message)) => {
            let _ = writeln!(out, "! {}", message);
            let _ = writeln!(out, "  [again] Scan again");
        }
        None => {}
    }

    let _ = writeln!(out, "{}", item.name);
    if let Some(sku) = &item.secondary_key {
        let _ = writeln!(out, "  Item no.: {}", sku);
    }
    if let Some(hint) = detail.location_hint() {
        let _ = writeln!(out, "  @ {}", hint);
    }
    if let Some(image) = &item.image_url {
        let _ = writeln!(out, "  Image: {}", image);
    }

    let _ = writeln!(
        out,
        "  Current stock: {} {}",
        item.quantity,
        item.unit_label()
    );
    if item.below_minimum() {
        if let Some(min) = item.minimum {
            let _ = writeln!(out, "  ! Below minimum stock ({})", min);
        }
    }
    if let Some(location) = &item.location {
        let _ = writeln!(out, "  Storage location: {}", location);
    }
    if let Some(supplier) = &item.supplier {
        let _ = writeln!(out, "  Supplier: {}", supplier);
    }
    if let Some(updated) = item.updated_at {
        let _ = writeln!(out, "  Updated: {}", updated.format("%Y-%m-%d %H:%M"));
    }

    let picks: Vec<String> = QUICK_PICKS
        .iter()
        .map(|n| {
            if *n == detail.amount.get() {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    let _ = writeln!(
        out,
        "  Amount: [-] {} [+]    pick: {}",
        detail.amount.get(),
        picks.join(" ")
    );

    let take = if detail.can_take() {
        "[take]"
    } else {
        "(take disabled)"
    };
    let _ = writeln!(
        out,
        "  {} Remove    [add] Receive    [again] New scan",
        take
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::amount::Amount;
    use crate::app::state::ErrorBanner;
    use crate::models::ScanParams;
    use crate::testing::sample_item;

    const LINK: &str = "https://scan.example.com/";

    #[test]
    fn test_error_banner_offers_retry() {
        let state = ViewState::Error(ErrorBanner {
            message: "No camera found".to_string(),
        });
        let text = render(&state, &ScanConfig::default(), LINK);
        assert!(text.contains("! No camera found"));
        assert!(text.contains("[again]"));
    }

    #[test]
    fn test_detail_shows_warning_and_disabled_take() {
        let params = ScanParams {
            id: "12345".to_string(),
            category: None,
            location: Some("Dock 2".to_string()),
        };
        let mut detail = Detail::new(sample_item("12345", "ABC-100", 1, Some(5)), Some(params));
        detail.amount = Amount::new(5);
        let text = render(&ViewState::Detail(detail), &ScanConfig::default(), LINK);
        assert!(text.contains("Current stock: 1 pcs"));
        assert!(text.contains("Below minimum stock (5)"));
        assert!(text.contains("@ Dock 2"));
        assert!(text.contains("(take disabled)"));
        assert!(text.contains("[5]"));
    }

    #[test]
    fn test_detail_without_warning() {
        let detail = Detail::new(sample_item("12345", "ABC-100", 7, Some(5)), None);
        let text = render(&ViewState::Detail(detail), &ScanConfig::default(), LINK);
        assert!(!text.contains("Below minimum"));
        assert!(text.contains("[take]"));
    }

    #[test]
    fn test_scanning_shows_box() {
        let text = render(&ViewState::Scanning, &ScanConfig::default(), LINK);
        assert!(text.contains("250x250"));
        assert!(text.ends_with(&format!("-- {}\n", LINK)));
    }
}
