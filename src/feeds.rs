// 2.0: supported feeds and their reference prices. the mock source jitters around these.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub reference_price: Decimal,
}

pub static SUPPORTED_FEEDS: [Feed; 3] = [
    Feed {
        id: "ETH",
        name: "Ethereum",
        symbol: "ETH",
        reference_price: dec!(3732.76),
    },
    Feed {
        id: "BTC",
        name: "Bitcoin",
        symbol: "BTC",
        reference_price: dec!(105180.73),
    },
    Feed {
        id: "SOL",
        name: "Solana",
        symbol: "SOL",
        reference_price: dec!(176.98),
    },
];

/// Case-insensitive lookup by feed id.
pub fn find_feed(feed_id: &str) -> Option<&'static Feed> {
    SUPPORTED_FEEDS
        .iter()
        .find(|feed| feed.id.eq_ignore_ascii_case(feed_id))
}
