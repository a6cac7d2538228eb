//! Sample order placed by the driver.

use contracts::{Consumer, ConsumerAddress, LineItemArticle, OrderLineItem};
use uuid::Uuid;

pub fn sample_consumer() -> Consumer {
    Consumer::new(
        "test@test.de",
        vec![ConsumerAddress::new(
            "Werdener Straße",
            "17a",
            "40226",
            "Düsseldorf",
            "DE",
            "Meier",
        )],
    )
}

/// One PlayStation 5 under a fresh tenant article id.
pub fn sample_line_items() -> Vec<OrderLineItem> {
    let article = LineItemArticle::new(Uuid::new_v4().to_string(), "PlayStation 5");
    let mut item = OrderLineItem::new("", article, 1);
    item.scannable_codes = Some(Vec::new());
    item.shop_price = Some(1.0);
    vec![item]
}
