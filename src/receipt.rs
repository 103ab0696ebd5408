use once_cell::sync::Lazy;
use regex::Regex;

// SMPP v3.4 Issue 1.2 pg. 167 understates the id length; real SMSCs
// send up to 65 characters.
static DELIVERY_RECEIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"id:(?P<id>\S{0,65}) +sub:(?P<sub>.{3}) +dlvrd:(?P<dlvrd>.{3}) +submit date:(?P<submit_date>\d*) +done date:(?P<done_date>\d*) +stat:(?P<stat>[A-Z]{7}) +err:(?P<err>.{3}) +[Tt]ext:(?P<text>.{0,20})",
    )
    .unwrap()
});

/// The fields of an SMSC delivery receipt carried in a deliver_sm body.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub id: String,
    pub sub: String,
    pub dlvrd: String,
    pub submit_date: String,
    pub done_date: String,
    pub stat: String,
    pub err: String,
    pub text: String,
}

/// Matches a short_message against the delivery-receipt text grammar.
/// Leading and trailing content is free, so operator decoration around
/// the receipt does not break recognition.
pub fn parse_delivery_report(short_message: &[u8]) -> Option<DeliveryReport> {
    let text = String::from_utf8_lossy(short_message);
    let captures = DELIVERY_RECEIPT.captures(&text)?;
    let group = |name: &str| {
        captures
            .name(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };
    Some(DeliveryReport {
        id: group("id"),
        sub: group("sub"),
        dlvrd: group("dlvrd"),
        submit_date: group("submit_date"),
        done_date: group("done_date"),
        stat: group("stat"),
        err: group("err"),
        text: group("text"),
    })
}
