use crate::services::ServiceError;

/// Coin packages offered in the shop: (coins, price in whole currency units).
pub const COIN_PACKAGES: [(u32, u32); 4] = [(20, 29), (50, 59), (100, 99), (200, 179)];

/// Invoice payloads carry the purchased amount as `coins_<amount>` so a
/// successful payment maps back to a ledger credit without extra state.
pub fn invoice_payload(coins: u32) -> String {
    format!("coins_{}", coins)
}

pub fn parse_invoice_payload(payload: &str) -> Result<u32, ServiceError> {
    payload
        .strip_prefix("coins_")
        .and_then(|raw| raw.parse::<u32>().ok())
        .ok_or_else(|| ServiceError::InvalidPaymentPayload(payload.to_string()))
}

/// Parses a `buy_<coins>_<price>` shop callback.
pub fn parse_buy_callback(data: &str) -> Option<(u32, u32)> {
    let rest = data.strip_prefix("buy_")?;
    let (coins, price) = rest.split_once('_')?;
    Some((coins.parse().ok()?, price.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_payload_round_trip() {
        for (coins, _) in COIN_PACKAGES {
            assert_eq!(parse_invoice_payload(&invoice_payload(coins)).unwrap(), coins);
        }
    }

    #[test]
    fn test_parse_invoice_payload_rejects_garbage() {
        assert!(parse_invoice_payload("coins_").is_err());
        assert!(parse_invoice_payload("coins_abc").is_err());
        assert!(parse_invoice_payload("stars_50").is_err());
    }

    #[test]
    fn test_parse_buy_callback() {
        assert_eq!(parse_buy_callback("buy_50_59"), Some((50, 59)));
        assert_eq!(parse_buy_callback("buy_50"), None);
        assert_eq!(parse_buy_callback("unsub_0"), None);
    }
}
