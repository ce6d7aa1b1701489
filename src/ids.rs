//! Product identifier and wallet address helpers

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, 0 if the clock is before it
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn wallet_suffix(wallet: Option<&str>) -> String {
    match wallet {
        Some(w) if !w.is_empty() => {
            let chars: Vec<char> = w.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        }
        _ => "0000".to_string(),
    }
}

/// `PROD_{timestamp}_{nonce}_{last 4 chars of wallet}`
pub fn product_id(timestamp_ms: u64, nonce: u32, wallet: Option<&str>) -> String {
    format!(
        "PROD_{}_{}_{}",
        timestamp_ms,
        nonce % 10_000,
        wallet_suffix(wallet)
    )
}

/// 32-bit rolling hash (`h * 31 + unit`) over the UTF-16 code units of `data`
fn rolling_hash(data: &str) -> i32 {
    data.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Identifier derived from the product data plus a timestamp.
///
/// The same name, category and wallet always give the same hash part.
pub fn hash_based_id(name: &str, category: &str, wallet: Option<&str>, timestamp_ms: u64) -> String {
    let data = format!("{}_{}_{}", name, category, wallet.unwrap_or("unknown"));
    let hash = i64::from(rolling_hash(&data)).abs();
    format!("HASH_{:x}_{}", hash, timestamp_ms)
}

/// Shorten an address to `before…after`; short addresses are returned as is
pub fn human_address(address: &str, before: usize, after: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < before + after {
        return address.to_string();
    }
    let head: String = chars[..before].iter().collect();
    let tail: String = chars[chars.len() - after..].iter().collect();
    format!("{}…{}", head, tail)
}
