//! Intelligent Mail Barcode data payload.
//!
//! Builds the digit string that a 4-state barcode would carry:
//!
//! | Field           | Width                 |
//! |-----------------|-----------------------|
//! | Barcode ID      | 2                     |
//! | Service Type ID | 3                     |
//! | Mailer ID       | 6 or 9                |
//! | Serial Number   | 9 or 6 (MID dependent)|
//! | Routing Code    | 11 (ZIP + 4 + DP)     |
//!
//! The bar pattern itself (Reed-Solomon / codeword encoding) is not produced here.
//!
//! Encoding never fails. Malformed inputs are padded, truncated or stripped instead of rejected,
//! so a payload built from a bad Mailer ID can come out shorter or longer than 31 digits.

use super::config::ImbConfig;

pub const BARCODE_ID_WIDTH: usize = 2;
pub const SERVICE_TYPE_ID_WIDTH: usize = 3;
pub const ZIP_WIDTH: usize = 5;
pub const PLUS4_WIDTH: usize = 4;
pub const DELIVERY_POINT_WIDTH: usize = 2;
pub const ROUTING_CODE_WIDTH: usize = ZIP_WIDTH + PLUS4_WIDTH + DELIVERY_POINT_WIDTH;

/// Nominal payload length when the Mailer ID is 6 or 9 digits.
pub const PAYLOAD_WIDTH: usize = 31;

pub const DEFAULT_PLUS4: &str = "0000";
pub const DEFAULT_DELIVERY_POINT: &str = "00";

/// Builds the payload for one mailpiece.
///
/// `plus4` and `delivery_point` fall back to `"0000"` and `"00"` when absent.
pub fn encode(
    config: &ImbConfig,
    sequence_number: u64,
    zip: &str,
    plus4: Option<&str>,
    delivery_point: Option<&str>,
) -> String {
    let barcode_id = pad_then_keep_first(&config.barcode_id, BARCODE_ID_WIDTH);
    let service_type_id = pad_then_keep_first(&config.service_type_id, SERVICE_TYPE_ID_WIDTH);
    let mailer_id = digits_only(&config.mailer_id);
    let serial = serial_field(sequence_number, serial_width(mailer_id.len()));
    let routing = routing_code(zip, plus4, delivery_point);

    let mut payload = String::with_capacity(PAYLOAD_WIDTH);
    payload.push_str(&barcode_id);
    payload.push_str(&service_type_id);
    payload.push_str(&mailer_id);
    payload.push_str(&serial);
    payload.push_str(&routing);
    payload
}

/// Serial number width for a Mailer ID of `mailer_id_len` digits.
///
/// A 6-digit MID gets a 9-digit serial and a 9-digit MID gets a 6-digit serial. Any other length
/// gets 6.
pub fn serial_width(mailer_id_len: usize) -> usize {
    match mailer_id_len {
        6 => 9,
        9 => 6,
        _ => 6,
    }
}

/// Left-pads the decimal sequence number and keeps the last `width` digits.
pub fn serial_field(sequence_number: u64, width: usize) -> String {
    let padded = pad_left(&sequence_number.to_string(), width);
    // decimal digits are ASCII, byte offsets are char offsets
    padded[padded.len() - width..].to_string()
}

/// ZIP (5) + add-on (4) + delivery point (2), each stripped to digits and zero-padded.
///
/// Over-long components are kept as-is, not truncated.
pub fn routing_code(zip: &str, plus4: Option<&str>, delivery_point: Option<&str>) -> String {
    let zip = pad_left(&digits_only(zip), ZIP_WIDTH);
    let plus4 = pad_left(&digits_only(plus4.unwrap_or(DEFAULT_PLUS4)), PLUS4_WIDTH);
    let delivery_point = pad_left(
        &digits_only(delivery_point.unwrap_or(DEFAULT_DELIVERY_POINT)),
        DELIVERY_POINT_WIDTH,
    );
    format!("{zip}{plus4}{delivery_point}")
}

/// Drops every character that is not an ASCII digit.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn pad_left(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut padded = "0".repeat(width - len);
    padded.push_str(value);
    padded
}

// Pads first, so over-long values lose their trailing characters.
fn pad_then_keep_first(value: &str, width: usize) -> String {
    pad_left(value, width).chars().take(width).collect()
}
