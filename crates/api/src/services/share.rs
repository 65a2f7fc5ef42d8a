//! Share message builder for receipts.
//!
//! Produces the plain-text message organizers forward to buyers over
//! messaging apps: reserved numbers, amount and payment instructions, or a
//! confirmation once everything is paid.

use domain::services::ledger::Receipt;
use shared::money::format_brl;

/// Builds the forwardable receipt message for one purchase group.
pub fn receipt_message(receipt: &Receipt) -> String {
    let numbers = receipt
        .numbers
        .iter()
        .map(|n| shared::money::pad_number(n.number, receipt.total_numbers))
        .collect::<Vec<_>>()
        .join(", ");

    let mut text = format!(
        "🎟 *{}*\nPrêmio: {}\n\nOlá {}! Seus números: {}\nTotal: {}\n",
        receipt.raffle_name,
        receipt.prize,
        receipt.buyer_name,
        numbers,
        format_brl(receipt.total),
    );

    if receipt.is_paid {
        text.push_str("\n✅ Pagamento confirmado. Boa sorte!");
    } else {
        text.push_str(&format!(
            "\n💰 Pagamento via PIX\nChave: {}\nNome: {}\n\nEnvie o comprovante para confirmar sua reserva.",
            receipt.pix_key, receipt.pix_name,
        ));
    }

    text.push_str(&format!("\n\nCódigo da rifa: {}", receipt.raffle_code));
    text
}
