//! Renders an [`OrderRecord`] as the plain-text summary sent to the shop's operators.

use crate::db_types::OrderRecord;

pub const EMAIL_HEADER: &str = "Dirección de correo electrónico:";
pub const PHONE_HEADER: &str = "Teléfono:";
pub const TAX_ID_HEADER: &str = "Cédula de Ciudadanía:";
pub const NOTE_HEADER: &str = "Nota del cliente:";
pub const SHIPPING_LINE: &str = "1 envío";
pub const PAYMENT_SUFFIX: &str = " - web";

/// Formats the order summary. The output depends only on the record, so identical records always produce identical
/// text (and identical dedup fingerprints).
pub fn format_order_message(record: &OrderRecord) -> String {
    let mut lines = vec![format!("Pedido {}", record.order_number)];
    let address = &record.address;
    [&record.customer.name, &address.address_1, &address.address_2, &address.city, &address.state]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .for_each(|s| lines.push(s.to_string()));
    lines.push(String::new());

    let mut section = |header: &str, value: String| {
        lines.push(header.to_string());
        lines.push(value);
        lines.push(String::new());
    };
    section(EMAIL_HEADER, record.customer.email.clone());
    section(PHONE_HEADER, normalize_phone(&record.customer.phone));
    section(TAX_ID_HEADER, record.extracted_tax_id.clone());
    if !record.extracted_note.trim().is_empty() {
        section(NOTE_HEADER, record.extracted_note.trim().to_string());
    }

    let mut items = record
        .line_items
        .iter()
        .map(|item| format!("{} {}", display_quantity(item.quantity), item.label().trim()))
        .collect::<Vec<String>>();
    if record.has_shipping_lines {
        items.push(SHIPPING_LINE.to_string());
    }
    if !items.is_empty() {
        lines.extend(items);
        lines.push(String::new());
    }

    lines.push(format_currency(record.total));
    lines.push(format!("{}{PAYMENT_SUFFIX}", record.payment_method).trim().to_string());
    lines.join("\n").trim().to_string()
}

fn display_quantity(quantity: f64) -> i64 {
    let q = if quantity.is_finite() { quantity.trunc() as i64 } else { 0 };
    if q <= 0 {
        1
    } else {
        q
    }
}

/// Rounds to a whole amount (half away from zero) and groups thousands with `.`, e.g. `86010.4` becomes `86.010`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Strips all whitespace and a leading `+`, which is the form the messaging channel expects for recipients.
pub fn normalize_phone(phone: &str) -> String {
    let compact = phone.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    compact.strip_prefix('+').map(str::to_string).unwrap_or(compact)
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::normalizer::normalize;

    fn record(raw: serde_json::Value) -> OrderRecord {
        normalize(&raw, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap())
    }

    #[test]
    fn currency() {
        assert_eq!(format_currency(86010.4), "86.010");
        assert_eq!(format_currency(999.0), "999");
        assert_eq!(format_currency(1000.0), "1.000");
        assert_eq!(format_currency(45000.5), "45.001");
        assert_eq!(format_currency(1234567.0), "1.234.567");
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(-2500.5), "-2.501");
        assert_eq!(format_currency(-0.2), "0");
        assert_eq!(format_currency(f64::NAN), "0");
        assert_eq!(format_currency(f64::INFINITY), "0");
    }

    #[test]
    fn phones() {
        assert_eq!(normalize_phone("+57 300 1234567"), "573001234567");
        assert_eq!(normalize_phone(" 300\t123 "), "300123");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn full_message() {
        let rec = record(json!({
            "id": 812,
            "number": "812",
            "total": "86010.4",
            "payment_method_title": "Transferencia",
            "customer_note": "Entregar en la tarde",
            "billing": {
                "first_name": "Luis", "last_name": "Gómez", "email": "luis@example.com", "phone": "+57 311 000 1122",
                "address_1": "Calle 10 # 5-20", "city": "Bogotá", "state": "DC", "cedula": "80123456"
            },
            "line_items": [{"sku": "VAL-12", "name": "Válvula", "quantity": 3}, {"name": "Teflón", "quantity": 0}],
            "shipping_lines": [{"method_id": "flat_rate"}]
        }));
        let expected = "Pedido 812\nLuis Gómez\nCalle 10 # 5-20\nBogotá\nDC\n\nDirección de correo electrónico:\n\
                        luis@example.com\n\nTeléfono:\n573110001122\n\nCédula de Ciudadanía:\n80123456\n\n\
                        Nota del cliente:\nEntregar en la tarde\n\n3 VAL-12\n1 Teflón\n1 envío\n\n86.010\n\
                        Transferencia - web";
        assert_eq!(format_order_message(&rec), expected);
    }

    #[test]
    fn sparse_message_keeps_sections() {
        let rec = record(json!({}));
        let expected = "Pedido N/A\nN/A\n\nDirección de correo electrónico:\n\n\nTeléfono:\n\n\n\
                        Cédula de Ciudadanía:\n\n\n0\n- web";
        assert_eq!(format_order_message(&rec), expected);
    }

    #[test]
    fn formatting_is_deterministic() {
        let raw = json!({
            "id": 3,
            "total": 10,
            "line_items": [{"sku": "A", "quantity": 1.6}, {"sku": "B", "quantity": "2.9"}]
        });
        let a = format_order_message(&record(raw.clone()));
        let b = format_order_message(&record(raw));
        assert_eq!(a, b);
        // Fractional quantities are truncated
        assert!(a.contains("\n1 A\n2 B\n"));
    }
}
