use serde_json::Value;

use super::coercion::{get_ignore_case, text_of};

const TAX_ID_KEYS: [&str; 7] = ["cedula", "dni", "document", "documento", "cc", "nit", "billing_cc"];
const TAX_ID_META_KEYS: [&str; 13] = [
    "cedula",
    "dni",
    "document",
    "documento",
    "cc",
    "nit",
    "billing_cc",
    "billing_cedula",
    "billing_dni",
    "numero_documento",
    "shipping_cc",
    "shipping_cedula",
    "shipping_dni",
];
const NOTE_KEYS: [&str; 3] = ["customer_note", "note", "nota"];
const NOTE_META_KEYS: [&str; 6] = ["customer_note", "nota", "nota_cliente", "order_note", "_order_note", "note"];

/// Finds the customer's tax id: direct keys on the billing and shipping blocks first, then the order's meta data.
pub fn extract_tax_id(raw: &Value) -> String {
    direct_value(raw, &TAX_ID_KEYS).or_else(|| meta_value(&raw["meta_data"], &TAX_ID_META_KEYS)).unwrap_or_default()
}

/// Finds the customer note: the top-level `customer_note`, then direct keys on billing and shipping, then meta data.
pub fn extract_note(raw: &Value) -> String {
    let top = text_of(&raw["customer_note"]).trim().to_string();
    if !top.is_empty() {
        return top;
    }
    direct_value(raw, &NOTE_KEYS).or_else(|| meta_value(&raw["meta_data"], &NOTE_META_KEYS)).unwrap_or_default()
}

fn direct_value(raw: &Value, keys: &[&str]) -> Option<String> {
    ["billing", "shipping"]
        .iter()
        .filter_map(|block| raw.get(block).and_then(Value::as_object))
        .flat_map(|obj| keys.iter().filter_map(move |k| get_ignore_case(obj, k)))
        .map(|v| text_of(v).trim().to_string())
        .find(|v| !v.is_empty())
}

/// Scans a `[{key, value}]` list for the first key in `keys` with a non-empty value. Keys are tried in priority
/// order. A mapping value yields its first non-empty member.
pub fn meta_value(meta: &Value, keys: &[&str]) -> Option<String> {
    let entries = meta.as_array()?;
    keys.iter().find_map(|wanted| {
        entries
            .iter()
            .filter(|entry| entry["key"].as_str().map(|k| k.trim().eq_ignore_ascii_case(wanted)).unwrap_or(false))
            .filter_map(|entry| meta_entry_text(&entry["value"]))
            .next()
    })
}

fn meta_entry_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Object(map) => map.values().map(|v| text_of(v).trim().to_string()).find(|v| !v.is_empty()),
        v => Some(text_of(v).trim().to_string()),
    };
    text.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn tax_id_from_billing_is_case_insensitive() {
        let raw = json!({"billing": {"Cedula": "1020304050"}, "shipping": {"dni": "999"}});
        assert_eq!(extract_tax_id(&raw), "1020304050");
    }

    #[test]
    fn tax_id_falls_back_to_shipping_then_meta() {
        let raw = json!({"billing": {"cedula": ""}, "shipping": {"NIT": "900.123"}});
        assert_eq!(extract_tax_id(&raw), "900.123");
        let raw = json!({
            "billing": {},
            "meta_data": [
                {"key": "_billing_phone", "value": "123"},
                {"key": "Billing_Cedula", "value": {"label": "", "number": "7788"}},
            ]
        });
        assert_eq!(extract_tax_id(&raw), "7788");
        assert_eq!(extract_tax_id(&json!({"meta_data": "nope"})), "");
        assert_eq!(extract_tax_id(&json!([1, 2])), "");
    }

    #[test]
    fn meta_keys_are_tried_in_priority_order() {
        let meta = json!([
            {"key": "shipping_dni", "value": "2"},
            {"key": "cedula", "value": "  "},
            {"key": "dni", "value": "1"},
        ]);
        assert_eq!(meta_value(&meta, &TAX_ID_META_KEYS).as_deref(), Some("1"));
    }

    #[test]
    fn notes() {
        assert_eq!(extract_note(&json!({"customer_note": "  dejar en portería "})), "dejar en portería");
        let raw = json!({"customer_note": "", "shipping": {"nota": "timbre 2"}});
        assert_eq!(extract_note(&raw), "timbre 2");
        let raw = json!({"meta_data": [{"key": "nota_cliente", "value": "llamar antes"}]});
        assert_eq!(extract_note(&raw), "llamar antes");
        assert_eq!(extract_note(&json!({})), "");
    }
}
