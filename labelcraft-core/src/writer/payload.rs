//! Text encoded in each label's QR code

use super::metrics::truncate_chars;
use crate::config::{CodeMode, LabelLayoutConfig};
use crate::record::AssetRecord;

const CARD_RULE: &str = "━━━━━━━━━━━━━━━";

/// Build the QR payload for a record according to the configured mode
pub fn code_payload(record: &AssetRecord, layout: &LabelLayoutConfig) -> String {
    match layout.code_mode {
        CodeMode::Card => card_payload(record, layout),
        CodeMode::Url => url_payload(
            &record.id,
            layout.url_base.as_deref().unwrap_or_default(),
            &layout.url_param,
        ),
    }
}

/// Multi-line "virtual ID card" shown by phone scanners without network
pub fn card_payload(record: &AssetRecord, layout: &LabelLayoutConfig) -> String {
    let mut lines = vec![
        format!("🔴 {}", layout.card_title),
        CARD_RULE.to_string(),
        format!("🆔 ID:    {}", record.id),
        format!("📦 BIEN:  {}", truncate_chars(&record.description, 25)),
        format!("🏭 MARCA: {}", truncate_chars(&record.brand, 15)),
        format!("🔢 MOD:   {}", truncate_chars(&record.model, 15)),
        format!("📍 SEDE:  {}", truncate_chars(&record.branch, 15)),
    ];
    if let Some(category) = &record.category {
        lines.push(format!("🏷 CAT:   {}", truncate_chars(category, 15)));
    }
    lines.push(CARD_RULE.to_string());
    lines.push(format!("✅ {}", layout.card_footer));
    lines.join("\n")
}

/// Lookup URL with the identifier as a query parameter
pub fn url_payload(id: &str, base: &str, param: &str) -> String {
    let base = base.trim();
    let separator = if base.contains('?') {
        if base.ends_with('?') || base.ends_with('&') {
            ""
        } else {
            "&"
        }
    } else {
        "?"
    };
    format!("{}{}{}={}", base, separator, param, urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AssetRecord {
        AssetRecord {
            id: "RE-045".to_string(),
            description: "Refrigerador vertical de dos puertas".to_string(),
            brand: "Frigilux".to_string(),
            model: "RF-2000".to_string(),
            serial: String::new(),
            sheet: "Base de Datos Maestra Centro".to_string(),
            branch: "Centro".to_string(),
            category: None,
        }
    }

    #[test]
    fn test_card_payload() {
        let layout = LabelLayoutConfig::default();
        let payload = card_payload(&record(), &layout);
        let lines: Vec<&str> = payload.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].ends_with("ACTIVO FIJO"));
        assert!(lines[2].ends_with("RE-045"));
        assert!(lines[3].ends_with("Refrigerador vertical de "));
        assert!(lines[6].ends_with("Centro"));
        assert!(lines[8].ends_with("Inventario Verificado"));
    }

    #[test]
    fn test_card_payload_with_category() {
        let mut record = record();
        record.category = Some("Refrigeracion".to_string());
        let payload = card_payload(&record, &LabelLayoutConfig::default());
        assert_eq!(payload.lines().count(), 10);
        assert!(payload.contains("CAT:   Refrigeracion"));
    }

    #[test]
    fn test_url_payload() {
        assert_eq!(
            url_payload("RE-045", "https://inv.example.com/activo", "id"),
            "https://inv.example.com/activo?id=RE-045"
        );
        assert_eq!(
            url_payload("A 1/2", "https://inv.example.com/a?sede=1", "codigo"),
            "https://inv.example.com/a?sede=1&codigo=A%201%2F2"
        );
        assert_eq!(
            url_payload("X", "https://inv.example.com/a?", "id"),
            "https://inv.example.com/a?id=X"
        );
    }

    #[test]
    fn test_modes_are_exclusive() {
        let mut layout = LabelLayoutConfig::default();
        assert!(code_payload(&record(), &layout).contains("MARCA"));

        layout.code_mode = CodeMode::Url;
        layout.url_base = Some("https://inv.example.com/activo".to_string());
        let payload = code_payload(&record(), &layout);
        assert_eq!(payload, "https://inv.example.com/activo?id=RE-045");
    }
}
