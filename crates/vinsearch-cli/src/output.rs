use vinsearch_lib::LookupRecord;

/// Render a record as aligned `label: value` lines. Empty fields show `-`.
pub fn render_text(record: &LookupRecord) -> String {
    let rows = [
        ("VIN", &record.vin),
        ("Statut", &record.statut),
        ("Prix", &record.prix),
        ("Kilométrage", &record.km),
        ("Année", &record.annee),
        ("Marque", &record.marque),
        ("Modèle", &record.modele),
        ("Concessionnaire", &record.concessionnaire),
        ("URL", &record.url),
        ("Description", &record.description),
    ];

    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        let pad = width - label.chars().count();
        let value = if value.is_empty() { "-" } else { value.as_str() };
        out.push_str(&format!("{}:{} {}\n", label, " ".repeat(pad), value));
    }
    out
}
