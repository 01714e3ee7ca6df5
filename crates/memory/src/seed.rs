//! Built-in reference records used when no seed file is configured.

use chrono::NaiveDate;
use lifexia_core::record::{DrugRecord, DrugStatus, Regulation};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The default seed set, in insertion order.
pub fn default_records() -> Vec<DrugRecord> {
    vec![
        DrugRecord {
            name: "Aspirin".into(),
            generic_name: "Acetylsalicylic Acid".into(),
            category: Some("Analgesic / Antiplatelet".into()),
            status: DrugStatus::Approved,
            regulation: Regulation {
                agency: Some("FDA".into()),
                notes: Some("No restrictions".into()),
                restricted_on: None,
            },
            safety_alerts: strings(&[
                "Avoid in children under 12 due to Reye's syndrome risk",
                "Use with caution in patients with ulcers",
            ]),
            adverse_effects: strings(&[
                "Common: Stomach upset, heartburn",
                "Serious: GI bleeding, allergic reactions",
            ]),
            interactions: strings(&["Warfarin", "Ibuprofen"]),
            timing_instructions: strings(&["Morning with food"]),
            withdrawal_alerts: strings(&[
                "Risk of bleeding if stopped abruptly in cardiac patients",
                "Consult physician before discontinuation",
            ]),
        },
        DrugRecord {
            name: "Metformin".into(),
            generic_name: "Metformin Hydrochloride".into(),
            category: Some("Antidiabetic".into()),
            status: DrugStatus::Approved,
            regulation: Regulation {
                agency: Some("FDA".into()),
                notes: Some("First-line for Type 2 Diabetes".into()),
                restricted_on: None,
            },
            safety_alerts: strings(&[
                "Monitor kidney function regularly",
                "Risk of lactic acidosis",
            ]),
            adverse_effects: strings(&["Common: Nausea, diarrhea", "Rare: Lactic acidosis"]),
            interactions: strings(&["Contrast dye", "Alcohol"]),
            timing_instructions: strings(&["Morning with meal", "Evening with meal"]),
            withdrawal_alerts: strings(&[
                "Gradual tapering recommended",
                "Monitor blood glucose levels",
            ]),
        },
        DrugRecord {
            name: "Ranitidine".into(),
            generic_name: "Ranitidine Hydrochloride".into(),
            category: Some("H2 blocker".into()),
            status: DrugStatus::Recalled,
            regulation: Regulation {
                agency: Some("FDA".into()),
                notes: Some("Market withdrawal due to NDMA (April 2020)".into()),
                restricted_on: NaiveDate::from_ymd_opt(2020, 4, 1),
            },
            safety_alerts: strings(&[
                "Recalled by FDA in 2020",
                "Do not use any remaining stock",
            ]),
            adverse_effects: strings(&["Common: Headache, constipation", "Rare: Liver problems"]),
            interactions: strings(&["Ketoconazole"]),
            timing_instructions: strings(&["Evening before bedtime"]),
            withdrawal_alerts: strings(&["Alternative H2 blockers available"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_contains_one_restricted_record() {
        let records = default_records();
        assert_eq!(records.len(), 3);
        let restricted: Vec<&str> = records
            .iter()
            .filter(|r| r.is_restricted())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(restricted, ["Ranitidine"]);
    }
}
