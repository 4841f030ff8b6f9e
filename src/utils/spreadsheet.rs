//! Normalizes spreadsheet rows for the bulk santri import.
//!
//! Uploaded sheets arrive as loosely-typed JSON objects whose keys follow
//! whatever casing the operator's template used. Each canonical field is
//! resolved by probing an ordered list of accepted column names; the first
//! candidate that is present with a non-empty value wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::RejectedRow;

/// Accepted column names per canonical field, probed in order. Kept as data
/// so template drift is a config change, not a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportAliases {
    pub nis: Vec<String>,
    pub nama: Vec<String>,
    pub kelas: Vec<String>,
    pub asrama: Vec<String>,
    pub wali: Vec<String>,
    pub status: Vec<String>,
    pub email: Vec<String>,
    pub password: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ImportAliases {
    fn default() -> Self {
        Self {
            nis: names(&["nis", "NIS"]),
            nama: names(&["nama", "Nama"]),
            kelas: names(&["kelas", "Kelas"]),
            asrama: names(&[
                "asrama",
                "Nomer Kamar",
                "Nomer_Kamar",
                "NomerKamar",
                "kamar",
                "Kamar",
            ]),
            wali: names(&["wali", "Wali"]),
            status: names(&["status", "Status"]),
            email: names(&["email", "Email"]),
            password: names(&["password", "Password"]),
        }
    }
}

/// A fully resolved row, ready for the per-row create phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub asrama: String,
    pub wali: String,
    pub status: String,
    pub email: String,
    pub password: String,
}

const REQUIRED_FIELDS: [&str; 6] = ["nis", "nama", "kelas", "asrama", "wali", "email"];

/// Spreadsheet cells may hold numbers (a numeric NIS column) or booleans;
/// stringify them the way the sheet displayed them.
fn cell_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn resolve(row: &Map<String, Value>, candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|key| row.get(key).and_then(cell_to_string))
        .find(|value| !value.is_empty())
}

/// Splits raw rows into resolvable rows and rejected ones. A row missing any
/// required field is excluded from the create phase but reported back with
/// its 1-based position and the fields that came up empty.
pub fn normalize_rows(
    rows: &[Value],
    aliases: &ImportAliases,
    default_password: &str,
) -> (Vec<ImportRow>, Vec<RejectedRow>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for (index, raw) in rows.iter().enumerate() {
        let row_number = index + 1;

        let Some(object) = raw.as_object() else {
            rejected.push(RejectedRow {
                row: row_number,
                missing: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            });
            continue;
        };

        let nis = resolve(object, &aliases.nis);
        let nama = resolve(object, &aliases.nama);
        let kelas = resolve(object, &aliases.kelas);
        let asrama = resolve(object, &aliases.asrama);
        let wali = resolve(object, &aliases.wali);
        let email = resolve(object, &aliases.email);

        let resolved = [&nis, &nama, &kelas, &asrama, &wali, &email];
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .zip(resolved)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        if !missing.is_empty() {
            rejected.push(RejectedRow {
                row: row_number,
                missing,
            });
            continue;
        }

        let status = resolve(object, &aliases.status)
            .unwrap_or_else(|| "AKTIF".to_string())
            .to_uppercase();
        let password =
            resolve(object, &aliases.password).unwrap_or_else(|| default_password.to_string());

        valid.push(ImportRow {
            nis: nis.unwrap_or_default(),
            nama: nama.unwrap_or_default(),
            kelas: kelas.unwrap_or_default(),
            asrama: asrama.unwrap_or_default(),
            wali: wali.unwrap_or_default(),
            status,
            email: email.unwrap_or_default(),
            password,
        });
    }

    (valid, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> ImportAliases {
        ImportAliases::default()
    }

    #[test]
    fn test_resolves_template_column_names() {
        let rows = vec![json!({
            "NIS": 12345,
            "Nama": "Contoh Nama Santri",
            "Kelas": "10A",
            "Nomer_Kamar": "A1",
            "Wali": "Nama Wali",
            "Status": "aktif",
            "Email": "contoh@email.com",
            "Password": "rahasia",
        })];

        let (valid, rejected) = normalize_rows(&rows, &defaults(), "123456");
        assert!(rejected.is_empty());
        assert_eq!(
            valid,
            vec![ImportRow {
                nis: "12345".to_string(),
                nama: "Contoh Nama Santri".to_string(),
                kelas: "10A".to_string(),
                asrama: "A1".to_string(),
                wali: "Nama Wali".to_string(),
                status: "AKTIF".to_string(),
                email: "contoh@email.com".to_string(),
                password: "rahasia".to_string(),
            }]
        );
    }

    #[test]
    fn test_first_alias_wins() {
        let rows = vec![json!({
            "asrama": "B2",
            "Kamar": "C9",
            "nis": "1", "nama": "A", "kelas": "X", "wali": "W", "email": "a@x.com",
        })];

        let (valid, _) = normalize_rows(&rows, &defaults(), "123456");
        assert_eq!(valid[0].asrama, "B2");
    }

    #[test]
    fn test_empty_value_falls_through_to_next_alias() {
        let rows = vec![json!({
            "asrama": "",
            "Kamar": "C9",
            "nis": "1", "nama": "A", "kelas": "X", "wali": "W", "email": "a@x.com",
        })];

        let (valid, _) = normalize_rows(&rows, &defaults(), "123456");
        assert_eq!(valid[0].asrama, "C9");
    }

    #[test]
    fn test_defaults_for_status_and_password() {
        let rows = vec![json!({
            "nis": "1", "nama": "A", "kelas": "X", "asrama": "A1",
            "wali": "W", "email": "a@x.com",
        })];

        let (valid, _) = normalize_rows(&rows, &defaults(), "123456");
        assert_eq!(valid[0].status, "AKTIF");
        assert_eq!(valid[0].password, "123456");
    }

    #[test]
    fn test_incomplete_row_is_rejected_with_reason() {
        let rows = vec![
            json!({
                "nis": "1", "nama": "A", "kelas": "X", "asrama": "A1",
                "wali": "W", "email": "a@x.com",
            }),
            json!({
                "nis": "", "nama": "B", "kelas": "X", "asrama": "A2",
                "wali": "W", "email": "b@x.com",
            }),
        ];

        let (valid, rejected) = normalize_rows(&rows, &defaults(), "123456");
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].nis, "1");
        assert_eq!(
            rejected,
            vec![RejectedRow {
                row: 2,
                missing: vec!["nis".to_string()],
            }]
        );
    }

    #[test]
    fn test_non_object_row_is_rejected() {
        let rows = vec![json!("not a row")];
        let (valid, rejected) = normalize_rows(&rows, &defaults(), "123456");
        assert!(valid.is_empty());
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].row, 1);
    }

    #[test]
    fn test_custom_alias_table() {
        let mut aliases = defaults();
        aliases.nis.push("Nomor Induk".to_string());

        let rows = vec![json!({
            "Nomor Induk": "2024001",
            "nama": "A", "kelas": "X", "asrama": "A1", "wali": "W", "email": "a@x.com",
        })];

        let (valid, rejected) = normalize_rows(&rows, &aliases, "123456");
        assert!(rejected.is_empty());
        assert_eq!(valid[0].nis, "2024001");
    }
}
