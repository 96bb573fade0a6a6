use anyhow::{Context, Result};
use extract::RecordBatch;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const GENERAL_FILE: &str = "general_information.csv";
pub const STATEMENTS_FILE: &str = "statements.csv";
pub const NETWORK_FILE: &str = "networks.csv";

const GENERAL_HEADER: [&str; 6] = ["PartyId", "Name", "Street", "City", "Register", "Description"];
const STATEMENTS_HEADER: [&str; 5] = ["PartyId", "AsOfDate", "Amount", "Position", "Section"];
const NETWORK_HEADER: [&str; 4] = ["PartyId", "SourceName", "TargetName", "Description"];

/// Write the three result tables into `dir`, returning the written paths.
pub fn write_tables(batch: &RecordBatch, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dir))?;

    let paths = vec![
        write_table(&dir.join(GENERAL_FILE), &GENERAL_HEADER, &batch.general)?,
        write_table(&dir.join(STATEMENTS_FILE), &STATEMENTS_HEADER, &batch.statements)?,
        write_table(&dir.join(NETWORK_FILE), &NETWORK_HEADER, &batch.network)?,
    ];
    Ok(paths)
}

fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    // serde only emits a header together with the first row
    if rows.is_empty() {
        writer.write_record(header)?;
    }
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{GeneralInfo, GraphEdge, Section, StatementRow};

    #[test]
    fn test_write_tables() {
        let dir = tempfile::tempdir().unwrap();
        let batch = RecordBatch {
            general: vec![GeneralInfo {
                party_id: "7".to_string(),
                name: "Acme GmbH".to_string(),
                street: "Hauptstr. 1".to_string(),
                city: "10115 Berlin".to_string(),
                register: "HRB 1".to_string(),
                description: "Maschinen, Anlagen".to_string(),
            }],
            statements: vec![
                StatementRow {
                    party_id: "7".to_string(),
                    as_of_date: "31.12.2022".to_string(),
                    amount: "1500000".to_string(),
                    position: "Kasse".to_string(),
                    section: Section::Assets,
                },
                StatementRow {
                    party_id: "7".to_string(),
                    as_of_date: "31.12.2022".to_string(),
                    amount: "250000".to_string(),
                    position: "Umsatz".to_string(),
                    section: Section::IncomeExpense,
                },
            ],
            network: Vec::<GraphEdge>::new(),
        };

        let paths = write_tables(&batch, dir.path()).unwrap();
        assert_eq!(paths.len(), 3);

        let general = std::fs::read_to_string(dir.path().join(GENERAL_FILE)).unwrap();
        let mut lines = general.lines();
        assert_eq!(lines.next(), Some("PartyId,Name,Street,City,Register,Description"));
        assert_eq!(
            lines.next(),
            Some("7,Acme GmbH,Hauptstr. 1,10115 Berlin,HRB 1,\"Maschinen, Anlagen\"")
        );

        let statements = std::fs::read_to_string(dir.path().join(STATEMENTS_FILE)).unwrap();
        assert_eq!(
            statements.lines().collect::<Vec<_>>(),
            vec![
                "PartyId,AsOfDate,Amount,Position,Section",
                "7,31.12.2022,1500000,Kasse,Aktiva",
                "7,31.12.2022,250000,Umsatz,GuV",
            ]
        );

        let network = std::fs::read_to_string(dir.path().join(NETWORK_FILE)).unwrap();
        assert_eq!(network.trim(), "PartyId,SourceName,TargetName,Description");
    }
}
