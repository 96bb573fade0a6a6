use anyhow::{Context, Result};
use extract::Party;
use std::path::Path;

/// Read `name,party_id` rows from a CSV file with a header line.
pub fn read_parties(path: &Path) -> Result<Vec<Party>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open input file: {:?}", path))?;

    let mut parties = Vec::new();
    for (line, row) in reader.deserialize::<Party>().enumerate() {
        let party = row.with_context(|| format!("Invalid input row {} in {:?}", line + 2, path))?;
        if party.name.is_empty() {
            continue;
        }
        parties.push(party);
    }
    Ok(parties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_parties() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,party_id").unwrap();
        writeln!(file, "Acme GmbH, 1001").unwrap();
        writeln!(file, "\"Beta, Gamma AG\",1002").unwrap();
        writeln!(file, ",1003").unwrap();

        let parties = read_parties(file.path()).unwrap();
        assert_eq!(
            parties,
            vec![Party::new("Acme GmbH", "1001"), Party::new("Beta, Gamma AG", "1002")]
        );
    }
}
