use crate::core::models::small_molecule::{MoleculeAtom, SmallMolecule};
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// Data item tag under which per-atom partial charges are stored, one float
/// per atom in atom-block order.
pub const PARTIAL_CHARGE_PROPERTY: &str = "atom.dprop.PartialCharge";

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: SdfParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum SdfParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for an atom record (must be at least 32 chars)")]
    LineTooShort,
    #[error("Unsupported connection table version '{version}' (only V2000 is supported)")]
    UnsupportedVersion { version: String },
    #[error("Data item header lacks a '<tag>' name")]
    InvalidDataHeader,
    #[error("Expected a data item header ('> <tag>'), a blank line, or '$$$$'")]
    ExpectedDataHeader,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn data_item_tag(line: &str) -> Option<String> {
    let open = line.find('<')?;
    let close = line[open + 1..].find('>')?;
    let tag = line[open + 1..open + 1 + close].trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// One entry of a structure-data file: title, atom block, and the data items
/// that follow the connection table. Partial charges from the
/// [`PARTIAL_CHARGE_PROPERTY`] item are already applied to the atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfEntry {
    pub title: String,
    pub atoms: Vec<MoleculeAtom>,
    pub properties: BTreeMap<String, String>,
}

impl SdfEntry {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// The SMILES string recorded for this entry, under either common tag
    /// spelling.
    pub fn smiles(&self) -> Option<&str> {
        self.property("smiles").or_else(|| self.property("SMILES"))
    }

    pub fn to_small_molecule(&self) -> SmallMolecule {
        SmallMolecule::new(&self.title, self.smiles().unwrap_or(""), self.atoms.clone())
    }
}

pub struct SdfFile;

impl SdfFile {
    /// Reads every entry of a V2000 structure-data file.
    ///
    /// The subset understood here is the one solvation datasets actually use:
    /// title line, counts line, atom block (coordinates and element), data
    /// items. Bond blocks and `M` property lines other than `M  END` are
    /// skipped. Entries are separated by `$$$$`; a final entry terminated by
    /// end of input instead of a delimiter is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::Parse`] with a 1-based line number for malformed
    /// records, [`SdfError::Inconsistency`] when a charge item does not match
    /// the atom block, and [`SdfError::MissingRecord`] for truncated entries
    /// or inputs with no entries at all.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Vec<SdfEntry>, SdfError> {
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        let last_content = match lines.iter().rposition(|l| !l.trim().is_empty()) {
            Some(pos) => pos,
            None => return Err(SdfError::MissingRecord("structure entries".into())),
        };

        let mut entries = Vec::new();
        let mut idx = 0;
        while idx <= last_content {
            let (entry, next) = Self::read_entry(&lines, idx)?;
            entries.push(entry);
            idx = next;
        }
        Ok(entries)
    }

    fn read_entry(lines: &[String], start: usize) -> Result<(SdfEntry, usize), SdfError> {
        if start + 3 >= lines.len() {
            return Err(SdfError::MissingRecord("counts line".into()));
        }
        let title = lines[start].trim().to_string();

        // Header lines 2 and 3 (program stamp, comment) carry nothing we use.
        let counts = &lines[start + 3];
        let counts_line = start + 4;

        let atom_count_str = slice_and_trim(counts, 0, 3);
        let atom_count: usize = atom_count_str.parse().map_err(|_| SdfError::Parse {
            line: counts_line,
            kind: SdfParseErrorKind::InvalidInt {
                columns: "1-3".into(),
                value: atom_count_str.into(),
            },
        })?;
        let bond_count_str = slice_and_trim(counts, 3, 6);
        let bond_count: usize = bond_count_str.parse().map_err(|_| SdfError::Parse {
            line: counts_line,
            kind: SdfParseErrorKind::InvalidInt {
                columns: "4-6".into(),
                value: bond_count_str.into(),
            },
        })?;
        let version = slice_and_trim(counts, 33, 39);
        if !version.is_empty() && version != "V2000" {
            return Err(SdfError::Parse {
                line: counts_line,
                kind: SdfParseErrorKind::UnsupportedVersion {
                    version: version.into(),
                },
            });
        }

        let mut idx = start + 4;
        let mut atoms = Vec::with_capacity(atom_count);
        for record in 0..atom_count {
            let line = lines.get(idx).ok_or_else(|| {
                SdfError::MissingRecord(format!(
                    "atom record {} of {} in entry '{}'",
                    record + 1,
                    atom_count,
                    title
                ))
            })?;
            let line_num = idx + 1;
            if line.len() < 32 {
                return Err(SdfError::Parse {
                    line: line_num,
                    kind: SdfParseErrorKind::LineTooShort,
                });
            }

            let x_str = slice_and_trim(line, 0, 10);
            let y_str = slice_and_trim(line, 10, 20);
            let z_str = slice_and_trim(line, 20, 30);
            let element_str = slice_and_trim(line, 31, 34);

            let x: f64 = x_str.parse().map_err(|_| SdfError::Parse {
                line: line_num,
                kind: SdfParseErrorKind::InvalidFloat {
                    columns: "1-10".into(),
                    value: x_str.into(),
                },
            })?;
            let y: f64 = y_str.parse().map_err(|_| SdfError::Parse {
                line: line_num,
                kind: SdfParseErrorKind::InvalidFloat {
                    columns: "11-20".into(),
                    value: y_str.into(),
                },
            })?;
            let z: f64 = z_str.parse().map_err(|_| SdfError::Parse {
                line: line_num,
                kind: SdfParseErrorKind::InvalidFloat {
                    columns: "21-30".into(),
                    value: z_str.into(),
                },
            })?;
            if element_str.is_empty() {
                return Err(SdfError::Parse {
                    line: line_num,
                    kind: SdfParseErrorKind::MissingRequiredField {
                        columns: "32-34".into(),
                    },
                });
            }

            atoms.push(MoleculeAtom::new(element_str, Point3::new(x, y, z)));
            idx += 1;
        }

        // Bond block carries connectivity we do not need.
        idx += bond_count;

        loop {
            let line = lines.get(idx).ok_or_else(|| {
                SdfError::MissingRecord(format!("M  END record in entry '{}'", title))
            })?;
            let trimmed = line.trim();
            if trimmed == "$$$$" {
                return Err(SdfError::MissingRecord(format!(
                    "M  END record in entry '{}'",
                    title
                )));
            }
            idx += 1;
            if trimmed == "M  END" {
                break;
            }
        }

        let mut properties = BTreeMap::new();
        loop {
            let Some(line) = lines.get(idx) else {
                break;
            };
            let trimmed = line.trim();
            if trimmed == "$$$$" {
                idx += 1;
                break;
            }
            if trimmed.is_empty() {
                idx += 1;
                continue;
            }
            if !trimmed.starts_with('>') {
                return Err(SdfError::Parse {
                    line: idx + 1,
                    kind: SdfParseErrorKind::ExpectedDataHeader,
                });
            }
            let tag = data_item_tag(trimmed).ok_or(SdfError::Parse {
                line: idx + 1,
                kind: SdfParseErrorKind::InvalidDataHeader,
            })?;
            idx += 1;

            let mut value_lines = Vec::new();
            while let Some(value) = lines.get(idx) {
                let value = value.trim();
                if value == "$$$$" {
                    break;
                }
                idx += 1;
                if value.is_empty() {
                    break;
                }
                value_lines.push(value.to_string());
            }
            properties.insert(tag, value_lines.join("\n"));
        }

        if let Some(raw) = properties.get(PARTIAL_CHARGE_PROPERTY) {
            let mut charges = Vec::new();
            for token in raw.split_whitespace() {
                let charge: f64 = token.parse().map_err(|_| {
                    SdfError::Inconsistency(format!(
                        "Entry '{}' has a non-numeric partial charge: '{}'",
                        title, token
                    ))
                })?;
                charges.push(charge);
            }
            if charges.len() != atoms.len() {
                return Err(SdfError::Inconsistency(format!(
                    "Entry '{}' carries {} partial charges for {} atoms",
                    title,
                    charges.len(),
                    atoms.len()
                )));
            }
            for (atom, charge) in atoms.iter_mut().zip(charges) {
                atom.partial_charge_e = charge;
            }
        }

        Ok((
            SdfEntry {
                title,
                atoms,
                properties,
            },
            idx,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    const ETHANE_LIKE: &str = "\
ethane
  program stamp
  comment
  2  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C
    1.5400    0.0000    0.0000 C
  1  2  1  0
M  END
> <smiles>
CC

> <atom.dprop.PartialCharge>
-0.1 0.1

$$$$
";

    fn parse(content: &str) -> Result<Vec<SdfEntry>, SdfError> {
        SdfFile::read_from(&mut BufReader::new(content.as_bytes()))
    }

    #[test]
    fn parses_single_entry_with_charges() {
        let entries = parse(ETHANE_LIKE).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.title, "ethane");
        assert_eq!(entry.atoms.len(), 2);
        assert_eq!(entry.atoms[0].element, "C");
        assert!((entry.atoms[0].partial_charge_e - (-0.1)).abs() < 1e-12);
        assert!((entry.atoms[1].partial_charge_e - 0.1).abs() < 1e-12);
        assert_eq!(entry.smiles(), Some("CC"));

        let mol = entry.to_small_molecule();
        assert_eq!(mol.name(), "ethane");
        assert_eq!(mol.smiles(), "CC");
        assert!(mol.has_charges());
    }

    #[test]
    fn parses_multiple_entries_and_tolerates_trailing_blanks() {
        let content = format!("{}{}\n\n", ETHANE_LIKE, ETHANE_LIKE);
        let entries = parse(&content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, entries[1].title);
    }

    #[test]
    fn final_entry_may_omit_the_delimiter() {
        let content = ETHANE_LIKE.trim_end_matches("$$$$\n");
        let entries = parse(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].property(PARTIAL_CHARGE_PROPERTY), Some("-0.1 0.1"));
    }

    #[test]
    fn empty_input_is_missing_record() {
        let result = parse("\n\n");
        assert!(matches!(result, Err(SdfError::MissingRecord(_))));
    }

    #[test]
    fn bad_coordinate_reports_line_number() {
        let content = ETHANE_LIKE.replace("    1.5400", "    badval");
        let result = parse(&content);
        match result {
            Err(SdfError::Parse {
                line,
                kind: SdfParseErrorKind::InvalidFloat { columns, value },
            }) => {
                assert_eq!(line, 6);
                assert_eq!(columns, "1-10");
                assert_eq!(value, "badval");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unsupported_version() {
        let content = ETHANE_LIKE.replace("V2000", "V3000");
        let result = parse(&content);
        assert!(matches!(
            result,
            Err(SdfError::Parse {
                line: 4,
                kind: SdfParseErrorKind::UnsupportedVersion { .. },
            })
        ));
    }

    #[test]
    fn truncated_entry_is_missing_record() {
        let content = "ethane\n\n\n  2  1  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C  \n";
        let result = parse(content);
        match result {
            Err(SdfError::MissingRecord(what)) => assert!(what.contains("atom record 2")),
            other => panic!("expected missing record, got {:?}", other),
        }
    }

    #[test]
    fn charge_count_mismatch_is_inconsistency() {
        let content = ETHANE_LIKE.replace("-0.1 0.1", "-0.1 0.05 0.05");
        let result = parse(&content);
        match result {
            Err(SdfError::Inconsistency(msg)) => {
                assert!(msg.contains("3 partial charges for 2 atoms"));
            }
            other => panic!("expected inconsistency, got {:?}", other),
        }
    }

    #[test]
    fn junk_between_data_items_is_rejected() {
        let content = ETHANE_LIKE.replace("> <smiles>", "not a header");
        let result = parse(&content);
        assert!(matches!(
            result,
            Err(SdfError::Parse {
                kind: SdfParseErrorKind::ExpectedDataHeader,
                ..
            })
        ));
    }
}
