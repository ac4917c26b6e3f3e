//! Structure file readers used by the command line front end.

pub mod pdb;
pub mod sdf;

use std::path::Path;

use super::{Complex, Molecule};
use crate::error::{ParseError, SceneError};

/// What a structure file turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// One or more small molecules (SDF/MOL).
    Molecules(Vec<Molecule>),
    /// A macromolecular structure (PDB).
    Complex(Complex),
}

/// Read a structure file, picking the reader from the extension.
pub fn load(path: &Path) -> Result<Loaded, SceneError> {
    let text = std::fs::read_to_string(path).map_err(SceneError::Io)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    match ext.as_str() {
        "pdb" | "ent" => {
            let mut mol = pdb::parse(&text)?;
            if mol.title.is_empty() {
                stem.clone_into(&mut mol.title);
            }
            Ok(Loaded::Complex(Complex::from_structure(mol)))
        }
        "sdf" | "mol" | "sd" => {
            let mut mols = sdf::parse(&text)?;
            for (i, mol) in mols.iter_mut().enumerate() {
                if mol.title.is_empty() {
                    mol.title = format!("{stem}_{}", i + 1);
                }
            }
            Ok(Loaded::Molecules(mols))
        }
        other => Err(SceneError::Parse(ParseError::general(format!(
            "unsupported structure format '{other}'"
        )))),
    }
}

/// Trimmed fixed-width column `[a, b)`; empty when the line is shorter.
pub(crate) fn column(line: &str, a: usize, b: usize) -> &str {
    line.get(a..b.min(line.len())).unwrap_or("").trim()
}

/// `"CL"` / `"cl"` → `"Cl"`.
pub(crate) fn normalize_element(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = first.to_ascii_uppercase().to_string();
        out.extend(chars.map(|c| c.to_ascii_lowercase()));
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_handles_short_lines() {
        assert_eq!(column("ATOM", 0, 6), "ATOM");
        assert_eq!(column("ATOM", 10, 20), "");
    }

    #[test]
    fn element_capitalization() {
        assert_eq!(normalize_element("CL"), "Cl");
        assert_eq!(normalize_element(" n "), "N");
        assert_eq!(normalize_element(""), "");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = std::env::temp_dir().join("scenebook-io-test.xyzq");
        std::fs::write(&dir, "3\n").unwrap();
        assert!(matches!(load(&dir), Err(SceneError::Parse(_))));
        let _ = std::fs::remove_file(&dir);
    }
}
