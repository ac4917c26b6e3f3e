//! Minimal PDB reader: ATOM/HETATM, CONECT, TITLE/HEADER. Only the first
//! model of a multi-model file is read.

use std::collections::BTreeSet;

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{column, normalize_element};
use crate::chem::{Atom, BondOrder, Molecule, Residue};
use crate::error::ParseError;

/// Parse PDB text into a single molecule with residue context.
pub fn parse(text: &str) -> Result<Molecule, ParseError> {
    let mut mol = Molecule::default();
    let mut serial_to_index: FxHashMap<i32, usize> = FxHashMap::default();
    let mut bonds: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut title = String::new();
    let mut id_code = String::new();
    let mut in_first_model = true;

    for (i, line) in text.lines().enumerate() {
        let lineno = i + 1;
        let record = column(line, 0, 6);
        match record {
            "ATOM" | "HETATM" if in_first_model => {
                let (serial, atom) = parse_atom(line, lineno)?;
                let index = mol.add_atom(atom);
                let _ = serial_to_index.insert(serial, index);
            }
            "ENDMDL" => in_first_model = false,
            "CONECT" => {
                let Some(&from) = parse_serial(line, 6, 11)
                    .and_then(|s| serial_to_index.get(&s))
                else {
                    continue;
                };
                for start in [11, 16, 21, 26] {
                    if let Some(&to) = parse_serial(line, start, start + 5)
                        .and_then(|s| serial_to_index.get(&s))
                    {
                        if from != to {
                            let _ = bonds.insert((from.min(to), from.max(to)));
                        }
                    }
                }
            }
            "TITLE" => {
                let text = line.get(10..).unwrap_or("").trim();
                if !title.is_empty() && !text.is_empty() {
                    title.push(' ');
                }
                title.push_str(text);
            }
            "HEADER" => column(line, 62, 66).clone_into(&mut id_code),
            _ => {}
        }
    }

    if mol.atoms.is_empty() {
        return Err(ParseError::general("no ATOM/HETATM records"));
    }
    for (a, b) in bonds {
        mol.add_bond(a, b, BondOrder::Single);
    }
    mol.title = if title.is_empty() { id_code } else { title };
    Ok(mol)
}

fn parse_atom(line: &str, lineno: usize) -> Result<(i32, Atom), ParseError> {
    if line.len() < 54 {
        return Err(ParseError::at(lineno, "truncated atom record"));
    }
    let coord = |a: usize, b: usize, axis: &str| {
        column(line, a, b).parse::<f32>().map_err(|_| {
            ParseError::at(lineno, format!("invalid {axis} coordinate"))
        })
    };
    let position = Vec3::new(
        coord(30, 38, "x")?,
        coord(38, 46, "y")?,
        coord(46, 54, "z")?,
    );
    let serial = column(line, 6, 11).parse::<i32>().unwrap_or(0);
    let name = column(line, 12, 16);
    let number = column(line, 22, 26)
        .parse::<i32>()
        .map_err(|_| ParseError::at(lineno, "invalid residue number"))?;

    let element = match column(line, 76, 78) {
        "" => name
            .chars()
            .find(char::is_ascii_alphabetic)
            .map(String::from)
            .unwrap_or_default(),
        sym => normalize_element(sym),
    };

    let residue = Residue {
        name: column(line, 17, 20).to_owned(),
        number,
        chain: column(line, 21, 22).to_owned(),
        insertion: column(line, 26, 27).chars().next(),
    };
    let mut atom = Atom::new(name, &element, position).with_residue(residue);
    atom.hetero = line.starts_with("HETATM");
    atom.formal_charge = parse_charge(column(line, 78, 80));
    Ok((serial, atom))
}

fn parse_serial(line: &str, a: usize, b: usize) -> Option<i32> {
    column(line, a, b).parse().ok()
}

/// PDB charge column, e.g. `"2+"` or `"1-"`.
fn parse_charge(field: &str) -> i8 {
    let mut chars = field.chars();
    let (Some(digit), Some(sign)) = (chars.next(), chars.next()) else {
        return 0;
    };
    let magnitude = digit.to_digit(10).unwrap_or(0) as i8;
    if sign == '-' {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRAMBIN_FRAGMENT: &str = "\
HEADER    PLANT PROTEIN                           30-APR-81   1CRN
TITLE     WATER STRUCTURE OF A HYDROPHOBIC PROTEIN
ATOM      1  N   THR A   1      17.047  14.099   3.625  1.00 13.79           N
ATOM      2  CA  THR A   1      16.967  12.784   4.338  1.00 10.80           C
HETATM    3  O   HOH B 101      10.000  10.000  10.000  1.00 20.00           O
HETATM    4 FE   HEM C 201       1.000   2.000   3.000  1.00 20.00          FE2+
CONECT    1    2
CONECT    2    1
END
";

    #[test]
    fn reads_atoms_residues_and_title() {
        let mol = parse(CRAMBIN_FRAGMENT).unwrap();
        assert_eq!(mol.title, "WATER STRUCTURE OF A HYDROPHOBIC PROTEIN");
        assert_eq!(mol.atoms.len(), 4);

        let ca = &mol.atoms[1];
        assert_eq!(ca.name, "CA");
        assert_eq!(ca.element, "C");
        let res = ca.residue.as_ref().unwrap();
        assert_eq!((res.name.as_str(), res.number, res.chain.as_str()), ("THR", 1, "A"));
        assert!(!ca.hetero);

        let fe = &mol.atoms[3];
        assert!(fe.hetero);
        assert_eq!(fe.element, "Fe");
        assert_eq!(fe.formal_charge, 2);
    }

    #[test]
    fn conect_records_are_deduplicated() {
        let mol = parse(CRAMBIN_FRAGMENT).unwrap();
        assert_eq!(mol.bonds.len(), 1);
        assert_eq!((mol.bonds[0].a, mol.bonds[0].b), (0, 1));
    }

    #[test]
    fn only_first_model_is_read() {
        let text = "\
MODEL        1
ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  GLY A   1       1.000   0.000   0.000  1.00  0.00           C
ENDMDL
";
        assert_eq!(parse(text).unwrap().atoms.len(), 1);
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(parse("END\n").is_err());
    }

    #[test]
    fn bad_coordinate_reports_line() {
        let text =
            "ATOM      1  CA  GLY A   1       x.xxx   0.000   0.000  1.00  0.00           C\n";
        assert_eq!(parse(text).unwrap_err().line, Some(1));
    }
}
