//! PDB writer for multi-component complexes.
//!
//! Components are written in order with one continuous serial sequence.
//! Polymer atoms become ATOM records, everything else HETATM. A TER record
//! closes each polymer chain. Bonds touching a hetero atom are written as
//! CONECT records; polymer connectivity is left to the reader.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use crate::chem::{Atom, Complex, ComponentRole};
use crate::error::SerializationError;

const MAX_SERIAL: usize = 99_999;
const RESIDUE_RANGE: std::ops::RangeInclusive<i32> = -999..=9999;
const COORD_RANGE: std::ops::RangeInclusive<f32> = -999.999..=9999.999;

struct Record<'a> {
    atom: &'a Atom,
    hetero: bool,
    res_name: &'a str,
    res_number: i32,
    chain: &'a str,
    insertion: char,
}

/// Write a complex as PDB text.
pub fn write(entity: &str, complex: &Complex) -> Result<String, SerializationError> {
    let fail = |reason: String| SerializationError::new(entity, reason);
    if complex.atom_count() == 0 {
        return Err(fail("structure has no atoms".to_owned()));
    }

    let mut out = String::new();
    let mut serial = 0usize;
    // serial of each atom, per component
    let mut serials: Vec<Vec<usize>> = Vec::with_capacity(complex.components.len());
    // previous polymer atom still waiting for its TER
    let mut open_chain: Option<(String, &str, i32)> = None;

    write_title(&mut out, &complex.title).map_err(|e| fail(e.to_string()))?;

    for component in &complex.components {
        let mut component_serials = Vec::with_capacity(component.molecule.atoms.len());
        for atom in &component.molecule.atoms {
            let record = record_for(atom, component.role);
            check(&record).map_err(fail)?;

            let continues = open_chain
                .as_ref()
                .is_some_and(|(chain, _, _)| !record.hetero && chain == record.chain);
            if !continues {
                if let Some((chain, res_name, res_number)) = open_chain.take() {
                    serial = next_serial(serial).map_err(fail)?;
                    write_ter(&mut out, serial, res_name, &chain, res_number)
                        .map_err(|e| fail(e.to_string()))?;
                }
            }

            serial = next_serial(serial).map_err(fail)?;
            write_atom(&mut out, serial, &record).map_err(|e| fail(e.to_string()))?;
            component_serials.push(serial);

            if !record.hetero {
                open_chain =
                    Some((record.chain.to_owned(), record.res_name, record.res_number));
            }
        }
        // polymer chains never continue across components
        if let Some((chain, res_name, res_number)) = open_chain.take() {
            serial = next_serial(serial).map_err(fail)?;
            write_ter(&mut out, serial, res_name, &chain, res_number)
                .map_err(|e| fail(e.to_string()))?;
        }
        serials.push(component_serials);
    }

    write_conect(&mut out, complex, &serials).map_err(|e| fail(e.to_string()))?;
    out.push_str("END\n");
    Ok(out)
}

fn record_for(atom: &Atom, role: ComponentRole) -> Record<'_> {
    let hetero = atom.hetero || role.is_hetero();
    let default_name = match role {
        ComponentRole::Solvent => "HOH",
        ComponentRole::Protein | ComponentRole::NucleicAcid => "UNK",
        ComponentRole::Ligand | ComponentRole::Other => "UNL",
    };
    match &atom.residue {
        Some(res) => Record {
            atom,
            hetero,
            res_name: res.name.trim(),
            res_number: res.number,
            chain: res.chain.trim(),
            insertion: res.insertion.unwrap_or(' '),
        },
        None => Record {
            atom,
            hetero,
            res_name: default_name,
            res_number: 1,
            chain: "",
            insertion: ' ',
        },
    }
}

fn check(record: &Record<'_>) -> Result<(), String> {
    let atom = record.atom;
    if record.chain.chars().count() > 1 {
        return Err(format!(
            "chain id '{}' does not fit the single-character PDB column",
            record.chain
        ));
    }
    if !RESIDUE_RANGE.contains(&record.res_number) {
        return Err(format!(
            "residue number {} does not fit the PDB column",
            record.res_number
        ));
    }
    if !atom.position.is_finite() {
        return Err(format!("atom '{}' has non-finite coordinates", atom.name));
    }
    if !atom.position.to_array().iter().all(|c| COORD_RANGE.contains(c)) {
        return Err(format!(
            "atom '{}' coordinates do not fit the PDB columns",
            atom.name
        ));
    }
    Ok(())
}

fn next_serial(serial: usize) -> Result<usize, String> {
    if serial >= MAX_SERIAL {
        Err(format!("more than {MAX_SERIAL} records"))
    } else {
        Ok(serial + 1)
    }
}

fn write_title(out: &mut String, title: &str) -> fmt::Result {
    let title: String = title.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = title.chars().collect();
    for (i, chunk) in chars.chunks(70).enumerate() {
        let cont = if i > 0 {
            format!("{:>2} ", i + 1)
        } else {
            "   ".to_owned()
        };
        writeln!(out, "TITLE  {cont}{}", chunk.iter().collect::<String>())?;
    }
    Ok(())
}

fn write_atom(out: &mut String, serial: usize, r: &Record<'_>) -> fmt::Result {
    let atom = r.atom;
    let record = if r.hetero { "HETATM" } else { "ATOM  " };
    let res_name: String = r.res_name.chars().take(3).collect();
    let chain = if r.chain.is_empty() { " " } else { r.chain };
    writeln!(
        out,
        "{record}{serial:5} {:4} {res_name:>3} {chain}{:4}{}   {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}{}",
        format_atom_name(&atom.name, &atom.element),
        r.res_number,
        r.insertion,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        1.0,
        0.0,
        atom.element.to_ascii_uppercase(),
        format_charge(atom.formal_charge),
    )
}

fn write_ter(
    out: &mut String,
    serial: usize,
    res_name: &str,
    chain: &str,
    res_number: i32,
) -> fmt::Result {
    let res_name: String = res_name.chars().take(3).collect();
    let chain = if chain.is_empty() { " " } else { chain };
    writeln!(out, "TER   {serial:5}      {res_name:>3} {chain}{res_number:4}")
}

fn write_conect(
    out: &mut String,
    complex: &Complex,
    serials: &[Vec<usize>],
) -> fmt::Result {
    let mut partners: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (component, component_serials) in complex.components.iter().zip(serials) {
        let role_hetero = component.role.is_hetero();
        let atoms = &component.molecule.atoms;
        for bond in &component.molecule.bonds {
            let (Some(a), Some(b)) = (atoms.get(bond.a), atoms.get(bond.b)) else {
                continue;
            };
            if !(role_hetero || a.hetero || b.hetero) {
                continue;
            }
            let (sa, sb) = (component_serials[bond.a], component_serials[bond.b]);
            partners.entry(sa).or_default().push(sb);
            partners.entry(sb).or_default().push(sa);
        }
    }
    for (serial, mut bonded) in partners {
        bonded.sort_unstable();
        bonded.dedup();
        for chunk in bonded.chunks(4) {
            write!(out, "CONECT{serial:5}")?;
            for partner in chunk {
                write!(out, "{partner:5}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Four-column atom name: one-letter elements start in the second column.
fn format_atom_name(name: &str, element: &str) -> String {
    let name = name.trim();
    if name.chars().count() >= 4 {
        name.chars().take(4).collect()
    } else if element.len() == 1 && !name.starts_with(char::is_numeric) {
        format!(" {name:<3}")
    } else {
        format!("{name:<4}")
    }
}

/// `"2+"`, `"1-"`, or blank.
fn format_charge(charge: i8) -> String {
    match charge {
        0 => "  ".to_owned(),
        c if c > 0 => format!("{c}+"),
        c => format!("{}-", c.unsigned_abs()),
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::chem::io::pdb::parse;
    use crate::chem::{BondOrder, Molecule, Residue};

    fn protein() -> Molecule {
        let mut m = Molecule::new("prot");
        for (i, chain) in ["A", "A", "B"].into_iter().enumerate() {
            let _ = m.add_atom(
                Atom::new("CA", "C", Vec3::new(i as f32, 0.0, 0.0))
                    .with_residue(Residue::new("GLY", 10 + i as i32, chain)),
            );
        }
        m
    }

    fn ligand() -> Molecule {
        let mut m = Molecule::new("lig");
        let a = m.add_atom(Atom::new("C1", "C", Vec3::new(5.0, 5.0, 5.0)));
        let b = m.add_atom(Atom::new("N1", "N", Vec3::new(6.0, 5.0, 5.0)));
        m.add_bond(a, b, BondOrder::Single);
        m
    }

    fn complex() -> Complex {
        Complex::new("test complex")
            .with_component(ComponentRole::Protein, protein())
            .with_component(ComponentRole::Ligand, ligand())
    }

    #[test]
    fn chains_are_terminated_and_ligand_is_hetero() {
        let text = write("cx", &complex()).unwrap();
        let records: Vec<_> = text.lines().map(|l| l.get(..6).unwrap_or(l)).collect();
        assert_eq!(
            records,
            vec![
                "TITLE ", "ATOM  ", "ATOM  ", "TER   ", "ATOM  ", "TER   ",
                "HETATM", "HETATM", "CONECT", "CONECT", "END",
            ]
        );
        assert!(text.contains("CONECT    6    7\n"));
    }

    #[test]
    fn residue_numbers_and_chains_survive() {
        let text = write("cx", &complex()).unwrap();
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.atoms.len(), 5);
        let residues: Vec<_> = parsed
            .atoms
            .iter()
            .map(|a| {
                let r = a.residue.as_ref().unwrap();
                (r.chain.clone(), r.number)
            })
            .collect();
        assert_eq!(
            residues,
            vec![
                ("A".to_owned(), 10),
                ("A".to_owned(), 11),
                ("B".to_owned(), 12),
                (String::new(), 1),
                (String::new(), 1),
            ]
        );
        assert_eq!(parsed.bonds.len(), 1);
        assert_eq!(parsed.title, "test complex");
    }

    #[test]
    fn atom_line_layout() {
        let text = write("cx", &complex()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "ATOM      1  CA  GLY A  10       0.000   0.000   0.000  1.00  0.00           C  "
        );
    }

    #[test]
    fn multi_character_chain_is_rejected() {
        let mut m = Molecule::new("p");
        let _ = m.add_atom(
            Atom::new("CA", "C", Vec3::ZERO).with_residue(Residue::new("GLY", 1, "AB")),
        );
        let err = write("long", &Complex::from_structure(m)).unwrap_err();
        assert_eq!(err.entity, "long");
        assert!(err.reason.contains("AB"));
    }

    #[test]
    fn empty_and_out_of_range_are_rejected() {
        assert!(write("e", &Complex::new("e")).is_err());

        let mut m = Molecule::new("far");
        let _ = m.add_atom(Atom::new("CA", "C", Vec3::new(1.0e6, 0.0, 0.0)));
        assert!(write("far", &Complex::from_structure(m)).is_err());

        let mut m = Molecule::new("nan");
        let _ = m.add_atom(Atom::new("CA", "C", Vec3::new(0.0, f32::INFINITY, 0.0)));
        assert!(write("nan", &Complex::from_structure(m)).is_err());
    }

    #[test]
    fn charges_are_formatted() {
        assert_eq!(format_charge(2), "2+");
        assert_eq!(format_charge(-1), "1-");
        assert_eq!(format_charge(0), "  ");
        assert_eq!(format_atom_name("CA", "C"), " CA ");
        assert_eq!(format_atom_name("FE", "Fe"), "FE  ");
    }
}
