//! MDL SDF/MOL V2000 reader.

use glam::Vec3;

use super::{column, normalize_element};
use crate::chem::{Atom, BondOrder, Dimensionality, Molecule};
use crate::error::ParseError;

/// Parse every record of an SDF file.
pub fn parse(text: &str) -> Result<Vec<Molecule>, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut molecules = Vec::new();
    let mut start = 0;

    while start < lines.len() {
        let end = lines[start..]
            .iter()
            .position(|l| l.trim_end() == "$$$$")
            .map_or(lines.len(), |p| start + p);
        let record = &lines[start..end];
        if record.iter().any(|l| !l.trim().is_empty()) {
            molecules.push(parse_record(record, start)?);
        }
        start = end + 1;
    }

    if molecules.is_empty() {
        return Err(ParseError::general("no molecules in SDF input"));
    }
    Ok(molecules)
}

/// Parse one record; `offset` is the record's first line index in the file.
fn parse_record(lines: &[&str], offset: usize) -> Result<Molecule, ParseError> {
    let err = |i: usize, msg: &str| ParseError::at(offset + i + 1, msg);
    if lines.len() < 4 {
        return Err(err(lines.len(), "truncated molfile header"));
    }

    let counts = lines[3];
    if counts.contains("V3000") {
        return Err(err(3, "V3000 molfiles are not supported"));
    }
    let n_atoms: usize = column(counts, 0, 3)
        .parse()
        .map_err(|_| err(3, "invalid atom count"))?;
    let n_bonds: usize = column(counts, 3, 6)
        .parse()
        .map_err(|_| err(3, "invalid bond count"))?;
    if lines.len() < 4 + n_atoms + n_bonds {
        return Err(err(lines.len(), "record shorter than its counts line"));
    }

    let mut mol = Molecule::new(lines[0].trim());
    for (i, line) in lines.iter().enumerate().skip(4).take(n_atoms) {
        let coord = |a: usize, b: usize| {
            column(line, a, b)
                .parse::<f32>()
                .map_err(|_| err(i, "invalid atom coordinate"))
        };
        let position = Vec3::new(coord(0, 10)?, coord(10, 20)?, coord(20, 30)?);
        let element = normalize_element(column(line, 31, 34));
        let _ = mol.add_atom(Atom::new(&element, &element, position));
    }

    for (i, line) in lines.iter().enumerate().skip(4 + n_atoms).take(n_bonds) {
        let index = |a: usize, b: usize| {
            column(line, a, b)
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1 && n <= n_atoms)
                .map(|n| n - 1)
                .ok_or_else(|| err(i, "bond references unknown atom"))
        };
        let order = column(line, 6, 9).parse::<u8>().unwrap_or(1);
        mol.add_bond(index(0, 3)?, index(3, 6)?, BondOrder::from_mdl_code(order));
    }

    let tail = &lines[4 + n_atoms + n_bonds..];
    apply_charges(&mut mol, tail);
    read_properties(&mut mol, tail);

    mol.dimensionality = match column(lines[1], 20, 22) {
        "2D" => Dimensionality::Flat,
        "3D" => Dimensionality::ThreeD,
        _ if mol.atoms.iter().all(|a| a.position.z == 0.0) => {
            Dimensionality::Flat
        }
        _ => Dimensionality::ThreeD,
    };
    Ok(mol)
}

/// `M  CHG` property lines.
fn apply_charges(mol: &mut Molecule, tail: &[&str]) {
    for line in tail.iter().filter(|l| l.starts_with("M  CHG")) {
        let fields: Vec<i32> = line[6..]
            .split_whitespace()
            .filter_map(|t| t.parse().ok())
            .collect();
        for pair in fields.get(1..).unwrap_or(&[]).chunks_exact(2) {
            let idx = (pair[0] - 1) as usize;
            if let Some(atom) = mol.atoms.get_mut(idx) {
                atom.formal_charge = pair[1] as i8;
            }
        }
    }
}

/// `> <name>` data blocks following `M  END`.
fn read_properties(mol: &mut Molecule, tail: &[&str]) {
    let mut lines = tail.iter();
    while let Some(line) = lines.next() {
        if !line.starts_with('>') {
            continue;
        }
        let Some(name) = line
            .split_once('<')
            .and_then(|(_, rest)| rest.split_once('>'))
            .map(|(name, _)| name.to_owned())
        else {
            continue;
        };
        let mut value = Vec::new();
        for data in lines.by_ref() {
            if data.trim().is_empty() {
                break;
            }
            value.push(data.trim_end());
        }
        if name.eq_ignore_ascii_case("smiles") {
            mol.smiles = value.first().map(|s| (*s).to_owned());
        }
        let _ = mol.properties.insert(name, value.join("\n"));
    }
}
