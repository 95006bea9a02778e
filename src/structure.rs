//! Minimal XYZ structure model.
//!
//! The `/modal` endpoint returns atomic geometry as XYZ-format text. The
//! 3D viewers consume that text verbatim; this parser exists so the
//! attention styling pass knows the atom count and which atoms are
//! hydrogens (hydrogens keep the base sphere style).

use crate::error::SpbError;

/// One atom record from an XYZ block.
#[derive(Debug, Clone)]
pub struct Atom {
    /// Element symbol as written in the file (e.g. `Zn`, `H`).
    pub element: String,
    /// Cartesian position in Angstroms.
    pub position: [f64; 3],
}

impl Atom {
    /// Whether this atom is a hydrogen (excluded from attention radius
    /// scaling).
    #[must_use]
    pub fn is_hydrogen(&self) -> bool {
        self.element == "H"
    }
}

/// A parsed XYZ structure alongside its raw text.
#[derive(Debug, Clone)]
pub struct XyzStructure {
    raw: String,
    atoms: Vec<Atom>,
}

impl XyzStructure {
    /// Parse XYZ text: a count line, a comment line, then one
    /// `element x y z` record per atom.
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::InvalidResponse`] when the count line is
    /// missing or malformed, a record cannot be parsed, or fewer records
    /// are present than the count line promises.
    pub fn parse(text: &str) -> Result<Self, SpbError> {
        let mut lines = text.lines();

        let count: usize = lines
            .next()
            .ok_or_else(|| {
                SpbError::InvalidResponse("empty xyz block".to_owned())
            })?
            .trim()
            .parse()
            .map_err(|_| {
                SpbError::InvalidResponse(
                    "xyz count line is not an integer".to_owned(),
                )
            })?;

        // Comment line; contents are ignored.
        let _ = lines.next();

        let mut atoms = Vec::with_capacity(count);
        for line in lines {
            if atoms.len() == count {
                break;
            }
            let mut fields = line.split_whitespace();
            let element = fields
                .next()
                .ok_or_else(|| {
                    SpbError::InvalidResponse(format!(
                        "xyz record {} is empty",
                        atoms.len()
                    ))
                })?
                .to_owned();

            let mut position = [0.0_f64; 3];
            for coord in &mut position {
                *coord = fields
                    .next()
                    .and_then(|f| f.parse().ok())
                    .ok_or_else(|| {
                        SpbError::InvalidResponse(format!(
                            "xyz record {} has a bad coordinate",
                            atoms.len()
                        ))
                    })?;
            }

            atoms.push(Atom { element, position });
        }

        if atoms.len() != count {
            return Err(SpbError::InvalidResponse(format!(
                "xyz promises {count} atoms, found {}",
                atoms.len()
            )));
        }

        Ok(Self {
            raw: text.to_owned(),
            atoms,
        })
    }

    /// The raw XYZ text, for viewers that consume the format directly.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed atom records.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Number of atoms in the structure.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
3
water-ish fragment
O 0.000 0.000 0.117
H 0.000 0.757 -0.469
H 0.000 -0.757 -0.469
";

    #[test]
    fn parses_count_elements_and_positions() {
        let s = XyzStructure::parse(SAMPLE).unwrap();
        assert_eq!(s.atom_count(), 3);
        assert_eq!(s.atoms()[0].element, "O");
        assert_eq!(s.atoms()[1].position[1], 0.757);
        assert_eq!(s.raw(), SAMPLE);
    }

    #[test]
    fn hydrogen_detection() {
        let s = XyzStructure::parse(SAMPLE).unwrap();
        assert!(!s.atoms()[0].is_hydrogen());
        assert!(s.atoms()[1].is_hydrogen());
    }

    #[test]
    fn short_block_is_rejected() {
        let truncated = "5\ncomment\nC 0 0 0\n";
        assert!(matches!(
            XyzStructure::parse(truncated),
            Err(SpbError::InvalidResponse(_))
        ));
    }

    #[test]
    fn garbage_count_line_is_rejected() {
        assert!(XyzStructure::parse("atoms\ncomment\n").is_err());
    }
}
