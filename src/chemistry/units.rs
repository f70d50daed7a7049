//! Mass concentration to charge equivalence conversion.
//!
//! `meq/L = mg/L / molar_mass * charge`. Negative or non-finite inputs are
//! refused rather than converted, so a bad cell can never turn into a
//! plausible-looking equivalent.

use crate::config::{IonSpec, IonTable};
use crate::error::InvalidValue;
use crate::model::{Concentrations, Equivalents, Ion};

/// Converts one concentration (mg/L) to meq/L.
pub fn mg_l_to_meq(concentration: f64, spec: IonSpec) -> Result<f64, InvalidValue> {
    if !concentration.is_finite() {
        return Err(InvalidValue::NonFinite);
    }
    if concentration < 0.0 {
        return Err(InvalidValue::Negative);
    }
    Ok(concentration / spec.molar_mass * f64::from(spec.charge))
}

/// Converts every major ion of a sample.
///
/// On failure returns the first offending ion with its reason.
pub fn to_equivalents(
    concentrations: &Concentrations,
    ions: &IonTable,
) -> Result<Equivalents, (Ion, InvalidValue)> {
    let convert = |ion: Ion| mg_l_to_meq(concentrations.ion(ion), ions.spec(ion)).map_err(|e| (ion, e));
    Ok(Equivalents {
        na: convert(Ion::Na)?,
        ca: convert(Ion::Ca)?,
        mg: convert(Ion::Mg)?,
        cl: convert(Ion::Cl)?,
        hco3: convert(Ion::Hco3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(na: f64, cl: f64) -> Concentrations {
        Concentrations {
            na,
            ca: 40.0,
            mg: 24.3,
            cl,
            hco3: 61.0,
            ec: 500.0,
        }
    }

    #[test]
    fn test_one_molar_mass_of_monovalent_ion_is_one_meq() {
        let ions = IonTable::default();
        assert_eq!(mg_l_to_meq(23.0, ions.na), Ok(1.0));
        assert_eq!(mg_l_to_meq(61.0, ions.hco3), Ok(1.0));
    }

    #[test]
    fn test_divalent_ions_are_doubled() {
        let ions = IonTable::default();
        assert_eq!(mg_l_to_meq(40.0, ions.ca), Ok(2.0));
        let mg = mg_l_to_meq(24.3, ions.mg).expect("valid concentration");
        assert!((mg - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_concentration_is_zero_meq() {
        assert_eq!(mg_l_to_meq(0.0, IonTable::default().cl), Ok(0.0));
    }

    #[test]
    fn test_negative_concentration_is_rejected() {
        assert_eq!(
            mg_l_to_meq(-1.0, IonTable::default().na),
            Err(InvalidValue::Negative)
        );
    }

    #[test]
    fn test_nan_concentration_is_rejected() {
        assert_eq!(
            mg_l_to_meq(f64::NAN, IonTable::default().na),
            Err(InvalidValue::NonFinite)
        );
    }

    #[test]
    fn test_to_equivalents_converts_all_ions() {
        let eq = to_equivalents(&sample(23.0, 35.45), &IonTable::default())
            .expect("valid sample should convert");
        assert_eq!(eq.na, 1.0);
        assert_eq!(eq.cl, 1.0);
        assert_eq!(eq.ca, 2.0);
        assert_eq!(eq.hco3, 1.0);
    }

    #[test]
    fn test_to_equivalents_reports_offending_ion() {
        let result = to_equivalents(&sample(23.0, -5.0), &IonTable::default());
        assert_eq!(result, Err((Ion::Cl, InvalidValue::Negative)));
    }
}
