//! Diagnostic ionic ratios.
//!
//! Na/Cl near unity points at seawater; Cl/HCO3 tracks chloride dominance.
//! A zero denominator yields `Ratio::Undefined`.

use crate::model::{Equivalents, Ratio, Ratios};

/// Divides two meq/L values, returning `Undefined` instead of NaN or infinity.
pub fn ratio(numerator: f64, denominator: f64) -> Ratio {
    if denominator == 0.0 {
        return Ratio::Undefined;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        Ratio::Defined(value)
    } else {
        Ratio::Undefined
    }
}

pub fn compute_ratios(eq: &Equivalents) -> Ratios {
    Ratios {
        na_cl: ratio(eq.na, eq.cl),
        cl_hco3: ratio(eq.cl, eq.hco3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::units::mg_l_to_meq;
    use crate::config::IonTable;

    fn equivalents(na: f64, cl: f64, hco3: f64) -> Equivalents {
        Equivalents {
            na,
            ca: 0.0,
            mg: 0.0,
            cl,
            hco3,
        }
    }

    #[test]
    fn test_equal_meq_sodium_and_chloride_give_unit_ratio() {
        let ions = IonTable::default();
        let na = mg_l_to_meq(23.0, ions.na).expect("valid");
        let cl = mg_l_to_meq(35.45, ions.cl).expect("valid");
        assert_eq!(ratio(na, cl), Ratio::Defined(1.0));
    }

    #[test]
    fn test_zero_chloride_makes_na_cl_undefined() {
        let ratios = compute_ratios(&equivalents(2.0, 0.0, 1.0));
        assert_eq!(ratios.na_cl, Ratio::Undefined);
        assert_eq!(ratios.cl_hco3, Ratio::Defined(0.0));
    }

    #[test]
    fn test_zero_bicarbonate_makes_cl_hco3_undefined() {
        let ratios = compute_ratios(&equivalents(1.0, 3.0, 0.0));
        assert_eq!(ratios.cl_hco3, Ratio::Undefined);
        assert_eq!(ratios.na_cl, Ratio::Defined(1.0 / 3.0));
    }

    #[test]
    fn test_zero_over_zero_is_undefined_not_nan() {
        assert_eq!(ratio(0.0, 0.0), Ratio::Undefined);
    }

    #[test]
    fn test_overflowing_quotient_is_undefined() {
        assert_eq!(ratio(f64::MAX, 1e-300), Ratio::Undefined);
    }
}
