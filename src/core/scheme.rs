//! Numeric genotype encoding schemes
//!
//! A scheme maps a small set of integer codes onto the four genotype
//! classes. Both supported schemes share the `-9` missing sentinel.

use crate::core::error::Num2HapError;
use std::fmt;
use std::str::FromStr;

/// Reserved code for an unobserved genotype
pub const MISSING_CODE: i32 = -9;

/// Output token for a missing genotype
pub const MISSING_TOKEN: &str = "NA";

/// Tokens that already denote a missing value in the input
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// Semantic genotype class of a diploid call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeClass {
    HomozygousReference,
    Heterozygous,
    HomozygousAlternate,
    Missing,
}

/// Supported numeric encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// 0 = REF/REF, 1 = REF/ALT, 2 = ALT/ALT
    #[default]
    ZeroOneTwo,
    /// -1 = REF/REF, 0 = REF/ALT, 1 = ALT/ALT
    MinusOneZeroOne,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::ZeroOneTwo, Scheme::MinusOneZeroOne];

    /// Canonical name, as accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Scheme::ZeroOneTwo => "0/1/2",
            Scheme::MinusOneZeroOne => "-1/0/1",
        }
    }

    /// Every code that is legal under this scheme, missing sentinel included
    pub fn legal_codes(self) -> [i32; 4] {
        match self {
            Scheme::ZeroOneTwo => [0, 1, 2, MISSING_CODE],
            Scheme::MinusOneZeroOne => [-1, 0, 1, MISSING_CODE],
        }
    }

    /// Map an integer code to its genotype class
    #[inline]
    pub fn classify(self, code: i32) -> Option<GenotypeClass> {
        match (self, code) {
            (_, MISSING_CODE) => Some(GenotypeClass::Missing),
            (Scheme::ZeroOneTwo, 0) | (Scheme::MinusOneZeroOne, -1) => {
                Some(GenotypeClass::HomozygousReference)
            }
            (Scheme::ZeroOneTwo, 1) | (Scheme::MinusOneZeroOne, 0) => {
                Some(GenotypeClass::Heterozygous)
            }
            (Scheme::ZeroOneTwo, 2) | (Scheme::MinusOneZeroOne, 1) => {
                Some(GenotypeClass::HomozygousAlternate)
            }
            _ => None,
        }
    }

    /// Inverse of [`Scheme::classify`]
    pub fn code_for(self, class: GenotypeClass) -> i32 {
        let base = match self {
            Scheme::ZeroOneTwo => 0,
            Scheme::MinusOneZeroOne => -1,
        };
        match class {
            GenotypeClass::HomozygousReference => base,
            GenotypeClass::Heterozygous => base + 1,
            GenotypeClass::HomozygousAlternate => base + 2,
            GenotypeClass::Missing => MISSING_CODE,
        }
    }

    /// Interpret a coerced numeric value as a code of this scheme
    ///
    /// Non-integral, non-finite and out-of-domain values yield `None`.
    pub fn code_of(self, value: f64) -> Option<i32> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < i32::MIN as f64 || value > i32::MAX as f64 {
            return None;
        }
        let code = value as i32;
        self.classify(code).map(|_| code)
    }

    /// Check whether a numeric value is legal under this scheme
    #[inline]
    pub fn is_legal(self, value: f64) -> bool {
        self.code_of(value).is_some()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = Num2HapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0/1/2" | "012" => Ok(Scheme::ZeroOneTwo),
            "-1/0/1" | "-101" => Ok(Scheme::MinusOneZeroOne),
            other => Err(Num2HapError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// A genotype cell after tolerant numeric coercion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    /// Parsed as a number (not necessarily a legal code)
    Number(f64),
    /// Empty, an NA-like token, or NaN
    Missing,
    /// Anything else that does not parse as a number
    Text,
}

/// Coerce a raw cell token to a number
///
/// Missing tokens and unparseable text are not numbers; they are never
/// reported as illegal values.
pub fn coerce_cell(token: &str) -> CellValue {
    let token = token.trim();
    if MISSING_TOKENS.contains(&token) {
        return CellValue::Missing;
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_nan() => CellValue::Missing,
        Ok(value) => CellValue::Number(value),
        Err(_) => CellValue::Text,
    }
}

/// Per-marker code to allele-pair mapping
///
/// Built from the scheme and the marker's own REF/ALT letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleMap {
    scheme: Scheme,
    hom_ref: String,
    het: String,
    hom_alt: String,
}

impl AlleleMap {
    pub fn new(scheme: Scheme, ref_allele: &str, alt_allele: &str) -> Self {
        let pair = |a: &str, b: &str| {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            s
        };
        Self {
            scheme,
            hom_ref: pair(ref_allele, ref_allele),
            het: pair(ref_allele, alt_allele),
            hom_alt: pair(alt_allele, alt_allele),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Allele pair for a genotype class
    pub fn pair(&self, class: GenotypeClass) -> &str {
        match class {
            GenotypeClass::HomozygousReference => &self.hom_ref,
            GenotypeClass::Heterozygous => &self.het,
            GenotypeClass::HomozygousAlternate => &self.hom_alt,
            GenotypeClass::Missing => MISSING_TOKEN,
        }
    }

    /// Map an allele pair back to its code
    ///
    /// When REF equals ALT the pairs coincide and the homozygous-reference
    /// code wins.
    pub fn code_of_pair(&self, pair: &str) -> Option<i32> {
        let class = if pair == self.hom_ref {
            GenotypeClass::HomozygousReference
        } else if pair == self.het {
            GenotypeClass::Heterozygous
        } else if pair == self.hom_alt {
            GenotypeClass::HomozygousAlternate
        } else if pair == MISSING_TOKEN {
            GenotypeClass::Missing
        } else {
            return None;
        };
        Some(self.scheme.code_for(class))
    }
}
