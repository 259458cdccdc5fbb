//! Axis specifications and grid expansion.
//!
//! Every simulation parameter can be declared as a single value, an
//! explicit set `{a,b,c}`, or (for numeric parameters) an arithmetic
//! range `[min:max]` / `[min:max:step]` with an inclusive upper bound.
//! The grid is the Cartesian product of all axes, deduplicated while
//! preserving first-occurrence order.

use std::collections::HashSet;
use std::str::FromStr;

use ordered_float::OrderedFloat;

use synrec_core::synteny::Synteny;
use synrec_sim::SimulationParams;

/// Malformed axis specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A scalar inside a spec failed to parse.
    #[error("cannot parse '{text}' as a {expected}")]
    InvalidValue {
        /// The offending scalar text.
        text: String,
        /// What was expected.
        expected: &'static str,
    },

    /// A range was malformed (missing bounds, bad step, inverted bounds).
    #[error("malformed range '{text}'; expected [min:max] or [min:max:step] with step > 0 and min <= max")]
    InvalidRange {
        /// The offending spec text.
        text: String,
    },

    /// A range was given for an axis that only supports values and sets.
    #[error("axis does not support ranges: '{text}'")]
    RangeUnsupported {
        /// The offending spec text.
        text: String,
    },

    /// A spec expanded to no values.
    #[error("axis spec '{text}' is empty")]
    Empty {
        /// The offending spec text.
        text: String,
    },
}

/// Syntactic shape of one axis spec.
enum Shape<'a> {
    Single(&'a str),
    Set(Vec<&'a str>),
    Range(&'a str),
}

fn shape(text: &str) -> Shape<'_> {
    let trimmed = text.trim();
    if let Some(inner) = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        return Shape::Set(inner.split(',').map(str::trim).collect());
    }
    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return Shape::Range(inner);
    }
    Shape::Single(trimmed)
}

/// Parse an axis that admits single values and sets only (syntenies).
///
/// # Errors
///
/// [`GridError`] on malformed scalars, empty sets, or a range spec.
pub fn parse_axis<T>(text: &str, expected: &'static str) -> Result<Vec<T>, GridError>
where
    T: FromStr,
{
    let scalar = |piece: &str| {
        piece.parse::<T>().map_err(|_| GridError::InvalidValue {
            text: piece.to_owned(),
            expected,
        })
    };
    let values = match shape(text) {
        Shape::Single(piece) => vec![scalar(piece)?],
        Shape::Set(pieces) => pieces
            .into_iter()
            .map(scalar)
            .collect::<Result<Vec<_>, _>>()?,
        Shape::Range(_) => {
            return Err(GridError::RangeUnsupported {
                text: text.to_owned(),
            });
        }
    };
    if values.is_empty() {
        return Err(GridError::Empty {
            text: text.to_owned(),
        });
    }
    Ok(values)
}

/// Parse a floating-point axis: single value, set, or range with a
/// default step of 1.
///
/// # Errors
///
/// [`GridError`] on malformed scalars or ranges.
pub fn parse_f64_axis(text: &str) -> Result<Vec<f64>, GridError> {
    match shape(text) {
        Shape::Range(inner) => expand_range(text, inner),
        _ => parse_axis(text, "number"),
    }
}

/// Parse an unsigned integer axis: single value, set, or range.
///
/// # Errors
///
/// [`GridError`] on malformed scalars or ranges, or values that are not
/// whole numbers.
pub fn parse_u32_axis(text: &str) -> Result<Vec<u32>, GridError> {
    match shape(text) {
        Shape::Range(inner) => expand_range(text, inner)?
            .into_iter()
            .map(|value| {
                let rounded = value.round();
                if (value - rounded).abs() < f64::EPSILON && rounded >= 0.0 {
                    Ok(rounded as u32)
                } else {
                    Err(GridError::InvalidValue {
                        text: value.to_string(),
                        expected: "unsigned integer",
                    })
                }
            })
            .collect(),
        _ => parse_axis(text, "unsigned integer"),
    }
}

/// Expand `min:max[:step]` inclusively, tolerating float rounding at the
/// upper bound.
fn expand_range(text: &str, inner: &str) -> Result<Vec<f64>, GridError> {
    let malformed = || GridError::InvalidRange {
        text: text.to_owned(),
    };
    let pieces: Vec<&str> = inner.split(':').map(str::trim).collect();
    let (min, max, step) = match pieces.as_slice() {
        [min, max] => (min, max, "1"),
        [min, max, step] => (min, max, *step),
        _ => return Err(malformed()),
    };
    let min: f64 = min.parse().map_err(|_| malformed())?;
    let max: f64 = max.parse().map_err(|_| malformed())?;
    let step: f64 = step.parse().map_err(|_| malformed())?;
    if !(step > 0.0) || min > max {
        return Err(malformed());
    }

    let mut values = Vec::new();
    let mut index = 0_u32;
    loop {
        let value = step.mul_add(f64::from(index), min);
        if value > max + step * 1e-9 {
            break;
        }
        values.push(value);
        index += 1;
    }
    Ok(values)
}

/// One parsed axis per simulation parameter.
#[derive(Debug, Clone)]
pub struct GridSpec {
    /// Ancestral syntenies (single value or set).
    pub base: Vec<Synteny>,
    /// Tree depths.
    pub depth: Vec<u32>,
    /// Duplication probabilities.
    pub p_dup: Vec<f64>,
    /// Duplication-length geometric parameters.
    pub p_dup_length: Vec<f64>,
    /// Loss probabilities.
    pub p_loss: Vec<f64>,
    /// Loss-length geometric parameters.
    pub p_loss_length: Vec<f64>,
    /// Rearrangement geometric parameters.
    pub p_rearr: Vec<f64>,
}

impl GridSpec {
    /// The Cartesian product of all axes, deduplicated in
    /// first-occurrence order.
    #[must_use]
    pub fn expand(&self) -> Vec<SimulationParams> {
        let mut seen = HashSet::new();
        let mut points = Vec::new();
        for base in &self.base {
            for &depth in &self.depth {
                for &p_dup in &self.p_dup {
                    for &p_dup_length in &self.p_dup_length {
                        for &p_loss in &self.p_loss {
                            for &p_loss_length in &self.p_loss_length {
                                for &p_rearr in &self.p_rearr {
                                    let params = SimulationParams {
                                        base: base.clone(),
                                        depth,
                                        p_dup: OrderedFloat(p_dup),
                                        p_dup_length: OrderedFloat(p_dup_length),
                                        p_loss: OrderedFloat(p_loss),
                                        p_loss_length: OrderedFloat(p_loss_length),
                                        p_rearr: OrderedFloat(p_rearr),
                                    };
                                    if seen.insert(params.clone()) {
                                        points.push(params);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        points
    }
}
