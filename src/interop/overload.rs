//! Overload ranking for constructor and method calls.
//!
//! A ranker orders candidate parameter lists against the script arguments of
//! one call. Candidates are then tried best-first; a candidate whose argument
//! conversion or invocation fails is discarded and the next one is tried.

use std::cmp::Reverse;

use crate::error::{BridgeResult, HostError};
use crate::host::{
    HostValue, ParamEntry, array_type, object_type, primitive_type, script_value_type,
    string_type,
};
use crate::primitive_kind::PrimitiveKind;
use crate::script::ScriptValue;

use super::converter::convert_to;

/// Orders overload candidates for a call.
pub trait OverloadRanker {
    /// Indices into `candidates`, best first. Candidates that cannot accept
    /// `args` at all are left out.
    fn rank(&self, candidates: &[&[ParamEntry]], args: &[ScriptValue]) -> Vec<usize>;
}

/// Ranks candidates by total argument conversion cost.
///
/// Ties prefer the candidate with more exact matches, then declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostRanker;

impl CostRanker {
    /// No conversion needed.
    pub const COST_EXACT: u32 = 0;
    /// Pass-through to a `ScriptValue` parameter.
    pub const COST_SCRIPT_VALUE: u32 = 1;
    /// Whole number to an enum constant.
    pub const COST_ENUM: u32 = 2;
    /// Integer to a wider integer.
    pub const COST_PRIMITIVE_WIDENING: u32 = 3;
    /// Integer to a floating-point kind.
    pub const COST_INT_TO_FLOAT: u32 = 4;
    /// Integer to a narrower or unsigned kind, double to float, number to bool.
    pub const COST_PRIMITIVE_NARROWING: u32 = 5;
    /// Fractional number to an integer kind.
    pub const COST_FLOAT_TO_INT: u32 = 6;
    /// Host instance to a base class or interface, null to a reference type.
    pub const COST_REFERENCE_CAST: u32 = 7;
    /// Number or boolean formatted as a string.
    pub const COST_TO_STRING: u32 = 8;
    /// String parsed as a number or boolean.
    pub const COST_STRING_PARSE: u32 = 9;
    /// Anything boxed as `object`.
    pub const COST_TO_OBJECT: u32 = 10;

    pub fn new() -> Self {
        Self
    }

    /// Conversion cost of one argument to one parameter, or `None` when no
    /// conversion exists.
    pub fn cost(&self, arg: &ScriptValue, param: &ParamEntry) -> Option<u32> {
        let ty = &param.ty;
        if *ty == script_value_type() {
            return Some(Self::COST_SCRIPT_VALUE);
        }
        let to_object = (*ty == object_type()).then_some(Self::COST_TO_OBJECT);

        match arg {
            ScriptValue::Undefined => None,
            ScriptValue::Null => (!ty.is_value_type()).then_some(Self::COST_REFERENCE_CAST),
            ScriptValue::Boolean(_) => match ty.primitive_kind() {
                Some(PrimitiveKind::Bool) => Some(Self::COST_EXACT),
                Some(_) => Some(Self::COST_PRIMITIVE_NARROWING),
                None if *ty == string_type() => Some(Self::COST_TO_STRING),
                None => to_object,
            },
            ScriptValue::String(_) => {
                if *ty == string_type() {
                    Some(Self::COST_EXACT)
                } else if ty.primitive_kind().is_some() || ty.is_enum() {
                    Some(Self::COST_STRING_PARSE)
                } else {
                    to_object
                }
            }
            ScriptValue::Number(n) => {
                let whole = n.is_finite() && n.fract() == 0.0;
                if let Some(kind) = ty.primitive_kind() {
                    Some(number_cost(whole, kind))
                } else if ty.is_enum() {
                    whole.then_some(Self::COST_ENUM)
                } else if *ty == string_type() {
                    Some(Self::COST_TO_STRING)
                } else {
                    to_object
                }
            }
            ScriptValue::Object(obj) => {
                if obj.array_elements().is_some() {
                    return if *ty == array_type() {
                        Some(Self::COST_EXACT)
                    } else {
                        to_object
                    };
                }
                if let Some(instance) = obj.host_target() {
                    return if instance.ty() == ty {
                        Some(Self::COST_EXACT)
                    } else if to_object.is_some() {
                        to_object
                    } else {
                        instance
                            .ty()
                            .is_assignable_to(ty)
                            .then_some(Self::COST_REFERENCE_CAST)
                    };
                }
                to_object
            }
        }
    }
}

/// Cost of a script number reaching a primitive parameter.
fn number_cost(whole: bool, kind: PrimitiveKind) -> u32 {
    match (whole, kind) {
        (true, PrimitiveKind::Int32) | (false, PrimitiveKind::Double) => CostRanker::COST_EXACT,
        (true, PrimitiveKind::Int64) => CostRanker::COST_PRIMITIVE_WIDENING,
        (true, k) if k.is_float() => CostRanker::COST_INT_TO_FLOAT,
        (false, k) if k.is_integer() => CostRanker::COST_FLOAT_TO_INT,
        _ => CostRanker::COST_PRIMITIVE_NARROWING,
    }
}

impl OverloadRanker for CostRanker {
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn rank(&self, candidates: &[&[ParamEntry]], args: &[ScriptValue]) -> Vec<usize> {
        let mut viable: Vec<(usize, u32, usize)> = Vec::new();

        'candidates: for (index, params) in candidates.iter().enumerate() {
            let required = params.iter().filter(|p| !p.is_optional()).count();
            if args.len() < required || args.len() > params.len() {
                continue;
            }
            let mut total = 0;
            let mut exact = 0;
            for (arg, param) in args.iter().zip(params.iter()) {
                let Some(cost) = self.cost(arg, param) else {
                    continue 'candidates;
                };
                total += cost;
                if cost == Self::COST_EXACT {
                    exact += 1;
                }
            }
            viable.push((index, total, exact));
        }

        viable.sort_by_key(|&(_, total, exact)| (total, Reverse(exact)));
        viable.into_iter().map(|(index, _, _)| index).collect()
    }
}

/// Convert script arguments to a candidate's declared parameter types.
///
/// Omitted trailing arguments take the parameter's default; a required
/// parameter with no argument is an error.
pub(crate) fn convert_arguments(
    params: &[ParamEntry],
    args: &[ScriptValue],
) -> BridgeResult<Vec<HostValue>> {
    params
        .iter()
        .enumerate()
        .map(|(index, param)| -> BridgeResult<HostValue> {
            match (args.get(index), &param.default) {
                (Some(arg), _) => Ok(convert_to(arg, &param.ty)?),
                (None, Some(default)) => Ok(default()),
                (None, None) => Err(HostError::MissingArgument { index }.into()),
            }
        })
        .collect()
}
