//! Custom strategy conditions.
//!
//! A condition compares a named indicator column against a literal value or a
//! second column and evaluates to a boolean series. Failures are local and
//! silent: an unknown indicator name, an unresolvable `compare_to`, or a
//! missing required `value` make that single condition all-false without
//! aborting the group. Undefined series elements satisfy nothing.

use serde::Deserialize;

use crate::domain::indicator::{roc::roc, IndicatorSet};
use crate::domain::series::Series;
use crate::domain::signal::Signal;

/// Comparison operator. `==`/`!=` compare exactly, matching the original
/// semantics; they are rarely useful against computed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ConditionOp {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "crosses_above")]
    CrossesAbove,
    #[serde(rename = "crosses_below")]
    CrossesBelow,
    #[serde(rename = "pct_change_above", alias = "pct_change")]
    PctChangeAbove,
    #[serde(rename = "pct_change_below")]
    PctChangeBelow,
}

impl ConditionOp {
    fn is_comparison(self) -> bool {
        matches!(
            self,
            ConditionOp::LessThan
                | ConditionOp::LessOrEqual
                | ConditionOp::GreaterThan
                | ConditionOp::GreaterOrEqual
                | ConditionOp::Equal
                | ConditionOp::NotEqual
        )
    }

    fn compare(self, left: f64, right: f64) -> bool {
        match self {
            ConditionOp::LessThan => left < right,
            ConditionOp::LessOrEqual => left <= right,
            ConditionOp::GreaterThan => left > right,
            ConditionOp::GreaterOrEqual => left >= right,
            ConditionOp::Equal => left == right,
            ConditionOp::NotEqual => left != right,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub indicator: String,
    pub operator: ConditionOp,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub compare_to: Option<String>,
}

/// How a group's conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupLogic {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: GroupLogic,
}

/// Evaluate one condition to a boolean series over the bundle's bar range.
pub fn evaluate_condition(set: &IndicatorSet, condition: &Condition) -> Vec<bool> {
    let len = set.len();
    let Some(primary) = set.column(&condition.indicator) else {
        return vec![false; len];
    };

    // Column-to-column comparison when compare_to is given; an unresolvable
    // reference voids the condition even if a literal value is also present.
    if let Some(reference) = &condition.compare_to {
        let Some(reference) = set.column(reference) else {
            return vec![false; len];
        };
        return match condition.operator {
            op if op.is_comparison() => (0..len)
                .map(|i| match (primary.get(i), reference.get(i)) {
                    (Some(a), Some(b)) => op.compare(a, b),
                    _ => false,
                })
                .collect(),
            ConditionOp::CrossesAbove => crossings(primary, |i| reference.get(i), len, true),
            ConditionOp::CrossesBelow => crossings(primary, |i| reference.get(i), len, false),
            _ => vec![false; len],
        };
    }

    let Some(value) = condition.value else {
        return vec![false; len];
    };
    match condition.operator {
        ConditionOp::CrossesAbove => crossings(primary, |_| Some(value), len, true),
        ConditionOp::CrossesBelow => crossings(primary, |_| Some(value), len, false),
        ConditionOp::PctChangeAbove => {
            let change = roc(primary, 1);
            (0..len)
                .map(|i| change.get(i).is_some_and(|c| c > value))
                .collect()
        }
        ConditionOp::PctChangeBelow => {
            let change = roc(primary, 1);
            (0..len)
                .map(|i| change.get(i).is_some_and(|c| c < value))
                .collect()
        }
        op => (0..len)
            .map(|i| primary.get(i).is_some_and(|v| op.compare(v, value)))
            .collect(),
    }
}

/// Strict crossing detection: beyond the reference now, on or over the near
/// side one bar earlier. Index 0 is never a cross.
fn crossings(
    series: &Series,
    reference: impl Fn(usize) -> Option<f64>,
    len: usize,
    above: bool,
) -> Vec<bool> {
    (0..len)
        .map(|i| {
            if i == 0 {
                return false;
            }
            match (series.get(i), series.get(i - 1), reference(i), reference(i - 1)) {
                (Some(cur), Some(prev), Some(ref_cur), Some(ref_prev)) => {
                    if above {
                        cur > ref_cur && prev <= ref_prev
                    } else {
                        cur < ref_cur && prev >= ref_prev
                    }
                }
                _ => false,
            }
        })
        .collect()
}

/// Element-wise conjunction/disjunction of a group's conditions. An empty
/// group is all-false, never "always true".
pub fn combine_conditions(
    set: &IndicatorSet,
    conditions: &[Condition],
    logic: GroupLogic,
) -> Vec<bool> {
    let Some((first, rest)) = conditions.split_first() else {
        return vec![false; set.len()];
    };

    let mut acc = evaluate_condition(set, first);
    for condition in rest {
        let next = evaluate_condition(set, condition);
        for (a, b) in acc.iter_mut().zip(next) {
            match logic {
                GroupLogic::And => *a = *a && b,
                GroupLogic::Or => *a = *a || b,
            }
        }
    }
    acc
}

/// Signals from buy/sell condition groups. Buy is checked first and wins on
/// any bar where both groups fire.
pub fn custom_signals(
    set: &IndicatorSet,
    buy: &ConditionGroup,
    sell: &ConditionGroup,
) -> Vec<Signal> {
    let buy_mask = combine_conditions(set, &buy.conditions, buy.logic);
    let sell_mask = combine_conditions(set, &sell.conditions, sell.logic);

    buy_mask
        .iter()
        .zip(&sell_mask)
        .map(|(b, s)| {
            if *b {
                Signal::Buy
            } else if *s {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect()
}
