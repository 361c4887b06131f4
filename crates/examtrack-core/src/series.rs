//! Chart-ready numeric series built from sittings.
//!
//! Rendering belongs to an external charting collaborator; this module only
//! produces labels and values. Values are rounded to 2 decimals here since
//! series are a presentation boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ExamSitting, ExamType};
use crate::scoring::round_to;

/// Label of the dataset holding sitting totals.
pub const TOTAL_NET_LABEL: &str = "Toplam Net";

const ELLIPSIS: &str = "...";

/// Labels plus one or more datasets aligned with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Shorten a label to `max_chars` characters plus a trailing ellipsis.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

fn ascending(sittings: &[ExamSitting]) -> Vec<&ExamSitting> {
    let mut ordered: Vec<&ExamSitting> = sittings.iter().collect();
    ordered.sort_by_key(|s| s.date);
    ordered
}

fn net_value(net: f64) -> f64 {
    round_to(net, 2)
}

/// Total net per sitting in ascending date order.
pub fn progress_series(sittings: &[ExamSitting], max_label_chars: usize) -> ChartSeries {
    let ordered = ascending(sittings);
    ChartSeries {
        labels: ordered
            .iter()
            .map(|s| truncate_label(&s.name, max_label_chars))
            .collect(),
        datasets: vec![Dataset {
            label: TOTAL_NET_LABEL.to_string(),
            data: ordered.iter().map(|s| net_value(s.total_net)).collect(),
        }],
    }
}

/// What the comparison chart breaks sittings down by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "subject", rename_all = "snake_case")]
pub enum ComparisonScope {
    /// One dataset of sitting totals.
    #[default]
    Total,
    /// One dataset per main subject.
    MainSubjects,
    /// A named subject. A main subject with sub-subjects yields one dataset
    /// per sub-subject; any other subject yields a single dataset.
    Subject(String),
}

impl ComparisonScope {
    /// Build a scope from an optional subject filter.
    pub fn from_filter(subject: Option<&str>) -> Self {
        match subject.map(str::trim) {
            None | Some("") => ComparisonScope::Total,
            Some(s) if s.eq_ignore_ascii_case("all") => ComparisonScope::MainSubjects,
            Some(s) => ComparisonScope::Subject(s.to_string()),
        }
    }
}

/// Comparison series for sittings of one exam type.
///
/// The x-domain is the same as [`progress_series`] over those sittings,
/// optionally restricted to the sitting named `selected`. Unknown subjects
/// fall back to sitting totals.
pub fn comparison_series(
    sittings: &[ExamSitting],
    exam_type: ExamType,
    scope: &ComparisonScope,
    selected: Option<&str>,
    max_label_chars: usize,
) -> ChartSeries {
    let ordered: Vec<&ExamSitting> = ascending(sittings)
        .into_iter()
        .filter(|s| s.exam_type == exam_type)
        .filter(|s| selected.map_or(true, |name| s.name == name))
        .collect();

    let labels = ordered
        .iter()
        .map(|s| truncate_label(&s.name, max_label_chars))
        .collect();

    let layout = exam_type.layout();
    let slot_series = |label: &str, pick: &dyn Fn(&ExamSitting) -> f64| Dataset {
        label: label.to_string(),
        data: ordered.iter().map(|&s| net_value(pick(s))).collect(),
    };
    let totals = || vec![slot_series(TOTAL_NET_LABEL, &|s| s.total_net)];

    let datasets = match scope {
        ComparisonScope::Total => totals(),
        ComparisonScope::MainSubjects => layout
            .mains
            .iter()
            .enumerate()
            .map(|(i, main)| {
                slot_series(main.subject.name, &|s| {
                    s.breakdown.get(i).map_or(0.0, |m| m.slot.net)
                })
            })
            .collect(),
        ComparisonScope::Subject(subject) => match layout.locate(subject, None) {
            Some(slot) => {
                let main_def = &layout.mains[slot.main];
                match slot.sub {
                    None if !main_def.is_leaf() => main_def
                        .subs
                        .iter()
                        .enumerate()
                        .map(|(j, sub)| {
                            slot_series(sub.name, &|s| {
                                s.breakdown
                                    .get(slot.main)
                                    .and_then(|m| m.subs.get(j))
                                    .map_or(0.0, |n| n.net)
                            })
                        })
                        .collect(),
                    None => vec![slot_series(main_def.subject.name, &|s| {
                        s.breakdown.get(slot.main).map_or(0.0, |m| m.slot.net)
                    })],
                    Some(j) => {
                        let name = main_def.subs.get(j).map_or(subject.as_str(), |d| d.name);
                        vec![slot_series(name, &|s| {
                            s.breakdown
                                .get(slot.main)
                                .and_then(|m| m.subs.get(j))
                                .map_or(0.0, |n| n.net)
                        })]
                    }
                }
            }
            None => {
                tracing::debug!(%subject, %exam_type, "unknown comparison subject, using totals");
                totals()
            }
        },
    };

    ChartSeries { labels, datasets }
}

/// One proportional slice of a distribution snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub subject: String,
    pub net: f64,
    /// Percentage of the summed absolute nets, 1 decimal.
    pub share: f64,
}

/// Subject distribution of the most recent sitting of an exam type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSnapshot {
    pub sitting: String,
    pub exam_type: ExamType,
    pub date: NaiveDate,
    pub slices: Vec<DistributionSlice>,
}

/// Most recent sitting of `exam_type`: greatest date, first encountered
/// among equal dates.
pub fn latest_sitting(sittings: &[ExamSitting], exam_type: ExamType) -> Option<&ExamSitting> {
    sittings
        .iter()
        .filter(|s| s.exam_type == exam_type)
        .fold(None, |best: Option<&ExamSitting>, s| match best {
            Some(b) if b.date >= s.date => Some(b),
            _ => Some(s),
        })
}

/// Leaf-level contributions of the most recent sitting of `exam_type`.
///
/// Zero contributions are left out, unlike the breakdown tables which keep
/// every hierarchy slot. Returns `None` when there is no such sitting.
pub fn distribution_snapshot(
    sittings: &[ExamSitting],
    exam_type: ExamType,
) -> Option<DistributionSnapshot> {
    let sitting = latest_sitting(sittings, exam_type)?;

    let mut contributions: Vec<(String, f64)> = Vec::new();
    for main in &sitting.breakdown {
        if main.subs.is_empty() {
            contributions.push((main.slot.name.clone(), main.slot.net));
            continue;
        }
        let mut sub_sum = 0.0;
        for sub in &main.subs {
            sub_sum += sub.net;
            contributions.push((sub.name.clone(), sub.net));
        }
        // main-level counts reported without sub detail
        contributions.push((main.slot.name.clone(), main.slot.net - sub_sum));
    }
    for extra in &sitting.unassigned {
        contributions.push((extra.name.clone(), extra.net));
    }

    contributions.retain(|(_, net)| *net != 0.0);
    let magnitude: f64 = contributions.iter().map(|(_, net)| net.abs()).sum();

    let slices = contributions
        .into_iter()
        .map(|(subject, net)| DistributionSlice {
            subject,
            net: net_value(net),
            share: if magnitude > 0.0 {
                round_to(net.abs() / magnitude * 100.0, 1)
            } else {
                0.0
            },
        })
        .collect();

    Some(DistributionSnapshot {
        sitting: sitting.name.clone(),
        exam_type: sitting.exam_type,
        date: sitting.date,
        slices,
    })
}
