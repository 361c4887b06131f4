//! Normalizes raw submissions into exam sittings.
//!
//! Composite records are sittings on their own. Single-subject records are
//! bucketed by a sitting key derived from their display name, and each
//! member is assigned to its slot in the subject hierarchy.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DataError;
use crate::hierarchy::ExamLayout;
use crate::model::{
    CompositeScores, ExamSitting, ExamSubmission, ExamType, MainSlotNet, Scores,
    SingleSubjectScore, SubjectNet,
};

/// Separates the sitting name from the subject name in single-subject
/// display names, e.g. `"Deneme1 - Matematik"`.
pub const NAME_DELIMITER: &str = " - ";

/// Identity of a single-subject sitting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SittingKey {
    pub exam_type: ExamType,
    pub base_name: String,
}

/// Derive the sitting key of a single-subject record.
///
/// The base name is the display name up to the first delimiter. Records
/// without a name, or whose name has no delimiter, fall back to their date.
pub fn derive_sitting_key(
    exam_type: ExamType,
    display_name: Option<&str>,
    date: NaiveDate,
) -> SittingKey {
    let base_name = display_name
        .and_then(|name| name.split_once(NAME_DELIMITER))
        .map(|(base, _)| base.trim())
        .filter(|base| !base.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| date_label(date));
    SittingKey {
        exam_type,
        base_name,
    }
}

/// Name of a composite sitting: its display name, or its date.
pub fn composite_sitting_name(display_name: Option<&str>, date: NaiveDate) -> String {
    display_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| date_label(date))
}

fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A submission that was degraded while building sittings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAnomaly {
    pub submission_id: String,
    pub sitting: String,
    pub message: String,
}

impl DataAnomaly {
    fn new(submission: &ExamSubmission, sitting: &str, error: &DataError) -> Self {
        Self {
            submission_id: submission.id.clone(),
            sitting: sitting.to_string(),
            message: error.to_string(),
        }
    }
}

/// Sittings in ascending date order plus everything that was degraded
/// along the way.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub sittings: Vec<ExamSitting>,
    pub anomalies: Vec<DataAnomaly>,
}

/// Group submissions into sittings, ascending by date.
pub fn group_sittings(submissions: &[ExamSubmission]) -> Vec<ExamSitting> {
    group(submissions).sittings
}

/// Group submissions into sittings and report degraded submissions.
///
/// Sittings with the same date keep the order in which their first member
/// appears in `submissions`.
pub fn group(submissions: &[ExamSubmission]) -> Grouping {
    let mut pending: Vec<PendingSitting<'_>> = Vec::new();
    let mut by_key: HashMap<SittingKey, usize> = HashMap::new();

    for submission in submissions {
        if submission.is_single_subject() {
            let key = derive_sitting_key(
                submission.exam_type,
                submission.exam_name.as_deref(),
                submission.exam_date,
            );
            if let Some(&idx) = by_key.get(&key) {
                pending[idx].members.push(submission);
            } else {
                by_key.insert(key.clone(), pending.len());
                pending.push(PendingSitting {
                    name: key.base_name,
                    exam_type: submission.exam_type,
                    members: vec![submission],
                });
            }
        } else {
            pending.push(PendingSitting {
                name: composite_sitting_name(submission.exam_name.as_deref(), submission.exam_date),
                exam_type: submission.exam_type,
                members: vec![submission],
            });
        }
    }

    let mut anomalies = Vec::new();
    let mut sittings = Vec::with_capacity(pending.len());
    for p in pending {
        sittings.push(p.resolve(&mut anomalies));
    }
    // stable: equal dates keep first-encounter order
    sittings.sort_by_key(|s| s.date);

    debug!(
        submissions = submissions.len(),
        sittings = sittings.len(),
        anomalies = anomalies.len(),
        "grouped submissions into sittings"
    );

    Grouping {
        sittings,
        anomalies,
    }
}

struct PendingSitting<'a> {
    name: String,
    exam_type: ExamType,
    members: Vec<&'a ExamSubmission>,
}

impl PendingSitting<'_> {
    fn resolve(self, anomalies: &mut Vec<DataAnomaly>) -> ExamSitting {
        let layout = self.exam_type.layout();
        let mut slots = SlotTable::new(layout);
        let mut total_net = 0.0;

        for member in &self.members {
            let mut errors = Vec::new();
            match member.scores() {
                Ok(Scores::Composite(c)) => {
                    total_net += c.net();
                    slots.fill_composite(c, &mut errors);
                }
                Ok(Scores::Single(s)) => {
                    total_net += s.net();
                    slots.fill_single(s, &mut errors);
                }
                Err(e) => errors.push(e),
            }
            for error in errors {
                warn!(
                    submission = %member.id,
                    sitting = %self.name,
                    "{error}"
                );
                anomalies.push(DataAnomaly::new(member, &self.name, &error));
            }
        }

        let date = self
            .members
            .iter()
            .map(|m| m.exam_date)
            .max()
            .unwrap_or(NaiveDate::MIN);

        ExamSitting {
            name: self.name,
            exam_type: self.exam_type,
            date,
            total_net,
            member_submissions: self.members.into_iter().cloned().collect(),
            breakdown: slots.breakdown,
            unassigned: slots.unassigned,
        }
    }
}

/// Hierarchy-shaped accumulator of slot nets.
struct SlotTable {
    layout: &'static ExamLayout,
    breakdown: Vec<MainSlotNet>,
    unassigned: Vec<SubjectNet>,
}

impl SlotTable {
    fn new(layout: &'static ExamLayout) -> Self {
        let breakdown = layout
            .mains
            .iter()
            .map(|main| MainSlotNet {
                slot: SubjectNet::empty(main.subject.key, main.subject.name),
                subs: main
                    .subs
                    .iter()
                    .map(|sub| SubjectNet::empty(sub.key, sub.name))
                    .collect(),
            })
            .collect();
        Self {
            layout,
            breakdown,
            unassigned: Vec::new(),
        }
    }

    fn fill_composite(&mut self, scores: &CompositeScores, errors: &mut Vec<DataError>) {
        for main in &scores.subjects {
            let net = main.net();
            let Some((main_idx, def)) = self.layout.main(&main.subject) else {
                errors.push(self.unknown(&main.subject));
                self.add_unassigned(&main.subject, net);
                continue;
            };
            let slot = &mut self.breakdown[main_idx];
            slot.slot.add(net);
            for sub in &main.subs {
                match def.subs.iter().position(|d| d.matches(&sub.subject)) {
                    Some(sub_idx) => slot.subs[sub_idx].add(sub.net()),
                    None => errors.push(DataError::UnknownSubject {
                        exam_type: self.layout.exam_type,
                        subject: format!("{}{NAME_DELIMITER}{}", main.subject, sub.subject),
                    }),
                }
            }
        }
    }

    fn fill_single(&mut self, score: &SingleSubjectScore, errors: &mut Vec<DataError>) {
        let net = score.net();
        let located = self
            .layout
            .locate(&score.subject, score.section.as_deref())
            .and_then(|slot| self.breakdown.get_mut(slot.main).map(|main| (main, slot.sub)));
        match located {
            Some((main, sub)) => {
                main.slot.add(net);
                if let Some(sub_slot) = sub.and_then(|i| main.subs.get_mut(i)) {
                    sub_slot.add(net);
                }
            }
            None => {
                errors.push(self.unknown(&score.subject));
                self.add_unassigned(&score.subject, net);
            }
        }
    }

    fn unknown(&self, subject: &str) -> DataError {
        DataError::UnknownSubject {
            exam_type: self.layout.exam_type,
            subject: subject.trim().to_string(),
        }
    }

    fn add_unassigned(&mut self, subject: &str, net: f64) {
        let name = subject.trim();
        match self.unassigned.iter_mut().find(|u| u.name == name) {
            Some(existing) => existing.add(net),
            None => {
                let mut entry = SubjectNet::empty(name, name);
                entry.add(net);
                self.unassigned.push(entry);
            }
        }
    }
}
