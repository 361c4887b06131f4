//! Static subject hierarchy per exam type.
//!
//! Each exam type lists its main subjects in display order. A main subject
//! is either a leaf or carries sub-subjects. Question counts are the
//! official per-section counts and are used for data-quality checks.

use crate::model::ExamType;

/// A single subject (leaf or main) with its canonical display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectDef {
    /// Stable identifier, unique within an exam type.
    pub key: &'static str,
    /// Canonical display name.
    pub name: &'static str,
    /// Alternative spellings accepted when matching declared names.
    pub aliases: &'static [&'static str],
    /// Number of questions in this section.
    pub questions: u32,
}

impl SubjectDef {
    /// Returns `true` if `declared` names this subject by key, display name,
    /// or alias. Matching ignores case and surrounding whitespace.
    pub fn matches(&self, declared: &str) -> bool {
        let wanted = normalize(declared);
        if wanted.is_empty() {
            return false;
        }
        normalize(self.key) == wanted
            || normalize(self.name) == wanted
            || self.aliases.iter().any(|a| normalize(a) == wanted)
    }

    /// Like [`matches`](Self::matches), against the display name with its
    /// numeric section suffix removed (`"Tarih-2"` -> `"Tarih"`).
    pub fn matches_base(&self, declared: &str) -> bool {
        let wanted = normalize(declared);
        !wanted.is_empty() && normalize(base_name(self.name)) == wanted
    }
}

fn base_name(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((base, suffix)) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) => {
            base.trim_end()
        }
        _ => name,
    }
}

/// A main subject and its optional sub-subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainSubjectDef {
    pub subject: SubjectDef,
    /// Empty for leaf main subjects.
    pub subs: &'static [SubjectDef],
}

impl MainSubjectDef {
    pub fn is_leaf(&self) -> bool {
        self.subs.is_empty()
    }
}

/// The declared layout of one exam type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamLayout {
    pub exam_type: ExamType,
    /// Total question count of a full composite sitting.
    pub total_questions: u32,
    pub mains: &'static [MainSubjectDef],
}

/// Position of a subject inside an [`ExamLayout`].
///
/// `sub == None` addresses the main subject itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub main: usize,
    pub sub: Option<usize>,
}

impl ExamLayout {
    /// Find a main subject by key, name, or alias.
    pub fn main(&self, declared: &str) -> Option<(usize, &MainSubjectDef)> {
        self.mains
            .iter()
            .enumerate()
            .find(|(_, m)| m.subject.matches(declared))
    }

    /// Resolve a declared subject name to its slot.
    ///
    /// When `section` names a main subject, the search is confined to it and
    /// sub-subjects also match by their base name (`"Tarih"` for `"Tarih-2"`).
    /// Otherwise main subjects are tried first, then sub-subjects in
    /// declaration order; the first match wins.
    pub fn locate(&self, subject: &str, section: Option<&str>) -> Option<SlotRef> {
        if let Some((main_idx, main)) = section.and_then(|s| self.main(s)) {
            if main.subject.matches(subject) {
                return Some(SlotRef {
                    main: main_idx,
                    sub: None,
                });
            }
            let sub = main
                .subs
                .iter()
                .position(|s| s.matches(subject))
                .or_else(|| main.subs.iter().position(|s| s.matches_base(subject)));
            return sub.map(|sub_idx| SlotRef {
                main: main_idx,
                sub: Some(sub_idx),
            });
        }

        if let Some((main_idx, _)) = self.main(subject) {
            return Some(SlotRef {
                main: main_idx,
                sub: None,
            });
        }

        self.mains.iter().enumerate().find_map(|(main_idx, main)| {
            main.subs
                .iter()
                .position(|s| s.matches(subject))
                .map(|sub_idx| SlotRef {
                    main: main_idx,
                    sub: Some(sub_idx),
                })
        })
    }

    /// The subject definition a slot points at.
    pub fn subject(&self, slot: SlotRef) -> Option<&SubjectDef> {
        let main = self.mains.get(slot.main)?;
        match slot.sub {
            None => Some(&main.subject),
            Some(i) => main.subs.get(i),
        }
    }

    /// All leaf slots in display order: sub-subjects where a main has them,
    /// otherwise the main subject itself.
    pub fn leaves(&self) -> impl Iterator<Item = SlotRef> + '_ {
        self.mains.iter().enumerate().flat_map(|(main_idx, main)| {
            let subs: Vec<SlotRef> = if main.is_leaf() {
                vec![SlotRef {
                    main: main_idx,
                    sub: None,
                }]
            } else {
                (0..main.subs.len())
                    .map(|sub_idx| SlotRef {
                        main: main_idx,
                        sub: Some(sub_idx),
                    })
                    .collect()
            };
            subs.into_iter()
        })
    }
}

fn normalize(s: &str) -> String {
    // 'İ'.to_lowercase() yields "i\u{307}"; drop the combining dot
    s.trim().to_lowercase().replace('\u{307}', "")
}

/// Look up the static layout of an exam type.
pub fn layout(exam_type: ExamType) -> &'static ExamLayout {
    match exam_type {
        ExamType::Tyt => &TYT,
        ExamType::Ayt => &AYT,
        ExamType::Lgs => &LGS,
    }
}

/// Fixed question count of a full TYT sitting.
pub const TYT_TOTAL_QUESTIONS: u32 = 120;
/// Fixed question count of a full AYT sitting.
pub const AYT_TOTAL_QUESTIONS: u32 = 160;
/// Fixed question count of a full LGS sitting.
pub const LGS_TOTAL_QUESTIONS: u32 = 90;

const fn subject(
    key: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
    questions: u32,
) -> SubjectDef {
    SubjectDef {
        key,
        name,
        aliases,
        questions,
    }
}

const fn leaf(def: SubjectDef) -> MainSubjectDef {
    MainSubjectDef {
        subject: def,
        subs: &[],
    }
}

// ---------------------------------------------------------------------------
// TYT
// ---------------------------------------------------------------------------

static TYT_SCIENCE: [SubjectDef; 3] = [
    subject("physics", "Fizik", &["physics"], 7),
    subject("chemistry", "Kimya", &["chemistry"], 7),
    subject("biology", "Biyoloji", &["biology"], 6),
];

static TYT_SOCIAL: [SubjectDef; 4] = [
    subject("history", "Tarih", &["history"], 5),
    subject("geography", "Coğrafya", &["cografya", "geography"], 5),
    subject("philosophy", "Felsefe", &["philosophy"], 5),
    subject(
        "religion",
        "Din Kültürü",
        &["din", "din kulturu", "din kültürü ve ahlak bilgisi", "religion"],
        5,
    ),
];

static TYT_MAINS: [MainSubjectDef; 4] = [
    leaf(subject("turkish", "Türkçe", &["turkce", "turkish"], 40)),
    leaf(subject(
        "math",
        "Temel Matematik",
        &["matematik", "temel matematik", "mathematics"],
        40,
    )),
    MainSubjectDef {
        subject: subject("science", "Fen Bilimleri", &["fen", "fen bilimleri"], 20),
        subs: &TYT_SCIENCE,
    },
    MainSubjectDef {
        subject: subject("social", "Sosyal Bilimler", &["sosyal", "sosyal bilimler"], 20),
        subs: &TYT_SOCIAL,
    },
];

static TYT: ExamLayout = ExamLayout {
    exam_type: ExamType::Tyt,
    total_questions: TYT_TOTAL_QUESTIONS,
    mains: &TYT_MAINS,
};

// ---------------------------------------------------------------------------
// AYT
// ---------------------------------------------------------------------------

static AYT_LITERATURE_SOCIAL_1: [SubjectDef; 3] = [
    subject(
        "literature",
        "Türk Dili ve Edebiyatı",
        &["edebiyat", "literature"],
        24,
    ),
    subject("history_1", "Tarih-1", &["tarih", "history"], 10),
    subject(
        "geography_1",
        "Coğrafya-1",
        &["coğrafya", "cografya", "geography"],
        6,
    ),
];

static AYT_SOCIAL_2: [SubjectDef; 4] = [
    subject("history_2", "Tarih-2", &["tarih 2"], 11),
    subject("geography_2", "Coğrafya-2", &["cografya-2", "coğrafya 2"], 11),
    subject("philosophy", "Felsefe Grubu", &["felsefe", "philosophy"], 12),
    subject(
        "religion",
        "Din Kültürü",
        &["din", "din kulturu", "religion"],
        6,
    ),
];

static AYT_MAINS: [MainSubjectDef; 6] = [
    leaf(subject("math", "Matematik", &["mathematics"], 40)),
    MainSubjectDef {
        subject: subject(
            "literature_social_1",
            "Türk Dili ve Edebiyatı-Sosyal Bilimler-1",
            &["edebiyat-sosyal bilimler-1", "edebiyat-sosyal-1", "literature-social-1"],
            40,
        ),
        subs: &AYT_LITERATURE_SOCIAL_1,
    },
    MainSubjectDef {
        subject: subject(
            "social_2",
            "Sosyal Bilimler-2",
            &["sosyal-2", "social-2"],
            40,
        ),
        subs: &AYT_SOCIAL_2,
    },
    leaf(subject("physics", "Fizik", &["physics"], 14)),
    leaf(subject("chemistry", "Kimya", &["chemistry"], 13)),
    leaf(subject("biology", "Biyoloji", &["biology"], 13)),
];

static AYT: ExamLayout = ExamLayout {
    exam_type: ExamType::Ayt,
    total_questions: AYT_TOTAL_QUESTIONS,
    mains: &AYT_MAINS,
};

// ---------------------------------------------------------------------------
// LGS
// ---------------------------------------------------------------------------

static LGS_MAINS: [MainSubjectDef; 6] = [
    leaf(subject("turkish", "Türkçe", &["turkce", "turkish"], 20)),
    leaf(subject("math", "Matematik", &["mathematics"], 20)),
    leaf(subject("science", "Fen Bilimleri", &["fen", "science"], 20)),
    leaf(subject(
        "history",
        "T.C. İnkılap Tarihi ve Atatürkçülük",
        &["inkılap tarihi", "inkilap tarihi", "history"],
        10,
    )),
    leaf(subject(
        "religion",
        "Din Kültürü ve Ahlak Bilgisi",
        &["din kültürü", "din kulturu", "din", "religion"],
        10,
    )),
    leaf(subject(
        "foreign_language",
        "Yabancı Dil",
        &["ingilizce", "english", "foreign language"],
        10,
    )),
];

static LGS: ExamLayout = ExamLayout {
    exam_type: ExamType::Lgs,
    total_questions: LGS_TOTAL_QUESTIONS,
    mains: &LGS_MAINS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_counts_add_up() {
        for exam in [ExamType::Tyt, ExamType::Ayt, ExamType::Lgs] {
            let l = layout(exam);
            let mains: u32 = l.mains.iter().map(|m| m.subject.questions).sum();
            assert_eq!(mains, l.total_questions, "{exam} main counts");
            for m in l.mains.iter().filter(|m| !m.is_leaf()) {
                let subs: u32 = m.subs.iter().map(|s| s.questions).sum();
                assert_eq!(subs, m.subject.questions, "{exam} {}", m.subject.key);
            }
        }
    }

    #[test]
    fn tyt_leaves_in_display_order() {
        let l = layout(ExamType::Tyt);
        let names: Vec<&str> = l
            .leaves()
            .filter_map(|slot| l.subject(slot))
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Türkçe",
                "Temel Matematik",
                "Fizik",
                "Kimya",
                "Biyoloji",
                "Tarih",
                "Coğrafya",
                "Felsefe",
                "Din Kültürü"
            ]
        );
    }

    #[test]
    fn locate_by_name_alias_and_case() {
        let l = layout(ExamType::Ayt);
        assert_eq!(
            l.locate("Matematik", None),
            Some(SlotRef { main: 0, sub: None })
        );
        assert_eq!(
            l.locate("FİZİK", None),
            Some(SlotRef { main: 3, sub: None })
        );
        assert_eq!(
            l.locate("edebiyat", None),
            Some(SlotRef {
                main: 1,
                sub: Some(0)
            })
        );
        assert_eq!(l.locate("Astronomi", None), None);
    }

    #[test]
    fn section_disambiguates_repeated_subjects() {
        let l = layout(ExamType::Ayt);
        // plain "Tarih" resolves to the first declaring section
        assert_eq!(
            l.locate("Tarih", None),
            Some(SlotRef {
                main: 1,
                sub: Some(1)
            })
        );
        assert_eq!(
            l.locate("Tarih-2", Some("Sosyal Bilimler-2")),
            Some(SlotRef {
                main: 2,
                sub: Some(0)
            })
        );
        assert_eq!(
            l.locate("Din Kültürü", Some("social_2")),
            Some(SlotRef {
                main: 2,
                sub: Some(3)
            })
        );
    }

    #[test]
    fn section_confines_the_search() {
        let l = layout(ExamType::Ayt);
        // base name inside the named section, not the first global match
        assert_eq!(
            l.locate("Tarih", Some("Sosyal Bilimler-2")),
            Some(SlotRef {
                main: 2,
                sub: Some(0)
            })
        );
        assert_eq!(
            l.locate("Coğrafya", Some("social_2")),
            Some(SlotRef {
                main: 2,
                sub: Some(1)
            })
        );
        assert_eq!(l.locate("Fizik", Some("Sosyal Bilimler-2")), None);
        assert_eq!(l.locate("Matematik", Some("Fizik")), None);
        // an unknown section falls back to the global search
        assert_eq!(
            l.locate("Matematik", Some("Astronomi")),
            Some(SlotRef { main: 0, sub: None })
        );
    }

    #[test]
    fn lgs_is_all_leaves() {
        let l = layout(ExamType::Lgs);
        assert!(l.mains.iter().all(|m| m.is_leaf()));
        assert_eq!(l.leaves().count(), 6);
        assert!(l.locate("İnkılap Tarihi", None).is_some());
    }
}
