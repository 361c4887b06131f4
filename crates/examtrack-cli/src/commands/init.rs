//! The `examtrack init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_absent("examtrack.toml", SAMPLE_CONFIG)?;
    write_if_absent("examtrack-data.json", SAMPLE_SUBMISSIONS)?;
    write_if_absent("examtrack-practice.json", SAMPLE_PRACTICE)?;

    println!("\nNext steps:");
    println!("  1. Replace examtrack-data.json with your exported submissions");
    println!("  2. Run: examtrack validate");
    println!("  3. Run: examtrack analyze --exam-type AYT --subject all");

    Ok(())
}

fn write_if_absent(name: &str, content: &str) -> Result<()> {
    if Path::new(name).exists() {
        println!("{name} already exists, skipping.");
    } else {
        std::fs::write(name, content)?;
        println!("Created {name}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examtrack configuration

data_file = "examtrack-data.json"
practice_log = "examtrack-practice.json"
# default_exam_type = "TYT"

[engine]
label_max_chars = 15
recent_limit = 5
net_decimals = 2
rate_decimals = 1
"#;

const SAMPLE_SUBMISSIONS: &str = r#"[
  {
    "id": "tyt-1",
    "studentId": "student-1",
    "examType": "TYT",
    "examName": "TYT Genel Deneme 1",
    "examDate": "2024-03-01",
    "totalQuestions": 120,
    "subjectScores": {
      "kind": "composite",
      "subjects": [
        { "subject": "Türkçe", "correct": 30, "wrong": 6, "blank": 4 },
        { "subject": "Temel Matematik", "correct": 22, "wrong": 8, "blank": 10 },
        { "subject": "Fen Bilimleri", "subs": [
          { "subject": "Fizik", "correct": 4, "wrong": 2, "blank": 1 },
          { "subject": "Kimya", "correct": 5, "wrong": 1, "blank": 1 },
          { "subject": "Biyoloji", "correct": 4, "wrong": 1, "blank": 1 }
        ]},
        { "subject": "Sosyal Bilimler", "subs": [
          { "subject": "Tarih", "correct": 4, "wrong": 1 },
          { "subject": "Coğrafya", "correct": 3, "wrong": 1, "blank": 1 },
          { "subject": "Felsefe", "correct": 4, "wrong": 0, "blank": 1 },
          { "subject": "Din Kültürü", "correct": 5 }
        ]}
      ]
    }
  },
  {
    "id": "ayt-1-mat",
    "studentId": "student-1",
    "examType": "AYT",
    "examName": "AYT Deneme 1 - Matematik",
    "examDate": "2024-04-01",
    "totalQuestions": 40,
    "correctAnswers": 20,
    "wrongAnswers": 8,
    "emptyAnswers": 12,
    "subjectScores": { "kind": "single", "subject": "Matematik", "correct": 20, "wrong": 8, "blank": 12 }
  },
  {
    "id": "ayt-1-fiz",
    "studentId": "student-1",
    "examType": "AYT",
    "examName": "AYT Deneme 1 - Fizik",
    "examDate": "2024-04-01",
    "totalQuestions": 14,
    "correctAnswers": 10,
    "wrongAnswers": 4,
    "emptyAnswers": 0,
    "subjectScores": { "kind": "single", "subject": "Fizik", "correct": 10, "wrong": 4 }
  }
]
"#;

const SAMPLE_PRACTICE: &str = r#"[
  { "date": "2024-03-10", "subject": "Fizik", "correctAnswers": 18, "wrongAnswers": 2 },
  { "date": "2024-03-11", "subject": "Matematik", "correctAnswers": 25, "wrongAnswers": 5 }
]
"#;
