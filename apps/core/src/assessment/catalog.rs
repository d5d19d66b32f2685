//! Built-in assessment question banks.
//!
//! Question shapes are tagged unions rather than the original's loose
//! objects: a multiple-choice question carries its options and answer
//! key, a code question its starter code and test cases.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub cert_id: String,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// `correct` is the index into `options`.
    MultipleChoice {
        options: Vec<String>,
        correct: usize,
    },
    Code {
        starter_code: String,
        test_cases: Vec<TestCase>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected: String,
}

impl Assessment {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// The catalog shipped with the portal.
pub fn builtin_assessments() -> Vec<Assessment> {
    vec![python_basic(), react_basic()]
}

/// Looks up an assessment by certificate id.
pub fn find_assessment(cert_id: &str) -> Option<Assessment> {
    builtin_assessments()
        .into_iter()
        .find(|a| a.cert_id == cert_id)
}

fn python_basic() -> Assessment {
    Assessment {
        cert_id: "python-basic".into(),
        title: "Python (Basic)".into(),
        questions: vec![
            Question {
                id: 1,
                prompt: "What is the correct file extension for Python files?".into(),
                kind: QuestionKind::MultipleChoice {
                    options: vec![".pt".into(), ".py".into(), ".pyt".into(), ".python".into()],
                    correct: 1,
                },
            },
            Question {
                id: 2,
                prompt: "Write a function `sum_list(numbers)` that returns the sum of all \
                         numbers in a list."
                    .into(),
                kind: QuestionKind::Code {
                    starter_code: "def sum_list(numbers):\n    # Write your code here\n    pass"
                        .into(),
                    test_cases: vec![
                        TestCase {
                            input: "[1, 2, 3]".into(),
                            expected: "6".into(),
                        },
                        TestCase {
                            input: "[-1, 1]".into(),
                            expected: "0".into(),
                        },
                    ],
                },
            },
            Question {
                id: 3,
                prompt: "Which of the following is NOT a core data type in Python?".into(),
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        "List".into(),
                        "Dictionary".into(),
                        "Tuple".into(),
                        "Class".into(),
                    ],
                    correct: 3,
                },
            },
        ],
    }
}

fn react_basic() -> Assessment {
    Assessment {
        cert_id: "react-basic".into(),
        title: "React (Basic)".into(),
        questions: vec![
            Question {
                id: 1,
                prompt: "Which method in a React Class Component is called after the \
                         component is rendered for the first time?"
                    .into(),
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        "componentDidMount".into(),
                        "componentWillUnmount".into(),
                        "getDerivedStateFromProps".into(),
                        "render".into(),
                    ],
                    correct: 0,
                },
            },
            Question {
                id: 2,
                prompt: "Create a functional component `Welcome` that accepts a `name` prop \
                         and renders \"Hello, {name}\"."
                    .into(),
                kind: QuestionKind::Code {
                    starter_code: "function Welcome(props) {\n    // Write your code here\n}"
                        .into(),
                    test_cases: vec![],
                },
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_both_banks() {
        let ids: Vec<_> = builtin_assessments()
            .into_iter()
            .map(|a| a.cert_id)
            .collect();
        assert_eq!(ids, vec!["python-basic", "react-basic"]);
    }

    #[test]
    fn test_find_assessment() {
        let a = find_assessment("python-basic").unwrap();
        assert_eq!(a.question_count(), 3);
        assert!(find_assessment("cobol-expert").is_none());
    }

    #[test]
    fn test_answer_keys_in_range() {
        for assessment in builtin_assessments() {
            for q in &assessment.questions {
                if let QuestionKind::MultipleChoice { options, correct } = &q.kind {
                    assert!(correct < &options.len(), "bad key in {}", assessment.cert_id);
                }
            }
        }
    }
}
