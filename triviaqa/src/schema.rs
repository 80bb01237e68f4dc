use std::fmt;

use serde::Serialize;
use serde_json::Value;

pub const DATASET_NAME: &str = "triviaqa";
pub const VERSION: &str = "0.1.0";
pub const HOMEPAGE: &str = "http://nlp.cs.washington.edu/triviaqa/";
pub const DOWNLOAD_URL: &str = "http://nlp.cs.washington.edu/triviaqa/data/triviaqa-rc.tar.gz";

pub const DESCRIPTION: &str = "\
TriviaQA is a reading comprehension dataset containing over 650K
question-answer-evidence triples. TriviaQA includes 95K question-answer
pairs authored by trivia enthusiasts and independently gathered evidence
documents, six per question on average, that provide high quality distant
supervision for answering the questions.
";

pub const CITATION: &str = r#"
@article{2017arXivtriviaqa,
       author = {{Joshi}, Mandar and {Choi}, Eunsol and {Weld},
                 Daniel and {Zettlemoyer}, Luke},
        title = "{triviaqa: A Large Scale Distantly Supervised Challenge Dataset for Reading Comprehension}",
      journal = {arXiv e-prints},
         year = 2017,
          eid = {arXiv:1705.03551},
        pages = {arXiv:1705.03551},
archivePrefix = {arXiv},
       eprint = {1705.03551},
}
"#;

/// Shape of one value in an output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feature {
    Text,
    Sequence { feature: Box<Feature> },
    Dict { fields: Vec<Field> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub feature: Feature,
}

/// First place where a value disagrees with its [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMismatch {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for FeatureMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

impl std::error::Error for FeatureMismatch {}

impl Feature {
    pub fn sequence(feature: Feature) -> Self {
        Self::Sequence {
            feature: Box::new(feature),
        }
    }

    pub fn dict<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Feature)>,
    {
        Self::Dict {
            fields: fields
                .into_iter()
                .map(|(name, feature)| Field { name, feature })
                .collect(),
        }
    }

    /// Checks `value` against this feature. Dicts must carry exactly the
    /// declared fields.
    pub fn validate(&self, value: &Value) -> Result<(), FeatureMismatch> {
        self.validate_at("$", value)
    }

    fn validate_at(&self, path: &str, value: &Value) -> Result<(), FeatureMismatch> {
        match (self, value) {
            (Self::Text, Value::String(_)) => Ok(()),
            (Self::Sequence { feature }, Value::Array(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    feature.validate_at(&format!("{path}[{idx}]"), item)?;
                }
                Ok(())
            }
            (Self::Dict { fields }, Value::Object(map)) => {
                for field in fields {
                    let field_path = format!("{path}.{}", field.name);
                    let Some(inner) = map.get(field.name) else {
                        return Err(FeatureMismatch {
                            path: field_path,
                            reason: "missing field".to_string(),
                        });
                    };
                    field.feature.validate_at(&field_path, inner)?;
                }
                if let Some(extra) = map
                    .keys()
                    .find(|key| !fields.iter().any(|field| field.name == key.as_str()))
                {
                    return Err(FeatureMismatch {
                        path: format!("{path}.{extra}"),
                        reason: "undeclared field".to_string(),
                    });
                }
                Ok(())
            }
            (expected, other) => Err(FeatureMismatch {
                path: path.to_string(),
                reason: format!("expected {}, found {}", expected.kind(), json_kind(other)),
            }),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Sequence { .. } => "sequence",
            Self::Dict { .. } => "dict",
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Static description of the dataset and of one output record.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub citation: &'static str,
    pub homepage: &'static str,
    /// TriviaQA has no canonical (input, target) pairing.
    pub supervised_keys: Option<(&'static str, &'static str)>,
    pub features: Feature,
}

pub fn dataset_info() -> DatasetInfo {
    DatasetInfo {
        name: DATASET_NAME,
        version: VERSION,
        description: DESCRIPTION,
        citation: CITATION,
        homepage: HOMEPAGE,
        supervised_keys: None,
        features: record_features(),
    }
}

fn record_features() -> Feature {
    Feature::dict([
        ("question", Feature::Text),
        ("question_id", Feature::Text),
        ("question_source", Feature::Text),
        (
            "entity_pages",
            Feature::sequence(Feature::dict([
                ("doc_source", Feature::Text),
                ("file_name", Feature::Text),
                ("title", Feature::Text),
            ])),
        ),
        (
            "answer",
            Feature::dict([
                ("aliases", Feature::sequence(Feature::Text)),
                ("matched_wiki_entity_name", Feature::Text),
                ("normalized_aliases", Feature::sequence(Feature::Text)),
                ("normalized_matched_wiki_entity_name", Feature::Text),
                ("normalized_value", Feature::Text),
                ("type", Feature::Text),
                ("value", Feature::Text),
            ]),
        ),
    ])
}
