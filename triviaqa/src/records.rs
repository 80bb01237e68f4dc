use std::{
    fs,
    iter::Enumerate,
    path::{Path, PathBuf},
    vec,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{CorpusError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawArticle {
    question: String,
    question_id: String,
    question_source: String,
    answer: RawAnswer,
    entity_pages: Vec<RawEntityPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAnswer {
    aliases: Vec<String>,
    matched_wiki_entity_name: String,
    normalized_aliases: Vec<String>,
    normalized_matched_wiki_entity_name: String,
    normalized_value: String,
    #[serde(rename = "Type")]
    kind: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawEntityPage {
    #[serde(rename = "Docsource")]
    doc_source: String,
    #[serde(rename = "Filename")]
    file_name: String,
    #[serde(rename = "Title")]
    title: String,
}

/// One normalized question with its answer and evidence pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQaRecord {
    pub question: String,
    /// Copied verbatim from the source, whitespace included.
    pub question_id: String,
    pub question_source: String,
    pub entity_pages: Vec<EntityPage>,
    pub answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPage {
    pub doc_source: String,
    pub file_name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub aliases: Vec<String>,
    pub matched_wiki_entity_name: String,
    pub normalized_aliases: Vec<String>,
    pub normalized_matched_wiki_entity_name: String,
    pub normalized_value: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl From<RawArticle> for TriviaQaRecord {
    fn from(article: RawArticle) -> Self {
        Self {
            question: trimmed(&article.question),
            question_id: article.question_id,
            question_source: trimmed(&article.question_source),
            entity_pages: article
                .entity_pages
                .into_iter()
                .map(EntityPage::from)
                .collect(),
            answer: Answer::from(article.answer),
        }
    }
}

impl From<RawEntityPage> for EntityPage {
    fn from(page: RawEntityPage) -> Self {
        Self {
            doc_source: trimmed(&page.doc_source),
            file_name: trimmed(&page.file_name),
            title: trimmed(&page.title),
        }
    }
}

impl From<RawAnswer> for Answer {
    fn from(answer: RawAnswer) -> Self {
        Self {
            aliases: answer.aliases.iter().map(|alias| trimmed(alias)).collect(),
            matched_wiki_entity_name: trimmed(&answer.matched_wiki_entity_name),
            normalized_aliases: answer
                .normalized_aliases
                .iter()
                .map(|alias| trimmed(alias))
                .collect(),
            normalized_matched_wiki_entity_name: trimmed(
                &answer.normalized_matched_wiki_entity_name,
            ),
            normalized_value: trimmed(&answer.normalized_value),
            kind: trimmed(&answer.kind),
            value: trimmed(&answer.value),
        }
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Records of one question file, in file order.
///
/// The file is already parsed; each step only normalizes the next article.
/// An article missing a key yields an error instead of a record.
#[derive(Debug)]
pub struct Examples {
    path: PathBuf,
    articles: Enumerate<vec::IntoIter<Value>>,
}

impl Examples {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for Examples {
    type Item = Result<TriviaQaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, article) = self.articles.next()?;
        let record = serde_json::from_value::<RawArticle>(article)
            .map(TriviaQaRecord::from)
            .map_err(|source| CorpusError::Schema {
                path: self.path.clone(),
                index,
                source,
            });
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.articles.size_hint()
    }
}

impl ExactSizeIterator for Examples {}

/// Reads and parses a `{"Data": [...]}` question file.
///
/// Malformed JSON or a missing `Data` array fails here, before any record
/// is produced.
pub fn generate_examples(path: &Path) -> Result<Examples> {
    info!(path = %path.display(), "Generating examples");

    let raw = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Value =
        serde_json::from_str(&raw).map_err(|source| CorpusError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let articles = match document.get_mut("Data").map(Value::take) {
        Some(Value::Array(articles)) => articles,
        Some(_) => {
            return Err(CorpusError::Layout {
                path: path.to_path_buf(),
                reason: "`Data` is not an array",
            })
        }
        None => {
            return Err(CorpusError::Layout {
                path: path.to_path_buf(),
                reason: "missing top-level `Data` key",
            })
        }
    };

    Ok(Examples {
        path: path.to_path_buf(),
        articles: articles.into_iter().enumerate(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn article(question_id: &str) -> Value {
        json!({
            "Question": "  Who wrote Hamlet? ",
            "QuestionId": question_id,
            "QuestionSource": " http://www.quizballs.com/ ",
            "QuestionPartOfVerifiedEval": false,
            "Answer": {
                "Aliases": [" Shakespeare", "William Shakespeare ", "The Bard"],
                "MatchedWikiEntityName": " William Shakespeare ",
                "NormalizedAliases": ["shakespeare ", " william shakespeare", "bard"],
                "NormalizedMatchedWikiEntityName": "william shakespeare",
                "NormalizedValue": " shakespeare",
                "Type": "WikipediaEntity ",
                "Value": "Shakespeare\n"
            },
            "EntityPages": [
                {"DocPartOfVerifiedEval": false, "Docsource": "TagMe", "Filename": "Hamlet.txt", "Title": "Hamlet"},
                {"Docsource": "Search", "Filename": "William_Shakespeare.txt", "Title": "William Shakespeare"}
            ],
            "SearchResults": []
        })
    }

    fn write_json(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{value}").expect("write json");
        file.flush().expect("flush");
        file
    }

    #[test]
    fn yields_one_normalized_record_per_article() {
        let file = write_json(&json!({
            "Data": [article("qb_1"), article("qb_2"), article("qb_3")],
            "Domain": "Wikipedia",
            "Version": 1.0
        }));

        let examples = generate_examples(file.path()).expect("open examples");
        assert_eq!(examples.len(), 3);

        let records = examples
            .collect::<Result<Vec<_>>>()
            .expect("all records valid");
        let ids: Vec<_> = records.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, vec!["qb_1", "qb_2", "qb_3"]);

        let first = &records[0];
        assert_eq!(first.question, "Who wrote Hamlet?");
        assert_eq!(first.question_source, "http://www.quizballs.com/");
        assert_eq!(first.answer.matched_wiki_entity_name, "William Shakespeare");
        assert_eq!(first.answer.normalized_value, "shakespeare");
        assert_eq!(first.answer.kind, "WikipediaEntity");
        assert_eq!(first.answer.value, "Shakespeare");
    }

    #[test]
    fn alias_arrays_are_trimmed_element_wise() {
        let mut raw = article("qb_1");
        raw["Answer"]["Aliases"] = json!(["x", " y "]);
        let file = write_json(&json!({ "Data": [raw] }));

        let record = generate_examples(file.path())
            .expect("open examples")
            .next()
            .expect("one record")
            .expect("valid record");

        assert_eq!(record.answer.aliases, vec!["x", "y"]);
        assert_eq!(
            record.answer.normalized_aliases,
            vec!["shakespeare", "william shakespeare", "bard"]
        );
    }

    #[test]
    fn entity_pages_follow_source_order() {
        let file = write_json(&json!({ "Data": [article("qb_1")] }));
        let record = generate_examples(file.path())
            .expect("open examples")
            .next()
            .expect("one record")
            .expect("valid record");

        assert_eq!(
            record.entity_pages,
            vec![
                EntityPage {
                    doc_source: "TagMe".into(),
                    file_name: "Hamlet.txt".into(),
                    title: "Hamlet".into(),
                },
                EntityPage {
                    doc_source: "Search".into(),
                    file_name: "William_Shakespeare.txt".into(),
                    title: "William Shakespeare".into(),
                },
            ]
        );
    }

    #[test]
    fn question_id_is_kept_verbatim() {
        let file = write_json(&json!({ "Data": [article(" tc_42 ")] }));
        let record = generate_examples(file.path())
            .expect("open examples")
            .next()
            .expect("one record")
            .expect("valid record");
        assert_eq!(record.question_id, " tc_42 ");
    }

    #[test]
    fn empty_data_yields_nothing() {
        let file = write_json(&json!({ "Data": [] }));
        let mut examples = generate_examples(file.path()).expect("open examples");
        assert_eq!(examples.len(), 0);
        assert!(examples.next().is_none());
    }

    #[test]
    fn malformed_json_fails_before_any_record() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{{\"Data\": [{{\"Question\": ").expect("write");
        file.flush().expect("flush");

        let err = generate_examples(file.path()).expect_err("malformed json must fail");
        assert!(matches!(err, CorpusError::Malformed { .. }));
        assert!(!err.is_schema_violation());
    }

    #[test]
    fn missing_data_key_is_a_layout_error() {
        let file = write_json(&json!({ "data": [article("qb_1")] }));
        let err = generate_examples(file.path()).expect_err("missing Data must fail");
        assert!(matches!(err, CorpusError::Layout { .. }));
        assert!(err.is_schema_violation());
    }

    #[test]
    fn missing_answer_is_an_error_not_a_default() {
        let mut broken = article("qb_2");
        broken
            .as_object_mut()
            .expect("article object")
            .remove("Answer");
        let file = write_json(&json!({ "Data": [article("qb_1"), broken] }));

        let mut examples = generate_examples(file.path()).expect("open examples");
        assert!(examples.next().expect("first").is_ok());

        let err = examples
            .next()
            .expect("second")
            .expect_err("missing Answer must fail");
        match err {
            CorpusError::Schema { index, source, .. } => {
                assert_eq!(index, 1);
                assert!(source.to_string().contains("Answer"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn string_aliases_are_rejected() {
        let mut raw = article("qb_1");
        raw["Answer"]["Aliases"] = json!("Shakespeare");
        let file = write_json(&json!({ "Data": [raw] }));

        let result = generate_examples(file.path())
            .expect("open examples")
            .next()
            .expect("one item");
        assert!(matches!(result, Err(CorpusError::Schema { index: 0, .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = generate_examples(&dir.path().join("absent-dev.json"))
            .expect_err("missing file must fail");
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
