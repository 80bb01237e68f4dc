use std::{fs, path::Path};

use serde_json::{json, Value};
use tempfile::tempdir;
use triviaqa::{
    dataset_info, harness, resolve_splits, CorpusError, DatasetBuilder, ExtractedDir, Split,
    TriviaQa,
};

fn article(idx: usize, pages: usize) -> Value {
    let entity_pages: Vec<Value> = (0..pages)
        .map(|page| {
            json!({
                "Docsource": "TagMe",
                "Filename": format!("Page_{idx}_{page}.txt"),
                "Title": format!(" Page {page} ")
            })
        })
        .collect();

    json!({
        "Question": format!("  Question number {idx}?\n"),
        "QuestionId": format!("qz_{idx}"),
        "QuestionSource": "\thttp://www.quizwise.com/ ",
        "Answer": {
            "Aliases": [format!(" answer {idx} "), "alt"],
            "MatchedWikiEntityName": " Answer ",
            "NormalizedAliases": ["answer", " alt "],
            "NormalizedMatchedWikiEntityName": "answer ",
            "NormalizedValue": " answer",
            "Type": "WikipediaEntity",
            "Value": " Answer "
        },
        "EntityPages": entity_pages
    })
}

fn write_qa(root: &Path, name: &str, body: &str) {
    let qa = root.join("triviaqa-rc/qa");
    fs::create_dir_all(&qa).expect("qa dir");
    fs::write(qa.join(name), body).expect("write qa file");
}

fn is_trimmed(value: &str) -> bool {
    value.trim() == value
}

#[test]
fn builder_flow_preserves_counts_and_trims_strings() {
    let corpus = tempdir().expect("corpus dir");
    let articles: Vec<Value> = (0..5).map(|idx| article(idx, idx)).collect();
    write_qa(
        corpus.path(),
        "wikipedia-train.json",
        &json!({ "Data": articles }).to_string(),
    );
    write_qa(
        corpus.path(),
        "wikipedia-dev.json",
        &json!({ "Data": [article(9, 2)] }).to_string(),
    );

    let adapter = TriviaQa::default();
    let generators = adapter
        .split_generators(&ExtractedDir::new(corpus.path()))
        .expect("split generators");
    let train = generators
        .iter()
        .find(|generator| generator.split == Split::Train)
        .expect("train split");
    assert_eq!(train.files.len(), 1);

    let records = adapter
        .generate_examples(&train.files[0])
        .expect("open train file")
        .collect::<Result<Vec<_>, _>>()
        .expect("valid records");
    assert_eq!(records.len(), 5);

    let info = dataset_info();
    for (idx, record) in records.iter().enumerate() {
        assert_eq!(record.entity_pages.len(), idx);
        assert!(is_trimmed(&record.question));
        assert!(is_trimmed(&record.question_source));
        assert!(record.answer.aliases.iter().all(|alias| is_trimmed(alias)));
        assert!(record
            .answer
            .normalized_aliases
            .iter()
            .all(|alias| is_trimmed(alias)));
        assert!(is_trimmed(&record.answer.matched_wiki_entity_name));
        assert!(is_trimmed(&record.answer.normalized_matched_wiki_entity_name));
        assert!(is_trimmed(&record.answer.normalized_value));
        assert!(is_trimmed(&record.answer.kind));
        assert!(is_trimmed(&record.answer.value));
        assert_eq!(record.answer.aliases, vec![format!("answer {idx}"), "alt".to_string()]);

        let value = serde_json::to_value(record).expect("serialise record");
        info.features.validate(&value).expect("record matches features");
    }
}

#[test]
fn heldout_file_without_answers_fails_loudly() {
    let corpus = tempdir().expect("corpus dir");
    let mut unanswered = article(1, 1);
    unanswered
        .as_object_mut()
        .expect("article object")
        .remove("Answer");
    write_qa(
        corpus.path(),
        "web-test-without-answers.json",
        &json!({ "Data": [unanswered] }).to_string(),
    );

    let generators = resolve_splits(corpus.path()).expect("resolve splits");
    let test = &generators[2];
    assert_eq!(test.split, Split::Test);
    assert_eq!(test.files.len(), 1);

    let results: Vec<_> = TriviaQa::default()
        .generate_examples(&test.files[0])
        .expect("open test file")
        .collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(CorpusError::Schema { index: 0, .. })));
}

#[test]
fn malformed_file_yields_no_records_and_no_output() {
    let corpus = tempdir().expect("corpus dir");
    let out = tempdir().expect("output dir");
    write_qa(corpus.path(), "web-dev.json", "{\"Data\": [");

    let err = harness::run(
        &TriviaQa::default(),
        &ExtractedDir::new(corpus.path()),
        out.path(),
        &[Split::Dev],
        false,
    )
    .expect_err("malformed dev file must fail");

    assert!(matches!(
        err.downcast_ref::<CorpusError>(),
        Some(CorpusError::Malformed { .. })
    ));
    assert!(!harness::records_path(out.path(), Split::Dev).exists());
    assert!(!harness::summary_path(out.path(), Split::Dev).exists());
}
