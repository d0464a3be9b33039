use docmatch_core::diff::ChangeKind;
use docmatch_core::word_diff::WordChangeKind;
use docmatch_core::{
    compare, AlgorithmRegistry, Category, CompareOptions, DiffEngine, MatchError,
    MatchingAlgorithm, PendingAlgorithm, SequentialAlgorithm,
};
use std::sync::Arc;

const LEFT: &str = "Hello world.\nFoo bar.";
const RIGHT: &str = "Hello world.\nFoo baz.";

fn exact_only() -> CompareOptions {
    CompareOptions::new().with_match_range(1.0, 1.0)
}

#[test]
fn exact_only_sequential_reports_removed_and_added() {
    let result = compare(LEFT, RIGHT, Some(CompareOptions::default())).unwrap();
    let matches = &result.matches;

    assert_eq!(matches.exact_matches.len(), 1);
    assert_eq!(
        (matches.exact_matches[0].left_index, matches.exact_matches[0].right_index),
        (0, 0)
    );
    assert!(matches.fuzzy_matches.is_empty());
    assert_eq!(matches.unmatched_left.iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(matches.unmatched_right.iter().copied().collect::<Vec<_>>(), vec![1]);

    assert_eq!(result.diff.len(), 2);
    assert_eq!(result.diff[0].kind, ChangeKind::Removed);
    assert_eq!(result.diff[0].value, "Foo bar.");
    assert_eq!(result.diff[1].kind, ChangeKind::Added);
    assert_eq!(result.diff[1].value, "Foo baz.");
}

#[test]
fn fuzzy_sequential_pairs_edited_paragraph() {
    // Jaccard of the edited pair is 1/3
    let options = CompareOptions::new()
        .with_fuzziness(1.0)
        .with_match_range(0.3, 0.9);
    let result = compare(LEFT, RIGHT, Some(options)).unwrap();

    let fuzzy = &result.matches.fuzzy_matches;
    assert_eq!(fuzzy.len(), 1);
    assert_eq!((fuzzy[0].left_index, fuzzy[0].right_index), (1, 1));
    assert!((fuzzy[0].similarity - 1.0 / 3.0).abs() < 1e-9);

    assert_eq!(result.diff.len(), 2);
    for entry in &result.diff {
        assert_eq!(entry.similarity, Some(fuzzy[0].similarity));
    }

    let words = &result.extensions.word_diff;
    assert_eq!(words.len(), 1);
    let changed: Vec<_> = words[0]
        .changes
        .iter()
        .filter(|c| c.is_change())
        .map(|c| (c.kind, c.text.as_str()))
        .collect();
    assert_eq!(
        changed,
        vec![(WordChangeKind::Deleted, "bar."), (WordChangeKind::Added, "baz.")]
    );
}

#[test]
fn sequential_exact_pass_only_moves_forward() {
    let result = compare("A\nB\nC", "C\nA\nB", Some(exact_only())).unwrap();
    let matches = &result.matches;

    let exact: Vec<_> = matches
        .exact_matches
        .iter()
        .map(|m| (m.left_index, m.right_index))
        .collect();
    assert_eq!(exact, vec![(0, 1), (1, 2)]);
    assert!(matches.unmatched_left.contains(&2));
    assert!(matches.unmatched_right.contains(&0));
}

#[test]
fn fuzzy_pass_picks_up_what_the_cursor_skipped() {
    let result = compare("A\nB\nC", "C\nA\nB", Some(CompareOptions::default())).unwrap();
    let fuzzy = &result.matches.fuzzy_matches;

    assert_eq!(result.matches.exact_matches.len(), 2);
    assert_eq!(fuzzy.len(), 1);
    assert_eq!((fuzzy[0].left_index, fuzzy[0].right_index), (2, 0));
    assert_eq!(fuzzy[0].similarity, 1.0);
}

#[test]
fn registry_lists_lower_order_first() {
    let mut registry = AlgorithmRegistry::new();
    registry
        .register(
            "paragraph",
            Arc::new(PendingAlgorithm::named("late", "Late", Category::Paragraph, 2)),
        )
        .unwrap();
    registry
        .register(
            "paragraph",
            Arc::new(PendingAlgorithm::named("early", "Early", Category::Paragraph, 1)),
        )
        .unwrap();

    let all = registry.get_all("paragraph");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].metadata().name, "early");
    assert_eq!(all[1].metadata().name, "late");
}

#[test]
fn identical_texts_produce_empty_diff() {
    let text = "First paragraph here.\n\nSecond one. It has two sentences.\n\n\nThird.";
    let engine = DiffEngine::default();

    for category in ["paragraph", "sentence"] {
        for algorithm in engine.registry().get_metadata(category) {
            let result = engine
                .compare(category, &algorithm.name, text, text, &CompareOptions::default())
                .unwrap();

            assert!(result.diff.is_empty(), "{category}/{}", algorithm.name);
            assert!(result.matches.is_identity(), "{category}/{}", algorithm.name);
            assert!(result.matches.fuzzy_matches.is_empty());
        }
    }
}

#[test]
fn unchanged_entries_on_request() {
    let options = CompareOptions::default().with_unchanged(true);
    let result = compare("same\nold", "same\nnew", Some(options)).unwrap();

    let kinds: Vec<_> = result.diff.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::Unchanged,
            ChangeKind::Unchanged,
            ChangeKind::Removed,
            ChangeKind::Added
        ]
    );
    assert_eq!(result.changed_entries().len(), 2);
}

#[test]
fn sentences_map_back_to_whole_document() {
    let full = vec![
        "Intro.".to_string(),
        String::new(),
        "Middle part.".to_string(),
        "Prefix text. Beta one. Beta two.".to_string(),
    ];
    let options = CompareOptions::new()
        .with_left_paragraphs(vec![3], full.clone())
        .with_right_paragraphs(vec![3], full);

    let engine = DiffEngine::default();
    let result = engine
        .compare(
            "sentence",
            "thomas",
            "Beta one. Beta two.",
            "Beta one. Beta three.",
            &options,
        )
        .unwrap();

    let info = result.extensions.sentence_info.expect("sentence info");
    assert_eq!(info.left.len(), 2);
    let second = &info.left[1];
    assert_eq!(second.text, "Beta two.");
    assert_eq!(second.paragraph_index, 3);
    assert_eq!((second.start, second.end), (10, 19));
    let span = second.paragraph_span.expect("located in full paragraph");
    assert_eq!((span.start, span.end), (23, 32));

    // Sentence not present in the supplied paragraph has no span
    assert!(info.right[1].paragraph_span.is_none());

    for entry in &result.diff {
        assert_eq!(entry.paragraph_index, 3);
    }
}

#[test]
fn offsets_point_into_compared_text() {
    let left = "Alpha beta.\r\n\r\nGamma delta. Epsilon.";
    let result = DiffEngine::default()
        .compare("sentence", "thomas", left, "", &CompareOptions::default())
        .unwrap();

    assert_eq!(result.diff.len(), 3);
    for entry in &result.diff {
        assert_eq!(entry.kind, ChangeKind::Removed);
        assert_eq!(&left[entry.start..entry.end], entry.value);
    }
}

#[test]
fn pending_algorithm_refuses_to_run() {
    let mut registry = AlgorithmRegistry::with_defaults();
    registry
        .register(
            "sentence",
            Arc::new(PendingAlgorithm::named("semantic", "Semantic", Category::Sentence, 5)),
        )
        .unwrap();

    let engine = DiffEngine::new(registry);
    let err = engine
        .compare("sentence", "semantic", "a", "b", &CompareOptions::default())
        .unwrap_err();
    assert!(matches!(err, MatchError::NotImplemented { .. }));

    let listed = engine.registry().get_metadata("sentence");
    assert_eq!(listed.last().map(|m| m.name.as_str()), Some("semantic"));
}

#[test]
fn engine_reports_unknown_algorithm() {
    let err = DiffEngine::default()
        .compare("paragraph", "histogram", "a", "b", &CompareOptions::default())
        .unwrap_err();

    assert_eq!(
        err,
        MatchError::UnknownAlgorithm {
            category: "paragraph".to_string(),
            name: "histogram".to_string(),
        }
    );
}

#[test]
fn malformed_options_fail_fast() {
    let options = CompareOptions::new().with_match_range(f64::INFINITY, 0.9);
    let err = SequentialAlgorithm::sentences()
        .compare("a.", "b.", &options)
        .unwrap_err();
    assert_eq!(err.code(), "ERR_MALFORMED_OPTIONS");
}

#[test]
fn out_of_range_options_are_clamped() {
    let options: CompareOptions =
        serde_json::from_str(r#"{"fuzziness": 7.5, "minMatch": 0.8, "maxMatch": 0.2}"#).unwrap();
    let result = compare("the cat sat", "the cat ran", Some(options)).unwrap();

    // Fuzziness clamps to 1 and the swapped range gives a threshold of 0.2
    assert_eq!(result.matches.fuzzy_matches.len(), 1);
}

#[test]
fn result_serializes_for_the_host() {
    let options = CompareOptions::new().with_fuzziness(1.0);
    let result = DiffEngine::default()
        .compare("paragraph", "character", "Colour.", "Color.", &options)
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(json["metadata"]["name"], "character");
    assert_eq!(json["metadata"]["supportsFuzzy"], false);
    assert_eq!(json["diff"][0]["kind"], "removed");
    assert!(json["extensions"]["characterDiffPairs"][0]["ops"].is_array());
    assert!(json["timestamp"].is_string());
}

#[test]
fn repeated_sentence_is_dropped_wherever_it_appears() {
    let engine = DiffEngine::default();
    let options = CompareOptions::default();

    for (left, right) in [
        ("Yes. No. Yes. Maybe.", "Yes. No. Maybe."),
        ("Maybe. Yes. No. Yes.", "Maybe. Yes. No."),
    ] {
        let result = engine.compare("sentence", "thomas", left, right, &options).unwrap();
        assert!(result.diff.is_empty(), "{left:?} vs {right:?}");
        assert_eq!(result.matches.left_count, 3);
    }
}

#[test]
fn unbounded_word_lookahead_is_accepted() {
    let options: CompareOptions =
        serde_json::from_str(&format!(r#"{{"fuzziness": 1.0, "wordLookahead": {}}}"#, usize::MAX))
            .unwrap();
    let result = DiffEngine::default()
        .compare("paragraph", "levenshtein", "p q r", "p s r", &options)
        .unwrap();

    let changes = &result.extensions.word_diff[0].changes;
    let kinds: Vec<_> = changes.iter().map(|c| (c.kind, c.text.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (WordChangeKind::Unchanged, "p"),
            (WordChangeKind::Deleted, "q"),
            (WordChangeKind::Added, "s"),
            (WordChangeKind::Unchanged, "r"),
        ]
    );
}
