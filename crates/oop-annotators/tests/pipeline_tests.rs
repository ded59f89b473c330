//! End-to-end runs of the reference annotators through the registry and
//! the pipeline runner.

use oop_annotators::default_registry;
use oop_core::{
    Annotator, AnnotatorError, ConfigurationError, Contribution, Document, MapParameterStore,
    Metadata, Namespace, Pipeline, PipelineError, DOC_ID_KEY,
};
use oop_registry::{AnnotatorList, AnnotatorRegistry};
use serde_json::{json, Value};

fn build(registry: &AnnotatorRegistry, list: &str) -> Result<Pipeline, ConfigurationError> {
    let list = AnnotatorList::parse(list)?;
    registry.build_pipeline(&list, &MapParameterStore::new())
}

fn to_string(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap()
}

struct Exploding;

impl Annotator for Exploding {
    fn name(&self) -> &str {
        "Exploding"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Stanford
    }

    fn annotate(&self, _: &Document, _: &Metadata) -> Result<Contribution, AnnotatorError> {
        Err(AnnotatorError::ExecutionFailed("parser crashed".to_string()))
    }
}

fn registry_with_exploding() -> AnnotatorRegistry {
    let mut registry = default_registry();
    registry.register("Exploding", || Box::new(Exploding));
    registry
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_length_word_count_scenario() {
    let pipeline = build(&default_registry(), "Length\n#Skip\nWordCount\n").unwrap();
    assert_eq!(pipeline.len(), 2);

    let mut metadata = Metadata::new();
    metadata.set("Title", "Greeting");
    let result = pipeline.run("hello world", &mut metadata).unwrap();

    assert_eq!(Value::Object(result.oop.clone()), json!({ "Length": 11, "WordCount": 2 }));
    assert!(result.stanford.is_empty());
    assert_eq!(result.aggregates.get("AverageWordLength"), Some(&json!(5.5)));
    assert_eq!(result.pipeline["AnnotatorsExecuted"], json!(2));
    assert_eq!(result.pipeline["PipelineId"], json!("Length→WordCount"));

    assert_eq!(metadata.get(DOC_ID_KEY), Some(result.doc_id.as_str()));
    assert_eq!(metadata.get("Title"), Some("Greeting"));
}

#[test]
fn test_unknown_annotator_aborts_before_running() {
    let err = build(&default_registry(), "Unknown\n").unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::UnknownAnnotator {
            name: "Unknown".to_string(),
            line: 1
        }
    );

    let fatal: PipelineError = err.into();
    assert_eq!(fatal.annotator(), Some("Unknown"));
}

#[test]
fn test_optional_failure_keeps_other_namespaces() {
    let registry = registry_with_exploding();
    let pipeline = build(&registry, "Tokens\nExploding?\nLength\nWordCount\nTypeTokenRatio\n").unwrap();
    let result = pipeline.run("the cat saw the dog", &mut Metadata::new()).unwrap();

    assert_eq!(
        result.pipeline["Exploding"],
        json!({ "status": "failed", "kind": "execution_failed", "message": "parser crashed" })
    );
    assert_eq!(result.stanford["Tokens"], json!(["the", "cat", "saw", "the", "dog"]));
    assert_eq!(result.oop["Length"], json!(19));
    assert_eq!(result.oop["WordCount"], json!(5));
    assert_eq!(result.oop["TypeTokenRatio"], json!(0.8));
    assert_eq!(result.aggregates.get("AnnotatorsFailed"), Some(&json!(1)));
}

#[test]
fn test_required_failure_aborts_run() {
    let registry = registry_with_exploding();
    let pipeline = build(&registry, "Length\nExploding\nWordCount\n").unwrap();
    let mut metadata = Metadata::new();
    let err = pipeline.run("hello world", &mut metadata).unwrap_err();

    assert!(matches!(err, PipelineError::AnnotatorFailed { .. }));
    assert_eq!(err.annotator(), Some("Exploding"));
    assert!(err.to_string().contains("annotate"));
}

#[test]
fn test_empty_list_runs() {
    let pipeline = build(&default_registry(), "# everything disabled\n").unwrap();
    let result = pipeline.run("hello world", &mut Metadata::new()).unwrap();

    assert!(result.stanford.is_empty());
    assert!(result.oop.is_empty());
    assert_eq!(result.pipeline["AnnotatorsExecuted"], json!(0));
    assert_eq!(result.aggregates.get("AnnotatorsExecuted"), Some(&json!(0)));
    assert_eq!(result.aggregates.get("AverageWordLength"), Some(&Value::Null));
}

// =============================================================================
// Ordering and determinism
// =============================================================================

#[test]
fn test_independent_reorder_is_equivalent() {
    let registry = default_registry();
    let text = "One sentence here. And another one!";
    let a = build(&registry, "Tokens\nLength\nWordCount\nSentenceCount\n")
        .unwrap()
        .run(text, &mut Metadata::new())
        .unwrap();
    let b = build(&registry, "SentenceCount\nWordCount\nTokens\nLength\n")
        .unwrap()
        .run(text, &mut Metadata::new())
        .unwrap();

    assert_eq!(to_string(&a.stanford), to_string(&b.stanford));
    assert_eq!(to_string(&a.oop), to_string(&b.oop));
    assert_eq!(to_string(&a.aggregates), to_string(&b.aggregates));
    assert_ne!(a.pipeline["PipelineId"], b.pipeline["PipelineId"]);
}

#[test]
fn test_dependent_reorder_reports_missing_dependency() {
    let registry = default_registry();
    let result = build(&registry, "TypeTokenRatio\nTokens\n")
        .unwrap()
        .run("a b a", &mut Metadata::new())
        .unwrap();

    assert_eq!(
        result.oop["TypeTokenRatio"],
        json!({ "status": "missing_dependency", "requires": "STANFORD.Tokens" })
    );
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let registry = default_registry();
    let pipeline = build(
        &registry,
        "Tokens\nLength\nWordCount\nSentenceCount\nTypeTokenRatio\nProvenance\n",
    )
    .unwrap();
    let text = "It was late. The house was quiet, and the clock ticked.";

    let first = pipeline.run(text, &mut Metadata::new()).unwrap();
    let second = pipeline.run(text, &mut Metadata::new()).unwrap();

    for ns in Namespace::ALL {
        assert_eq!(to_string(first.namespace(ns)), to_string(second.namespace(ns)));
    }
    assert_eq!(to_string(&first.aggregates), to_string(&second.aggregates));
    assert_eq!(first.doc_id, second.doc_id);
    assert_eq!(first.pipeline["Provenance"]["docId"], json!(first.doc_id));
}

#[test]
fn test_duplicate_annotator_is_merge_conflict() {
    let err = build(&default_registry(), "Length\nLength\n")
        .unwrap()
        .run("hello", &mut Metadata::new())
        .unwrap_err();
    assert!(matches!(err, PipelineError::MergeConflict { .. }));
}

#[test]
fn test_parameters_reach_annotators() {
    let list = AnnotatorList::parse("Tokens\n").unwrap();
    let params = MapParameterStore::new()
        .with("tokens.lowercase", "true")
        .with("aggregates.topTokens", "1");
    let result = default_registry()
        .build_pipeline(&list, &params)
        .unwrap()
        .run("The the cat", &mut Metadata::new())
        .unwrap();

    assert_eq!(result.stanford["Tokens"], json!(["the", "the", "cat"]));
    assert_eq!(
        result.aggregates.get("TokenFrequencies"),
        Some(&json!([{ "token": "the", "count": 2 }]))
    );
}

#[test]
fn test_invalid_parameter_names_its_annotator() {
    let list = AnnotatorList::parse("Length\nTokens\n").unwrap();
    let params = MapParameterStore::new().with("tokens.lowercase", "sometimes");
    let err = default_registry().build_pipeline(&list, &params).unwrap_err();

    match &err {
        ConfigurationError::Initialization { annotator, reason } => {
            assert_eq!(annotator, "Tokens");
            assert!(reason.contains("line 2"));
            assert!(reason.contains("tokens.lowercase"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let fatal = PipelineError::from(err);
    assert_eq!(fatal.annotator(), Some("Tokens"));
    assert!(fatal.to_string().starts_with("[load] CONFIG/INIT:"));
}

#[test]
fn test_pipeline_shared_across_threads() {
    let pipeline = std::sync::Arc::new(build(&default_registry(), "Length\nWordCount\n").unwrap());

    let handles: Vec<_> = ["one two", "three four five", "six"]
        .into_iter()
        .map(|text| {
            let pipeline = pipeline.clone();
            std::thread::spawn(move || pipeline.run(text, &mut Metadata::new()).unwrap())
        })
        .collect();

    let counts: Vec<Value> = handles
        .into_iter()
        .map(|h| h.join().unwrap().oop["WordCount"].clone())
        .collect();
    assert_eq!(counts, vec![json!(2), json!(3), json!(1)]);
}
