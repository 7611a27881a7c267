use search_core::{IndexEntry, SearchEngine};

fn corpus() -> SearchEngine {
    let mut engine = SearchEngine::new();
    engine.add_document("The quick brown fox jumps over the lazy dog.", Some(1));
    engine.add_document("A dog and a cat play together in the garden.", Some(2));
    engine.add_document("The fox is having a lazy day, but the cat is awake.", Some(3));
    engine
}

fn ids(results: &std::collections::BTreeMap<u64, String>) -> Vec<u64> {
    results.keys().copied().collect()
}

#[test]
fn implicit_and_tokenizes_query() {
    let engine = corpus();
    let results = engine.search("fox lazy");
    assert_eq!(ids(&results), vec![1, 3]);
    assert_eq!(results[&1], "The quick brown fox jumps over the lazy dog.");
}

#[test]
fn explicit_or_unions() {
    let engine = corpus();
    assert_eq!(ids(&engine.search("dog OR cat")), vec![1, 2, 3]);
}

#[test]
fn explicit_and_intersects() {
    let engine = corpus();
    assert_eq!(ids(&engine.search("dog AND cat")), vec![2]);
}

#[test]
fn operators_match_case_insensitively() {
    let mut engine = SearchEngine::new();
    engine.add_document("Dog and Cat are playing.", Some(1));
    engine.add_document("Only the dog is barking.", Some(2));
    assert_eq!(ids(&engine.search("Dog AND Cat")), vec![1]);
    assert_eq!(ids(&engine.search("dog and cat")), vec![1]);
}

#[test]
fn or_excludes_unmatched_documents() {
    let mut engine = SearchEngine::new();
    engine.add_document("Dog", Some(1));
    engine.add_document("Cat", Some(2));
    engine.add_document("Bird", Some(3));
    assert_eq!(ids(&engine.search("Dog OR Cat")), vec![1, 2]);
}

#[test]
fn deleted_unique_term_is_gone() {
    let mut engine = corpus();
    assert!(engine.delete_document(1));
    assert!(engine.search("quick").is_empty());
    assert_eq!(engine.postings("quick"), None);
    assert_eq!(engine.postings("fox"), Some(vec![3]));
    assert!(engine.check_consistency().is_ok());
}

#[test]
fn explicit_id_indexes_terms() {
    let mut engine = SearchEngine::new();
    assert_eq!(engine.add_document("Hello World", Some(5)), 5);
    assert_eq!(engine.postings("hello"), Some(vec![5]));
    assert_eq!(engine.postings("world"), Some(vec![5]));
}

#[test]
fn readding_replaces_terms() {
    let mut engine = SearchEngine::new();
    engine.add_document("alpha beta", Some(7));
    engine.add_document("gamma", Some(7));
    assert_eq!(engine.get_document(7), Some("gamma"));
    assert_eq!(engine.postings("alpha"), None);
    assert_eq!(engine.postings("gamma"), Some(vec![7]));
    assert!(engine.search("alpha").is_empty());
    assert_eq!(engine.len(), 1);
}

#[test]
fn empty_queries_return_nothing() {
    let engine = corpus();
    assert!(engine.search("").is_empty());
    assert!(engine.search("   ").is_empty());
    assert!(engine.search("?!").is_empty());
}

#[test]
fn unknown_term_collapses_and_but_not_or() {
    let engine = corpus();
    assert!(engine.search("dog AND unicorn").is_empty());
    assert!(engine.search("unicorn AND dog").is_empty());
    assert_eq!(ids(&engine.search("unicorn OR dog")), vec![1, 2]);
}

#[test]
fn multi_word_segment_is_one_literal_term() {
    let engine = corpus();
    assert!(engine.search("quick brown AND fox").is_empty());
    assert_eq!(ids(&engine.search("quick brown OR garden")), vec![2]);
}

#[test]
fn search_does_not_mutate_index() {
    let engine = corpus();
    let before = engine.index_listing();
    engine.search("dog AND cat");
    engine.search("fox OR garden");
    assert_eq!(engine.index_listing(), before);
}

#[test]
fn listings_are_sorted() {
    let mut engine = SearchEngine::new();
    engine.add_document("zebra apple", Some(9));
    engine.add_document("apple", Some(2));

    let index = engine.index_listing();
    assert_eq!(
        index,
        vec![
            IndexEntry { term: "apple".into(), doc_ids: vec![2, 9] },
            IndexEntry { term: "zebra".into(), doc_ids: vec![9] },
        ]
    );

    let docs: Vec<u64> = engine.document_listing().iter().map(|d| d.doc_id).collect();
    assert_eq!(docs, vec![2, 9]);
}

#[test]
fn document_without_terms_is_stored_but_unindexed() {
    let mut engine = SearchEngine::new();
    let id = engine.add_document("1234 !!", None);
    assert!(engine.contains(id));
    assert_eq!(engine.num_terms(), 0);
    assert!(engine.delete_document(id));
    assert!(engine.is_empty());
}
