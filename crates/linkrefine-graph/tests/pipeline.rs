//! End-to-end tests: scan a corpus on disk, select candidates, review and
//! write back through the filesystem.

use std::path::PathBuf;

use linkrefine_graph::{
    find_links, prepare, prepare_with_progress, strip_links_to, ContentMeasure, Decision,
    FsPageWriter, LinkPolicy, NoopObserver, Phase, Proposal, RefineConfig, RefineError,
    SelectionCriteria,
};
use linkrefine_test_utils::{
    ObservedEvent, RecordingObserver, RecordingWriter, ScriptedDecider, TestCorpus,
};

fn config(min_backlinks: usize, max_content_size: usize) -> RefineConfig {
    RefineConfig {
        selection: SelectionCriteria {
            min_backlinks,
            max_content_size,
            measure: ContentMeasure::Lines,
        },
        ..RefineConfig::default()
    }
}

/// `A.md` is empty and linked once from each of B..G.
fn six_backlink_corpus() -> TestCorpus {
    TestCorpus::new()
        .page("A.md", "")
        .page("B.md", "- talked about [[A]] today\n- and [[H]]\n")
        .page("C.md", "- [[A]]\n")
        .page("D.md", "- [[A]]\n")
        .page("E.md", "- [[A]]\n")
        .page("F.md", "- [[A]]\n")
        .page("G.md", "- [[A]]\n")
        .page("H.md", "- H has some\n- real\n- content\n- here\n")
}

// ─── Selection ───────────────────────────────────────────────────────────────

#[test]
fn test_prepare_reports_phases() {
    let corpus = six_backlink_corpus();
    let mut phases = Vec::new();
    let prepared =
        prepare_with_progress(&[corpus.root()], &config(5, 0), |phase| phases.push(phase)).unwrap();

    assert_eq!(phases, vec![Phase::Scanning, Phase::Selecting]);
    assert_eq!(prepared.session.phase(), Phase::Selecting);
}

#[test]
fn test_prepare_stops_in_scanning_on_missing_root() {
    let corpus = six_backlink_corpus();
    let mut phases = Vec::new();
    let result = prepare_with_progress(&[corpus.file("missing")], &config(5, 0), |phase| {
        phases.push(phase)
    });

    assert!(matches!(result, Err(RefineError::CorpusAccess { .. })));
    assert_eq!(phases, vec![Phase::Scanning]);
}

#[test]
fn test_sole_candidate_selected() {
    let corpus = six_backlink_corpus();
    let prepared = prepare(&[corpus.root()], &config(5, 0)).unwrap();

    let candidates = prepared.session.candidates();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].page, "A");
    assert_eq!(candidates[0].backlinks, 6);
    assert_eq!(
        prepared.session.graph().backlinks("A").unwrap(),
        vec!["B", "C", "D", "E", "F", "G"]
    );
}

#[test]
fn test_candidates_ordered_by_backlinks_regardless_of_scan_order() {
    let corpus = TestCorpus::new()
        .page("Alpha.md", "")
        .page("Beta.md", "")
        .linking_pages("a-src", "Alpha", 7)
        .linking_pages("b-src", "Beta", 10);
    let prepared = prepare(&[corpus.root()], &config(5, 3)).unwrap();

    let pages: Vec<_> = prepared
        .session
        .candidates()
        .iter()
        .map(|c| (c.page.as_str(), c.backlinks))
        .collect();
    assert_eq!(pages, vec![("Beta", 10), ("Alpha", 7)]);
}

#[test]
fn test_skip_list_applies_to_corpus() {
    let corpus = six_backlink_corpus();
    let mut cfg = config(5, 0);
    cfg.skip.add_page("A");

    let prepared = prepare(&[corpus.root()], &cfg).unwrap();
    assert!(prepared.session.candidates().is_empty());
}

#[test]
fn test_multiple_roots_scanned_in_order() {
    let corpus = TestCorpus::new()
        .page("pages/Topic.md", "")
        .linking_pages("journals/day", "Topic", 3)
        .page("pages/Note.md", "[[Topic]] [[Topic]]");
    let roots = [corpus.file("pages"), corpus.file("journals")];
    let prepared = prepare(&roots, &config(3, 0)).unwrap();

    // Four distinct sources; the duplicate link in Note counts once.
    assert_eq!(
        prepared.session.graph().backlinks("Topic").unwrap(),
        vec!["Note", "day0", "day1", "day2"]
    );
    assert_eq!(prepared.session.candidates()[0].backlinks, 4);
}

#[test]
fn test_logseq_namespace_files_join_hierarchy() {
    let corpus = TestCorpus::new()
        .page("Project.md", "")
        .page("Project___Sub.md", "")
        .page("Notes.md", "- [[Project/Sub]] and [[ProjectX]]");
    let prepared = prepare(&[corpus.root()], &config(0, 0)).unwrap();
    let graph = prepared.session.graph();

    assert_eq!(graph.backlinks("Project").unwrap(), vec!["Notes"]);
    assert_eq!(graph.backlinks("Project/Sub").unwrap(), vec!["Notes"]);
    assert_eq!(graph.dangling_links().len(), 1);
    assert_eq!(graph.dangling_links()[0].target, "ProjectX");
}

// ─── Review loop ─────────────────────────────────────────────────────────────

#[test]
fn test_accepting_first_backlink_rewrites_only_that_file() {
    let corpus = six_backlink_corpus();
    let before_b = corpus.read("B.md");
    let mut prepared = prepare(&[corpus.root()], &config(5, 0)).unwrap();

    let mut decider = ScriptedDecider::new([Decision::Apply]).otherwise(Decision::Skip);
    let summary = prepared
        .session
        .run(&mut decider, &mut FsPageWriter::new(), &mut NoopObserver)
        .unwrap();

    assert_eq!(summary.applied, 1);
    assert_eq!(summary.skipped, 5);
    let after_b = corpus.read("B.md");
    assert_eq!(after_b, "- talked about A today\n- and [[H]]\n");
    assert_eq!(after_b.len(), before_b.len() - 4);
    assert_eq!(corpus.read("C.md"), "- [[A]]\n");
    assert_eq!(prepared.session.graph().content("B").unwrap(), after_b);
}

#[test]
fn test_proposals_asked_in_backlink_order() {
    let corpus = six_backlink_corpus();
    let mut prepared = prepare(&[corpus.root()], &config(5, 0)).unwrap();

    let mut decider = ScriptedDecider::reject_all();
    prepared
        .session
        .run(&mut decider, &mut RecordingWriter::new(), &mut NoopObserver)
        .unwrap();

    let sources: Vec<_> = decider.asked().into_iter().map(|(_, s)| s).collect();
    assert_eq!(sources, vec!["B", "C", "D", "E", "F", "G"]);
}

#[test]
fn test_failed_write_is_reported_and_run_continues() {
    let corpus = six_backlink_corpus();
    let mut prepared = prepare(&[corpus.root()], &config(5, 0)).unwrap();

    let mut writer = RecordingWriter::to_disk().failing_on(corpus.file("C.md"));
    let mut observer = RecordingObserver::new();
    let mut decider = ScriptedDecider::accept_all();
    let summary = prepared
        .session
        .run(&mut decider, &mut writer, &mut observer)
        .unwrap();

    assert_eq!(summary.applied, 5);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].source, "C");
    assert_eq!(corpus.read("C.md"), "- [[A]]\n");
    assert_eq!(corpus.read("D.md"), "- A\n");
    let written: Vec<PathBuf> = ["B.md", "D.md", "E.md", "F.md", "G.md"]
        .iter()
        .map(|f| corpus.file(f))
        .collect();
    assert_eq!(
        writer.written_paths(),
        written.iter().map(PathBuf::as_path).collect::<Vec<_>>()
    );
    assert_eq!(prepared.session.graph().content("C").unwrap(), "- [[A]]\n");
    assert!(observer
        .events
        .iter()
        .any(|e| matches!(e, ObservedEvent::WriteFailed { source, .. } if source == "C")));
}

#[test]
fn test_quit_keeps_applied_writes() {
    let corpus = six_backlink_corpus();
    let mut prepared = prepare(&[corpus.root()], &config(5, 0)).unwrap();

    let mut decider = ScriptedDecider::new([Decision::Apply, Decision::Apply, Decision::Quit]);
    let summary = prepared
        .session
        .run(&mut decider, &mut FsPageWriter::new(), &mut NoopObserver)
        .unwrap();

    assert!(summary.aborted);
    assert_eq!(summary.applied, 2);
    assert_eq!(corpus.read("C.md"), "- A\n");
    assert_eq!(corpus.read("D.md"), "- [[A]]\n");
}

#[test]
fn test_closure_decider_and_observer_sequence() {
    let corpus = TestCorpus::new()
        .page("A.md", "")
        .page("B.md", "[[A]]")
        .page("C.md", "[[A/child]]");
    let mut prepared = prepare(&[corpus.root()], &config(1, 0)).unwrap();

    let mut decider = |p: &Proposal| p.source == "C";
    let mut observer = RecordingObserver::new();
    prepared
        .session
        .run(&mut decider, &mut FsPageWriter::new(), &mut observer)
        .unwrap();

    assert_eq!(observer.candidates(), vec!["A"]);
    assert_eq!(corpus.read("B.md"), "[[A]]");
    assert_eq!(corpus.read("C.md"), "A/child");
    assert_eq!(
        observer.events.last(),
        Some(&ObservedEvent::Applied {
            candidate: "A".to_string(),
            source: "C".to_string()
        })
    );
}

#[test]
fn test_rerun_after_refinement_finds_nothing_to_strip() {
    let corpus = six_backlink_corpus();
    let mut first = prepare(&[corpus.root()], &config(5, 0)).unwrap();
    first
        .session
        .run(&mut ScriptedDecider::accept_all(), &mut FsPageWriter::new(), &mut NoopObserver)
        .unwrap();

    let second = prepare(&[corpus.root()], &config(5, 0)).unwrap();
    assert!(second.session.candidates().is_empty());
    assert_eq!(second.session.graph().backlink_count("A"), 0);
}

#[test]
fn test_leaf_policy_end_to_end() {
    let corpus = TestCorpus::new()
        .page("Project.md", "")
        .page("One.md", "[[Area/Project]]")
        .page("Two.md", "[[Project]]");
    let mut cfg = config(1, 0);
    cfg.link_policy = LinkPolicy::Leaf;
    let mut prepared = prepare(&[corpus.root()], &cfg).unwrap();

    prepared
        .session
        .run(&mut ScriptedDecider::accept_all(), &mut FsPageWriter::new(), &mut NoopObserver)
        .unwrap();
    assert_eq!(corpus.read("One.md"), "Area/Project");
    assert_eq!(corpus.read("Two.md"), "Project");
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn test_missing_root_aborts_before_indexing() {
    let corpus = TestCorpus::new().page("A.md", "");
    let roots = [corpus.root().to_path_buf(), corpus.file("missing")];
    let err = prepare(&roots, &RefineConfig::default()).unwrap_err();
    assert!(matches!(err, RefineError::CorpusAccess { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn test_unreadable_file_skipped() {
    let corpus = six_backlink_corpus();
    std::fs::write(corpus.file("Broken.md"), [0xc3, 0x28]).unwrap();

    let prepared = prepare(&[corpus.root()], &config(5, 0)).unwrap();
    assert_eq!(prepared.skipped.len(), 1);
    assert!(!prepared.session.graph().contains("Broken"));
    assert_eq!(prepared.session.candidates().len(), 1);
}

// ─── Text properties ─────────────────────────────────────────────────────────

#[test]
fn test_strip_properties_over_corpus_samples() {
    let samples = [
        "- [[A]] text [[B/C]]",
        "[[A/x]] [[AB]] [[A]]]] [[ A ]]",
        "multi\n[[A]]\n\n[[A/y/z]] end",
        "",
    ];
    for content in samples {
        let once = strip_links_to(content, "A");
        assert_eq!(strip_links_to(&once, "A"), once);

        let matching = find_links(content)
            .into_iter()
            .filter(|t| *t == "A" || t.starts_with("A/"))
            .count();
        assert_eq!(once.len(), content.len() - 4 * matching);
    }
}
