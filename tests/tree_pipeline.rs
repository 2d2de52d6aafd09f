use proctree::process::ProcessRecord;
use proctree::query::{QueryOutcome, SubtreeQuery};
use proctree::render::{RenderOptions, Theme, TreeRenderer};
use proctree::repository::ProcessRepository;
use proctree::source::{ProcessSource, StaticSource};
use proctree::tree::ProcessForest;

fn collect(records: Vec<ProcessRecord>) -> ProcessRepository {
    let mut repository = ProcessRepository::new();
    StaticSource::new(records)
        .collect_into(&mut repository)
        .unwrap();
    repository
}

fn render_forest(repository: &ProcessRepository, options: RenderOptions) -> String {
    let forest = ProcessForest::build(repository);
    let theme = Theme::plain();
    let mut output = Vec::new();
    TreeRenderer::new(&forest, options, &theme)
        .render_forest(&mut output)
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_collection_order_does_not_leak_into_output() {
    let records = vec![
        ProcessRecord::new(1, Some(0), "init").with_status("S"),
        ProcessRecord::new(2, Some(1), "shell").with_status("S"),
        ProcessRecord::new(3, Some(2), "editor").with_status("R"),
        ProcessRecord::new(4, Some(0), "daemon").with_status("S"),
        ProcessRecord::new(5, Some(1), "cron").with_status("S"),
    ];
    let mut reversed = records.clone();
    reversed.reverse();

    let options = RenderOptions {
        show_resources: true,
        verbose: true,
    };
    let forward = render_forest(&collect(records), options);
    let backward = render_forest(&collect(reversed), options);

    assert_eq!(forward, backward);
    insta::assert_snapshot!(forward, @r"
    └── init [PID: 1] CPU: 0.0% MEM: 0KB Threads: 0
        ├── shell [PID: 2] CPU: 0.0% MEM: 0KB Threads: 0
        │   └── editor [PID: 3] CPU: 0.0% MEM: 0KB Threads: 0
        └── cron [PID: 5] CPU: 0.0% MEM: 0KB Threads: 0
    └── daemon [PID: 4] CPU: 0.0% MEM: 0KB Threads: 0
    ");
}

#[test]
fn test_subtree_query_on_collected_processes() {
    let repository = collect(vec![
        ProcessRecord::new(1, None, "init"),
        ProcessRecord::new(10, Some(1), "sshd"),
        ProcessRecord::new(11, Some(10), "sshd"),
        ProcessRecord::new(12, Some(11), "bash"),
        ProcessRecord::new(20, Some(1), "nginx"),
    ]);
    let forest = ProcessForest::build(&repository);
    let theme = Theme::plain();
    let renderer = TreeRenderer::new(&forest, RenderOptions::default(), &theme);
    let query = SubtreeQuery::new(&renderer);

    let mut output = Vec::new();
    assert_eq!(
        query.render_pid(11, &mut output).unwrap(),
        QueryOutcome::Rendered
    );
    let output = String::from_utf8(output).unwrap();
    let tree: Vec<&str> = output.lines().skip(4).collect();
    assert_eq!(tree, vec!["└── sshd [PID: 11]", "    └── bash [PID: 12]"]);

    let mut missing = Vec::new();
    assert_eq!(
        query.render_pid(999, &mut missing).unwrap(),
        QueryOutcome::NotFound
    );
    assert_eq!(
        String::from_utf8(missing).unwrap(),
        "Process with PID 999 not found\n"
    );
    assert_eq!(repository.count(), 5);
}

#[test]
fn test_duplicate_pid_keeps_last_record() {
    let repository = collect(vec![
        ProcessRecord::new(1, None, "init"),
        ProcessRecord::new(2, Some(1), "old"),
        ProcessRecord::new(2, Some(1), "new"),
    ]);

    assert_eq!(repository.count(), 2);
    assert_eq!(repository.collected(), 3);
    assert_eq!(
        render_forest(&repository, RenderOptions::default()),
        "└── init [PID: 1]\n    └── new [PID: 2]\n"
    );
}

#[test]
fn test_empty_collection_renders_nothing() {
    let repository = collect(Vec::new());
    assert_eq!(render_forest(&repository, RenderOptions::default()), "");
}
