use codebench_tree::NodeId;
use codebench_workbench::{Command, Outcome, Workbench};

fn id_of(bench: &Workbench, path: &str) -> NodeId {
    bench
        .tree()
        .resolve_path(path)
        .unwrap_or_else(|| panic!("missing node at {path}"))
}

fn open(bench: &mut Workbench, path: &str) -> NodeId {
    let id = id_of(bench, path);
    bench
        .apply(Command::Open { target: id })
        .expect("open file");
    id
}

#[test]
fn deleting_a_folder_drops_descendant_tabs_in_the_same_step() {
    let mut bench = Workbench::with_sample_project();
    let readme = open(&mut bench, "README.md");
    let index = open(&mut bench, "src/index.js");
    open(&mut bench, "src/components/Button.jsx");
    bench
        .apply(Command::Select { target: index })
        .expect("select");

    let src = id_of(&bench, "src");
    bench
        .apply(Command::RequestDelete { target: src })
        .expect("request delete");
    assert!(bench.tree().contains(src), "nothing removed while pending");
    assert_eq!(bench.session().len(), 3);

    let outcome = bench.apply(Command::ConfirmDelete).expect("confirm");
    let diff = match outcome {
        Outcome::TreeAndSessionChanged(diff) => diff,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(diff.removed.len(), 5, "src subtree holds five nodes");

    assert!(bench.tree().resolve_path("src").is_none());
    assert!(bench.tree().resolve_path("src/index.js").is_none());
    assert_eq!(bench.session().len(), 1);
    assert_eq!(bench.session().active_id(), Some(readme));
    assert_eq!(bench.active().filename, "README.md");
}

#[test]
fn pruned_session_promotes_the_newest_surviving_tab() {
    let mut bench = Workbench::with_sample_project();
    open(&mut bench, "README.md");
    let pkg = open(&mut bench, "package.json");
    let index = open(&mut bench, "src/index.js");
    assert_eq!(bench.session().active_id(), Some(index));

    let src = id_of(&bench, "src");
    bench
        .apply(Command::RequestDelete { target: src })
        .expect("request delete");
    bench.apply(Command::ConfirmDelete).expect("confirm");

    assert_eq!(bench.session().active_id(), Some(pkg));
    assert_eq!(bench.active().filename, "package.json");
    assert!(bench.active().content.contains("codebench-sample"));
}

#[test]
fn cancelled_delete_request_changes_nothing() {
    let mut bench = Workbench::with_sample_project();
    open(&mut bench, "src/index.js");
    let snapshot = bench.clone();

    let src = id_of(&bench, "src");
    bench
        .apply(Command::RequestDelete { target: src })
        .expect("request delete");
    assert!(bench.pending_delete().is_some());

    bench.apply(Command::CancelDelete).expect("cancel");
    assert_eq!(bench, snapshot);
}

#[test]
fn search_results_follow_every_tree_mutation() {
    let mut bench = Workbench::with_sample_project();
    bench
        .apply(Command::SetSearchQuery {
            query: "jsx".into(),
        })
        .expect("set query");
    assert_eq!(bench.search().results().len(), 2);

    let src = id_of(&bench, "src");
    bench
        .apply(Command::RequestDelete { target: src })
        .expect("request delete");
    bench.apply(Command::ConfirmDelete).expect("confirm");
    assert!(
        bench.search().results().is_empty(),
        "hits must drop with their files"
    );

    let root = bench.tree().root_id();
    bench
        .apply(Command::CreateFile {
            context: root,
            name: Some("Panel.jsx".into()),
        })
        .expect("create");
    assert_eq!(bench.search().results().len(), 1);
}

#[test]
fn mirror_tracks_rename_and_edit_of_the_active_file() {
    let mut bench = Workbench::with_sample_project();
    let index = open(&mut bench, "src/index.js");

    bench
        .apply(Command::Edit {
            target: index,
            content: "console.log(\"hi\");\n".into(),
        })
        .expect("edit");
    assert_eq!(bench.active().content, "console.log(\"hi\");\n");
    assert!(bench.tree().get(index).expect("node").edited());

    bench
        .apply(Command::Rename {
            target: index,
            name: "main.js".into(),
        })
        .expect("rename");
    assert_eq!(bench.active().filename, "main.js");
    assert_eq!(bench.tree().get(index).expect("node").name, "main.js");
    assert!(bench.tree().resolve_path("src/main.js").is_some());
}

#[test]
fn close_other_tabs_spares_only_the_active_one() {
    let mut bench = Workbench::with_sample_project();
    let readme = open(&mut bench, "README.md");
    let pkg = open(&mut bench, "package.json");
    open(&mut bench, "src/index.js");
    bench
        .apply(Command::TogglePin { target: readme })
        .expect("pin");
    bench
        .apply(Command::Select { target: pkg })
        .expect("select");

    bench.apply(Command::CloseOtherTabs).expect("close others");
    assert_eq!(bench.session().len(), 1);
    assert_eq!(bench.session().active_id(), Some(pkg));
}

#[test]
fn pins_and_order_survive_a_prune() {
    let mut bench = Workbench::with_sample_project();
    let readme = open(&mut bench, "README.md");
    let pkg = open(&mut bench, "package.json");
    let html = open(&mut bench, "public/index.html");
    bench
        .apply(Command::TogglePin { target: pkg })
        .expect("pin");
    bench
        .apply(Command::Reorder { from: 0, to: 1 })
        .expect("reorder");

    let public = id_of(&bench, "public");
    bench
        .apply(Command::RequestDelete { target: public })
        .expect("request delete");
    bench.apply(Command::ConfirmDelete).expect("confirm");

    let order: Vec<NodeId> = bench.session().tabs().iter().map(|tab| tab.node).collect();
    assert_eq!(order, vec![pkg, readme]);
    assert!(bench.session().get(pkg).expect("tab").pinned);
    assert!(!bench.session().is_open(html));
}

#[test]
fn created_files_open_empty_and_record_edits() {
    let mut bench = Workbench::with_sample_project();
    let src = id_of(&bench, "src");
    let outcome = bench
        .apply(Command::CreateFile {
            context: src,
            name: None,
        })
        .expect("create");
    let diff = match outcome {
        Outcome::TreeChanged(diff) => diff,
        other => panic!("unexpected outcome {other:?}"),
    };
    let created = diff.added[0];
    assert_eq!(bench.tree().parent_of(created), Some(src));

    bench
        .apply(Command::Open { target: created })
        .expect("open");
    assert_eq!(bench.active().filename, "new-file.txt");
    assert_eq!(bench.active().content, "");
    assert!(!bench.tree().get(created).expect("node").edited());

    bench
        .apply(Command::Edit {
            target: created,
            content: "draft".into(),
        })
        .expect("edit");
    assert!(bench.tree().get(created).expect("node").edited());
}
