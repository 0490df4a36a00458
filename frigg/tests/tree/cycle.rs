use std::rc::Rc;

use frigg::{
    AccessError, NodeKind, PropertyTree, TreeError, TypeHandle, TypeRegistry, Value, ValueKind,
};

use crate::support::{CountingStore, RecordingUi, ints, objects, read_ints, zoo};

/// Path and values of every leaf, in tree order.
fn leaves(tree: &PropertyTree) -> Vec<(String, Option<Vec<Value>>)> {
    tree.enumerate_tree(true)
        .map(|id| tree.property(id).unwrap())
        .filter(|p| p.kind().tag() == NodeKind::Leaf)
        .map(|p| {
            (
                p.meta().path().to_string(),
                p.value().values().map(<[Value]>::to_vec),
            )
        })
        .collect()
}

#[test]
fn updating_twice_without_changes_is_a_no_op() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2]);
    ada.set("weapons", Value::array([zoo.weapon("axe", 3)]));
    let mut tree = zoo.tree(&[&ada]);

    tree.update_tree().unwrap();
    let first = leaves(&tree);
    tree.update_tree().unwrap();
    assert_eq!(leaves(&tree), first);
    assert_eq!(ada.get("hp"), Some(Value::Int(10)));
    assert_eq!(read_ints(&ada, "scores"), [1, 2]);
}

#[test]
fn composites_cut_off_at_the_depth_limit_stay_unchanged_across_updates() {
    frigg_testhelpers::setup();
    let mut registry = TypeRegistry::new();
    let node = registry.declare("Node");
    registry
        .define(node)
        .field("value", TypeHandle::INT)
        .field("next", node)
        .build();
    let holder = registry
        .composite("Holder")
        .host_object()
        .field("chain", node)
        .build();
    let registry = Rc::new(registry);
    let target = registry.instantiate(holder);
    let mut tree = PropertyTree::builder(registry.clone(), [Value::Object(target)])
        .max_depth(2)
        .build()
        .unwrap();
    let next = tree.find_by_path("chain.next").unwrap();
    assert_eq!(tree.property(next).unwrap().kind().tag(), NodeKind::Leaf);

    tree.update_tree().unwrap();
    let first = leaves(&tree);
    tree.update_tree().unwrap();
    assert_eq!(leaves(&tree), first);
}

#[test]
fn external_changes_are_picked_up() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2]);
    let mut tree = zoo.tree(&[&ada]);
    let scores = tree.find_by_path("scores").unwrap();
    let hp = tree.find_by_path("hp").unwrap();

    ada.set("hp", Value::Int(3));
    ada.set("scores", ints(&[1, 2, 3]));
    tree.update_tree().unwrap();
    assert_eq!(tree.property(hp).unwrap().value().get(), Some(&Value::Int(3)));
    assert_eq!(tree.child_count(scores).unwrap(), 3);
    assert!(tree.find_by_path("scores[2]").is_some());

    ada.set("scores", ints(&[7]));
    tree.update_tree().unwrap();
    assert_eq!(tree.child_count(scores).unwrap(), 1);
    assert!(tree.find_by_path("scores[1]").is_none());
}

#[test]
fn draw_visits_properties_in_member_order() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2]);
    let mut tree = zoo.tree(&[&ada]);

    let mut ui = RecordingUi::new();
    tree.draw(&mut ui).unwrap();
    insta::assert_snapshot!(ui.take(), @r#"
    field name = "Ada"
    field hp = 10
    header Scores - 2 elements
    field scores[0] = 1
    field scores[1] = 2
    controls scores count=2 active=None
    header Weapons - 0 elements
    controls weapons count=0 active=None
    foldout stats
    field stats.power = 0
    field target = null
    field label = ""
    "#);
}

#[test]
fn collapsed_composites_hide_their_children() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[]);
    let mut tree = zoo.tree(&[&ada]);
    let stats = tree.find_by_path("stats").unwrap();
    let expanded = tree.property_height(stats).unwrap();

    let mut ui = RecordingUi::new();
    ui.collapse("stats");
    tree.draw(&mut ui).unwrap();
    let events = ui.take();
    assert!(events.contains("foldout stats"));
    assert!(!events.contains("stats.power"));
    assert!(!tree.property(stats).unwrap().is_expanded());
    assert_eq!(expanded, 36.0);
    assert_eq!(tree.property_height(stats).unwrap(), 18.0);
}

#[test]
fn edits_are_committed_to_every_target() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[]);
    let bob = zoo.unit_with("Bob", 20, &[]);
    let mut tree = zoo.tree(&[&ada, &bob]);

    let mut ui = RecordingUi::new();
    ui.edit("hp", 42);
    tree.draw(&mut ui).unwrap();
    assert!(ui.take().contains("field hp = <mixed>"));
    assert_eq!(ada.get("hp"), Some(Value::Int(42)));
    assert_eq!(bob.get("hp"), Some(Value::Int(42)));

    tree.draw(&mut ui).unwrap();
    assert!(ui.take().contains("field hp = 42"));
}

#[test]
fn each_operation_is_one_update_commit_pair() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1]);
    let (store, counts) = CountingStore::new(zoo.registry.clone(), &[&ada]);
    let mut tree = PropertyTree::builder(zoo.registry.clone(), objects(&[&ada]))
        .store(store)
        .build()
        .unwrap();
    let hp = tree.find_by_path("hp").unwrap();

    let mut ui = RecordingUi::new();
    tree.draw(&mut ui).unwrap();
    assert_eq!((counts.borrow().begins, counts.borrow().applies), (1, 1));

    tree.set_value(hp, 11).unwrap();
    assert_eq!((counts.borrow().begins, counts.borrow().applies), (2, 2));

    ui.edit("hp", 12).edit("scores[0]", 5);
    tree.draw(&mut ui).unwrap();
    assert_eq!((counts.borrow().begins, counts.borrow().applies), (3, 3));
    assert_eq!(counts.borrow().writes, ["hp", "hp", "scores[0]"]);

    tree.update_tree().unwrap();
    assert_eq!((counts.borrow().begins, counts.borrow().applies), (4, 4));
    assert_eq!(ada.get("hp"), Some(Value::Int(12)));
    assert_eq!(read_ints(&ada, "scores"), [5]);
}

#[test]
fn read_only_and_mistyped_writes_are_rejected() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[]);
    let mut tree = zoo.tree(&[&ada]);
    let label = tree.find_by_path("label").unwrap();
    let hp = tree.find_by_path("hp").unwrap();

    assert_eq!(
        tree.set_value(label, "x"),
        Err(TreeError::Access(AccessError::ReadOnly {
            path: "label".parse().unwrap(),
        }))
    );
    assert_eq!(
        tree.set_value(hp, "x"),
        Err(TreeError::Access(AccessError::TypeMismatch {
            path: "hp".parse().unwrap(),
            expected: "int".into(),
            found: ValueKind::String,
        }))
    );

    let mut ui = RecordingUi::new();
    ui.edit("label", "x");
    tree.draw(&mut ui).unwrap();
    assert_eq!(ada.get("label"), Some(Value::from("")));
    assert_eq!(ada.get("hp"), Some(Value::Int(10)));
}

#[test]
fn members_missing_from_a_target_are_skipped() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[]);
    let bob = zoo.unit_with("Bob", 10, &[]);
    bob.set("stats", Value::Null);
    let mut tree = zoo.tree(&[&ada, &bob]);

    let power = tree.find_by_path("stats.power").unwrap();
    assert!(!tree.property(power).unwrap().value().is_resolved());
    assert_eq!(tree.property_height(power).unwrap(), 0.0);

    let mut ui = RecordingUi::new();
    tree.draw(&mut ui).unwrap();
    let events = ui.take();
    assert!(events.contains("foldout stats"));
    assert!(!events.contains("stats.power"));
    assert!(events.contains("field hp = 10"));
}
