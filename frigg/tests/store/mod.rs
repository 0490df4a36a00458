use frigg::{PropertyTree, SerializedObject, SerializedStore, Value};

use crate::support::{RecordingUi, read_ints, zoo};

#[test]
fn trees_share_the_targets_of_their_store() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2]);
    let bob = zoo.unit_with("Bob", 10, &[3]);
    let store = SerializedObject::new(zoo.registry.clone(), vec![ada.clone(), bob.clone()]);
    let mut tree = PropertyTree::init_from_store(zoo.registry.clone(), store).unwrap();

    assert_eq!(tree.targets().len(), 2);
    assert!(tree.targets()[0].ptr_eq(&ada));
    assert!(tree.targets()[1].ptr_eq(&bob));

    let hp = tree.find_by_path("hp").unwrap();
    tree.set_value(hp, 1).unwrap();
    assert_eq!(ada.get("hp"), Some(Value::Int(1)));
    assert_eq!(bob.get("hp"), Some(Value::Int(1)));
}

#[test]
fn store_fields_are_found_by_path() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2]);
    let tree = zoo.tree(&[&ada]);
    let store = tree.store().unwrap();

    let field = store.find_field_by_path("scores[1]").unwrap().unwrap();
    assert_eq!(store.read(&field).unwrap(), [Value::Int(2)]);
    assert!(store.find_field_by_path("scores[2]").unwrap().is_none());
    assert!(store.find_field_by_path("scores[").is_err());
}

#[test]
fn targets_change_only_when_a_cycle_commits() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1]);
    let mut store = SerializedObject::new(zoo.registry.clone(), vec![ada.clone()]);
    store.begin_update();
    let field = store.find_field_by_path("scores").unwrap().unwrap();
    store
        .write(&field, frigg::Assign::All(Value::array([Value::Int(9)])))
        .unwrap();
    assert_eq!(read_ints(&ada, "scores"), [1]);

    let mut tree = PropertyTree::init_from_store(zoo.registry.clone(), store).unwrap();
    tree.draw(&mut RecordingUi::new()).unwrap();
    assert_eq!(read_ints(&ada, "scores"), [1]);
}
