use std::rc::Rc;

use frigg::{
    Attribute, ListDrawerSettings, ListGesture, MemberDef, PropertyTree, TypeHandle, TypeRegistry,
    Value,
};

use crate::support::{RecordingUi, read_ints, zoo};

#[test]
fn add_select_remove_round() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2, 3]);
    let mut tree = zoo.tree(&[&ada]);
    let mut ui = RecordingUi::new();

    ui.gesture("scores", ListGesture::Add);
    tree.draw(&mut ui).unwrap();
    assert_eq!(read_ints(&ada, "scores"), [1, 2, 3, 0]);
    ui.take();

    ui.gesture("scores", ListGesture::Select(1));
    tree.draw(&mut ui).unwrap();
    assert!(ui.take().contains("controls scores count=4 active=None"));

    ui.gesture("scores", ListGesture::Remove);
    tree.draw(&mut ui).unwrap();
    assert!(ui.take().contains("controls scores count=4 active=Some(1)"));
    assert_eq!(read_ints(&ada, "scores"), [1, 3, 0]);

    tree.draw(&mut ui).unwrap();
    let events = ui.take();
    assert!(events.contains("header Scores - 3 elements"));
    assert!(events.contains("controls scores count=3 active=None"));
}

#[test]
fn remove_without_a_selection_drops_the_last_element() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2, 3]);
    let mut tree = zoo.tree(&[&ada]);
    let mut ui = RecordingUi::new();

    ui.gesture("scores", ListGesture::Remove);
    tree.draw(&mut ui).unwrap();
    assert_eq!(read_ints(&ada, "scores"), [1, 2]);
}

#[test]
fn dragging_reorders_elements() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[1, 2, 3]);
    let mut tree = zoo.tree(&[&ada]);
    let mut ui = RecordingUi::new();

    ui.gesture("scores", ListGesture::Select(2));
    tree.draw(&mut ui).unwrap();
    ui.gesture("scores", ListGesture::Move { from: 2, to: 0 });
    tree.draw(&mut ui).unwrap();
    assert_eq!(read_ints(&ada, "scores"), [3, 1, 2]);

    ui.take();
    tree.draw(&mut ui).unwrap();
    assert!(ui.take().contains("controls scores count=3 active=Some(0)"));
}

#[test]
fn disabled_controls_ignore_gestures() {
    frigg_testhelpers::setup();
    let mut registry = TypeRegistry::new();
    let ints = registry.array_of(TypeHandle::INT);
    let locked = ListDrawerSettings {
        allow_drag: false,
        hide_header: true,
        hide_add_button: true,
        hide_remove_button: true,
    };
    let deck = registry
        .composite("Deck")
        .host_object()
        .member(MemberDef::field("cards", ints).with(Attribute::ListDrawerSettings(locked)))
        .build();
    let registry = Rc::new(registry);
    let target = registry
        .instantiate(deck)
        .with("cards", Value::array([Value::Int(1), Value::Int(2)]));
    let mut tree = PropertyTree::init(registry.clone(), [Value::Object(target.clone())]).unwrap();
    let mut ui = RecordingUi::new();

    for gesture in [
        ListGesture::Add,
        ListGesture::Remove,
        ListGesture::Move { from: 0, to: 1 },
    ] {
        ui.gesture("cards", gesture);
        tree.draw(&mut ui).unwrap();
    }
    assert_eq!(read_ints(&target, "cards"), [1, 2]);
    assert!(!ui.take().contains("header"));

    let cards = tree.find_by_path("cards").unwrap();
    // two elements, each followed by spacing, and no chrome
    assert_eq!(tree.property_height(cards).unwrap(), 44.0);
}
