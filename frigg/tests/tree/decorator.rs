use frigg::{Area, Rect};

use crate::support::{RecordingUi, zoo};

#[test]
fn required_members_grow_while_empty() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let nameless = zoo.unit_with("", 10, &[]);
    let mut tree = zoo.tree(&[&nameless]);
    let name = tree.find_by_path("name").unwrap();
    assert_eq!(tree.property(name).unwrap().decorators().len(), 1);
    assert_eq!(tree.property_height(name).unwrap(), 38.0);

    let mut ui = RecordingUi::new();
    tree.draw(&mut ui).unwrap();
    let events = ui.take();
    let mut lines = events.lines();
    assert_eq!(lines.next(), Some("help Error Name is required!"));
    assert_eq!(lines.next(), Some(r#"field name = """#));

    ui.edit("name", "Ada");
    tree.draw(&mut ui).unwrap();
    assert_eq!(tree.property_height(name).unwrap(), 18.0);
    ui.take();
    tree.draw(&mut ui).unwrap();
    assert!(!ui.take().contains("help"));
}

#[test]
fn any_empty_target_shows_the_message() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let ada = zoo.unit_with("Ada", 10, &[]);
    let nameless = zoo.unit_with("", 10, &[]);
    let mut tree = zoo.tree(&[&ada, &nameless]);

    let mut ui = RecordingUi::new();
    tree.draw(&mut ui).unwrap();
    assert!(ui.take().starts_with("help Error Name is required!\nfield name = <mixed>"));
}

#[test]
fn decorators_take_the_top_of_the_slot() {
    frigg_testhelpers::setup();
    let zoo = zoo();
    let nameless = zoo.unit_with("", 10, &[]);
    let mut tree = zoo.tree(&[&nameless]);

    let mut ui = RecordingUi::new();
    tree.draw_in(&mut ui, Rect::new(0.0, 0.0, 300.0, 1000.0)).unwrap();
    let areas: Vec<Area> = ui.areas.iter().take(3).map(|(_, area)| *area).collect();
    assert_eq!(
        areas,
        [
            Area::Rect(Rect::new(0.0, 0.0, 300.0, 20.0)),
            Area::Rect(Rect::new(0.0, 20.0, 300.0, 18.0)),
            Area::Rect(Rect::new(0.0, 38.0, 300.0, 18.0)),
        ]
    );
    assert_eq!(ui.areas[2].0, "field hp = 10");
}
