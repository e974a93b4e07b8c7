use std::cell::RefCell;
use std::rc::Rc;
use timetable::grid::DrawCommand;
use timetable::interaction::ItemClick;
use timetable::model::{IngestOutcome, TUESDAY, WEDNESDAY};
use timetable::{
    DisplayMode, GestureEvent, GridConfig, RosterStore, SectionKind, Tick, TimetableController,
    TimetableListener,
};

const PORTAL_PAGE: &str = r##"
<html>
<body>
  <table width="100%"><tr><td class="title">Registered Course</td></tr></table>
  <table width="100%"><tr><td>
    <table border="1">
      <tr bgcolor="#003366"><td>No</td><td>Code</td><td>Title</td><td>Lecture</td><td>Tutorial</td><td>Credit</td></tr>
      <tr bgcolor="#FFFFFF"><td>1</td><td>TCP1101</td><td>Programming Fundamentals</td><td>LEC TC01</td><td>TUT TT02</td><td>4</td></tr>
      <tr bgcolor="#FFFFFF"><td>2</td><td>TMA1101</td><td>Calculus</td><td>LEC TC03</td><td>-</td><td>3</td></tr>
    </table>
  </td></tr></table>

  <table width="100%"><tr><td class="title">Schedule</td></tr></table>
  <table width="100%"><tr><td>
    <table border="1">
      <tr bgcolor="#003366"><td>No</td><td>Code</td><td>Section</td><td>Day</td><td>Time</td><td>Room</td></tr>
      <tr bgcolor="#FFFFFF"><td>1</td><td>TCP1101</td><td>LEC TC01</td><td>TUE</td><td>10AM</td><td>CNMX1001</td></tr>
      <tr bgcolor="#FFFFFF"><td>2</td><td>TUE</td><td>11AM</td><td>CNMX1001</td></tr>
      <tr bgcolor="#FFFFFF"><td>3</td><td>TUT TT02</td><td>THU</td><td>02PM</td><td>BR2005</td></tr>
      <tr bgcolor="#FFFFFF"><td>4</td><td>TMA1101</td><td>LEC TC03</td><td>WED</td><td>08AM</td><td>DTC</td></tr>
      <tr bgcolor="#FFFFFF"><td>5</td><td>WED</td><td>09AM</td><td>DTC</td></tr>
      <tr bgcolor="#FFFFFF"><td>6</td><td>WED</td><td>07AM</td><td>DTC</td></tr>
    </table>
  </td></tr></table>
</body>
</html>
"##;

#[derive(Clone, Default)]
struct Clicks(Rc<RefCell<Vec<ItemClick>>>);

impl TimetableListener for Clicks {
    fn on_item_click(&mut self, click: &ItemClick) {
        self.0.borrow_mut().push(click.clone());
    }

    fn on_day_changed(&mut self, _day: u8) {}
}

#[tokio::test]
async fn test_portal_page_to_tap() {
    let store = RosterStore::new();
    let outcome = store.ingest(PORTAL_PAGE.to_string()).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Replaced { subjects: 2 });

    let roster = store.snapshot();
    let programming = roster.find_subject("tcp1101").unwrap();
    assert_eq!(programming.tutorial_section.as_deref(), Some("TUT TT02"));
    assert_eq!(programming.schedules().len(), 2);
    assert_eq!(programming.schedules()[1].section(), SectionKind::Tutorial);
    assert_eq!(programming.schedules()[1].start_hour(), 14);

    let calculus = roster.find_subject("TMA1101").unwrap();
    assert_eq!(calculus.tutorial_section, None);
    assert_eq!(calculus.schedules().len(), 1);
    assert_eq!(calculus.schedules()[0].start_hour(), 7);
    assert_eq!(calculus.schedules()[0].length(), 3);

    let config = GridConfig {
        display_mode: DisplayMode::Week,
        current_day: Some(TUESDAY),
        ..GridConfig::default()
    };
    let mut controller = TimetableController::new(config, 556.0, 900.0, roster).unwrap();
    let clicks = Clicks::default();
    controller.set_listener(Box::new(clicks.clone()));

    // Calculus starts before the visible range; its 9AM hour is still on screen
    let viewport = *controller.viewport();
    let (x, y) = controller
        .geometry()
        .cell_rect(WEDNESDAY, 9, 1, &viewport)
        .unwrap()
        .center();
    assert_eq!(controller.handle(GestureEvent::Tap { x, y }), Tick::Done);

    let clicks = clicks.0.borrow();
    assert_eq!(clicks.len(), 1);
    assert_eq!((clicks[0].day, clicks[0].hour), (WEDNESDAY, 9));
    assert_eq!(
        clicks[0].slot.as_ref().map(|s| s.subject_code.as_str()),
        Some("TMA1101")
    );
}

#[tokio::test]
async fn test_replaced_roster_reaches_grid() {
    let store = RosterStore::new();
    let config = GridConfig {
        display_mode: DisplayMode::Week,
        current_day: Some(TUESDAY),
        ..GridConfig::default()
    };
    let mut controller = TimetableController::new(config, 556.0, 900.0, store.snapshot()).unwrap();
    assert!(controller.layout().is_empty());

    store.ingest(PORTAL_PAGE.to_string()).await.unwrap();
    controller.set_roster(store.snapshot());

    let codes: Vec<String> = controller.layout().into_iter().map(|b| b.code).collect();
    assert_eq!(codes, vec!["TCP1101", "TCP1101", "TMA1101"]);

    let json = serde_json::to_string(&controller.display_list()).unwrap();
    assert!(json.contains("\"op\":\"fill_rect\""));
    assert!(controller
        .display_list()
        .iter()
        .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "CNMX1001")));
}

#[tokio::test]
async fn test_broken_page_keeps_roster_on_screen() {
    let store = RosterStore::new();
    store.ingest(PORTAL_PAGE.to_string()).await.unwrap();

    let broken = PORTAL_PAGE.replace("Registered Course", "Maintenance");
    assert!(store.ingest(broken).await.is_err());
    assert_eq!(store.snapshot().len(), 2);
}
