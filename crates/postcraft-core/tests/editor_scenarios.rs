use kurbo::{Point, Rect, Size};
use postcraft_core::{
    Artboard, ArtboardFormat, Corner, EditorConfig, Editor, ElementDraft, EventResponse,
    MemoryStorage, PageBridge, PointerEvent, PointerTarget,
};
use std::time::Instant;

fn instagram_editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::with_artboard(
        Artboard::new(ArtboardFormat::InstagramPost),
        Rect::new(0.0, 0.0, 1080.0, 1080.0),
    )
}

#[test]
fn test_drag_then_resize_to_minimum() {
    let mut editor = instagram_editor();
    let now = Instant::now();
    let id = editor.add_element(ElementDraft::text(
        Point::new(100.0, 100.0),
        Size::new(200.0, 40.0),
        "Summer sale",
    ));

    // Drag the body by (50, 0).
    editor.handle_pointer_event(PointerEvent::down(Point::new(120.0, 110.0)), now);
    editor.handle_pointer_event(PointerEvent::moved(Point::new(145.0, 110.0)), now);
    editor.handle_pointer_event(PointerEvent::moved(Point::new(170.0, 110.0)), now);
    editor.handle_pointer_event(PointerEvent::up(Point::new(170.0, 110.0)), now);
    let el = editor.scene().get(id).unwrap();
    assert_eq!(el.position, Point::new(150.0, 100.0));
    assert_eq!(editor.scene().selected(), Some(id));

    // Resize from the south-east corner by (-300, -300).
    let se = Point::new(350.0, 140.0);
    assert_eq!(editor.target_at(se), PointerTarget::Handle(id, Corner::BottomRight));
    editor.handle_pointer_event(PointerEvent::down(se), now);
    editor.handle_pointer_event(PointerEvent::moved(Point::new(50.0, -160.0)), now);
    let r = editor.handle_pointer_event(PointerEvent::up(Point::new(50.0, -160.0)), now);
    assert_eq!(r, EventResponse::GestureEnded(id));

    let el = editor.scene().get(id).unwrap();
    assert_eq!(el.size, Size::new(50.0, 50.0));
    assert_eq!(el.position, Point::new(150.0, 100.0));
    assert!(!editor.pointer_capture().is_active());
}

#[test]
fn test_each_gesture_is_one_undo_step() {
    let mut editor = instagram_editor();
    let now = Instant::now();
    let id = editor.add_element(ElementDraft::text(
        Point::new(100.0, 100.0),
        Size::new(200.0, 40.0),
        "Hello",
    ));

    editor.handle_pointer_event(PointerEvent::down(Point::new(150.0, 120.0)), now);
    for step in 1..=20 {
        let x = 150.0 + f64::from(step) * 5.0;
        editor.handle_pointer_event(PointerEvent::moved(Point::new(x, 120.0)), now);
    }
    editor.handle_pointer_event(PointerEvent::up(Point::new(250.0, 120.0)), now);
    assert_eq!(editor.scene().get(id).unwrap().position, Point::new(200.0, 100.0));

    assert!(editor.undo());
    assert_eq!(editor.scene().get(id).unwrap().position, Point::new(100.0, 100.0));
    assert!(editor.undo());
    assert!(editor.scene().is_empty());
    assert!(!editor.undo());

    assert!(editor.redo());
    assert!(editor.redo());
    assert_eq!(editor.scene().get(id).unwrap().position, Point::new(200.0, 100.0));
}

#[test]
fn test_pages_stay_isolated_through_storage() {
    let storage = MemoryStorage::new();
    let mut editor = instagram_editor();
    let first = editor.pages().active_page();
    let headline = editor.add_element(ElementDraft::text(
        Point::new(40.0, 40.0),
        Size::new(300.0, 60.0),
        "Page one",
    ));

    let second = editor.add_page();
    assert!(editor.switch_page(second));
    let footer = editor.add_element(ElementDraft::text(
        Point::new(40.0, 900.0),
        Size::new(300.0, 60.0),
        "Page two",
    ));
    assert_eq!(editor.scene().len(), 1);

    pollster::block_on(editor.pages_mut().save_to(&storage)).unwrap();

    let mut reopened = PageBridge::new(&EditorConfig::default());
    pollster::block_on(reopened.load_from(&storage, first)).unwrap();
    pollster::block_on(reopened.load_from(&storage, second)).unwrap();

    reopened.switch_page(first);
    assert!(reopened.scene().contains(headline));
    assert!(!reopened.scene().contains(footer));
    reopened.switch_page(second);
    assert!(reopened.scene().contains(footer));
    assert!(!reopened.scene().contains(headline));
}

#[test]
fn test_text_tool_inserts_at_click() {
    let mut editor = instagram_editor();
    editor.set_tool_id("text");
    let r = editor.handle_pointer_event(PointerEvent::down(Point::new(540.0, 540.0)), Instant::now());
    let EventResponse::Tool(postcraft_core::ToolOutcome::Inserted(id)) = r else {
        panic!("expected an insertion, got {r:?}");
    };
    let el = editor.scene().get(id).unwrap();
    assert_eq!(el.position, Point::new(440.0, 520.0));
    assert_eq!(el.content, postcraft_core::element::TEXT_PLACEHOLDER);
}
