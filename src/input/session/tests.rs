use super::*;
use crate::draw::BLACK;
use crate::history::DecodedImage;
use crate::input::{Key, Modifiers, PointerEvent};
use crate::recognize::Recognition;
use crate::util::Point;

fn test_config() -> Config {
    let mut config = Config::default();
    // Unsmoothed strokes keep the captured path equal to the raw samples.
    config.drawing.smoothing_factor = 1.0;
    config.drawing.default_color = crate::config::ColorSpec::Name("black".into());
    config
}

fn create_session(runtime: &tokio::runtime::Runtime) -> DrawingSession {
    DrawingSession::new(&test_config(), 200, 200, 1.0, runtime.handle()).unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

/// Samples the polyline through `corners` every ~2 units.
fn densify(corners: &[(f64, f64)]) -> Vec<Point> {
    let mut points = vec![Point::from(corners[0])];
    for pair in corners.windows(2) {
        let (a, b) = (Point::from(pair[0]), Point::from(pair[1]));
        let steps = (a.distance_to(b) / 2.0).ceil().max(1.0) as usize;
        for i in 1..=steps {
            points.push(a.lerp(b, i as f64 / steps as f64));
        }
    }
    points
}

fn press_and_drag(session: &mut DrawingSession, points: &[Point]) {
    session
        .on_pointer_down(&PointerEvent::new(points[0].x, points[0].y))
        .unwrap();
    for point in &points[1..] {
        session
            .on_pointer_move(&PointerEvent::new(point.x, point.y))
            .unwrap();
    }
}

fn draw_stroke(session: &mut DrawingSession, points: &[Point]) -> Option<Recognition> {
    press_and_drag(session, points);
    let last = points[points.len() - 1];
    session
        .on_pointer_up(&PointerEvent::new(last.x, last.y))
        .unwrap()
}

fn alpha(session: &DrawingSession, x: i32, y: i32) -> u8 {
    session.renderer().pixel(x, y).map(|(a, ..)| a).unwrap_or(0)
}

fn dented_square() -> Vec<Point> {
    densify(&[
        (40.0, 40.0),
        (80.0, 40.0),
        (90.0, 60.0),
        (100.0, 40.0),
        (140.0, 40.0),
        (140.0, 140.0),
        (40.0, 140.0),
        (40.0, 40.0),
    ])
}

#[test]
fn session_starts_with_single_blank_snapshot() {
    let rt = runtime();
    let session = create_session(&rt);
    assert_eq!(session.history().undo_depth(), 1);
    assert_eq!(session.state().line_width, 2);
    assert_eq!(session.state().tool, Tool::Pen);
    assert_eq!(session.renderer().width(), 200);
    assert_eq!(alpha(&session, 100, 100), 0);
}

#[test]
fn recognized_square_replaces_freehand_ink() {
    let rt = runtime();
    let mut session = create_session(&rt);
    let points = dented_square();

    press_and_drag(&mut session, &points);
    assert!(alpha(&session, 87, 55) > 0, "dent should be inked while drawing");

    let recognition = session
        .on_pointer_up(&PointerEvent::new(40.0, 40.0))
        .unwrap();
    let Some(Recognition::Square(square)) = recognition else {
        panic!("expected square, got {recognition:?}");
    };
    assert_eq!(square.size, 100.0);
    assert_eq!(square.center, Point::new(90.0, 90.0));

    assert_eq!(alpha(&session, 87, 55), 0, "dent ink must be erased");
    assert!(alpha(&session, 90, 40) > 0, "square top edge drawn");

    let outer = square.bounds().inflate(3.0);
    let inner = square.bounds().inflate(-6.0);
    for y in 0..200 {
        for x in 0..200 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if inner.contains(center) || !outer.contains(center) {
                assert!(
                    alpha(&session, x, y) < 16,
                    "stray freehand pixel at ({x}, {y})"
                );
            }
        }
    }
    assert_eq!(session.history().undo_depth(), 2);
}

#[test]
fn recognized_arrow_points_at_barbed_end() {
    let rt = runtime();
    let mut session = create_session(&rt);
    let mut raw: Vec<Point> = (0..=14)
        .map(|i| Point::new(20.0 + i as f64 * 10.0, 100.0))
        .collect();
    raw.extend(
        [
            (165.0, 100.0),
            (165.0, 110.0),
            (165.0, 90.0),
            (170.0, 100.0),
            (175.0, 100.0),
            (180.0, 100.0),
        ]
        .map(Point::from),
    );

    press_and_drag(&mut session, &raw);
    assert!(alpha(&session, 165, 108) > 0);

    let recognition = session
        .on_pointer_up(&PointerEvent::new(180.0, 100.0))
        .unwrap();
    let Some(Recognition::Arrow(arrow)) = recognition else {
        panic!("expected arrow, got {recognition:?}");
    };
    assert_eq!(arrow.tip, Point::new(180.0, 100.0));
    assert_eq!(alpha(&session, 165, 108), 0, "barb ink must be erased");
    assert_eq!(alpha(&session, 170, 100), 255, "arrow head is filled");

    let line_width = session.state().line_width as f64;
    let margin = line_width + 4.0;
    let [left, right] = arrow.barbs;
    for y in 0..200 {
        for x in 0..200 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let near_shaft =
                distance_to_segment(center, arrow.tail, arrow.shaft_end) <= line_width + margin;
            let near_head = in_triangle(center, arrow.tip, left, right)
                || [(arrow.tip, left), (left, right), (right, arrow.tip)]
                    .iter()
                    .any(|&(a, b)| distance_to_segment(center, a, b) <= margin);
            if !near_shaft && !near_head {
                assert!(
                    alpha(&session, x, y) < 16,
                    "stray freehand pixel at ({x}, {y})"
                );
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance_to(a.lerp(b, t))
}

fn in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let side = |u: Point, v: Point| (v.x - u.x) * (p.y - u.y) - (v.y - u.y) * (p.x - u.x);
    let (d1, d2, d3) = (side(a, b), side(b, c), side(c, a));
    (d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0) || (d1 <= 0.0 && d2 <= 0.0 && d3 <= 0.0)
}

#[test]
fn eraser_strokes_stay_freehand_in_background_color() {
    let rt = runtime();
    let mut session = create_session(&rt);
    assert!(session.on_key_press(Key::Char('e'), Modifiers::new()));
    assert_eq!(session.state().tool, Tool::Eraser);
    assert_eq!(session.active_color().to_hex(), "#f0f0f0");

    let recognition = draw_stroke(&mut session, &dented_square());
    assert_eq!(recognition, Some(Recognition::Freehand));
    assert_eq!(session.renderer().pixel(87, 55).map(|(a, ..)| a), Some(255));
    assert_eq!(session.state().pen_color, BLACK);
}

#[test]
fn tap_without_movement_records_nothing() {
    let rt = runtime();
    let mut session = create_session(&rt);
    let recognition = draw_stroke(&mut session, &[Point::new(10.0, 10.0)]);
    assert_eq!(recognition, Some(Recognition::Freehand));
    assert_eq!(session.history().undo_depth(), 1);
}

#[test]
fn pointer_leave_finishes_stroke() {
    let rt = runtime();
    let mut session = create_session(&rt);
    let points = densify(&[(10.0, 10.0), (60.0, 80.0), (20.0, 150.0)]);
    press_and_drag(&mut session, &points);
    let result = session
        .on_pointer_leave(&PointerEvent::new(20.0, 150.0))
        .unwrap();
    assert_eq!(result, Some(Recognition::Freehand));
    assert!(!session.state().is_drawing());
    assert_eq!(session.history().undo_depth(), 2);
    assert_eq!(session.on_pointer_up(&PointerEvent::new(0.0, 0.0)).unwrap(), None);
}

#[test]
fn middle_drag_pans_without_drawing() {
    let rt = runtime();
    let mut session = create_session(&rt);
    session
        .on_pointer_down(&PointerEvent::new(50.0, 50.0).with_buttons(4))
        .unwrap();
    assert!(session.state().is_panning());

    session
        .on_pointer_move(
            &PointerEvent::new(60.0, 50.0)
                .with_buttons(4)
                .with_movement(10.0, -4.0),
        )
        .unwrap();
    assert_eq!(session.viewport().pan(), (10.0, -4.0));
    assert!(session.pending_redraw().is_some());

    session.on_pointer_up(&PointerEvent::new(60.0, 50.0)).unwrap();
    assert_eq!(session.history().undo_depth(), 1);
}

#[test]
fn set_color_rejects_invalid_input() {
    let rt = runtime();
    let mut session = create_session(&rt);
    session.set_color("#ff0000").unwrap();
    assert_eq!(session.state().pen_color.to_hex(), "#ff0000");

    assert!(session.set_color("red-ish").is_err());
    assert_eq!(session.state().pen_color.to_hex(), "#ff0000");
}

#[test]
fn line_width_is_clamped() {
    let rt = runtime();
    let mut session = create_session(&rt);
    session.set_line_width(0);
    assert_eq!(session.state().line_width, 1);
    session.set_line_width(400);
    assert_eq!(session.state().line_width, 100);
}

#[test]
fn keybindings_dispatch_actions() {
    let rt = runtime();
    let mut session = create_session(&rt);

    assert!(session.on_key_press(Key::Char('d'), Modifiers::ctrl()));
    assert!(session.state().dark_mode);
    assert_eq!(session.background_color().to_hex(), "#1e1e1e");

    assert!(!session.on_key_press(Key::Char('q'), Modifiers::ctrl()));
    assert!(!session.on_key_press(Key::Unknown, Modifiers::new()));

    // Undo at the initial state is still a handled key.
    assert!(session.on_key_press(Key::Char('z'), Modifiers::ctrl()));
    assert_eq!(session.history().undo_depth(), 1);
}

#[test]
fn clear_wipes_and_records() {
    let rt = runtime();
    let mut session = create_session(&rt);
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));
    assert_eq!(alpha(&session, 100, 100), 255);

    assert!(session.on_key_press(Key::Delete, Modifiers::ctrl_shift()));
    assert_eq!(alpha(&session, 100, 100), 0);
    assert_eq!(session.history().undo_depth(), 3);
}

#[test]
fn blank_text_is_ignored() {
    let rt = runtime();
    let mut session = create_session(&rt);
    assert!(!session.commit_text(&TextCommit::new(10.0, 20.0, "   ")).unwrap());
    assert_eq!(session.history().undo_depth(), 1);

    assert!(session.commit_text(&TextCommit::new(10.0, 40.0, "Hi")).unwrap());
    assert_eq!(session.history().undo_depth(), 2);
}

#[test]
fn corrupt_image_leaves_surface_untouched() {
    let rt = runtime();
    let mut session = create_session(&rt);
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));

    assert!(session.load_image(b"not a png").is_err());
    assert!(session.paste_image(b"still not", 0.0, 0.0).is_err());
    assert_eq!(alpha(&session, 100, 100), 255);
    assert_eq!(session.history().undo_depth(), 2);
}

#[test]
fn loaded_image_fills_surface() {
    let rt = runtime();
    let mut session = create_session(&rt);
    let source = Renderer::new(20, 20, 1.0).unwrap();
    let style = crate::draw::DrawingStyle {
        color: BLACK,
        line_width: 40.0,
    };
    let segment = crate::draw::StrokeSegment {
        start: Point::new(0.0, 10.0),
        control: Point::new(0.0, 10.0),
        end: Point::new(20.0, 10.0),
    };
    source
        .draw_segment(&crate::viewport::ViewportState::default(), &segment, &style)
        .unwrap();

    session.load_image(&source.encode_png().unwrap()).unwrap();
    assert_eq!(alpha(&session, 0, 0), 255);
    assert_eq!(alpha(&session, 199, 199), 255);
    assert_eq!(session.history().undo_depth(), 2);
}

#[test]
fn export_is_independent_of_view() {
    let rt = runtime();
    let mut session = create_session(&rt);
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));
    let before = session.export_png().unwrap();

    let decoded = DecodedImage::decode(&before).unwrap();
    assert_eq!((decoded.width, decoded.height), (200, 200));
    assert!(!session.history().can_redo());
}

#[tokio::test]
async fn undo_and_redo_repaint_history() {
    let mut session =
        DrawingSession::new(&test_config(), 200, 200, 1.0, &tokio::runtime::Handle::current())
            .unwrap();
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));
    assert_eq!(alpha(&session, 100, 100), 255);

    assert!(session.undo());
    session.settle().await.unwrap();
    assert_eq!(alpha(&session, 100, 100), 0);
    assert!(!session.undo());

    assert!(session.redo());
    session.settle().await.unwrap();
    assert_eq!(alpha(&session, 100, 100), 255);
    assert!(!session.redo());
}

#[tokio::test]
async fn zoom_repaints_snapshot_through_viewport() {
    let mut session =
        DrawingSession::new(&test_config(), 200, 200, 1.0, &tokio::runtime::Handle::current())
            .unwrap();
    draw_stroke(&mut session, &densify(&[(20.0, 50.0), (80.0, 50.0)]));
    assert_eq!(alpha(&session, 66, 50), 255);

    assert!(session.on_wheel(0.0, 0.0, -120.0));
    assert!((session.viewport().scale() - 1.1).abs() < 1e-9);
    session.settle().await.unwrap();

    assert_eq!(alpha(&session, 66, 50), 0);
    assert!(alpha(&session, 66, 55) > 0);
    assert_eq!(session.status_label(), "Zoom: 110%, Pan: (0, 0)");
}

#[tokio::test]
async fn stale_decode_completion_is_never_applied() {
    let mut session =
        DrawingSession::new(&test_config(), 200, 200, 1.0, &tokio::runtime::Handle::current())
            .unwrap();
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));

    assert!(session.on_wheel(100.0, 100.0, 120.0));
    let first = session.pending_redraw().unwrap();
    assert!(session.on_wheel(100.0, 100.0, 120.0));
    let second = session.pending_redraw().unwrap();
    assert!(second > first);

    let blank = DecodedImage::decode(
        &Renderer::new(200, 200, 1.0).unwrap().encode_png().unwrap(),
    )
    .unwrap();
    let stale = crate::history::DecodeCompletion {
        ticket: first,
        result: Ok(blank),
    };
    let inked_before = alpha(&session, 100, 100);
    assert!(!session.apply_completion(stale).unwrap());
    assert_eq!(alpha(&session, 100, 100), inked_before);
    assert_eq!(session.pending_redraw(), Some(second));

    session.settle().await.unwrap();
    assert_eq!(session.pending_redraw(), None);
}

#[tokio::test]
async fn new_stroke_settles_pending_redraw_first() {
    let mut session =
        DrawingSession::new(&test_config(), 200, 200, 1.0, &tokio::runtime::Handle::current())
            .unwrap();
    draw_stroke(&mut session, &densify(&[(10.0, 20.0), (190.0, 20.0)]));

    assert!(session.undo());
    let ticket = session.pending_redraw().unwrap();

    let stroke = densify(&[(10.0, 150.0), (190.0, 150.0)]);
    draw_stroke(&mut session, &stroke);
    assert_eq!(session.pending_redraw(), None);
    assert_eq!(alpha(&session, 100, 20), 0, "undone stroke stays undone");
    assert_eq!(alpha(&session, 100, 150), 255);

    // The background decode still replies; it must not paint over the new stroke.
    let late = session.decoder.next().await.unwrap();
    assert_eq!(late.ticket, ticket);
    assert!(!session.apply_completion(late).unwrap());
    assert_eq!(alpha(&session, 100, 150), 255);
}

#[tokio::test]
async fn resize_repaints_current_snapshot() {
    let mut session =
        DrawingSession::new(&test_config(), 200, 200, 1.0, &tokio::runtime::Handle::current())
            .unwrap();
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));

    session.resize(300, 250, 1.0).unwrap();
    assert_eq!(session.renderer().width(), 300);
    assert_eq!(session.renderer().height(), 250);
    assert_eq!(alpha(&session, 100, 100), 0);

    session.settle().await.unwrap();
    assert_eq!(alpha(&session, 100, 100), 255);
    assert_eq!(alpha(&session, 250, 100), 0);
}

#[test]
fn scale_bounds_hold_for_wheel_sequences() {
    let rt = runtime();
    let mut session = create_session(&rt);
    for step in 0..200 {
        let delta = if (step / 37) % 2 == 0 { -1.0 } else { 1.0 };
        session.on_wheel(step as f64, 10.0, delta);
        assert!(crate::viewport::ViewportState::is_valid_scale(
            session.viewport().scale()
        ));
    }
}

#[tokio::test]
async fn poll_redraws_applies_only_latest_decode() {
    let mut session =
        DrawingSession::new(&test_config(), 200, 200, 1.0, &tokio::runtime::Handle::current())
            .unwrap();
    draw_stroke(&mut session, &densify(&[(10.0, 100.0), (190.0, 100.0)]));
    assert_eq!(session.poll_redraws().unwrap(), 0);

    assert!(session.on_wheel(0.0, 0.0, -120.0));
    assert!(session.on_wheel(0.0, 0.0, -120.0));

    let mut applied = 0;
    for _ in 0..500 {
        applied += session.poll_redraws().unwrap();
        if session.pending_redraw().is_none() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(session.pending_redraw(), None);
    assert_eq!(applied, 1);

    // Whatever is still in flight answers a superseded request.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(session.poll_redraws().unwrap(), 0);

    // Two zoom steps: the line at plane y 100 now sits near raster y 121.
    assert!(alpha(&session, 100, 121) > 0);
    assert_eq!(alpha(&session, 100, 100), 0);
}
