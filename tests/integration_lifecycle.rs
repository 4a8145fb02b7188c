use std::cell::RefCell;
use std::rc::Rc;

use desk_wm::{
    BufferedSurface, HostSurface, LifecycleState, Position, Size, WinRect, WindowManager,
    WindowNotice, WmConfig, WmError,
};

fn wm() -> WindowManager<BufferedSurface> {
    WindowManager::new(
        WmConfig::default().with_viewport(1280, 800),
        BufferedSurface::new(),
    )
}

fn open(wm: &mut WindowManager<BufferedSurface>, rect: WinRect) -> desk_wm::WindowId {
    wm.open("w", Some(rect.size()), Some(rect.position()))
}

#[test]
fn maximize_restore_is_bit_exact() {
    let mut wm = wm();
    for rect in [
        WinRect::new(0, 0, 300, 200),
        WinRect::new(123, 457, 301, 203),
        WinRect::new(980, 560, 300, 200),
    ] {
        let id = open(&mut wm, rect);
        wm.maximize(id).unwrap();
        wm.restore(id).unwrap();
        assert_eq!(wm.get_state(id).unwrap().rect(), rect);
        assert_eq!(wm.surface().read_rect(id), Some(rect));
    }
}

#[test]
fn focus_is_idempotent() {
    let mut wm = wm();
    let a = wm.open("a", None, None);
    let _b = wm.open("b", None, None);
    wm.focus(a).unwrap();
    let z = wm.get_state(a).unwrap().z_index();
    wm.focus(a).unwrap();
    wm.focus(a).unwrap();
    assert_eq!(wm.get_state(a).unwrap().z_index(), z);
}

#[test]
fn focusing_b_then_a_leaves_a_on_top() {
    let mut wm = wm();
    let a = wm.open("a", None, None);
    let b = wm.open("b", None, None);
    wm.focus(b).unwrap();
    wm.focus(a).unwrap();
    let za = wm.get_state(a).unwrap().z_index();
    let zb = wm.get_state(b).unwrap().z_index();
    assert!(za > zb);
    assert_eq!(wm.topmost(), Some(a));
    let order: Vec<_> = wm.windows_in_z_order().iter().map(|w| w.id()).collect();
    assert_eq!(order, vec![b, a]);
}

#[test]
fn minimized_maximized_window_restores_to_maximized() {
    let mut wm = wm();
    let rect = WinRect::new(40, 40, 500, 300);
    let id = open(&mut wm, rect);
    wm.maximize(id).unwrap();
    wm.minimize(id).unwrap();
    assert_eq!(wm.lifecycle(id), LifecycleState::Minimized);
    assert!(!wm.get_state(id).unwrap().is_maximized());
    assert_eq!(wm.surface().node(id).map(|n| n.visible), Some(false));
    wm.restore(id).unwrap();
    assert_eq!(wm.lifecycle(id), LifecycleState::Maximized);
    assert_eq!(wm.get_state(id).unwrap().rect(), WinRect::new(0, 0, 1280, 760));
    // A second restore leaves the maximized layout.
    wm.restore(id).unwrap();
    assert_eq!(wm.get_state(id).unwrap().rect(), rect);
}

#[test]
fn minimized_geometry_survives_viewport_changes() {
    let mut wm = wm();
    let plain_rect = WinRect::new(200, 150, 420, 310);
    let plain = open(&mut wm, plain_rect);
    let maxed = wm.open("m", None, None);
    wm.maximize(maxed).unwrap();
    wm.minimize(plain).unwrap();
    wm.minimize(maxed).unwrap();

    wm.set_viewport(1000, 600);
    assert_eq!(wm.get_state(plain).unwrap().rect(), plain_rect);
    assert_eq!(wm.get_state(maxed).unwrap().rect(), WinRect::new(0, 0, 1280, 760));

    // Un-minimizing shows exactly what was hidden, whatever the viewport did.
    wm.restore(plain).unwrap();
    assert_eq!(wm.get_state(plain).unwrap().rect(), plain_rect);
    assert_eq!(wm.surface().read_rect(plain), Some(plain_rect));
    wm.restore(maxed).unwrap();
    assert_eq!(wm.lifecycle(maxed), LifecycleState::Maximized);
    assert_eq!(wm.get_state(maxed).unwrap().rect(), WinRect::new(0, 0, 1280, 760));

    // The next viewport change fits them again.
    wm.set_viewport(1600, 900);
    assert_eq!(wm.get_state(maxed).unwrap().rect(), WinRect::new(0, 0, 1600, 860));
}

#[test]
fn closing_passes_focus_without_renumbering() {
    let mut wm = wm();
    let a = wm.open("a", None, None);
    let b = wm.open("b", None, None);
    let c = wm.open("c", None, None);
    let zb = wm.get_state(b).unwrap().z_index();
    wm.close(c).unwrap();
    assert_eq!(wm.topmost(), Some(b));
    assert_eq!(wm.get_state(b).unwrap().z_index(), zb);
    wm.close(b).unwrap();
    wm.close(a).unwrap();
    assert_eq!(wm.topmost(), None);
    assert!(wm.windows_in_z_order().is_empty());
}

#[test]
fn operations_on_unknown_ids_are_reported_no_ops() {
    let mut wm = wm();
    let a = wm.open("a", Some(Size::new(400, 300)), Some(Position::new(10, 10)));
    wm.close(a).unwrap();
    assert_eq!(wm.close(a), Err(WmError::UnknownWindow(a)));
    assert_eq!(wm.maximize(a), Err(WmError::UnknownWindow(a)));
    assert_eq!(wm.move_window(a, 1, 1), Err(WmError::UnknownWindow(a)));
    assert_eq!(wm.focus(a), Err(WmError::UnknownWindow(a)));
    assert!(wm.subscribe(a, |_| {}).is_err());
    assert_eq!(wm.lifecycle(a), LifecycleState::Closed);
}

#[test]
fn subscribers_get_one_notice_per_transition() {
    let mut wm = wm();
    let id = open(&mut wm, WinRect::new(100, 100, 400, 300));
    let notices = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notices);
    wm.subscribe(id, move |notice| {
        let entry = match notice {
            WindowNotice::Changed(state) => Some(state.lifecycle()),
            WindowNotice::Closed(_) => None,
        };
        sink.borrow_mut().push(entry);
    })
    .unwrap();
    wm.maximize(id).unwrap();
    wm.maximize(id).unwrap();
    wm.restore(id).unwrap();
    wm.close(id).unwrap();
    assert_eq!(
        *notices.borrow(),
        vec![
            Some(LifecycleState::Maximized),
            Some(LifecycleState::Windowed),
            None
        ]
    );
}
