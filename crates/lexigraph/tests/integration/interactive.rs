//! Headless layout sessions opened from stored maps.

use lexigraph::core::{Scope, CORE_ID};
use lexigraph::graph::{Level, MapRequest};
use lexigraph::layout::{LayoutSession, ParamKind, Vec2};
use lexigraph::{MapService, ServiceConfig};

use crate::common::{biology, BIOLOGY_VOCABULARY};

fn open(seed: u64) -> LayoutSession {
    let config = ServiceConfig {
        host: Some("https://notes.example/".to_string()),
        ..Default::default()
    };
    let mut service = MapService::new(config);
    service
        .generate(
            "bio",
            &biology(),
            &MapRequest::explicit(BIOLOGY_VOCABULARY)
                .with_root("r")
                .with_scope(Scope::Children),
        )
        .unwrap();
    service.open_layout("bio", Some(seed)).unwrap()
}

fn assert_inside(session: &LayoutSession) {
    for view in session.snapshot() {
        assert!(
            session.canvas().contains(view.position),
            "{} escaped the canvas at {:?}",
            view.id,
            view.position
        );
    }
}

#[test]
fn test_expand_settle_collapse() {
    let mut session = open(7);
    session.settle();
    assert_eq!(session.visible_node_ids().len(), 5);
    assert!(!session.is_visible("nucleus"));
    assert_inside(&session);

    assert!(session.toggle_expanded("cells").unwrap());
    assert!(session.is_running());
    session.settle();
    assert!(!session.is_running());
    assert_eq!(session.visible_node_ids().len(), 8);
    assert_inside(&session);
    assert!(session
        .visible_edges()
        .iter()
        .any(|e| e.from == "cells" && e.to == "nucleus"));

    assert!(!session.toggle_expanded("cells").unwrap());
    assert_eq!(session.visible_node_ids().len(), 5);
    assert!(session.visible_edges().iter().all(|e| e.to != "nucleus"));
}

#[test]
fn test_same_seed_same_layout() {
    let mut a = open(42);
    let mut b = open(42);
    a.settle();
    b.settle();
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_drag_holds_node_until_release() {
    let mut session = open(3);
    session.settle();
    let target = Vec2::new(300.0, 200.0);
    assert!(session.begin_drag("genetics", target));
    session.drag_to(target);
    session.settle();
    assert_eq!(session.simulation().position("genetics"), Some(target));
    session.end_drag();
    assert!(session.dragging().is_none());
    assert!(!session.begin_drag(CORE_ID, target));
}

#[test]
fn test_slider_change_restarts_run() {
    let mut session = open(5);
    session.settle();
    let applied = session.set_param(ParamKind::Gravity, 0.1);
    assert!((applied - 0.1).abs() < 1e-6);
    assert!(session.is_running());
    session.settle();
    assert_inside(&session);
}

#[test]
fn test_popups_link_back_to_sources() {
    let mut session = open(1);
    let detail = session.select("genetics").unwrap().clone();
    assert_eq!(detail.level, Level::Major);
    assert_eq!(detail.link.as_deref(), Some("https://notes.example/#/g"));
    assert!(detail.note.is_none());

    assert!(session.select("nucleus").is_err());
    session.toggle_expanded("cells").unwrap();
    let nucleus = session.select("nucleus").unwrap();
    assert_eq!(nucleus.link.as_deref(), Some("https://notes.example/#/n"));

    session.click_background();
    assert!(session.popup().is_none());
}
