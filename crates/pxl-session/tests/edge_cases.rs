//! Edge case tests for pxl-session

use pxl_render::{RenderError, with_current};
use pxl_session::{ClockMode, FontSettings, MemorySink, Session, SessionConfig, SessionError};

#[test]
fn test_single_pixel_session() {
    let config = SessionConfig {
        width: 1,
        height: 1,
        frames: Some(1),
        clock: ClockMode::Fixed,
        ..Default::default()
    };
    let mut session = Session::new(config).unwrap();
    let mut sink = MemorySink::new();
    session.run(|| (), &mut [&mut sink]).unwrap();
    assert_eq!(sink.last().unwrap().rgba, vec![0, 0, 0, 255]);
}

#[test]
fn test_invalid_configs_rejected() {
    for config in [
        SessionConfig { width: 0, ..Default::default() },
        SessionConfig { height: 0, ..Default::default() },
        SessionConfig { fps: 0, ..Default::default() },
        SessionConfig { frames: Some(0), ..Default::default() },
    ] {
        assert!(matches!(Session::new(config), Err(SessionError::Config(_))));
    }
}

#[test]
fn test_config_from_missing_file() {
    let path = std::env::temp_dir().join("pxl-session-no-such-config.json");
    assert!(matches!(SessionConfig::load(&path), Err(SessionError::Io(_))));
}

#[test]
fn test_config_unknown_clock_mode() {
    let parsed = SessionConfig::from_json(r#"{ "clock": "sometimes" }"#);
    assert!(matches!(parsed, Err(SessionError::ConfigParse(_))));
}

#[test]
fn test_no_context_after_frame() {
    let mut session = Session::new(SessionConfig {
        frames: Some(1),
        clock: ClockMode::Fixed,
        ..Default::default()
    })
    .unwrap();
    session.run(|| (), &mut []).unwrap();
    // The context is only current while the scene runs
    assert!(matches!(with_current(|_| ()), Err(RenderError::NoActiveContext)));
}

#[test]
fn test_frame_inside_borrowed_context_is_busy() {
    let config = SessionConfig { clock: ClockMode::Fixed, ..Default::default() };
    let mut outer = Session::new(config.clone()).unwrap();
    let mut inner = Session::new(config).unwrap();

    let (_, inner_result) = outer
        .render_frame(|| with_current(|_ctx| inner.render_frame(|| ()).map(|_| ())))
        .unwrap();

    assert!(matches!(
        inner_result,
        Ok(Err(SessionError::Render(RenderError::ContextBusy)))
    ));
    // The rejected frame leaves the inner root context in place
    assert!(inner.context().is_ok());
    let (frame, ()) = inner.render_frame(|| ()).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert!(outer.context().is_ok());
}

#[test]
fn test_unknown_default_font_is_fatal() {
    let config = SessionConfig {
        font: Some(FontSettings {
            families: vec!["Definitely Not A Font XYZ".to_string()],
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(matches!(
        Session::new(config),
        Err(SessionError::Render(RenderError::Text(_)))
    ));
}
