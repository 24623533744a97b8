use crate::app::AppState;
use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

fn report_scale(app: &mut AppState) {
    let percent = (app.viewport.scale() * 100.0).round();
    app.set_message(format!("Zoom {}%", percent));
}

pub fn zoom_in(app: &mut AppState) {
    app.viewport.zoom(app.config.zoom_step);
    report_scale(app);
}

pub fn zoom_out(app: &mut AppState) {
    app.viewport.zoom(-app.config.zoom_step);
    report_scale(app);
}

pub fn reset_view(app: &mut AppState) {
    app.viewport.reset();
    report_scale(app);
}

/// Modified scroll zooms by the scroll step; plain scroll pans vertically.
pub fn scroll(app: &mut AppState, direction: ScrollDirection, modifier: bool) {
    let sign = match direction {
        ScrollDirection::Up => 1.0,
        ScrollDirection::Down => -1.0,
    };
    if modifier {
        app.viewport.zoom(sign * app.config.scroll_zoom_step);
        report_scale(app);
    } else {
        app.viewport
            .pan(Point::new(0.0, sign * app.config.scroll_pan_step));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zoom_keys_use_configured_step() {
        let mut app = AppState::new(AppConfig::default());
        zoom_in(&mut app);
        assert!(approx(app.viewport.scale(), 1.1));
        zoom_out(&mut app);
        zoom_out(&mut app);
        assert!(approx(app.viewport.scale(), 0.9));
        assert_eq!(app.message.as_deref(), Some("Zoom 90%"));
    }

    #[test]
    fn test_zoom_in_stops_at_max() {
        let mut app = AppState::new(AppConfig::default());
        for _ in 0..30 {
            zoom_in(&mut app);
        }
        assert_eq!(app.viewport.scale(), 2.0);
        zoom_in(&mut app);
        assert_eq!(app.viewport.scale(), 2.0);
    }

    #[test]
    fn test_modified_scroll_zooms() {
        let mut app = AppState::new(AppConfig::default());
        scroll(&mut app, ScrollDirection::Up, true);
        assert!(approx(app.viewport.scale(), 1.05));
        assert_eq!(app.viewport.position, Point::ORIGIN);

        scroll(&mut app, ScrollDirection::Down, true);
        scroll(&mut app, ScrollDirection::Down, true);
        assert!(approx(app.viewport.scale(), 0.95));
    }

    #[test]
    fn test_plain_scroll_pans() {
        let mut app = AppState::new(AppConfig::default());
        scroll(&mut app, ScrollDirection::Down, false);
        assert_eq!(app.viewport.scale(), 1.0);
        assert_eq!(app.viewport.position, Point::new(0.0, -48.0));
    }

    #[test]
    fn test_reset_view() {
        let mut app = AppState::new(AppConfig::default());
        zoom_in(&mut app);
        scroll(&mut app, ScrollDirection::Up, false);
        reset_view(&mut app);
        assert_eq!(app.viewport.scale(), 1.0);
        assert_eq!(app.viewport.position, Point::ORIGIN);
    }
}
