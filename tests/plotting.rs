//! End-to-end plotting scenarios through the public API.

use monoplot::sampler::{coarse_sample_count, zoom_level};
use monoplot::{
    Action, Expression, Framebuffer, GraphConfig, Plot, PlotArea, PlotInput, Renderer, SegmentSet,
    Viewport, trace,
};

fn area() -> PlotArea {
    PlotArea::new(128, 56)
}

fn expression(source: &str) -> Expression {
    Expression::parse(source).expect("valid expression")
}

#[test]
fn identity_is_one_rising_segment_through_origin() {
    let f = expression("x");
    let traced = trace(
        &f,
        Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0),
        area(),
        &GraphConfig::default(),
    );
    let set = traced.segments();
    assert_eq!(set.segments.len(), 1);
    assert!(set.isolated.is_empty());

    let pixels = set.segments[0].pixels();
    for pair in pixels.windows(2) {
        assert!(pair[1].x >= pair[0].x);
        // Rows grow downwards, so a rising curve has falling rows.
        assert!(pair[1].y <= pair[0].y, "{:?} then {:?}", pair[0], pair[1]);
    }

    let axis_row = traced.transform().expect("valid viewport").map_y_clamped(0.0);
    let crossing: Vec<_> = pixels.iter().filter(|p| p.y == axis_row).collect();
    assert!(!crossing.is_empty());
    assert!(crossing.iter().all(|p| (62..=66).contains(&p.x)), "{crossing:?}");
}

#[test]
fn reciprocal_breaks_at_the_pole() {
    let f = expression("1/x");
    let traced = trace(
        &f,
        Viewport::from_bounds(-10.0, 10.0, -10.0, 10.0),
        area(),
        &GraphConfig::default(),
    );
    let set = traced.segments();
    assert!(set.segments.len() >= 2, "got {}", set.segments.len());
    for segment in &set.segments {
        for pair in segment.points().windows(2) {
            assert!(
                !(pair[0].x < 0.0 && pair[1].x > 0.0),
                "segment straddles the pole between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }
    assert!(traced.stats().boundary > 0);
    assert!(set.point_count() >= traced.stats().coarse / 2);
}

#[test]
fn sqrt_starts_at_the_domain_edge() {
    let f = expression("sqrt(x)");
    let traced = trace(
        &f,
        Viewport::from_bounds(-5.0, 5.0, -1.0, 3.0),
        area(),
        &GraphConfig::default(),
    );
    let set = traced.segments();
    assert_eq!(set.segments.len(), 1);
    let first = set.segments[0].points()[0];
    // Bisection lands within a few thousandths of the edge.
    assert!(first.x >= 0.0 && first.x < 0.01, "starts at {}", first.x);
}

#[test]
fn tangent_asymptotes_are_not_bridged() {
    let f = expression("tan(x)");
    let traced = trace(
        &f,
        Viewport::from_bounds(-5.0, 5.0, -5.0, 5.0),
        area(),
        &GraphConfig::default(),
    );
    let set = traced.segments();
    // Branches around -3π/2, -π/2, π/2 and 3π/2.
    assert!(set.segments.len() >= 4, "got {}", set.segments.len());
    let max_jump = traced.max_jump();
    for segment in &set.segments {
        for pair in segment.pixels().windows(2) {
            assert!((pair[1].y - pair[0].y).abs() <= max_jump);
        }
    }
}

fn straddles(set: &SegmentSet, x: f64) -> bool {
    set.segments.iter().any(|segment| {
        let points = segment.points();
        points.iter().any(|p| p.x < x) && points.iter().any(|p| p.x > x)
    })
}

#[test]
fn excursion_above_the_view_is_clipped() {
    let viewport = Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0);
    let config = GraphConfig::default();
    let count = coarse_sample_count(128, zoom_level(viewport.x.span()), &config);
    let spacing = viewport.x.span() / (count - 1) as f64;
    // Leave the top edge late in one coarse interval, return early in another.
    let exit = -20.0 + (100.0 + 0.95) * spacing;
    let entry = -20.0 + (130.0 + 0.05) * spacing;
    let (c, w) = ((exit + entry) / 2.0, (entry - exit) / 2.0);
    let f = move |x: f64| 10.0 + w * w - (x - c) * (x - c);

    let traced = trace(&f, viewport, area(), &config);
    let set = traced.segments();
    assert!(set.segments.len() >= 2, "got {}", set.segments.len());
    assert!(!straddles(set, c));

    let transform = traced.transform().expect("valid viewport");
    let mut fb = Framebuffer::default();
    Renderer::new(transform, &config)
        .render(set, traced.max_jump(), None)
        .rasterize(&mut fb);
    let (left, right) = (transform.map_x_clamped(exit), transform.map_x_clamped(entry));
    assert!(right - left > 6);
    assert!((left + 3..=right - 3).all(|x| !fb.pixel(x, 0)));
}

#[test]
fn tangent_branches_stay_apart_when_zoomed() {
    let f = expression("tan(x)");
    let traced = trace(
        &f,
        Viewport::from_bounds(1.2, 1.9, -20.0, 20.0),
        area(),
        &GraphConfig::default(),
    );
    let set = traced.segments();
    assert!(set.segments.len() >= 2, "got {}", set.segments.len());
    assert!(!straddles(set, std::f64::consts::FRAC_PI_2));
}

#[test]
fn session_replays_tokens() {
    let input = PlotInput {
        function: "sin(x)".to_string(),
        x_min: "-2*pi".to_string(),
        x_max: "2*pi".to_string(),
        y_min: "-2".to_string(),
        y_max: "2".to_string(),
    };
    let (expression, viewport) = input.parse().expect("valid input");
    let config = GraphConfig {
        transition_steps: 3,
        transition_delay_ms: 0,
        ..GraphConfig::default()
    };
    let mut plot = Plot::builder(expression, viewport).config(config).build();
    let mut frames: Vec<Framebuffer> = Vec::new();

    for token in ["pan-left", "pan-right", "zoom-in", "zoom-out"] {
        let action: Action = token.parse().expect("known token");
        assert!(plot.handle(action, &mut frames).expect("applies"));
    }
    assert_eq!(frames.len(), 12);
    let end = plot.viewport();
    assert!((end.x.min - viewport.x.min).abs() < 1e-9);
    assert!((end.y.max - viewport.y.max).abs() < 1e-9);
    assert_eq!(plot.input().x_min, "-2*pi");

    plot.handle("cursor-toggle".parse().expect("known token"), &mut frames)
        .expect("applies");
    plot.handle("custom-x=pi/2".parse().expect("known token"), &mut frames)
        .expect("applies");
    let mut fb = Framebuffer::default();
    plot.render_into(&mut fb);
    assert_eq!(frames.last(), Some(&fb));
    // Cursor line through the plot at the centre column.
    assert!((0..56).all(|y| fb.pixel(63, y)));

    assert!(plot.handle("custom-delta=0".parse().expect("known token"), &mut frames).is_err());
    assert!(!plot.handle(Action::Back, &mut frames).expect("applies"));
}

#[test]
fn degenerate_viewport_leaves_frame_blank() {
    let plot = Plot::new(expression("x"), Viewport::from_bounds(1.0, 1.0, -1.0, 1.0));
    let mut fb = Framebuffer::default();
    fb.set_pixel(5, 5, true);
    plot.render_into(&mut fb);
    assert_eq!(fb.count_on(), 0);
}
