use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_is_reduced() {
    let fps = Fps::new(60, 2).unwrap();
    assert_eq!(fps, Fps { num: 30, den: 1 });
}

#[test]
fn fps_parses_integer_decimal_and_ratio() {
    assert_eq!("60".parse::<Fps>().unwrap(), Fps { num: 60, den: 1 });
    assert_eq!("2.5".parse::<Fps>().unwrap(), Fps { num: 5, den: 2 });
    assert_eq!(
        "30000/1001".parse::<Fps>().unwrap(),
        Fps {
            num: 30000,
            den: 1001
        }
    );
    assert!("0".parse::<Fps>().is_err());
    assert!("-5".parse::<Fps>().is_err());
    assert!("fast".parse::<Fps>().is_err());
    assert!("30/0".parse::<Fps>().is_err());
}

#[test]
fn fps_display_drops_unit_denominator() {
    assert_eq!(Fps::new(24, 1).unwrap().to_string(), "24");
    assert_eq!(Fps::new(30000, 1001).unwrap().to_string(), "30000/1001");
}

#[test]
fn secs_to_frames_rounds() {
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(0.5), 30);
    let fps = Fps::new(10, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(0.001), 0);
    assert_eq!(fps.secs_to_frames_round(0.05), 1);
    let fps = Fps::new(2, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(0.5), 1);
}

#[test]
fn frames_to_secs_uses_rational_rate() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frames_to_secs(90) - 1.5).abs() < 1e-12);
}

#[test]
fn canvas_height_follows_first_aspect() {
    let c = Canvas::from_width_and_aspect(720, 100, 50).unwrap();
    assert_eq!((c.width, c.height), (720, 360));

    let c = Canvas::from_width_and_aspect(480, 1920, 1080).unwrap();
    assert_eq!((c.width, c.height), (480, 270));

    // 720 / (16/9) = 405 exactly; 500 / (3/2) = 333.33 rounds down.
    assert_eq!(Canvas::from_width_and_aspect(720, 16, 9).unwrap().height, 405);
    assert_eq!(Canvas::from_width_and_aspect(500, 3, 2).unwrap().height, 333);
    // 100 / (3/1) = 33.33, 101 / 3 = 33.67 rounds up.
    assert_eq!(Canvas::from_width_and_aspect(101, 3, 1).unwrap().height, 34);
}

#[test]
fn canvas_never_collapses_to_zero_height() {
    let c = Canvas::from_width_and_aspect(2, 1000, 1).unwrap();
    assert_eq!(c.height, 1);
}

#[test]
fn canvas_rejects_empty_native_size() {
    assert!(Canvas::from_width_and_aspect(720, 0, 50).is_err());
    assert!(Canvas::from_width_and_aspect(720, 100, 0).is_err());
}

#[test]
fn canvas_pads_odd_sides_to_even() {
    let c = Canvas {
        width: 721,
        height: 361,
    };
    assert_eq!(
        c.padded_to_even(),
        Canvas {
            width: 722,
            height: 362
        }
    );
    let even = Canvas {
        width: 720,
        height: 360,
    };
    assert_eq!(even.padded_to_even(), even);
}
