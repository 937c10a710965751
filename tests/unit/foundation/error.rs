use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        Img2VideoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        Img2VideoError::video_write("x")
            .to_string()
            .contains("video write error:")
    );
    assert!(
        Img2VideoError::transcode("x")
            .to_string()
            .contains("transcode error:")
    );
    assert!(
        Img2VideoError::probe("x")
            .to_string()
            .contains("probe error:")
    );
    assert!(
        Img2VideoError::DirectoryNotFound(PathBuf::from("nope"))
            .to_string()
            .contains("directory not found: 'nope'")
    );
}

#[test]
fn degenerate_interval_names_the_inputs() {
    let msg = Img2VideoError::DegenerateInterval {
        fps: 10.0,
        interval_secs: 0.001,
    }
    .to_string();
    assert!(msg.contains("0.001s"));
    assert!(msg.contains("10 fps"));
}

#[test]
fn image_decode_keeps_path_and_reason() {
    let err = Img2VideoError::image_decode("a/b.png", "bad magic");
    let Img2VideoError::ImageDecode { path, reason } = &err else {
        panic!("wrong variant: {err:?}");
    };
    assert_eq!(path, &PathBuf::from("a/b.png"));
    assert_eq!(reason, "bad magic");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = Img2VideoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
