use super::*;

fn frame(w: u32, h: u32) -> FrameBuffer {
    FrameBuffer {
        width: w,
        height: h,
        data: vec![7u8; (w * h * 3) as usize],
    }
}

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(4, 2)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg(4, 2)));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert!(sink.is_ended());
}

#[test]
fn in_memory_sink_rejects_frames_before_begin() {
    let mut sink = InMemorySink::new();
    let err = sink.push_frame(FrameIndex(0), &frame(4, 2)).unwrap_err();
    assert!(matches!(err, Img2VideoError::VideoWrite(_)));
}

#[test]
fn size_mismatch_is_video_write_error() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(2, 4)).unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"), "{err}");

    let mut short = frame(4, 2);
    short.data.pop();
    let err = sink.push_frame(FrameIndex(0), &short).unwrap_err();
    assert!(matches!(err, Img2VideoError::VideoWrite(_)));
}
