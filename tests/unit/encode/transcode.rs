use super::*;
use crate::foundation::core::{Canvas, Fps};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "img2video_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

enum Fake {
    Copies,
    Fails,
    SilentlyProducesNothing,
    ProducesEmptyFile,
}

impl Transcoder for Fake {
    fn transcode(&self, src: &Path, dst: &Path) -> Img2VideoResult<()> {
        match self {
            Fake::Copies => {
                std::fs::copy(src, dst).unwrap();
                Ok(())
            }
            Fake::Fails => Err(Img2VideoError::transcode("encoder exploded")),
            Fake::SilentlyProducesNothing => Ok(()),
            Fake::ProducesEmptyFile => {
                std::fs::write(dst, b"").unwrap();
                Ok(())
            }
        }
    }
}

fn raw_artifact(dir: &Path) -> VideoArtifact {
    let raw = dir.join("clip_tmp.mp4");
    std::fs::write(&raw, b"raw bytes").unwrap();
    VideoArtifact::new(raw, 720, 360, Fps::new(60, 1).unwrap(), 90)
}

#[test]
fn commit_deletes_raw_only_after_verification() {
    let tmp = temp_dir("transcode_commit");
    std::fs::create_dir_all(&tmp).unwrap();
    let raw = raw_artifact(&tmp);
    let dst = tmp.join("clip.mp4");

    let verified = RawOutput::new(raw.clone())
        .transcode(&Fake::Copies, &dst)
        .unwrap();
    // Verified but not yet committed: both files exist.
    assert!(raw.path.exists());
    assert_eq!(verified.final_path(), dst.as_path());

    let final_artifact = verified.commit().unwrap();
    assert!(!raw.path.exists());
    assert!(dst.exists());
    assert_eq!(final_artifact.path, dst);
    assert_eq!(final_artifact.frame_count, 90);
    assert_eq!((final_artifact.width, final_artifact.height), (720, 360));
    assert!((final_artifact.duration_secs - 1.5).abs() < 1e-9);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn failed_transcode_preserves_raw() {
    let tmp = temp_dir("transcode_fail");
    std::fs::create_dir_all(&tmp).unwrap();
    let raw = raw_artifact(&tmp);

    let err = RawOutput::new(raw.clone())
        .transcode(&Fake::Fails, &tmp.join("clip.mp4"))
        .unwrap_err();
    assert!(matches!(err, Img2VideoError::Transcode(_)), "{err}");
    assert!(raw.path.exists());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_or_empty_destination_is_transcode_error() {
    let tmp = temp_dir("transcode_missing");
    std::fs::create_dir_all(&tmp).unwrap();
    let raw = raw_artifact(&tmp);

    for fake in [Fake::SilentlyProducesNothing, Fake::ProducesEmptyFile] {
        let err = RawOutput::new(raw.clone())
            .transcode(&fake, &tmp.join("clip.mp4"))
            .unwrap_err();
        assert!(matches!(err, Img2VideoError::Transcode(_)), "{err}");
        assert!(raw.path.exists());
    }

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn destination_equal_to_raw_is_rejected() {
    let tmp = temp_dir("transcode_same_path");
    std::fs::create_dir_all(&tmp).unwrap();
    let raw = raw_artifact(&tmp);

    let err = RawOutput::new(raw.clone())
        .transcode(&Fake::Copies, &raw.path)
        .unwrap_err();
    assert!(matches!(err, Img2VideoError::Transcode(_)), "{err}");
    assert!(raw.path.exists());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn stale_destination_does_not_pass_verification() {
    let tmp = temp_dir("transcode_stale_dst");
    std::fs::create_dir_all(&tmp).unwrap();
    let raw = raw_artifact(&tmp);
    let dst = tmp.join("clip.mp4");
    std::fs::write(&dst, b"old video from yesterday").unwrap();

    let err = RawOutput::new(raw.clone())
        .transcode(&Fake::SilentlyProducesNothing, &dst)
        .unwrap_err();
    assert!(matches!(err, Img2VideoError::Transcode(_)), "{err}");
    assert!(raw.path.exists());
    assert!(!dst.exists());

    std::fs::write(&dst, b"old video from yesterday").unwrap();
    RawOutput::new(raw.clone())
        .transcode(&Fake::Copies, &dst)
        .unwrap()
        .commit()
        .unwrap();
    assert_eq!(std::fs::read(&dst).unwrap(), b"raw bytes");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn ffmpeg_transcoder_reports_even_padded_size() {
    let t = FfmpegTranscoder::default();
    let padded = t.output_canvas(Canvas {
        width: 721,
        height: 405,
    });
    assert_eq!((padded.width, padded.height), (722, 406));

    let even = Canvas {
        width: 720,
        height: 360,
    };
    assert_eq!(t.output_canvas(even), even);
    assert_eq!(Fake::Copies.output_canvas(padded), padded);
}

#[test]
fn committed_artifact_takes_the_transcoders_frame_size() {
    struct PaddingCopy;

    impl Transcoder for PaddingCopy {
        fn transcode(&self, src: &Path, dst: &Path) -> Img2VideoResult<()> {
            std::fs::copy(src, dst).unwrap();
            Ok(())
        }

        fn output_canvas(&self, input: Canvas) -> Canvas {
            input.padded_to_even()
        }
    }

    let tmp = temp_dir("transcode_padded_commit");
    std::fs::create_dir_all(&tmp).unwrap();
    let raw_path = tmp.join("clip_tmp.mp4");
    std::fs::write(&raw_path, b"raw bytes").unwrap();
    let raw = VideoArtifact::new(raw_path, 720, 405, Fps::new(60, 1).unwrap(), 90);

    let final_artifact = RawOutput::new(raw)
        .transcode(&PaddingCopy, &tmp.join("clip.mp4"))
        .unwrap()
        .commit()
        .unwrap();
    assert_eq!((final_artifact.width, final_artifact.height), (720, 406));
    assert_eq!(final_artifact.frame_count, 90);

    std::fs::remove_dir_all(&tmp).ok();
}
