mod common;

use common::{Mode, MockInvoker};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use sweep_harness::{probe_cache, probe_corpus, CacheArtifact, ProbeOptions, ProbeOutcome};

fn artifact() -> CacheArtifact {
    CacheArtifact {
        arch: "arm64".to_string(),
        name: "ios16".to_string(),
        path: PathBuf::from("/caches/arm64/ios16"),
    }
}

fn options(images: &[&str]) -> ProbeOptions {
    ProbeOptions {
        executable: PathBuf::from("/opt/dyldex"),
        output_dir: PathBuf::from("/tmp/extracted"),
        images: images.iter().map(|image| image.to_string()).collect(),
    }
}

#[test]
fn prober_reports_first_extractable_image() {
    let images = [
        "/System/Library/Frameworks/A.framework/A",
        "/System/Library/Frameworks/B.framework/B",
        "/System/Library/Frameworks/C.framework/C",
    ];
    let invoker = MockInvoker::new();
    invoker.push_captured(false, &format!("Unable to find image '{}'\n", images[0]));
    invoker.push_captured(false, &format!("Unable to find image '{}'\n", images[1]));
    invoker.push_captured(true, "Extracting C\n");

    let outcome = probe_cache(&invoker, &options(&images), &artifact()).expect("probe runs");
    assert_eq!(
        outcome,
        ProbeOutcome::Extracted {
            image: images[2].to_string(),
        }
    );

    let calls = invoker.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|call| call.mode == Mode::Captured));
    assert_eq!(
        calls[2].args,
        vec![
            OsString::from("-V"),
            OsString::from("-e"),
            OsString::from(images[2]),
            OsString::from("-o"),
            OsString::from("/tmp/extracted/arm64_ios16_C"),
            OsString::from("/caches/arm64/ios16"),
        ]
    );
}

#[test]
fn prober_warns_when_no_candidate_is_found() {
    let images = ["/A/a", "/B/b", "/C/c"];
    let invoker = MockInvoker::new();
    for image in &images {
        invoker.push_captured(false, &format!("Unable to find image '{image}'\n"));
    }

    let outcome = probe_cache(&invoker, &options(&images), &artifact()).expect("probe runs");
    assert_eq!(outcome, ProbeOutcome::NoSuitableImage);
    assert_eq!(invoker.calls().len(), 3);
}

#[test]
fn probe_corpus_attempts_every_cache_despite_failures() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("arm64")).expect("create dirs");
    fs::write(root.join("arm64/a"), b"cache").expect("write cache");
    fs::write(root.join("arm64/b"), b"cache").expect("write cache");

    let invoker = MockInvoker::new();
    invoker.push_captured_error();
    invoker.push_captured_error();

    let options = options(&["/A/a"]);
    probe_corpus(&invoker, &options, root).expect("probe run completes");
    assert_eq!(invoker.calls().len(), 2);
}
