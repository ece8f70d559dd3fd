use std::process::Command;

/// Run a git command and return its trimmed stdout, or `None` on any failure
/// (no git binary, not a checkout, non-zero exit).
fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    // Consumed by `generate::generator_id` and stamped into every report.
    println!("cargo:rustc-env=MANUAL_GEN_GIT_HASH={hash}");
    println!("cargo:rustc-env=MANUAL_GEN_ON_RELEASE_TAG={on_tag}");
}
