use std::path::Path;
use std::process::Command;

fn git(repo: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(repo).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo = Path::new(&manifest_dir).join("..");

    let version =
        git(&repo, &["describe", "--always", "--dirty"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=STMTCONV_BUILD_SHA={version}");

    if let Some(head) = git(&repo, &["rev-parse", "--git-path", "HEAD"]) {
        println!("cargo:rerun-if-changed={}", repo.join(head).display());
    }
}
