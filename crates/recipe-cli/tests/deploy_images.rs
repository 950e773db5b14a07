//! The container images build `recipes` with a toolchain the workspace accepts.

const WORKSPACE_MANIFEST: &str = include_str!("../../../Cargo.toml");
const APP_IMAGE: &str = include_str!("../../../Dockerfile");
const PROXY_IMAGE: &str = include_str!("../../../deploy/proxy/Dockerfile");

fn minor(version: &str) -> u32 {
    version
        .split('.')
        .nth(1)
        .and_then(|m| m.parse().ok())
        .unwrap_or_else(|| panic!("unparseable version '{version}'"))
}

fn workspace_rust_version() -> &'static str {
    WORKSPACE_MANIFEST
        .lines()
        .find_map(|line| line.strip_prefix("rust-version = "))
        .map(|v| v.trim_matches('"'))
        .expect("workspace rust-version")
}

fn builder_version(dockerfile: &str) -> &str {
    dockerfile
        .lines()
        .find_map(|line| line.strip_prefix("FROM rust:"))
        .and_then(|rest| rest.split(['-', ' ']).next())
        .expect("rust builder stage")
}

#[test]
fn builder_images_meet_the_workspace_rust_version() {
    let required = minor(workspace_rust_version());
    // let-chains in edition 2024 need 1.88.
    assert!(required >= 88, "workspace rust-version too old");
    for (name, image) in [("Dockerfile", APP_IMAGE), ("deploy/proxy/Dockerfile", PROXY_IMAGE)] {
        let version = builder_version(image);
        assert!(
            minor(version) >= required,
            "{name} builds with rust {version}, workspace needs 1.{required}"
        );
    }
}
