//! Shared helpers for launcher integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use wiremock::MockServer;
use ws4sql_launcher::SettingsBuilder;
use ws4sql_launcher::provisioner::{Arch, DownloadDescriptor, Os, Platform};

pub const VERSION: &str = "0.17dev2";

/// Platform used by tests that do not depend on the host
pub fn linux_amd64() -> Platform {
    Platform::new(Os::Linux, Arch::Amd64)
}

/// Request path the provisioner asks the mock release host for
pub fn archive_path(platform: Platform) -> String {
    format!(
        "/ws4sql_v{VERSION}/{}",
        DownloadDescriptor::asset_name(VERSION, platform)
    )
}

/// Build an in-memory zip archive from (name, contents) pairs
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("add directory");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(contents.as_bytes()).expect("write file");
        }
    }
    writer.finish().expect("finish archive").into_inner()
}

/// Settings pointed at a mock release host and a temporary cache root
pub fn settings_for(server: &MockServer, cache_root: &Path) -> SettingsBuilder {
    SettingsBuilder::new()
        .base_url(server.uri())
        .cache_root(cache_root)
        .version(VERSION)
        .platform(linux_amd64())
        .allow_insecure_http(true)
}

/// List file names in a directory, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
