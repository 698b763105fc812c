//! Hand-maintained version tables for providers without a listing endpoint.
//!
//! New upstream releases stay invisible until they are added here or listed
//! in the project's `versions` config key.

pub const SPIGOT_VERSIONS: &[&str] = &[
    "1.20.4", "1.20.2", "1.20.1", "1.19.4", "1.19.3", "1.19.2", "1.18.2", "1.17.1", "1.16.5",
    "1.15.2", "1.14.4", "1.13.2", "1.12.2", "1.8.8",
];

pub const CRAFTBUKKIT_VERSIONS: &[&str] = &[
    "1.20.4", "1.20.2", "1.20.1", "1.19.4", "1.18.2", "1.17.1", "1.16.5", "1.12.2", "1.8.8",
];

/// Known versions for a static-path project, newest first.
pub fn known_versions(project: &str) -> &'static [&'static str] {
    match project {
        "spigot" => SPIGOT_VERSIONS,
        "craftbukkit" => CRAFTBUKKIT_VERSIONS,
        _ => &[],
    }
}
