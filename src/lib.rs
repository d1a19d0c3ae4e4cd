//! # Sessionist
//!
//! `sessionist` is a small authenticated web endpoint built around cookie
//! sessions that resist fixation.
//!
//! ## Session lifecycle
//!
//! - **Anonymous:** the first request without a known `sid` cookie gets a fresh,
//!   unguessable identifier and an empty session.
//! - **Login:** a correct `user`/`pass` submission stores the `username`
//!   attribute and moves the session to a brand new identifier.
//! - **Logout:** the attributes are cleared and the identifier is rotated again.
//!
//! An identifier that was rotated away, removed, or expired is never valid again;
//! presenting it simply starts a new anonymous session. The session table lives in
//! process memory only.

pub mod api;
pub mod cli;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
