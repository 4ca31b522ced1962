// src/openssl.rs

//! OpenSSL directory ranking.
//!
//! Purely advisory: the final report suggests values for `OPENSSLDIR`,
//! `SSL_CERT_FILE` and `SSL_CERT_DIR` so the relocated interpreter can find
//! the host's certificate store. Candidates are the directory compiled into
//! the system `openssl` binary (best-effort subprocess query) followed by
//! the conventional per-distribution locations. Each existing candidate is
//! scored and the best one wins; nothing here ever mutates the filesystem,
//! and every failure degrades to "not found".

use crate::tool;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional certificate directories, in ranking order.
pub const DEFAULT_OPENSSL_DIRS: [&str; 6] = [
    "/usr/share/ssl",          // RHEL & Fedora
    "/etc/pki/tls",            // Old RHEL & Fedora
    "/usr/lib/ssl",            // Debian
    "/etc/ssl",                // Gentoo
    "/usr/local/ssl",          // Manual builds
    "/System/Library/OpenSSL", // Mac
];

/// Points for being the directory the system openssl was compiled with.
const SCORE_DEFAULT: u32 = 1;
/// Points for a `cert.pem` bundle directly inside the directory.
const SCORE_CERT_PEM: u32 = 4;
/// Points for a `certs/` subdirectory.
const SCORE_CERTS_DIR: u32 = 2;

/// Outcome of the ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SslGuidance {
    /// Best-guess OpenSSL directory; `None` when no candidate exists.
    pub dir: Option<PathBuf>,
    /// All candidates tied at the top score, when more than one.
    pub ambiguous: Vec<PathBuf>,
    /// Suggest exporting `SSL_CERT_FILE`.
    pub recommend_cert_file: bool,
    /// Suggest exporting `SSL_CERT_DIR`.
    pub recommend_cert_dir: bool,
}

impl SslGuidance {
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Query the system openssl for its compiled-in directory and rank it
/// against the conventional locations.
pub fn detect() -> SslGuidance {
    let default_dir = query_default_dir();
    let candidates: Vec<PathBuf> = DEFAULT_OPENSSL_DIRS.iter().map(PathBuf::from).collect();
    analyze(&rank_candidates(default_dir.as_deref(), &candidates))
}

/// Ask `openssl version -d` for its compiled-in directory. Best-effort; a
/// missing tool or unparseable output removes the candidate, nothing more.
pub fn query_default_dir() -> Option<PathBuf> {
    let output = tool::capture_stdout("openssl", &["version", "-d"])?;
    let dir = parse_openssldir_output(&output);
    match &dir {
        Some(d) => debug!("System openssl reports OPENSSLDIR {}", d.display()),
        None => debug!("Could not parse openssl version -d output: {output:?}"),
    }
    dir
}

/// The output looks like `OPENSSLDIR: "/usr/lib/ssl"`; the directory is the
/// first quoted string.
pub fn parse_openssldir_output(output: &str) -> Option<PathBuf> {
    let quoted = output.split('"').nth(1)?;
    if quoted.is_empty() {
        return None;
    }
    Some(PathBuf::from(quoted))
}

/// Score every existing candidate directory, preserving candidate order
/// (system default first). A candidate equal to the default is scored once.
pub fn rank_candidates(default_dir: Option<&Path>, candidates: &[PathBuf]) -> Vec<(PathBuf, u32)> {
    let mut ordered: Vec<&Path> = Vec::new();
    if let Some(default) = default_dir {
        ordered.push(default);
    }
    for candidate in candidates {
        if Some(candidate.as_path()) != default_dir {
            ordered.push(candidate);
        }
    }

    let mut ranked = Vec::new();
    for dir in ordered {
        if !dir.is_dir() {
            continue;
        }
        let mut score = 0;
        if Some(dir) == default_dir {
            score += SCORE_DEFAULT;
        }
        if dir.join("cert.pem").is_file() {
            score += SCORE_CERT_PEM;
        }
        if dir.join("certs").is_dir() {
            score += SCORE_CERTS_DIR;
        }
        ranked.push((dir.to_path_buf(), score));
    }
    ranked
}

/// Pick the best candidate and map its score onto the two recommendations:
/// >= 6 both, >= 4 cert-file only, >= 2 cert-dir only, below that neither.
pub fn analyze(ranked: &[(PathBuf, u32)]) -> SslGuidance {
    let Some(max_score) = ranked.iter().map(|(_, score)| *score).max() else {
        return SslGuidance::not_found();
    };

    let tied: Vec<&PathBuf> = ranked
        .iter()
        .filter(|(_, score)| *score == max_score)
        .map(|(dir, _)| dir)
        .collect();

    let (recommend_cert_file, recommend_cert_dir) = if max_score >= 6 {
        (true, true)
    } else if max_score >= 4 {
        (true, false)
    } else if max_score >= 2 {
        (false, true)
    } else {
        (false, false)
    };

    SslGuidance {
        dir: Some(tied[0].clone()),
        ambiguous: if tied.len() > 1 {
            tied.into_iter().cloned().collect()
        } else {
            Vec::new()
        },
        recommend_cert_file,
        recommend_cert_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_openssldir_output() {
        assert_eq!(
            parse_openssldir_output("OPENSSLDIR: \"/usr/lib/ssl\"\n"),
            Some(PathBuf::from("/usr/lib/ssl"))
        );
        assert_eq!(parse_openssldir_output("no quotes here"), None);
        assert_eq!(parse_openssldir_output("OPENSSLDIR: \"\""), None);
    }

    #[test]
    fn test_full_score_recommends_both() {
        let tmp = TempDir::new().unwrap();
        let ssl = tmp.path().join("fakessl");
        fs::create_dir_all(ssl.join("certs")).unwrap();
        fs::write(ssl.join("cert.pem"), "CERT").unwrap();

        let ranked = rank_candidates(Some(ssl.as_path()), &[ssl.clone()]);
        assert_eq!(ranked, vec![(ssl.clone(), 7)]);

        let guidance = analyze(&ranked);
        assert_eq!(guidance.dir, Some(ssl));
        assert!(guidance.ambiguous.is_empty());
        assert!(guidance.recommend_cert_file);
        assert!(guidance.recommend_cert_dir);
    }

    #[test]
    fn test_certs_dir_only_recommends_cert_dir() {
        let tmp = TempDir::new().unwrap();
        let ssl = tmp.path().join("fakessl");
        fs::create_dir_all(ssl.join("certs")).unwrap();

        let ranked = rank_candidates(None, &[ssl.clone()]);
        assert_eq!(ranked, vec![(ssl.clone(), 2)]);

        let guidance = analyze(&ranked);
        assert_eq!(guidance.dir, Some(ssl));
        assert!(!guidance.recommend_cert_file);
        assert!(guidance.recommend_cert_dir);
    }

    #[test]
    fn test_no_candidates_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let ranked = rank_candidates(None, &[tmp.path().join("missing")]);
        assert!(ranked.is_empty());

        let guidance = analyze(&ranked);
        assert_eq!(guidance, SslGuidance::not_found());
        assert!(guidance.dir.is_none());
        assert!(!guidance.recommend_cert_file);
        assert!(!guidance.recommend_cert_dir);
    }

    #[test]
    fn test_tied_candidates_report_ambiguity_first_wins() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(a.join("certs")).unwrap();
        fs::create_dir_all(b.join("certs")).unwrap();

        let ranked = rank_candidates(None, &[a.clone(), b.clone()]);
        let guidance = analyze(&ranked);
        assert_eq!(guidance.dir, Some(a.clone()));
        assert_eq!(guidance.ambiguous, vec![a, b]);
    }

    #[test]
    fn test_default_candidate_not_ranked_twice() {
        let tmp = TempDir::new().unwrap();
        let ssl = tmp.path().join("ssl");
        fs::create_dir_all(&ssl).unwrap();

        let ranked = rank_candidates(Some(ssl.as_path()), &[ssl.clone()]);
        assert_eq!(ranked.len(), 1);
        // Exists and is the default, but has no certificate material.
        assert_eq!(ranked[0], (ssl, 1));
    }

    #[test]
    fn test_score_zero_directory_still_canonical_with_no_recommendations() {
        let tmp = TempDir::new().unwrap();
        let bare = tmp.path().join("bare");
        fs::create_dir_all(&bare).unwrap();

        let guidance = analyze(&rank_candidates(None, &[bare.clone()]));
        assert_eq!(guidance.dir, Some(bare));
        assert!(!guidance.recommend_cert_file);
        assert!(!guidance.recommend_cert_dir);
    }
}
