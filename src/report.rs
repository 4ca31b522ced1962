// src/report.rs

//! Final success report.
//!
//! Rendered once after the pipeline finishes: install location, PATH
//! guidance, Qt note, OpenSSL certificate guidance (when the platform wants
//! it) and where the documentation lives.

use crate::openssl::SslGuidance;
use std::fmt;
use std::path::PathBuf;

/// Everything the closing report needs.
#[derive(Debug)]
pub struct InstallReport {
    pub product: String,
    pub version: String,
    pub install_dir: PathBuf,
    pub path_guidance: String,
    pub qt_note: Option<String>,
    pub ssl: Option<SslGuidance>,
    pub doc_location: PathBuf,
    pub documentation_url: Option<String>,
}

impl fmt::Display for InstallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\n{} {} has been successfully installed to:\n\n    {}\n",
            self.product,
            self.version,
            self.install_dir.display()
        )?;
        writeln!(
            f,
            "You can add the following to your shell profile to put {} on your PATH:\n\n    {}\n",
            self.product, self.path_guidance
        )?;

        if let Some(note) = &self.qt_note {
            writeln!(f, "{note}\n")?;
        }

        if let Some(ssl) = &self.ssl {
            self.fmt_ssl(f, ssl)?;
        }

        writeln!(f, "The documentation is available here:\n")?;
        writeln!(f, "    {}", self.doc_location.display())?;
        if let Some(url) = &self.documentation_url {
            writeln!(f, "    web: {url}")?;
        }
        Ok(())
    }
}

impl InstallReport {
    fn fmt_ssl(&self, f: &mut fmt::Formatter<'_>, ssl: &SslGuidance) -> fmt::Result {
        writeln!(
            f,
            "You may need to set the environment variables OPENSSLDIR,\n\
             SSL_CERT_DIR, and SSL_CERT_FILE so that the interpreter can\n\
             locate the default OpenSSL certificate directory. These are our\n\
             expected values for your system:\n"
        )?;

        let Some(dir) = &ssl.dir else {
            writeln!(f, "    OpenSSL directory not found in an expected location.\n")?;
            return Ok(());
        };

        if !ssl.ambiguous.is_empty() {
            writeln!(f, "    There may be multiple working OpenSSL installations:")?;
            for candidate in &ssl.ambiguous {
                writeln!(f, "        {}", candidate.display())?;
            }
            writeln!(f)?;
        }

        writeln!(f, "    export OPENSSLDIR={}", dir.display())?;
        if ssl.recommend_cert_file {
            writeln!(
                f,
                "    export SSL_CERT_FILE={}",
                dir.join("cert.pem").display()
            )?;
        }
        if ssl.recommend_cert_dir {
            writeln!(f, "    export SSL_CERT_DIR={}", dir.join("certs").display())?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_report() -> InstallReport {
        InstallReport {
            product: "Python Runtime".to_string(),
            version: "3.8.2".to_string(),
            install_dir: PathBuf::from("/opt/pyrt"),
            path_guidance: "export PATH=/opt/pyrt/bin:$PATH".to_string(),
            qt_note: None,
            ssl: None,
            doc_location: PathBuf::from("/opt/pyrt/doc/python3.8/index.html"),
            documentation_url: Some("https://docs.example.com/python/3.8".to_string()),
        }
    }

    #[test]
    fn test_report_basics() {
        let text = base_report().to_string();
        assert!(text.contains("successfully installed to:\n\n    /opt/pyrt"));
        assert!(text.contains("export PATH=/opt/pyrt/bin:$PATH"));
        assert!(text.contains("web: https://docs.example.com/python/3.8"));
        assert!(!text.contains("OPENSSLDIR"));
        assert!(!text.contains("Qt"));
    }

    #[test]
    fn test_report_ssl_recommendations() {
        let mut report = base_report();
        report.ssl = Some(SslGuidance {
            dir: Some(PathBuf::from("/etc/ssl")),
            ambiguous: Vec::new(),
            recommend_cert_file: true,
            recommend_cert_dir: true,
        });

        let text = report.to_string();
        assert!(text.contains("export OPENSSLDIR=/etc/ssl"));
        assert!(text.contains("export SSL_CERT_FILE=/etc/ssl/cert.pem"));
        assert!(text.contains("export SSL_CERT_DIR=/etc/ssl/certs"));
    }

    #[test]
    fn test_report_ssl_not_found() {
        let mut report = base_report();
        report.ssl = Some(SslGuidance::not_found());

        let text = report.to_string();
        assert!(text.contains("OpenSSL directory not found in an expected location."));
        assert!(!text.contains("export OPENSSLDIR"));
    }

    #[test]
    fn test_report_ssl_ambiguity_lists_all() {
        let mut report = base_report();
        report.ssl = Some(SslGuidance {
            dir: Some(PathBuf::from("/etc/ssl")),
            ambiguous: vec![PathBuf::from("/etc/ssl"), PathBuf::from("/usr/lib/ssl")],
            recommend_cert_file: false,
            recommend_cert_dir: true,
        });

        let text = report.to_string();
        assert!(text.contains("multiple working OpenSSL installations"));
        assert!(text.contains("        /usr/lib/ssl"));
        assert!(text.contains("export OPENSSLDIR=/etc/ssl"));
    }

    #[test]
    fn test_report_qt_note() {
        let mut report = base_report();
        report.qt_note = Some("Qt is bundled with this build".to_string());
        assert!(report.to_string().contains("Qt is bundled"));
    }
}
