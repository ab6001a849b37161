//! Security checks: transport security, protective headers, mixed
//! content, and the TLS certificate probe

use crate::analyzer::AnalysisContext;
use crate::checks::{Check, CheckResult, Importance, NamedResult};
use async_trait::async_trait;
use serde_json::json;

/// Warn when the certificate expires within this many days
const CERT_EXPIRY_WARNING_DAYS: i64 = 30;

/// The security category in insertion order
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(HttpsCheck),
        Box::new(TlsCertificateCheck),
        Box::new(HstsCheck),
        Box::new(CspCheck),
        Box::new(FrameOptionsCheck),
        Box::new(ContentTypeOptionsCheck),
        Box::new(ReferrerPolicyCheck),
        Box::new(ServerDisclosureCheck),
        Box::new(MixedContentCheck),
    ]
}

/// The page is served over HTTPS
struct HttpsCheck;

#[async_trait]
impl Check for HttpsCheck {
    fn names(&self) -> &'static [&'static str] {
        &["https"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let scheme = ctx.url().scheme();
        let result = CheckResult::verdict(
            Importance::High,
            json!(scheme),
            scheme == "https",
            || "Page is served over plain HTTP".to_string(),
        );

        vec![NamedResult::new("https", result)]
    }
}

/// The served certificate is valid and not about to expire
///
/// An absent probe result (plain-http page, handshake failure) is a
/// failing signal: the certificate could not be verified.
struct TlsCertificateCheck;

#[async_trait]
impl Check for TlsCertificateCheck {
    fn names(&self) -> &'static [&'static str] {
        &["tls_certificate"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let tls = ctx.facts().domain.as_ref().and_then(|d| d.tls.as_ref());

        let result = match tls {
            None => CheckResult::fail(
                Importance::High,
                json!(null),
                "TLS certificate could not be verified",
            ),
            Some(cert) => {
                let value = json!({
                    "subject": cert.subject,
                    "issuer": cert.issuer,
                    "not_after": cert.not_after.to_rfc3339(),
                    "days_until_expiry": cert.days_until_expiry,
                });

                if cert.is_expired() {
                    CheckResult::fail(
                        Importance::High,
                        value,
                        format!("Certificate expired {} days ago", -cert.days_until_expiry),
                    )
                } else {
                    let mut result = CheckResult::pass(Importance::High, value);
                    if cert.days_until_expiry < CERT_EXPIRY_WARNING_DAYS {
                        result = result.with_warning(format!(
                            "Certificate expires in {} days",
                            cert.days_until_expiry
                        ));
                    }
                    result
                }
            }
        };

        vec![NamedResult::new("tls_certificate", result)]
    }
}

/// Strict-Transport-Security is sent
struct HstsCheck;

#[async_trait]
impl Check for HstsCheck {
    fn names(&self) -> &'static [&'static str] {
        &["hsts_header"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let header = ctx.header("strict-transport-security");
        let result = CheckResult::verdict(
            Importance::Medium,
            json!(header),
            header.is_some(),
            || "No Strict-Transport-Security header sent".to_string(),
        );

        vec![NamedResult::new("hsts_header", result)]
    }
}

/// A Content-Security-Policy header is sent
struct CspCheck;

#[async_trait]
impl Check for CspCheck {
    fn names(&self) -> &'static [&'static str] {
        &["content_security_policy"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let header = ctx.header("content-security-policy");
        let mut result = CheckResult::verdict(
            Importance::Medium,
            json!(header),
            header.is_some(),
            || "No Content-Security-Policy header sent".to_string(),
        );

        if let Some(policy) = header {
            if policy.contains("unsafe-inline") {
                result = result.with_warning("Policy allows unsafe-inline".to_string());
            }
        }

        vec![NamedResult::new("content_security_policy", result)]
    }
}

/// Clickjacking protection via X-Frame-Options or frame-ancestors
struct FrameOptionsCheck;

#[async_trait]
impl Check for FrameOptionsCheck {
    fn names(&self) -> &'static [&'static str] {
        &["x_frame_options"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let header = ctx.header("x-frame-options");
        let csp_covers = ctx
            .header("content-security-policy")
            .map(|policy| policy.contains("frame-ancestors"))
            .unwrap_or(false);

        let result = CheckResult::verdict(
            Importance::Low,
            json!(header),
            header.is_some() || csp_covers,
            || "No clickjacking protection (X-Frame-Options or frame-ancestors)".to_string(),
        );

        vec![NamedResult::new("x_frame_options", result)]
    }
}

/// X-Content-Type-Options is nosniff
struct ContentTypeOptionsCheck;

#[async_trait]
impl Check for ContentTypeOptionsCheck {
    fn names(&self) -> &'static [&'static str] {
        &["x_content_type_options"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let header = ctx.header("x-content-type-options");
        let result = CheckResult::verdict(
            Importance::Low,
            json!(header),
            header.is_some_and(|v| v.eq_ignore_ascii_case("nosniff")),
            || "X-Content-Type-Options is not set to nosniff".to_string(),
        );

        vec![NamedResult::new("x_content_type_options", result)]
    }
}

/// A Referrer-Policy header is sent
struct ReferrerPolicyCheck;

#[async_trait]
impl Check for ReferrerPolicyCheck {
    fn names(&self) -> &'static [&'static str] {
        &["referrer_policy"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let header = ctx.header("referrer-policy");
        let result = CheckResult::verdict(
            Importance::Low,
            json!(header),
            header.is_some(),
            || "No Referrer-Policy header sent".to_string(),
        );

        vec![NamedResult::new("referrer_policy", result)]
    }
}

/// Server and X-Powered-By headers do not leak version numbers
struct ServerDisclosureCheck;

#[async_trait]
impl Check for ServerDisclosureCheck {
    fn names(&self) -> &'static [&'static str] {
        &["server_version_disclosure"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let mut disclosed = Vec::new();
        for name in ["server", "x-powered-by"] {
            if let Some(value) = ctx.header(name) {
                if value.chars().any(|c| c.is_ascii_digit()) {
                    disclosed.push(json!({ "header": name, "value": value }));
                }
            }
        }

        let clean = disclosed.is_empty();
        let result = CheckResult::verdict(
            Importance::Low,
            json!(disclosed),
            clean,
            || "Response headers disclose server software versions".to_string(),
        );

        vec![NamedResult::new("server_version_disclosure", result)]
    }
}

/// No http:// subresources on an https page
struct MixedContentCheck;

#[async_trait]
impl Check for MixedContentCheck {
    fn names(&self) -> &'static [&'static str] {
        &["mixed_content"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let mixed = &ctx.facts().security.mixed_content;
        let result = CheckResult::verdict(Importance::High, json!(mixed), mixed.is_empty(), || {
            format!("{} subresources are loaded over plain HTTP", mixed.len())
        });

        vec![NamedResult::new("mixed_content", result)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::TestPage;
    use crate::facts::{DomainFacts, TlsCertificate};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_https_passes_on_https_page() {
        let ctx = TestPage::new("<html></html>").build();
        assert!(HttpsCheck.run(&ctx).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_https_fails_on_http_page() {
        let mut page = TestPage::new("<html></html>");
        page.url = "http://example.com/".to_string();
        assert!(!HttpsCheck.run(&page.build()).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_missing_certificate_fails() {
        let ctx = TestPage::new("<html></html>").build();
        let results = TlsCertificateCheck.run(&ctx).await;
        assert!(!results[0].result.passed);
    }

    #[tokio::test]
    async fn test_valid_certificate_passes_with_expiry_warning() {
        let mut page = TestPage::new("<html></html>");
        let mut domain = DomainFacts::default();
        domain.tls = Some(TlsCertificate {
            subject: "CN=example.com".to_string(),
            issuer: "CN=Test CA".to_string(),
            not_after: Utc::now() + Duration::days(10),
            days_until_expiry: 10,
        });
        page.domain = Some(domain);
        let results = TlsCertificateCheck.run(&page.build()).await;
        assert!(results[0].result.passed);
        assert_eq!(results[0].result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_certificate_fails() {
        let mut page = TestPage::new("<html></html>");
        let mut domain = DomainFacts::default();
        domain.tls = Some(TlsCertificate {
            subject: "CN=example.com".to_string(),
            issuer: "CN=Test CA".to_string(),
            not_after: Utc::now() - Duration::days(3),
            days_until_expiry: -3,
        });
        page.domain = Some(domain);
        assert!(!TlsCertificateCheck.run(&page.build()).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_hsts_header_detected() {
        let mut page = TestPage::new("<html></html>");
        page.headers = vec![("strict-transport-security", "max-age=63072000")];
        assert!(HstsCheck.run(&page.build()).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_csp_unsafe_inline_warns() {
        let mut page = TestPage::new("<html></html>");
        page.headers = vec![(
            "content-security-policy",
            "default-src 'self' 'unsafe-inline'",
        )];
        let results = CspCheck.run(&page.build()).await;
        assert!(results[0].result.passed);
        assert_eq!(results[0].result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_frame_ancestors_satisfies_frame_options() {
        let mut page = TestPage::new("<html></html>");
        page.headers = vec![("content-security-policy", "frame-ancestors 'none'")];
        assert!(FrameOptionsCheck.run(&page.build()).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_nosniff_required() {
        let mut page = TestPage::new("<html></html>");
        page.headers = vec![("x-content-type-options", "something-else")];
        assert!(!ContentTypeOptionsCheck.run(&page.build()).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_server_version_disclosure() {
        let mut page = TestPage::new("<html></html>");
        page.headers = vec![("server", "nginx/1.24.0")];
        assert!(!ServerDisclosureCheck.run(&page.build()).await[0].result.passed);

        let mut page = TestPage::new("<html></html>");
        page.headers = vec![("server", "nginx")];
        assert!(ServerDisclosureCheck.run(&page.build()).await[0].result.passed);
    }

    #[tokio::test]
    async fn test_mixed_content_fails() {
        let ctx = TestPage::new(
            r#"<html><body><img src="http://cdn.example.com/x.png"></body></html>"#,
        )
        .build();
        assert!(!MixedContentCheck.run(&ctx).await[0].result.passed);
    }
}
