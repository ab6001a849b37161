//! Domain-level facts gathered through bounded network probes
//!
//! Forward DNS, reverse DNS, NS records, TXT lookups for SPF and DMARC, a
//! TLS handshake that retrieves the server certificate, and a probe for
//! the well-known `llms.txt` file. Every sub-probe degrades independently:
//! a failed lookup leaves its field absent and never aborts the analysis.

use chrono::{DateTime, TimeZone, Utc};
use hickory_resolver::TokioAsyncResolver;
use reqwest::Client;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use url::Url;

/// The server certificate presented during the TLS probe
#[derive(Debug, Clone)]
pub struct TlsCertificate {
    pub subject: String,
    pub issuer: String,
    pub not_after: DateTime<Utc>,
    pub days_until_expiry: i64,
}

impl TlsCertificate {
    pub fn is_expired(&self) -> bool {
        self.days_until_expiry < 0
    }
}

/// Domain-level probe results
#[derive(Debug, Clone, Default)]
pub struct DomainFacts {
    /// The probed host
    pub host: String,

    /// Forward-resolved addresses
    pub addresses: Vec<IpAddr>,

    /// PTR name of the first resolved address
    pub reverse_dns: Option<String>,

    /// Authoritative name servers
    pub name_servers: Vec<String>,

    /// The apex TXT record starting with `v=spf1`
    pub spf_record: Option<String>,

    /// The `_dmarc.` TXT record starting with `v=DMARC1`
    pub dmarc_record: Option<String>,

    /// Leaf certificate from the TLS probe; `None` on plain-http targets
    /// or handshake failure
    pub tls: Option<TlsCertificate>,

    /// Whether `/llms.txt` answered with a success status; `None` when
    /// the probe itself failed
    pub llms_txt: Option<bool>,
}

/// Runs every domain probe for the page's host
///
/// Sub-probes run concurrently and each one is bounded by `probe_timeout`.
pub async fn probe(page_url: &Url, client: &Client, probe_timeout: Duration) -> DomainFacts {
    let Some(host) = page_url.host_str().map(str::to_string) else {
        return DomainFacts::default();
    };

    let resolver = TokioAsyncResolver::tokio(Default::default(), Default::default());

    let (addresses, name_servers, spf_record, dmarc_record, tls, llms_txt) = tokio::join!(
        lookup_addresses(&resolver, &host, probe_timeout),
        lookup_name_servers(&resolver, &host, probe_timeout),
        lookup_spf(&resolver, &host, probe_timeout),
        lookup_dmarc(&resolver, &host, probe_timeout),
        fetch_certificate(page_url, &host, probe_timeout),
        probe_llms_txt(client, page_url),
    );

    let reverse_dns = match addresses.first() {
        Some(ip) => lookup_reverse(&resolver, *ip, probe_timeout).await,
        None => None,
    };

    DomainFacts {
        host,
        addresses,
        reverse_dns,
        name_servers,
        spf_record,
        dmarc_record,
        tls,
        llms_txt,
    }
}

async fn lookup_addresses(
    resolver: &TokioAsyncResolver,
    host: &str,
    bound: Duration,
) -> Vec<IpAddr> {
    match timeout(bound, resolver.lookup_ip(host)).await {
        Ok(Ok(lookup)) => lookup.iter().collect(),
        _ => {
            tracing::debug!("Forward DNS lookup failed for {}", host);
            Vec::new()
        }
    }
}

async fn lookup_reverse(
    resolver: &TokioAsyncResolver,
    ip: IpAddr,
    bound: Duration,
) -> Option<String> {
    match timeout(bound, resolver.reverse_lookup(ip)).await {
        Ok(Ok(lookup)) => lookup.iter().next().map(|name| name.to_string()),
        _ => None,
    }
}

async fn lookup_name_servers(
    resolver: &TokioAsyncResolver,
    host: &str,
    bound: Duration,
) -> Vec<String> {
    match timeout(bound, resolver.ns_lookup(host)).await {
        Ok(Ok(lookup)) => lookup.iter().map(|ns| ns.to_string()).collect(),
        _ => Vec::new(),
    }
}

async fn lookup_spf(resolver: &TokioAsyncResolver, host: &str, bound: Duration) -> Option<String> {
    lookup_txt_starting_with(resolver, host, "v=spf1", bound).await
}

async fn lookup_dmarc(
    resolver: &TokioAsyncResolver,
    host: &str,
    bound: Duration,
) -> Option<String> {
    lookup_txt_starting_with(resolver, &dmarc_host(host), "v=DMARC1", bound).await
}

/// The DMARC policy record lives at `_dmarc.<host>`
fn dmarc_host(host: &str) -> String {
    format!("_dmarc.{}", host)
}

async fn lookup_txt_starting_with(
    resolver: &TokioAsyncResolver,
    host: &str,
    prefix: &str,
    bound: Duration,
) -> Option<String> {
    match timeout(bound, resolver.txt_lookup(host)).await {
        Ok(Ok(lookup)) => lookup
            .iter()
            .map(|txt| txt.to_string())
            .find(|record| record.starts_with(prefix)),
        _ => None,
    }
}

/// Performs a TLS handshake limited to certificate retrieval
async fn fetch_certificate(
    page_url: &Url,
    host: &str,
    bound: Duration,
) -> Option<TlsCertificate> {
    if page_url.scheme() != "https" {
        return None;
    }

    let port = page_url.port().unwrap_or(443);

    match timeout(bound, handshake(host, port)).await {
        Ok(Some(cert)) => Some(cert),
        _ => {
            tracing::debug!("TLS certificate probe failed for {}", host);
            None
        }
    }
}

async fn handshake(host: &str, port: u16) -> Option<TlsCertificate> {
    let mut roots = rustls::RootCertStore::empty();
    roots.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
        rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));

    let config = rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let connector = TlsConnector::from(Arc::new(config));
    let server_name = rustls::ServerName::try_from(host).ok()?;

    let stream = TcpStream::connect((host, port)).await.ok()?;
    let tls = connector.connect(server_name, stream).await.ok()?;

    let (_, connection) = tls.get_ref();
    let leaf = connection.peer_certificates()?.first()?;

    parse_certificate(&leaf.0)
}

fn parse_certificate(der: &[u8]) -> Option<TlsCertificate> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;

    let not_after = Utc
        .timestamp_opt(cert.validity().not_after.timestamp(), 0)
        .single()?;

    Some(TlsCertificate {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_after,
        days_until_expiry: (not_after - Utc::now()).num_days(),
    })
}

/// Probes the well-known `llms.txt` file at the site root
async fn probe_llms_txt(client: &Client, page_url: &Url) -> Option<bool> {
    let probe_url = page_url.join("/llms.txt").ok()?;

    match client.get(probe_url).send().await {
        Ok(response) => Some(response.status().is_success()),
        Err(_) => None,
    }
}
