use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Url};
use scraper::{ElementRef, Html, Node};

use crate::config::Config;
use crate::error::{AppError, FetchError, Result};

/// How far into the document a `<meta charset>` declaration is looked for.
const META_PRESCAN_BYTES: usize = 1024;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line of text when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "li", "main", "nav", "ol", "option",
    "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title",
    "tr", "ul",
];

/// Raw page payload together with the encoding it was sniffed as.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub encoding: &'static Encoding,
}

impl PageContent {
    pub fn decode(&self) -> String {
        let (text, _, had_errors) = self.encoding.decode(&self.bytes);
        if had_errors {
            log::debug!("Lossy {} decode for {}", self.encoding.name(), self.final_url);
        }
        text.into_owned()
    }
}

/// Visible text pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText {
    pub text: String,
    /// Number of recoverable markup errors the parser ran into.
    pub parse_errors: usize,
}

pub fn build_client(config: &Config) -> Result<Client> {
    ClientBuilder::new()
        .timeout(config.fetch_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Accepts only absolute http(s) URLs with a host.
pub fn validate_url(url: &str) -> std::result::Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(parsed)
}

/// Single-shot page retrieval. No retries; the caller re-triggers on failure.
pub async fn fetch_page(client: &Client, url: &str) -> std::result::Result<PageContent, FetchError> {
    let target = validate_url(url)?;

    let response = client
        .get(target)
        .send()
        .await
        .map_err(|e| FetchError::from_send(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let tld = response.url().host_str().and_then(top_level_domain);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::from_body(url, e))?
        .to_vec();

    let encoding = sniff_encoding(&bytes, content_type.as_deref(), tld.as_deref());
    log::debug!(
        "Fetched {} bytes from {} ({}; declared {:?})",
        bytes.len(),
        final_url,
        encoding.name(),
        content_type
    );

    Ok(PageContent {
        url: url.to_string(),
        final_url,
        status: status.as_u16(),
        content_type,
        bytes,
        encoding,
    })
}

/// Works out the encoding from the bytes themselves.
///
/// A BOM wins, then UTF-8 validity, then statistical detection. A `<meta>`
/// or `Content-Type` declaration only breaks the tie when the detected
/// encoding cannot decode the bytes cleanly and the declared one can.
/// `tld` is the host's top-level domain, used as a detection hint.
pub fn sniff_encoding(
    bytes: &[u8],
    content_type: Option<&str>,
    tld: Option<&str>,
) -> &'static Encoding {
    if let Some((enc, _)) = Encoding::for_bom(bytes) {
        return enc;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(tld.map(str::as_bytes), false);

    // The bytes are not UTF-8, so a UTF-8 declaration is wrong.
    let declared = sniff_meta_charset(bytes)
        .or_else(|| {
            content_type
                .and_then(charset_from_content_type)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .filter(|enc| *enc != UTF_8);

    match declared {
        Some(declared) => prefer_declared(bytes, guess, declared),
        None => guess,
    }
}

fn prefer_declared(
    bytes: &[u8],
    guess: &'static Encoding,
    declared: &'static Encoding,
) -> &'static Encoding {
    let decodes_cleanly = |enc: &'static Encoding| !enc.decode_without_bom_handling(bytes).1;
    if declared != guess && !decodes_cleanly(guess) && decodes_cleanly(declared) {
        declared
    } else {
        guess
    }
}

/// Lowercase alphabetic top-level label of a host name, if it has one.
fn top_level_domain(host: &str) -> Option<String> {
    let label = host.trim_end_matches('.').rsplit('.').next()?;
    (label.len() >= 2 && label.bytes().all(|b| b.is_ascii_alphabetic()))
        .then(|| label.to_ascii_lowercase())
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Finds `<meta charset=..>` or `<meta http-equiv content="..; charset=..">`
/// near the top of the document.
fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(enc) = charset_in_tag(tag) {
            // A document that decoded far enough to be read as ASCII is not UTF-16.
            if enc == UTF_16LE || enc == UTF_16BE {
                return Some(UTF_8);
            }
            return Some(enc);
        }
        rest = &rest[start + 5..];
    }
    None
}

fn charset_in_tag(tag: &str) -> Option<&'static Encoding> {
    let idx = tag.find("charset")?;
    let after = tag[idx + "charset".len()..].trim_start();
    let after = after.strip_prefix('=')?.trim_start();
    let after = after.trim_start_matches(['"', '\'']);
    let label: String = after
        .chars()
        .take_while(|c| !matches!(c, '"' | '\'' | ';' | '/' | '>') && !c.is_whitespace())
        .collect();
    Encoding::for_label(label.as_bytes())
}

enum Step<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    Boundary,
}

/// Best-effort extraction of human-visible text. Malformed markup never fails;
/// the parser's error count is reported instead.
///
/// Text nodes keep their own whitespace, so inline markup inside a word does
/// not split it; block-level elements always separate words.
pub fn extract_text(html: &str) -> PlainText {
    let document = Html::parse_document(html);

    let mut raw = String::with_capacity(html.len() / 2);
    let mut stack = vec![Step::Element(document.root_element())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => raw.push_str(text),
            Step::Boundary => raw.push(' '),
            Step::Element(element) => {
                let name = element.value().name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    raw.push(' ');
                    stack.push(Step::Boundary);
                }
                let children: Vec<_> = element.children().collect();
                for child in children.into_iter().rev() {
                    match child.value() {
                        Node::Text(text) => stack.push(Step::Text(&**text)),
                        Node::Element(_) => {
                            if let Some(child) = ElementRef::wrap(child) {
                                stack.push(Step::Element(child));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    if !document.errors.is_empty() {
        log::debug!("Markup parsed with {} recoverable errors", document.errors.len());
    }

    PlainText {
        text: raw.split_whitespace().collect::<Vec<_>>().join(" "),
        parse_errors: document.errors.len(),
    }
}
