use regex::Regex;
use lazy_static::lazy_static;

// Tags that can run or embed code. These never make it
// into a response as markup, they get escaped into text.
const UNSAFE_TAGS: [&'static str; 5] =
  ["script", "style", "iframe", "object", "embed"];

// Attributes that take an URL and could be abused with
// the "javascript:" scheme.
const URL_ATTRIBUTES: [&'static str; 5] =
  ["href", "src", "action", "formaction", "xlink:href"];

lazy_static! {
  // Whatever a browser would start reading as a tag:
  // "<" or "</" followed by a letter. The name runs until
  // ASCII whitespace, "/" or ">", same as in the HTML
  // tokenizer.
  static ref TAG_START_REGEX: Regex = Regex::new(
    r"</?[a-zA-Z][^\t\n\x0C\r />]*"
  ).unwrap();
}

struct Attribute<'a> {
  name: &'a str,
  // Raw value text, quotes included.
  value: Option<&'a str>
}

struct ParsedTag<'a> {
  attributes: Vec<Attribute<'a>>,
  // "", "/" or " /", whatever came right before ">".
  self_closing: &'static str,
  // Byte offset right after the closing ">".
  end: usize
}

/**
 * Escapes the characters that could open or close
 * markup. Quotes are left alone, they can't do anything
 * outside of a tag.
 */
pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      _ => escaped.push(c)
    }
  }
  escaped
}

/**
 * Keeps the markup of the given HTML but removes event
 * handler attributes (onerror, onclick...) and
 * "javascript:" URLs from every tag. Script-like tags are
 * escaped entirely.
 *
 * Attributes are read the way a browser reads them, so
 * missing whitespace or "/" between attributes doesn't
 * hide anything. Anything that starts like a tag but can't
 * be read to its end gets its "<" escaped.
 */
pub fn sanitize_html(html: &str) -> String {
  let mut sanitized = String::with_capacity(html.len());
  let mut rest = html;
  while let Some(found) = TAG_START_REGEX.find(rest) {
    sanitized.push_str(&rest[..found.start()]);
    let start = found.as_str();
    let closing = start.starts_with("</");
    let name = start.trim_start_matches('<').trim_start_matches('/');
    let parsed = if is_plain_tag_name(name) {
      parse_attributes(rest, found.end())
    } else {
      None
    };
    match parsed {
      Some(tag) => {
        if UNSAFE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name)) {
          sanitized.push_str(&escape_html(&rest[found.start()..tag.end]));
        } else {
          sanitized.push_str(&rebuild_tag(closing, name, &tag));
        }
        rest = &rest[tag.end..];
      },
      None => {
        sanitized.push_str("&lt;");
        rest = &rest[found.start() + 1..];
      }
    }
  }
  sanitized.push_str(rest);
  sanitized
}

fn is_plain_tag_name(name: &str) -> bool {
  name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn is_attribute_name_end(b: u8) -> bool {
  b.is_ascii_whitespace() || b == b'/' || b == b'>' || b == b'='
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
  while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
    pos += 1;
  }
  pos
}

// Reads attributes from just after the tag name up to and
// including the closing ">". Returns None when the tag
// (or a quoted value) never ends.
// Every delimiter is ASCII so slicing on them is always
// on a char boundary.
fn parse_attributes(html: &str, from: usize) -> Option<ParsedTag<'_>> {
  let bytes = html.as_bytes();
  let mut pos = from;
  let mut attributes = Vec::new();
  loop {
    let separator_start = pos;
    while pos < bytes.len()
      && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
      pos += 1;
    }
    if pos >= bytes.len() {
      return None;
    }
    if bytes[pos] == b'>' {
      let separator = &html[separator_start..pos];
      let self_closing = match separator.strip_suffix('/') {
        Some(before) if before.ends_with(|c: char| c.is_ascii_whitespace()) => " /",
        Some(_) => "/",
        None => ""
      };
      return Some(ParsedTag { attributes, self_closing, end: pos + 1 });
    }

    let name_start = pos;
    // A leading "=" is part of the name for browsers.
    if bytes[pos] == b'=' {
      pos += 1;
    }
    while pos < bytes.len() && !is_attribute_name_end(bytes[pos]) {
      pos += 1;
    }
    let name = &html[name_start..pos];

    let mut value = None;
    let after_name = skip_whitespace(bytes, pos);
    if after_name < bytes.len() && bytes[after_name] == b'=' {
      pos = skip_whitespace(bytes, after_name + 1);
      if pos >= bytes.len() {
        return None;
      }
      let value_start = pos;
      match bytes[pos] {
        quote @ (b'"' | b'\'') => {
          let length = html[pos + 1..].find(quote as char)?;
          pos += length + 2;
        },
        _ => {
          // Unquoted values can contain quotes, only
          // whitespace or ">" ends them.
          while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
            pos += 1;
          }
        }
      }
      value = Some(&html[value_start..pos]);
    }
    attributes.push(Attribute { name, value });
  }
}

// Attributes are written back separated by single spaces
// so that the output always reads the same way it was
// parsed.
fn rebuild_tag(closing: bool, name: &str, tag: &ParsedTag) -> String {
  let mut rebuilt = String::from(if closing { "</" } else { "<" });
  rebuilt.push_str(name);
  for attribute in &tag.attributes {
    if !is_safe_attribute(attribute.name, attribute.value) {
      continue;
    }
    rebuilt.push(' ');
    rebuilt.push_str(attribute.name);
    if let Some(value) = attribute.value {
      rebuilt.push('=');
      rebuilt.push_str(value);
    }
  }
  rebuilt.push_str(tag.self_closing);
  rebuilt.push('>');
  rebuilt
}

fn is_safe_attribute(name: &str, value: Option<&str>) -> bool {
  let name = name.to_lowercase();
  if name.starts_with("on") {
    return false;
  }
  if URL_ATTRIBUTES.iter().any(|a| *a == name) {
    if let Some(value) = value {
      // Browsers happily ignore whitespace and control chars
      // in the scheme, e.g. "java\tscript:" still runs.
      let url: String = value
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();
      // Character references are decoded by the browser
      // before the scheme is looked at, so the scheme part
      // can't contain any.
      let scheme = url.split(|c: char| matches!(c, ':' | '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
      return !url.starts_with("javascript:") && !scheme.contains('&');
    }
  }
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_html_escapes_script_tags_but_not_quotes() {
    let sut = r#"Naughty naughty very naughty <script>alert("xss");</script>"#;
    let expected = r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#;
    assert_eq!(expected, escape_html(sut));
  }

  #[test]
  fn escape_html_leaves_plain_text_alone() {
    assert_eq!("Q&A: 10 tips", escape_html("Q&A: 10 tips"));
  }

  #[test]
  fn sanitize_html_removes_onerror_but_keeps_markup() {
    let sut = r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#;
    let expected = r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#;
    assert_eq!(expected, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_handles_unquoted_and_uppercase_handlers() {
    let sut = r#"<div class='box' ONCLICK=steal() id="a">hi</div>"#;
    let expected = r#"<div class='box' id="a">hi</div>"#;
    assert_eq!(expected, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_escapes_script_tags() {
    let sut = "<p>x</p><script>alert(1)</script>";
    let expected = "<p>x</p>&lt;script&gt;alert(1)&lt;/script&gt;";
    assert_eq!(expected, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_escapes_uppercase_script_tags() {
    let sut = "<SCRIPT src=x.js></SCRIPT>";
    let expected = "&lt;SCRIPT src=x.js&gt;&lt;/SCRIPT&gt;";
    assert_eq!(expected, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_drops_javascript_urls() {
    let sut = r#"<a href=" JavaScript:alert(1)" title="link">click</a>"#;
    let expected = r#"<a title="link">click</a>"#;
    assert_eq!(expected, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_drops_urls_with_encoded_schemes() {
    let sut = r#"<a href="&#106;avascript&#58;alert(1)">a</a><a href="java&Tab;script:alert(1)">b</a>"#;
    let expected = "<a>a</a><a>b</a>";
    assert_eq!(expected, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_keeps_urls_with_query_strings() {
    let sut = r#"<a href="https://blogful.example.com/?a=1&b=2">x</a><a href="/search?q=a&page=2">y</a>"#;
    assert_eq!(sut, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_keeps_self_closing_tags() {
    let sut = r#"line<br/>other<img src="a.png" />"#;
    assert_eq!(sut, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_ignores_lone_brackets() {
    let sut = "1 < 2 and 3 > 2";
    assert_eq!(sut, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_removes_handler_glued_to_a_quoted_value() {
    let sut = r#"<img src="x"onerror="alert(1)">"#;
    let sanitized = sanitize_html(sut);
    assert!(!sanitized.contains("onerror"));
    assert_eq!(r#"<img src="x">"#, sanitized);
  }

  #[test]
  fn sanitize_html_removes_handler_after_slash_separators() {
    let sut = r#"<img/src="x"/onerror="alert(1)">"#;
    let sanitized = sanitize_html(sut);
    assert!(!sanitized.contains("onerror"));
    assert_eq!(r#"<img src="x">"#, sanitized);
  }

  #[test]
  fn sanitize_html_removes_handler_after_unquoted_value_with_quote() {
    let sut = r#"<img src=x alt=a"b onerror=alert(1)>"#;
    let sanitized = sanitize_html(sut);
    assert!(!sanitized.contains("onerror"));
    assert_eq!(r#"<img src=x alt=a"b>"#, sanitized);
  }

  #[test]
  fn sanitize_html_escapes_tags_that_never_end() {
    let sut = r#"<img src="x onerror=alert(1)>"#;
    let sanitized = sanitize_html(sut);
    assert!(!sanitized.starts_with("<img"));
    assert_eq!(r#"&lt;img src="x onerror=alert(1)>"#, sanitized);
  }

  #[test]
  fn sanitize_html_escapes_tags_with_odd_names() {
    let sut = r#"<img"onerror=alert(1)>"#;
    assert_eq!(r#"&lt;img"onerror=alert(1)>"#, sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_escapes_tags_glued_with_unicode_spaces() {
    let sut = "<img\u{a0}onerror=alert(1)>";
    assert_eq!("&lt;img\u{a0}onerror=alert(1)>", sanitize_html(sut));
  }

  #[test]
  fn sanitize_html_keeps_multibyte_text_around_tags() {
    let sut = "<p title=\"café\">déjà vu</p>";
    assert_eq!(sut, sanitize_html(sut));
  }
}
