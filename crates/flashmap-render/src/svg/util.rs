use std::fmt::Write as _;

pub(super) fn fmt_display(v: f64) -> FmtDisplay {
    FmtDisplay(v)
}

/// Shortest round-trip form with `-0`, non-finite values and tiny float noise removed.
#[derive(Debug, Clone, Copy)]
pub(super) struct FmtDisplay(f64);

impl std::fmt::Display for FmtDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.0;
        if !v.is_finite() || v.abs() < 1e-9 {
            return f.write_str("0");
        }
        let nearest = v.round();
        let v = if (v - nearest).abs() < 1e-6 { nearest } else { v };
        // `round` keeps the sign, so -1e-7 would otherwise print as "-0".
        if v == 0.0 {
            return f.write_str("0");
        }
        write!(f, "{v}")
    }
}

/// Path coordinates: at most 3 fractional digits, ties rounded half-up.
pub(super) fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    let k = (v * 1000.0 + 0.5).floor() as i64;
    if k == 0 {
        out.push('0');
        return;
    }

    let abs = k.unsigned_abs();
    if k < 0 {
        out.push('-');
    }
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac == 0 {
        return;
    }
    let mut digits = format!("{frac:03}");
    while digits.ends_with('0') {
        digits.pop();
    }
    out.push('.');
    out.push_str(&digits);
}

fn xml_escape_for(b: u8) -> Option<&'static str> {
    match b {
        b'&' => Some("&amp;"),
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&#39;"),
        _ => None,
    }
}

pub(super) fn escape_xml_display(text: &str) -> EscapeXmlDisplay<'_> {
    EscapeXmlDisplay(text)
}

/// Escapes the five XML specials. Safe for both text content and quoted attributes.
pub(super) struct EscapeXmlDisplay<'a>(&'a str);

impl std::fmt::Display for EscapeXmlDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.0;
        let mut start = 0usize;
        for (i, &b) in text.as_bytes().iter().enumerate() {
            let Some(esc) = xml_escape_for(b) else {
                continue;
            };
            if start < i {
                f.write_str(&text[start..i])?;
            }
            f.write_str(esc)?;
            start = i + 1;
        }
        if start < text.len() {
            f.write_str(&text[start..])?;
        }
        Ok(())
    }
}

/// Comma-joined `font-family` list without padding around the commas.
pub(super) fn normalize_css_font_family(font_family: &str) -> String {
    let s = font_family.trim().trim_end_matches(';').trim();
    let mut parts: Vec<&str> = Vec::new();
    let mut start = 0usize;
    let mut quote: Option<char> = None;
    for (idx, ch) in s.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, ',') => {
                parts.push(s[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_display_cleans_numbers() {
        let fmt = |v: f64| fmt_display(v).to_string();
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt(f64::INFINITY), "0");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(-1e-7), "0");
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(1.0000004), "1");
        assert_eq!(fmt(-1.0000004), "-1");
        assert_eq!(fmt(1234.5678), "1234.5678");
    }

    #[test]
    fn fmt_path_into_matches_expected() {
        fn path(v: f64) -> String {
            let mut s = String::new();
            fmt_path_into(&mut s, v);
            s
        }

        assert_eq!(path(f64::NAN), "0");
        assert_eq!(path(0.0004), "0");
        assert_eq!(path(-0.0004), "0");
        assert_eq!(path(1.23456), "1.235");
        assert_eq!(path(1.0), "1");
        assert_eq!(path(-1.2345), "-1.234");
        assert_eq!(path(310.05), "310.05");
        assert_eq!(path(-0.5), "-0.5");
    }

    #[test]
    fn escape_xml_covers_all_specials() {
        assert_eq!(
            escape_xml_display(r#"<script>&"'"#).to_string(),
            "&lt;script&gt;&amp;&quot;&#39;"
        );
        assert_eq!(escape_xml_display("中文 plain").to_string(), "中文 plain");
    }

    #[test]
    fn font_family_is_normalized() {
        assert_eq!(
            normalize_css_font_family(" 'PingFang SC', \"Microsoft YaHei\" , Arial,sans-serif; "),
            "'PingFang SC',\"Microsoft YaHei\",Arial,sans-serif"
        );
        assert_eq!(normalize_css_font_family("  "), "");
        assert_eq!(normalize_css_font_family("'a,b', c"), "'a,b',c");
    }
}
