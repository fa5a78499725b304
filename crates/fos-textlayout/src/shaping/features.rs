//! OpenType feature settings
//!
//! A font target name may carry feature settings after a colon:
//! `Noto Sans:smcp&onum=1&-liga&kern[2:5]=0&lang=tr`.

use rustybuzz::ttf_parser::Tag;
use serde::{Deserialize, Serialize};

/// An OpenType feature applied over a character range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontFeature {
    /// Feature tag
    pub tag: [u8; 4],
    /// 0 disables, 1 enables, higher values pick alternates
    pub value: u32,
    /// First character the feature applies to
    pub start: u32,
    /// End of the range (exclusive); `u32::MAX` means end of text
    pub end: u32,
}

impl FontFeature {
    pub const KERN: [u8; 4] = *b"kern";
    pub const LIGA: [u8; 4] = *b"liga";
    pub const CLIG: [u8; 4] = *b"clig";

    /// Feature over the whole text
    pub fn new(tag: [u8; 4], value: u32) -> Self {
        Self {
            tag,
            value,
            start: 0,
            end: u32::MAX,
        }
    }

    /// Disable a feature over the whole text
    pub fn disabled(tag: [u8; 4]) -> Self {
        Self::new(tag, 0)
    }

    /// Restrict to a character range
    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Tag as text, trailing padding removed
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).trim_end().to_string()
    }

    pub fn to_rustybuzz(&self) -> rustybuzz::Feature {
        rustybuzz::Feature::new(
            Tag::from_bytes(&self.tag),
            self.value,
            self.start as usize..self.end as usize,
        )
    }

    /// Parse one setting: `tag`, `tag=N`, `+tag`, `-tag`, each optionally
    /// followed by `[start:end]` before the value
    pub fn parse(item: &str) -> Option<Self> {
        let item = item.trim();
        let (item, forced) = match item.as_bytes().first()? {
            b'+' => (&item[1..], Some(1)),
            b'-' => (&item[1..], Some(0)),
            _ => (item, None),
        };

        let (head, value) = match item.split_once('=') {
            Some(_) if forced.is_some() => return None,
            Some((head, value)) => (head, value.trim().parse::<u32>().ok()?),
            None => (item, forced.unwrap_or(1)),
        };

        let (tag, range) = match head.split_once('[') {
            Some((tag, rest)) => (tag, Some(parse_range(rest.strip_suffix(']')?)?)),
            None => (head, None),
        };

        let mut feature = Self::new(parse_tag(tag.trim())?, value);
        if let Some((start, end)) = range {
            feature = feature.with_range(start, end);
        }
        Some(feature)
    }
}

fn parse_tag(tag: &str) -> Option<[u8; 4]> {
    let bytes = tag.as_bytes();
    if bytes.is_empty() || bytes.len() > 4 || !bytes.iter().all(|b| b.is_ascii_graphic()) {
        return None;
    }
    let mut out = [b' '; 4];
    out[..bytes.len()].copy_from_slice(bytes);
    Some(out)
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    let (start, end) = range.split_once(':')?;
    let start = match start.trim() {
        "" => 0,
        s => s.parse().ok()?,
    };
    let end = match end.trim() {
        "" => u32::MAX,
        s => s.parse().ok()?,
    };
    (start <= end).then_some((start, end))
}

/// Settings carried by a font target name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSettings {
    /// Name with the settings suffix removed
    pub family: String,
    /// Parsed features, in order of appearance
    pub features: Vec<FontFeature>,
    /// `lang=` override
    pub language: Option<String>,
}

impl FeatureSettings {
    /// Split a font target name into family and settings. Items that
    /// don't parse are skipped.
    pub fn parse(name: &str) -> Self {
        let Some((family, settings)) = name.split_once(':') else {
            return Self {
                family: name.to_string(),
                ..Self::default()
            };
        };

        let mut parsed = Self {
            family: family.to_string(),
            ..Self::default()
        };

        for item in settings.split('&').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(lang) = item.strip_prefix("lang=") {
                if !lang.is_empty() {
                    parsed.language = Some(lang.to_string());
                }
                continue;
            }
            match FontFeature::parse(item) {
                Some(feature) => parsed.features.push(feature),
                None => tracing::trace!("Skipping feature setting {:?} in {}", item, family),
            }
        }

        parsed
    }
}

/// Drop later features that repeat the tag and range of an earlier one
pub fn dedup_features(features: impl IntoIterator<Item = FontFeature>) -> Vec<FontFeature> {
    let mut out: Vec<FontFeature> = Vec::new();
    for feature in features {
        let seen = out
            .iter()
            .any(|f| f.tag == feature.tag && f.start == feature.start && f.end == feature.end);
        if !seen {
            out.push(feature);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let settings = FeatureSettings::parse("Noto Sans");
        assert_eq!(settings.family, "Noto Sans");
        assert!(settings.features.is_empty());
        assert_eq!(settings.language, None);
    }

    #[test]
    fn test_parse_settings() {
        let settings = FeatureSettings::parse("Noto Sans:smcp&onum=2&-liga&+kern&lang=tr");
        assert_eq!(settings.family, "Noto Sans");
        assert_eq!(settings.language.as_deref(), Some("tr"));
        assert_eq!(
            settings.features,
            vec![
                FontFeature::new(*b"smcp", 1),
                FontFeature::new(*b"onum", 2),
                FontFeature::new(*b"liga", 0),
                FontFeature::new(*b"kern", 1),
            ]
        );
    }

    #[test]
    fn test_parse_range() {
        let feature = FontFeature::parse("kern[2:5]=0").unwrap();
        assert_eq!(feature, FontFeature::new(*b"kern", 0).with_range(2, 5));
        let open = FontFeature::parse("ss01[3:]").unwrap();
        assert_eq!((open.start, open.end), (3, u32::MAX));
    }

    #[test]
    fn test_invalid_items_skipped() {
        let settings = FeatureSettings::parse("Font:toolong&liga=x&-kern=1&&dlig");
        assert_eq!(settings.features, vec![FontFeature::new(*b"dlig", 1)]);
    }

    #[test]
    fn test_short_tag_padded() {
        let feature = FontFeature::parse("cv1").unwrap();
        assert_eq!(&feature.tag, b"cv1 ");
        assert_eq!(feature.tag_str(), "cv1");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let features = dedup_features([
            FontFeature::disabled(FontFeature::KERN),
            FontFeature::new(*b"smcp", 1),
            FontFeature::new(FontFeature::KERN, 1),
        ]);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].value, 0);
    }
}
