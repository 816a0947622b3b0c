//! A log4rs encoder that appends record key/values in logfmt style.
//!
//! `method` and `url` always come first, in that order, so every
//! `Outgoing request` line reads the same. Values that would split into
//! several tokens are quoted.

use log::Record;
use log::kv::{self, Key, Value, VisitSource};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::{Encode, Write};
use serde::Deserialize;

pub const DEFAULT_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l}):5} {t} - {m}";

static LEADING_KEYS: [&str; 2] = ["method", "url"];

#[derive(Debug, Default, Deserialize)]
pub struct LogfmtEncoderConfig {
    pub pattern: Option<String>,
}

#[derive(Debug)]
pub struct LogfmtEncoder {
    pattern: PatternEncoder,
}

impl LogfmtEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: PatternEncoder::new(pattern),
        }
    }
}

impl Default for LogfmtEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl Encode for LogfmtEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.pattern.encode(w, record)?;

        let mut pairs = PairCollector::default();
        record
            .key_values()
            .visit(&mut pairs)
            .map_err(|e| anyhow::anyhow!("Failed to read record key/values: {e}"))?;

        for (key, value) in pairs.in_display_order() {
            write!(w, " {}={}", key, quote(value))?;
        }
        w.write_all(b"\n")?;
        Ok(())
    }
}

#[derive(Default)]
struct PairCollector {
    pairs: Vec<(String, String)>,
}

impl PairCollector {
    fn in_display_order(&self) -> impl Iterator<Item = &(String, String)> {
        let leading = LEADING_KEYS
            .iter()
            .filter_map(|wanted| self.pairs.iter().find(|(key, _)| key.as_str() == *wanted));
        let rest = self
            .pairs
            .iter()
            .filter(|(key, _)| !LEADING_KEYS.contains(&key.as_str()));
        leading.chain(rest)
    }
}

impl<'kvs> VisitSource<'kvs> for PairCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.pairs.push((key.as_str().to_string(), value.to_string()));
        Ok(())
    }
}

/// Quotes `value` when it is empty or contains whitespace, `=` or `"`.
fn quote(value: &str) -> String {
    let needs_quotes =
        value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '=' || c == '"' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Registers the encoder under the `logfmt` kind for external YAML configs.
pub struct LogfmtEncoderDeserializer;

impl log4rs::config::Deserialize for LogfmtEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = LogfmtEncoderConfig;

    fn deserialize(
        &self,
        config: LogfmtEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let encoder = match config.pattern {
            Some(pattern) => LogfmtEncoder::new(&pattern),
            None => LogfmtEncoder::default(),
        };
        Ok(Box::new(encoder))
    }
}
