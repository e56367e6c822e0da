//! Configurable log line layout
//!
//! Log lines are rendered from a layout string such as
//! `[${longdate}] ${level}: ${logger} - ${message}`. Recognized placeholders:
//!
//! | placeholder    | renders                              |
//! |----------------|--------------------------------------|
//! | `${longdate}`  | `2024-03-01 12:30:45.123` local time |
//! | `${shortdate}` | `2024-03-01`                          |
//! | `${time}`      | `12:30:45.123`                       |
//! | `${level}`     | `Trace`, `Debug`, `Info`, `Warn`, `Error` |
//! | `${logger}`    | the event target (module path)        |
//! | `${message}`   | the formatted event fields            |
//!
//! Names are matched case-insensitively; anything else is copied verbatim.

use chrono::{DateTime, Local};
use std::fmt::Write as _;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "CHEADERGEN_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    LongDate,
    ShortDate,
    Time,
    Level,
    Logger,
    Message,
}

/// A parsed layout string, usable as a `tracing_subscriber` event format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    segments: Vec<Segment>,
}

impl Layout {
    pub fn parse(layout: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = layout;

        while let Some(start) = rest.find("${") {
            literal.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                literal.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let name = &after[..end];
            let segment = match name.to_ascii_lowercase().as_str() {
                "longdate" => Some(Segment::LongDate),
                "shortdate" => Some(Segment::ShortDate),
                "time" => Some(Segment::Time),
                "level" => Some(Segment::Level),
                "logger" => Some(Segment::Logger),
                "message" => Some(Segment::Message),
                _ => None,
            };
            match segment {
                Some(segment) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                }
                None => literal.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// Render one line (without the trailing newline).
    pub fn render(&self, now: &DateTime<Local>, level: &Level, logger: &str, message: &str) -> String {
        let mut line = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::LongDate => line.push_str(&now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
                Segment::ShortDate => line.push_str(&now.format("%Y-%m-%d").to_string()),
                Segment::Time => line.push_str(&now.format("%H:%M:%S%.3f").to_string()),
                Segment::Level => line.push_str(level_name(level)),
                Segment::Logger => line.push_str(logger),
                Segment::Message => line.push_str(message),
            }
        }
        line
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "Error",
        Level::WARN => "Warn",
        Level::INFO => "Info",
        Level::DEBUG => "Debug",
        _ => "Trace",
    }
}

impl<S, N> FormatEvent<S, N> for Layout
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let metadata = event.metadata();
        let line = self.render(&Local::now(), metadata.level(), metadata.target(), &message);
        writer.write_str(&line)?;
        writer.write_char('\n')
    }
}
