pub(crate) const EVENT_START: &str = "<event";
pub(crate) const EVENT_END: &str = "</event>";
pub(crate) const WGT_START: &str = "<wgt";
pub(crate) const WGT_END: &str = "</wgt>";
pub(crate) const MARKUP_START: char = '<';
pub(crate) const COMMENT_START: char = '#';

pub(crate) const HWU_COLUMNS_START: &str = "##";
pub(crate) const HISTOGRAM_START: &str = "<histogram>";
pub(crate) const HISTOGRAM_END: &str = r"<\histogram>";

/// Whether `line` opens an event, i.e. `<event>` or `<event attr=...>`
///
/// Tags that merely share the prefix, like `<eventgroup>`, don't count.
pub(crate) fn is_event_start(line: &str) -> bool {
    match line.strip_prefix(EVENT_START) {
        Some(rest) => rest.starts_with('>') || rest.starts_with(char::is_whitespace),
        None => false,
    }
}
