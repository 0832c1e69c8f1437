// Response body normalisation.
//
// The device firmware wraps its JSON in an HTML page on some builds and
// pads lines with CR/LF. Before parsing, comment lines are dropped and the
// remaining lines are trimmed and joined back into one string.

const COMMENT_MARKER: &str = "<!-";
const TRIM_CHARS: [char; 3] = ['\n', '\r', ' '];

/// Strip comment lines and per-line padding from a raw response body.
///
/// Any line containing `<!-` is removed entirely. Every surviving line is
/// trimmed of spaces, `\r` and `\n` at both ends, then the lines are
/// concatenated without a separator. Returns an empty string for an empty
/// body or when every line was filtered out.
pub fn cleanup_response(body: &str) -> String {
    body.split('\n')
        .filter(|line| !line.contains(COMMENT_MARKER))
        .map(|line| line.trim_matches(TRIM_CHARS.as_slice()))
        .collect()
}
