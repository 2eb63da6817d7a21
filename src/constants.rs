pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "content-security-policy-report-only";
pub(crate) const HEADER_WEBKIT_CSP: &str = "x-webkit-csp";
pub(crate) const HEADER_WEBKIT_CSP_REPORT_ONLY: &str = "x-webkit-csp-report-only";
pub(crate) const HEADER_X_CSP: &str = "x-content-security-policy";
pub(crate) const HEADER_X_CSP_REPORT_ONLY: &str = "x-content-security-policy-report-only";

pub(crate) const CONNECT_SRC: &str = "connect-src";
pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const FRAME_SRC: &str = "frame-src";
pub(crate) const IMG_SRC: &str = "img-src";
pub(crate) const MEDIA_SRC: &str = "media-src";
pub(crate) const OBJECT_SRC: &str = "object-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const SANDBOX: &str = "sandbox";
pub(crate) const REPORT_URI: &str = "report-uri";

pub(crate) const NONE_KEYWORD: &str = "none";
pub(crate) const SELF_KEYWORD: &str = "self";
pub(crate) const UNSAFE_INLINE_KEYWORD: &str = "unsafe-inline";
pub(crate) const UNSAFE_EVAL_KEYWORD: &str = "unsafe-eval";

pub(crate) const ALLOW_FORMS: &str = "allow-forms";
pub(crate) const ALLOW_SAME_ORIGIN: &str = "allow-same-origin";
pub(crate) const ALLOW_SCRIPTS: &str = "allow-scripts";
pub(crate) const ALLOW_TOP_NAVIGATION: &str = "allow-top-navigation";

pub(crate) const WILDCARD: &str = "*";
pub(crate) const DATA_SCHEME: &str = "data:";
pub(crate) const QUOTE: &str = "'";

pub(crate) const SCOPE_ENFORCE: &str = "enforce";
pub(crate) const SCOPE_REPORT_ONLY: &str = "report-only";
pub(crate) const SCOPE_ALL: &str = "all";
pub(crate) const SCOPE_BOTH: &str = "both";

pub(crate) const DIRECTIVE_TERMINATOR: &[u8] = b";";
pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 256;
