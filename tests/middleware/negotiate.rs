use actix_web_csp_compiler::middleware::{negotiate, HeaderPair, HeaderVariant};
use test_case::test_case;

const CHROME_23: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.97 Safari/537.11";
const CHROME_120: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FIREFOX_20: &str = "Mozilla/5.0 (Windows NT 6.1; rv:20.0) Gecko/20100101 Firefox/20.0";
const FIREFOX_120: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";
const MSIE_10: &str = "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)";
const MSIE_9: &str = "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; Trident/5.0)";
const SAFARI_6: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_8_2) AppleWebKit/536.26.17 (KHTML, like Gecko) Version/6.0.2 Safari/536.26.17";

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some(CHROME_23), HeaderVariant::WebKit ; "old chrome")]
    #[test_case(Some(CHROME_120), HeaderVariant::Standard ; "modern chrome")]
    #[test_case(Some(FIREFOX_20), HeaderVariant::Mozilla ; "old firefox")]
    #[test_case(Some(FIREFOX_120), HeaderVariant::Standard ; "modern firefox")]
    #[test_case(Some(MSIE_10), HeaderVariant::Mozilla ; "ie 10")]
    #[test_case(Some(MSIE_9), HeaderVariant::Standard ; "ie 9")]
    #[test_case(Some(SAFARI_6), HeaderVariant::WebKit ; "safari")]
    #[test_case(Some("Version/99 Safari/99999999999999999999999"), HeaderVariant::WebKit ; "safari version beyond u64")]
    #[test_case(Some("Mozilla/5.0 Safari/4294967296"), HeaderVariant::WebKit ; "safari version beyond u32")]
    #[test_case(Some("Chrome/99999999999999999999999 Safari/537.36"), HeaderVariant::Standard ; "chrome version beyond u64")]
    #[test_case(Some("curl/8.4.0"), HeaderVariant::Standard ; "unknown agent")]
    #[test_case(None, HeaderVariant::Standard ; "missing agent")]
    fn test_detect(user_agent: Option<&str>, expected: HeaderVariant) {
        assert_eq!(HeaderVariant::detect(user_agent), expected);
        assert_eq!(negotiate(user_agent), expected.pair());
    }

    #[test]
    fn test_header_pairs() {
        let standard = HeaderPair::default();
        assert_eq!(standard.enforce().as_str(), "content-security-policy");
        assert_eq!(
            standard.report_only().as_str(),
            "content-security-policy-report-only"
        );

        let webkit = HeaderPair::webkit();
        assert_eq!(webkit.enforce().as_str(), "x-webkit-csp");
        assert_eq!(webkit.report_only().as_str(), "x-webkit-csp-report-only");

        let mozilla = HeaderPair::mozilla();
        assert_eq!(mozilla.enforce().as_str(), "x-content-security-policy");
        assert_eq!(
            mozilla.report_only().as_str(),
            "x-content-security-policy-report-only"
        );
    }
}
