use std::sync::LazyLock;

use regex::Regex;

static ADVERT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AdvertID=(\d+)").unwrap());

const HASH_ID_LEN: usize = 10;

/// Stable short identifier for a job URL.
///
/// Uses the digits of an `AdvertID=<digits>` query pair when present, else the
/// first ten hex characters of the URL's MD5 digest. Same URL, same id, on
/// every run.
pub fn advert_id(url: &str) -> String {
    if let Some(caps) = ADVERT_ID_REGEX.captures(url) {
        return caps[1].to_string();
    }
    let digest = format!("{:x}", md5::compute(url.as_bytes()));
    digest[..HASH_ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::advert_id;

    #[test]
    fn advert_id_digits_are_used_verbatim() {
        assert_eq!(
            advert_id("https://search.jobs.wa.gov.au/page.php?pageID=160&windowUID=0&AdvertID=4821"),
            "4821"
        );
        assert_eq!(advert_id("https://x.example/?AdvertID=0012&other=9"), "0012");
    }

    #[test]
    fn non_numeric_advert_id_falls_back_to_hash() {
        let id = advert_id("https://x.example/?AdvertID=abc");
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_fallback_is_stable_and_distinct() {
        let a = advert_id("https://jobs.example.com/vacancy/42");
        let b = advert_id("https://jobs.example.com/vacancy/42");
        let c = advert_id("https://jobs.example.com/vacancy/43");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn hash_fallback_matches_md5_prefix() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(advert_id(""), "d41d8cd98f");
    }
}
